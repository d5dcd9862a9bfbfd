//! SentiScope HTTP server
//!
//! Exposes text, image, emotion-only and CSV batch sentiment analysis over
//! JSON and multipart endpoints.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod uploads;

pub use config::{ConfigOverrides, ServerConfig};
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
