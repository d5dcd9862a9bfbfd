//! Candle facial-expression classifier
//!
//! A small CNN over 48x48 grayscale faces with a 7-way softmax head in the
//! label order of [`Emotion::ALL`]. Probabilities are reported in percentage
//! units so the aggregator can treat every backend the same way.

use crate::emotion::{Emotion, EmotionAnalysis, EmotionClassifier, EmotionScore};
use crate::model_loader::{LoadedWeights, ModelConfig};
use candle_core::{Device, Module, Tensor, D};
use candle_nn::{conv2d, linear, Conv2d, Conv2dConfig, Linear, VarBuilder};
use image::imageops::FilterType;
use image::DynamicImage;
use sentiscope_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Input edge length expected by the network
pub const FACE_SIZE: u32 = 48;

/// Which part of the frame is treated as the face
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceRegion {
    /// The whole frame
    #[default]
    Full,
    /// The largest centered square
    Center,
}

/// FER network layers
pub struct FerNet {
    conv1: Conv2d,
    conv2: Conv2d,
    conv3: Conv2d,
    conv4: Conv2d,
    conv5: Conv2d,
    fc1: Linear,
    fc2: Linear,
    fc3: Linear,
}

impl FerNet {
    pub fn new(vb: VarBuilder) -> candle_core::Result<Self> {
        let cfg = Conv2dConfig::default();
        Ok(Self {
            conv1: conv2d(1, 64, 5, cfg, vb.pp("conv1"))?,
            conv2: conv2d(64, 64, 3, cfg, vb.pp("conv2"))?,
            conv3: conv2d(64, 64, 3, cfg, vb.pp("conv3"))?,
            conv4: conv2d(64, 128, 3, cfg, vb.pp("conv4"))?,
            conv5: conv2d(128, 128, 3, cfg, vb.pp("conv5"))?,
            fc1: linear(128, 1024, vb.pp("fc1"))?,
            fc2: linear(1024, 1024, vb.pp("fc2"))?,
            fc3: linear(1024, Emotion::ALL.len(), vb.pp("fc3"))?,
        })
    }
}

impl Module for FerNet {
    // (b, 1, 48, 48) -> (b, 7) logits
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let xs = self
            .conv1
            .forward(xs)?
            .relu()?
            .max_pool2d_with_stride((5, 5), (2, 2))?;
        let xs = self.conv2.forward(&xs)?.relu()?;
        let xs = self
            .conv3
            .forward(&xs)?
            .relu()?
            .avg_pool2d_with_stride((3, 3), (2, 2))?;
        let xs = self.conv4.forward(&xs)?.relu()?;
        let xs = self
            .conv5
            .forward(&xs)?
            .relu()?
            .avg_pool2d_with_stride((3, 3), (2, 2))?;
        let xs = xs.flatten_from(1)?;
        let xs = self.fc1.forward(&xs)?.relu()?;
        let xs = self.fc2.forward(&xs)?.relu()?;
        self.fc3.forward(&xs)
    }
}

/// [`EmotionClassifier`] backed by [`FerNet`]
pub struct FaceEmotionClassifier {
    name: String,
    model: FerNet,
    device: Device,
    region: FaceRegion,
}

impl FaceEmotionClassifier {
    /// Load weights described by `config` and build the network
    pub fn load(config: &ModelConfig, region: FaceRegion) -> Result<Self> {
        let weights = LoadedWeights::load(config)?;
        let classifier = Self::from_var_builder(
            weights.var_builder().clone(),
            weights.device().clone(),
            region,
        )?;

        info!(
            weights = %weights.weights_path().display(),
            region = ?region,
            "Facial emotion classifier ready"
        );
        Ok(classifier)
    }

    /// Build from an existing variable builder
    pub fn from_var_builder(vb: VarBuilder, device: Device, region: FaceRegion) -> Result<Self> {
        let model = FerNet::new(vb)
            .map_err(|e| Error::classifier(format!("Failed to build FER network: {}", e)))?;

        Ok(Self {
            name: "fer-cnn".to_string(),
            model,
            device,
            region,
        })
    }

    pub fn region(&self) -> FaceRegion {
        self.region
    }

    /// Crop, grayscale, resize and scale to [0, 1]
    fn preprocess(&self, image: &DynamicImage) -> Result<Tensor> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(Error::image("image has no pixels"));
        }

        let face = match self.region {
            FaceRegion::Full => image.to_luma8(),
            FaceRegion::Center => {
                let side = width.min(height);
                image
                    .crop_imm((width - side) / 2, (height - side) / 2, side, side)
                    .to_luma8()
            }
        };

        let resized = image::imageops::resize(&face, FACE_SIZE, FACE_SIZE, FilterType::Triangle);
        let pixels: Vec<f32> = resized.into_raw().into_iter().map(|p| p as f32 / 255.0).collect();

        Tensor::from_vec(
            pixels,
            (1, 1, FACE_SIZE as usize, FACE_SIZE as usize),
            &self.device,
        )
        .map_err(|e| Error::classifier(format!("Failed to build input tensor: {}", e)))
    }

    fn probabilities(&self, input: &Tensor) -> candle_core::Result<Vec<f32>> {
        let logits = self.model.forward(input)?;
        let probs = candle_nn::ops::softmax(&logits, D::Minus1)?;
        probs.squeeze(0)?.to_vec1::<f32>()
    }
}

impl EmotionClassifier for FaceEmotionClassifier {
    fn classify(&self, image: &DynamicImage) -> Result<EmotionAnalysis> {
        let input = self.preprocess(image)?;
        let probs = self
            .probabilities(&input)
            .map_err(|e| Error::classifier(format!("Inference failed: {}", e)))?;

        let scores: Vec<EmotionScore> = Emotion::ALL
            .iter()
            .zip(probs)
            .map(|(emotion, p)| EmotionScore::new(emotion.as_str(), p as f64 * 100.0))
            .collect();

        let analysis = EmotionAnalysis::from_scores(scores);
        debug!(dominant = ?analysis.dominant(), "classified face");
        Ok(analysis)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
