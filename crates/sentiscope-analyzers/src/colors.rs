//! Dominant color extraction by median-cut quantization
//!
//! Pixels are sampled, bucketed into a 5-bit-per-channel histogram and the
//! populated buckets are split recursively along their widest channel until
//! the requested number of boxes exists. Boxes are ranked by population and
//! reported as the mean of the pixels they contain.

use image::DynamicImage;
use sentiscope_core::{Error, Result};
use std::collections::HashMap;
use tracing::warn;

/// Default number of colors reported per image
pub const DEFAULT_COLOR_COUNT: usize = 3;

const SIGNIFICANT_BITS: u32 = 5;
const SHIFT: u32 = 8 - SIGNIFICANT_BITS;
const SAMPLE_STEP: usize = 10;
const MIN_ALPHA: u8 = 125;
const WHITE_CUTOFF: u8 = 250;

#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    count: u64,
    sum: [u64; 3],
}

/// Axis-aligned box over quantized color cells
#[derive(Debug, Clone)]
struct ColorBox {
    cells: Vec<([u8; 3], Bucket)>,
}

impl ColorBox {
    fn population(&self) -> u64 {
        self.cells.iter().map(|(_, b)| b.count).sum()
    }

    fn can_split(&self) -> bool {
        self.cells.len() > 1
    }

    /// Channel with the largest range of quantized values
    fn widest_channel(&self) -> usize {
        let mut best = (0, 0u8);
        for channel in 0..3 {
            let min = self.cells.iter().map(|(c, _)| c[channel]).min().unwrap_or(0);
            let max = self.cells.iter().map(|(c, _)| c[channel]).max().unwrap_or(0);
            if max - min > best.1 {
                best = (channel, max - min);
            }
        }
        best.0
    }

    /// Split at the population median of the widest channel
    fn split(mut self) -> (ColorBox, ColorBox) {
        let channel = self.widest_channel();
        self.cells.sort_by_key(|(c, _)| c[channel]);

        let half = self.population() / 2;
        let mut running = 0;
        let mut cut = 1;
        for (idx, (_, bucket)) in self.cells.iter().enumerate() {
            running += bucket.count;
            if running >= half {
                cut = idx + 1;
                break;
            }
        }
        // both halves keep at least one cell
        let cut = cut.clamp(1, self.cells.len() - 1);

        let upper = self.cells.split_off(cut);
        (self, ColorBox { cells: upper })
    }

    fn average(&self) -> [u8; 3] {
        let mut sum = [0u64; 3];
        let mut count = 0u64;
        for (_, bucket) in &self.cells {
            count += bucket.count;
            for channel in 0..3 {
                sum[channel] += bucket.sum[channel];
            }
        }
        let count = count.max(1);
        [
            (sum[0] / count) as u8,
            (sum[1] / count) as u8,
            (sum[2] / count) as u8,
        ]
    }
}

/// Median-cut palette extractor
#[derive(Debug, Clone)]
pub struct ColorExtractor {
    sample_step: usize,
}

impl Default for ColorExtractor {
    fn default() -> Self {
        Self {
            sample_step: SAMPLE_STEP,
        }
    }
}

impl ColorExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample every `step`-th pixel instead of the default every 10th
    pub fn with_sample_step(mut self, step: usize) -> Self {
        self.sample_step = step.max(1);
        self
    }

    /// Up to `count` dominant colors as lowercase `#rrggbb`, most dominant first
    pub fn try_extract(&self, image: &DynamicImage, count: usize) -> Result<Vec<String>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let histogram = self.histogram(image);
        if histogram.is_empty() {
            return Err(Error::image("no usable pixels for color extraction"));
        }

        let mut boxes = vec![ColorBox {
            cells: histogram.into_iter().collect(),
        }];

        while boxes.len() < count {
            // most populated splittable box next
            let Some(idx) = boxes
                .iter()
                .enumerate()
                .filter(|(_, b)| b.can_split())
                .max_by_key(|(_, b)| b.population())
                .map(|(idx, _)| idx)
            else {
                break;
            };

            let (lower, upper) = boxes.swap_remove(idx).split();
            boxes.push(lower);
            boxes.push(upper);
        }

        boxes.sort_by(|a, b| b.population().cmp(&a.population()));

        Ok(boxes
            .iter()
            .map(|b| {
                let [r, g, bl] = b.average();
                format!("#{:02x}{:02x}{:02x}", r, g, bl)
            })
            .collect())
    }

    /// Decode and extract; any failure yields an empty palette
    pub fn extract(&self, bytes: &[u8], count: usize) -> Vec<String> {
        let image = match image::load_from_memory(bytes) {
            Ok(image) => image,
            Err(e) => {
                warn!("Color extraction skipped, image could not be decoded: {}", e);
                return Vec::new();
            }
        };
        self.extract_from_image(&image, count)
    }

    /// Extract from a decoded image; any failure yields an empty palette
    pub fn extract_from_image(&self, image: &DynamicImage, count: usize) -> Vec<String> {
        match self.try_extract(image, count) {
            Ok(colors) => colors,
            Err(e) => {
                warn!("Color extraction failed: {}", e);
                Vec::new()
            }
        }
    }

    fn histogram(&self, image: &DynamicImage) -> HashMap<[u8; 3], Bucket> {
        let rgba = image.to_rgba8();
        let mut histogram: HashMap<[u8; 3], Bucket> = HashMap::new();

        for pixel in rgba.pixels().step_by(self.sample_step) {
            let [r, g, b, a] = pixel.0;
            if a < MIN_ALPHA {
                continue;
            }
            if r > WHITE_CUTOFF && g > WHITE_CUTOFF && b > WHITE_CUTOFF {
                continue;
            }

            let key = [r >> SHIFT, g >> SHIFT, b >> SHIFT];
            let bucket = histogram.entry(key).or_default();
            bucket.count += 1;
            bucket.sum[0] += r as u64;
            bucket.sum[1] += g as u64;
            bucket.sum[2] += b as u64;
        }

        histogram
    }
}
