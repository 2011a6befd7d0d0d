// THEORY:
// The `pipeline` module is the top-level API of the sampler. It turns one captured frame
// into the six-color answer the picker displays:
//
//   frame -> PositionPlanner (frame size) -> RegionSampler (per anchor)
//         -> ColorMath (per region) -> FrameColorResult [center, p1..p5]
//
// The six region computations are independent: each one reads a disjoint block of an
// immutable snapshot and produces its own sample. They run as separate tokio tasks over
// a shared `RasterBuffer` (an `Arc` clone, not a pixel copy) and are joined before the
// result is assembled, so the output order never depends on which task finishes first.
//
// Frames below the planner's minimum size fail before any task is spawned.

use crate::core_modules::collaborators::FrameSource;
use crate::core_modules::color_sample::{ColorSample, FRAME_SAMPLE_COUNT, FrameColorResult};
use crate::core_modules::position_planner::{Position, SamplingPlan};
use crate::core_modules::raster::RasterBuffer;
use crate::core_modules::region_sampler::{DEFAULT_SAMPLE_SIZE, sample_region};
use crate::error::{Result, SwatchError};
use futures::future::join_all;
use std::time::Instant;
use tracing::{debug, info};

/// Configuration for the FrameColorExtractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Edge length of each square sample region, in pixels.
    pub sample_size: u32,
    /// Whether each sample carries its CMYK representation.
    pub include_cmyk: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            include_cmyk: true,
        }
    }
}

impl ExtractorConfig {
    pub fn builder() -> ExtractorConfigBuilder {
        ExtractorConfigBuilder::default()
    }
}

#[derive(Default)]
pub struct ExtractorConfigBuilder {
    sample_size: Option<u32>,
    include_cmyk: Option<bool>,
}

impl ExtractorConfigBuilder {
    pub fn sample_size(mut self, sample_size: u32) -> Self {
        self.sample_size = Some(sample_size);
        self
    }

    pub fn include_cmyk(mut self, include_cmyk: bool) -> Self {
        self.include_cmyk = Some(include_cmyk);
        self
    }

    pub fn build(self) -> ExtractorConfig {
        let default = ExtractorConfig::default();
        ExtractorConfig {
            sample_size: self.sample_size.unwrap_or(default.sample_size),
            include_cmyk: self.include_cmyk.unwrap_or(default.include_cmyk),
        }
    }
}

/// A captured frame together with the colors extracted from it.
#[derive(Debug, Clone)]
pub struct CaptureReport {
    pub frame: RasterBuffer,
    pub colors: FrameColorResult,
}

/// Stateless orchestrator; one instance can serve any number of captures.
#[derive(Debug, Clone, Default)]
pub struct FrameColorExtractor {
    config: ExtractorConfig,
}

impl FrameColorExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Samples the center and the five peripheral regions of `buffer`.
    pub async fn extract(&self, buffer: &RasterBuffer) -> Result<FrameColorResult> {
        let started = Instant::now();
        let sample_size = self.config.sample_size;
        let include_cmyk = self.config.include_cmyk;
        let plan = SamplingPlan::checked(buffer.width(), buffer.height(), sample_size)?;

        let tasks = plan.ordered().into_iter().map(|position| {
            let snapshot = buffer.clone();
            tokio::spawn(async move {
                let rgb = sample_region(&snapshot, position, sample_size)?;
                debug!(x = position.x, y = position.y, r = rgb.r, g = rgb.g, b = rgb.b, "Sampled region");
                Ok::<_, SwatchError>(ColorSample::from_rgb(rgb, include_cmyk))
            })
        });

        let mut samples = Vec::with_capacity(FRAME_SAMPLE_COUNT);
        for joined in join_all(tasks).await {
            let sample = joined.map_err(|e| SwatchError::Task(e.to_string()))??;
            samples.push(sample);
        }

        let [center, p1, p2, p3, p4, p5]: [ColorSample; FRAME_SAMPLE_COUNT] = samples
            .try_into()
            .map_err(|_| SwatchError::Task("sampling produced a partial frame".to_string()))?;
        let result = FrameColorResult::new(center, [p1, p2, p3, p4, p5]);

        info!(
            width = buffer.width(),
            height = buffer.height(),
            center = %result.center().hex(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "Extracted frame colors"
        );
        Ok(result)
    }

    /// Captures a frame from `source` and extracts its colors. Decode failures from the
    /// source are returned as-is.
    pub async fn capture_and_extract(&self, source: &dyn FrameSource) -> Result<CaptureReport> {
        let frame = source.capture()?;
        let colors = self.extract(&frame).await?;
        Ok(CaptureReport { frame, colors })
    }

    /// The anchors `extract` would sample for a frame of this size.
    pub fn plan(&self, width: u32, height: u32) -> Result<[Position; FRAME_SAMPLE_COUNT]> {
        Ok(SamplingPlan::checked(width, height, self.config.sample_size)?.ordered())
    }
}
