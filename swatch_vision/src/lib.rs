// THEORY:
// This file is the entry point for the `swatch_vision` library crate. It exposes the
// sampling pipeline as a small public API: hand the `FrameColorExtractor` a captured
// frame and get back six colors, center first, each as hex, RGB, HSL and CMYK.
//
// The building blocks live in `core_modules` (pixel storage, color math, the position
// policy, region averaging, and the narrow collaborator traits for camera, clipboard and
// file export). They are public so that servers and tools can reuse the color math on
// its own, but the intended entry point is `pipeline`.

pub mod core_modules;
pub mod error;
pub mod logger;
pub mod pipeline;

pub use core_modules::collaborators::{Clipboard, FileExporter, FrameSource};
pub use core_modules::color_math::{Cmyk, Hsl, Rgb, hex_to_rgb, rgb_to_cmyk, rgb_to_hex, rgb_to_hsl};
pub use core_modules::color_sample::{ColorFormat, ColorSample, FrameColorResult};
pub use core_modules::position_planner::{Position, SamplingPlan, plan_positions};
pub use core_modules::raster::RasterBuffer;
pub use core_modules::region_sampler::{DEFAULT_SAMPLE_SIZE, sample_region};
pub use error::{ConversionError, InputError, Result, SwatchError};
pub use pipeline::{CaptureReport, ExtractorConfig, FrameColorExtractor};
