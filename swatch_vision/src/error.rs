//! Error types for the sampling pipeline.
//!
//! Input problems (frames too small, reads past the edge, undecodable bytes) are fatal to
//! one extraction and surface to the caller unchanged. Nothing in here is retried.

use thiserror::Error;

/// The frame handed to the extractor cannot be sampled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("frame {width}x{height} is smaller than the {min}x{min} sampling minimum")]
    FrameTooSmall { width: u32, height: u32, min: u32 },

    #[error("{size}x{size} region at ({x}, {y}) falls outside the {width}x{height} frame")]
    RegionOutOfBounds {
        x: u32,
        y: u32,
        size: u32,
        width: u32,
        height: u32,
    },

    #[error("RGBA buffer holds {got} bytes, {width}x{height} needs {expected}")]
    BufferSizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        got: usize,
    },

    #[error("sample size must be at least 1 pixel")]
    EmptySampleSize,

    #[error("failed to decode frame: {0}")]
    Decode(String),
}

/// A value handed to the color math is outside the representable range.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("{channel} channel value {value} is outside 0..=255")]
    ChannelOutOfRange { channel: &'static str, value: i64 },

    #[error("malformed hex color {0:?}, expected #rrggbb")]
    MalformedHex(String),
}

/// A platform collaborator (clipboard, exporter, frame source) failed.
#[derive(Error, Debug)]
pub enum CollaboratorError {
    #[error("clipboard write failed: {0}")]
    Clipboard(String),

    #[error("export of {name} failed: {reason}")]
    Export { name: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum SwatchError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    #[error("sampling task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, SwatchError>;
