// THEORY:
// Camera access, the clipboard and "save snapshot to disk" are platform concerns, not
// sampling concerns. The extractor only ever sees them through the three narrow traits
// below, so a webcam, a file on disk or a test fixture are interchangeable frame sources,
// and a real system clipboard can stand in for the in-process one without touching the
// pipeline.

use crate::core_modules::raster::RasterBuffer;
use crate::error::{CollaboratorError, InputError, Result};
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

/// Produces one still frame per call.
pub trait FrameSource: Send + Sync {
    fn capture(&self) -> Result<RasterBuffer>;
}

/// Receives text from a "copy" action.
pub trait Clipboard: Send + Sync {
    fn write(&self, text: &str) -> Result<()>;
}

/// Persists an exported file under `name` and reports where it went.
pub trait FileExporter: Send + Sync {
    fn save(&self, bytes: &[u8], name: &str) -> Result<PathBuf>;
}

/// Reads and decodes an encoded image file on every capture.
#[derive(Debug, Clone)]
pub struct ImageFileSource {
    path: PathBuf,
}

impl ImageFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSource for ImageFileSource {
    fn capture(&self) -> Result<RasterBuffer> {
        let bytes = std::fs::read(&self.path).map_err(|e| {
            InputError::Decode(format!("{}: {}", self.path.display(), e))
        })?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "Read still frame");
        RasterBuffer::decode(&bytes)
    }
}

/// Serves encoded frame bytes already in memory, e.g. an uploaded screenshot.
#[derive(Debug, Clone)]
pub struct EncodedFrameSource {
    bytes: Vec<u8>,
}

impl EncodedFrameSource {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl FrameSource for EncodedFrameSource {
    fn capture(&self) -> Result<RasterBuffer> {
        RasterBuffer::decode(&self.bytes)
    }
}

/// In-process clipboard that remembers the last text written to it.
#[derive(Debug, Default)]
pub struct ClipboardBuffer {
    contents: Mutex<Option<String>>,
}

impl ClipboardBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl Clipboard for ClipboardBuffer {
    fn write(&self, text: &str) -> Result<()> {
        let mut guard = self
            .contents
            .lock()
            .map_err(|_| CollaboratorError::Clipboard("clipboard lock poisoned".to_string()))?;
        *guard = Some(text.to_string());
        Ok(())
    }
}

/// Writes exported files into one directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectoryExporter {
    dir: PathBuf,
}

impl DirectoryExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl FileExporter for DirectoryExporter {
    fn save(&self, bytes: &[u8], name: &str) -> Result<PathBuf> {
        let file_name = Path::new(name);
        if name.is_empty() || file_name.file_name() != Some(file_name.as_os_str()) {
            return Err(CollaboratorError::Export {
                name: name.to_string(),
                reason: "name must be a plain file name".to_string(),
            }
            .into());
        }

        std::fs::create_dir_all(&self.dir).map_err(CollaboratorError::from)?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, bytes).map_err(CollaboratorError::from)?;
        info!(path = %path.display(), bytes = bytes.len(), "Exported file");
        Ok(path)
    }
}

/// Encodes a frame snapshot as PNG.
pub fn encode_png(buffer: &RasterBuffer) -> Result<Vec<u8>> {
    let mut encoded = Vec::new();
    PngEncoder::new(&mut encoded)
        .write_image(
            buffer.as_bytes(),
            buffer.width(),
            buffer.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| CollaboratorError::Export {
            name: "snapshot.png".to_string(),
            reason: e.to_string(),
        })?;
    Ok(encoded)
}
