// THEORY:
// `RasterBuffer` is the snapshot of one captured frame. The capture side hands it over
// once and the extraction side only ever reads it, so the pixel storage lives behind an
// `Arc<[u8]>`: cloning a buffer to move it into a sampling task is a refcount bump, and
// there is no API that can mutate the bytes after construction. That is what makes the
// six region reads safe to run concurrently without any locking.
//
// Layout is tightly packed RGBA8, row-major, no padding between rows.

use crate::core_modules::pixel::pixel::{CHANNELS, Pixel};
use crate::error::{InputError, Result};
use image::{DynamicImage, RgbaImage};
use std::sync::Arc;

/// An immutable, shareable RGBA8 frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    data: Arc<[u8]>,
}

impl RasterBuffer {
    /// Wraps an already packed RGBA8 buffer. The length must be exactly
    /// `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, data: impl Into<Arc<[u8]>>) -> Result<Self> {
        let data = data.into();
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(InputError::BufferSizeMismatch {
                width,
                height,
                expected,
                got: data.len(),
            }
            .into());
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A frame where every pixel is `pixel`.
    pub fn filled(width: u32, height: u32, pixel: Pixel) -> Self {
        let pixel_count = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixel_count * CHANNELS);
        for _ in 0..pixel_count {
            data.extend_from_slice(&pixel.to_bytes());
        }
        Self {
            width,
            height,
            data: data.into(),
        }
    }

    /// Converts any decoded image into an RGBA8 snapshot.
    pub fn from_image(image: DynamicImage) -> Self {
        Self::from(image.to_rgba8())
    }

    /// Decodes an encoded still frame (JPEG, PNG, ...). The format is guessed from the
    /// bytes themselves.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let image =
            image::load_from_memory(bytes).map_err(|e| InputError::Decode(e.to_string()))?;
        Ok(Self::from_image(image))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel_at(&self, x: u32, y: u32) -> Result<Pixel> {
        let row = self.row(x, y, 1)?;
        Pixel::from_slice(row).ok_or_else(|| {
            InputError::RegionOutOfBounds {
                x,
                y,
                size: 1,
                width: self.width,
                height: self.height,
            }
            .into()
        })
    }

    /// Returns `len` consecutive pixels of row `y`, starting at column `x`, as raw bytes.
    pub fn row(&self, x: u32, y: u32, len: u32) -> Result<&[u8]> {
        let end_x = x as u64 + len as u64;
        if y >= self.height || end_x > self.width as u64 {
            return Err(InputError::RegionOutOfBounds {
                x,
                y,
                size: len,
                width: self.width,
                height: self.height,
            }
            .into());
        }
        let start = (y as usize * self.width as usize + x as usize) * CHANNELS;
        let end = start + len as usize * CHANNELS;
        Ok(&self.data[start..end])
    }
}

impl From<RgbaImage> for RasterBuffer {
    fn from(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.into_raw().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SwatchError;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    #[test]
    fn from_rgba_rejects_wrong_length() {
        let err = RasterBuffer::from_rgba(2, 2, vec![0u8; 15]).unwrap_err();
        assert!(matches!(
            err,
            SwatchError::Input(InputError::BufferSizeMismatch {
                expected: 16,
                got: 15,
                ..
            })
        ));
    }

    #[test]
    fn pixel_at_reads_row_major() {
        let mut data = vec![0u8; 3 * 2 * 4];
        // (x=2, y=1) is the last pixel
        data[20..24].copy_from_slice(&[9, 8, 7, 6]);
        let buffer = RasterBuffer::from_rgba(3, 2, data).unwrap();
        assert_eq!(buffer.pixel_at(2, 1).unwrap(), Pixel::new(9, 8, 7, 6));
        assert_eq!(buffer.pixel_at(0, 0).unwrap(), Pixel::default());
    }

    #[test]
    fn row_past_right_edge_is_out_of_bounds() {
        let buffer = RasterBuffer::filled(10, 10, Pixel::opaque(1, 2, 3));
        assert!(buffer.row(5, 0, 5).is_ok());
        assert!(matches!(
            buffer.row(6, 0, 5),
            Err(SwatchError::Input(InputError::RegionOutOfBounds { .. }))
        ));
        assert!(buffer.row(0, 10, 1).is_err());
    }

    #[test]
    fn decode_png_bytes() {
        let image = RgbaImage::from_pixel(4, 3, Rgba([12, 34, 56, 255]));
        let mut encoded = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
            .unwrap();

        let buffer = RasterBuffer::decode(&encoded).unwrap();
        assert_eq!((buffer.width(), buffer.height()), (4, 3));
        assert_eq!(buffer.pixel_at(3, 2).unwrap(), Pixel::opaque(12, 34, 56));
    }

    #[test]
    fn decode_garbage_is_an_input_error() {
        let err = RasterBuffer::decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, SwatchError::Input(InputError::Decode(_))));
    }

    #[test]
    fn clones_share_storage() {
        let buffer = RasterBuffer::filled(8, 8, Pixel::opaque(0, 0, 0));
        let copy = buffer.clone();
        assert!(std::ptr::eq(buffer.as_bytes(), copy.as_bytes()));
    }
}
