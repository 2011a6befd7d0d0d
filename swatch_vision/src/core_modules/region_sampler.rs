// THEORY:
// The `RegionSampler` turns a square block of pixels into one representative color.
// A single pixel from a webcam frame is noisy (sensor grain, JPEG block artifacts); the
// mean over a 10x10 block cancels most of that out while staying small enough to
// describe "the color at this spot".
//
// Key points:
// 1.  **Spatial pooling**: red, green and blue are summed over every pixel of the
//     block and divided by the pixel count with integer (floor) division. A block of a
//     single constant color therefore averages back to exactly that color.
// 2.  **Alpha is ignored**: it is read along with the rest of the pixel but never
//     contributes to the result.
// 3.  **No clamping**: a block that would extend past the frame edge is an error. The
//     `PositionPlanner` guarantees in-bounds anchors for frames that pass its minimum
//     size check; anything else reaching this point is a caller bug and is reported,
//     not silently shrunk.

use crate::core_modules::color_math::Rgb;
use crate::core_modules::pixel::pixel::CHANNELS;
use crate::core_modules::position_planner::Position;
use crate::core_modules::raster::RasterBuffer;
use crate::error::{InputError, Result};

/// Edge length, in pixels, of a sample region unless configured otherwise.
pub const DEFAULT_SAMPLE_SIZE: u32 = 10;

/// Averages the `size` x `size` block whose top-left corner is `position`.
pub fn sample_region(buffer: &RasterBuffer, position: Position, size: u32) -> Result<Rgb> {
    if size == 0 {
        return Err(InputError::EmptySampleSize.into());
    }

    let fits_x = position.x as u64 + size as u64 <= buffer.width() as u64;
    let fits_y = position.y as u64 + size as u64 <= buffer.height() as u64;
    if !fits_x || !fits_y {
        return Err(InputError::RegionOutOfBounds {
            x: position.x,
            y: position.y,
            size,
            width: buffer.width(),
            height: buffer.height(),
        }
        .into());
    }

    let mut sum_r = 0u64;
    let mut sum_g = 0u64;
    let mut sum_b = 0u64;

    for y in position.y..position.y + size {
        let row = buffer.row(position.x, y, size)?;
        for pixel in row.chunks_exact(CHANNELS) {
            sum_r += pixel[0] as u64;
            sum_g += pixel[1] as u64;
            sum_b += pixel[2] as u64;
        }
    }

    let pixel_count = size as u64 * size as u64;
    Ok(Rgb::new(
        (sum_r / pixel_count) as u8,
        (sum_g / pixel_count) as u8,
        (sum_b / pixel_count) as u8,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel::pixel::Pixel;
    use crate::error::SwatchError;

    /// Frame whose pixel at (x, y) is (x, y, x + y) with a varying alpha.
    fn gradient(width: u32, height: u32) -> RasterBuffer {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[x as u8, y as u8, (x + y) as u8, (x * 7) as u8]);
            }
        }
        RasterBuffer::from_rgba(width, height, data).unwrap()
    }

    #[test]
    fn constant_region_has_no_rounding_drift() {
        let buffer = RasterBuffer::filled(20, 20, Pixel::new(17, 201, 99, 3));
        let rgb = sample_region(&buffer, Position::new(5, 5), DEFAULT_SAMPLE_SIZE).unwrap();
        assert_eq!(rgb, Rgb::new(17, 201, 99));
    }

    #[test]
    fn averages_with_floor_division() {
        let buffer = gradient(20, 20);
        // x in 0..10 averages to 4.5, y in 2..12 to 6.5, x + y to 11.
        let rgb = sample_region(&buffer, Position::new(0, 2), 10).unwrap();
        assert_eq!(rgb, Rgb::new(4, 6, 11));
    }

    #[test]
    fn alpha_does_not_contribute() {
        let mut data = Vec::new();
        for alpha in 0..4u8 {
            data.extend_from_slice(&[100, 50, 25, alpha * 80]);
        }
        let buffer = RasterBuffer::from_rgba(2, 2, data).unwrap();
        assert_eq!(
            sample_region(&buffer, Position::new(0, 0), 2).unwrap(),
            Rgb::new(100, 50, 25)
        );
    }

    #[test]
    fn region_touching_the_edge_is_allowed() {
        let buffer = gradient(30, 30);
        assert!(sample_region(&buffer, Position::new(20, 20), 10).is_ok());
    }

    #[test]
    fn region_past_the_edge_is_an_input_error() {
        let buffer = gradient(30, 30);
        let err = sample_region(&buffer, Position::new(21, 0), 10).unwrap_err();
        assert!(matches!(
            err,
            SwatchError::Input(InputError::RegionOutOfBounds {
                x: 21,
                y: 0,
                size: 10,
                ..
            })
        ));
        assert!(sample_region(&buffer, Position::new(0, 25), 10).is_err());
        assert!(sample_region(&buffer, Position::new(u32::MAX, 0), 10).is_err());
    }

    #[test]
    fn zero_size_is_rejected() {
        let buffer = gradient(10, 10);
        assert!(matches!(
            sample_region(&buffer, Position::new(0, 0), 0),
            Err(SwatchError::Input(InputError::EmptySampleSize))
        ));
    }
}
