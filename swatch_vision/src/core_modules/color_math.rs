// THEORY:
// `color_math` holds the pure numeric conversions the picker reports. Every function
// here is stateless and deterministic; nothing reads a buffer or touches I/O.
//
// RGB is the source of truth. Hex, HSL and CMYK are always *derived* from one 8-bit
// triple, so they can be recomputed at any time and can never drift apart. Channel
// types are `u8`, which moves the "inputs must be in 0..=255" contract into the type
// system; the only place an out-of-range channel can still show up is untrusted input
// (a JSON body, a hex string), and those go through the fallible constructors below.

use crate::error::ConversionError;
use serde::{Deserialize, Serialize};

/// An 8-bit sRGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// HSL with hue in degrees `[0, 360)` and saturation/lightness in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

/// Naive (uncalibrated) CMYK, each component in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Cmyk {
    pub c: f64,
    pub m: f64,
    pub y: f64,
    pub k: f64,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a triple from untrusted integers, rejecting anything outside `0..=255`.
    pub fn try_from_channels(r: i64, g: i64, b: i64) -> Result<Self, ConversionError> {
        Ok(Self {
            r: channel("red", r)?,
            g: channel("green", g)?,
            b: channel("blue", b)?,
        })
    }

    pub fn hex(self) -> String {
        rgb_to_hex(self.r, self.g, self.b)
    }

    pub fn hsl(self) -> Hsl {
        rgb_to_hsl(self.r, self.g, self.b)
    }

    pub fn cmyk(self) -> Cmyk {
        rgb_to_cmyk(self.r, self.g, self.b)
    }
}

fn channel(name: &'static str, value: i64) -> Result<u8, ConversionError> {
    u8::try_from(value).map_err(|_| ConversionError::ChannelOutOfRange {
        channel: name,
        value,
    })
}

/// `#rrggbb`, lowercase, zero padded: the hex encoding of `r*65536 + g*256 + b`.
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    let packed = (r as u32) << 16 | (g as u32) << 8 | b as u32;
    format!("#{packed:06x}")
}

/// Inverse of [`rgb_to_hex`]. Accepts `#` followed by exactly six hex digits in
/// either case.
pub fn hex_to_rgb(hex: &str) -> Result<Rgb, ConversionError> {
    let malformed = || ConversionError::MalformedHex(hex.to_string());
    let digits = hex.strip_prefix('#').ok_or_else(malformed)?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(malformed());
    }
    let packed = u32::from_str_radix(digits, 16).map_err(|_| malformed())?;
    Ok(Rgb::new(
        (packed >> 16) as u8,
        (packed >> 8) as u8,
        packed as u8,
    ))
}

pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    let red = r as f64 / 255.0;
    let green = g as f64 / 255.0;
    let blue = b as f64 / 255.0;

    let maximum_channel = red.max(green.max(blue));
    let minimum_channel = red.min(green.min(blue));
    let lightness = (maximum_channel + minimum_channel) / 2.0;

    // Achromatic: hue is undefined, report 0.
    if maximum_channel == minimum_channel {
        return Hsl {
            hue: 0.0,
            saturation: 0.0,
            lightness,
        };
    }

    let chroma = maximum_channel - minimum_channel;
    let saturation = if lightness > 0.5 {
        chroma / (2.0 - maximum_channel - minimum_channel)
    } else {
        chroma / (maximum_channel + minimum_channel)
    };

    let sector = if maximum_channel == red {
        ((green - blue) / chroma) % 6.0
    } else if maximum_channel == green {
        (blue - red) / chroma + 2.0
    } else {
        (red - green) / chroma + 4.0
    };

    let mut hue = sector * 60.0;
    if hue < 0.0 {
        hue += 360.0;
    }

    Hsl {
        hue,
        saturation,
        lightness,
    }
}

pub fn rgb_to_cmyk(r: u8, g: u8, b: u8) -> Cmyk {
    let c = 1.0 - r as f64 / 255.0;
    let m = 1.0 - g as f64 / 255.0;
    let y = 1.0 - b as f64 / 255.0;
    let k = c.min(m.min(y));

    if k < 1.0 {
        Cmyk {
            c: (c - k) / (1.0 - k),
            m: (m - k) / (1.0 - k),
            y: (y - k) / (1.0 - k),
            k,
        }
    } else {
        Cmyk {
            c: 0.0,
            m: 0.0,
            y: 0.0,
            k: 1.0,
        }
    }
}
