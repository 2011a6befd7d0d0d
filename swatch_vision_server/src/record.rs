//! Persisted color records and the checks a record must pass before it is stored.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use swatch_vision::{ColorSample, ConversionError, Hsl, Rgb, hex_to_rgb};
use thiserror::Error;

/// A saved color, as written to the store and returned by `fetch_latest`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredColorRecord {
    pub uuid: String,
    pub hex: String,
    pub rgb: Rgb,
    pub hsl: Hsl,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("hex {hex} does not match rgb, expected {expected}")]
    HexMismatch { hex: String, expected: String },

    #[error("hsl {field} value {value} is out of range")]
    HslOutOfRange { field: &'static str, value: f64 },

    #[error("hsl {field} value {value} does not match rgb, expected {expected}")]
    HslMismatch {
        field: &'static str,
        value: f64,
        expected: f64,
    },
}

/// Largest hue difference, in degrees, still read as the same color.
const HUE_TOLERANCE: f64 = 0.5;
/// Largest saturation or lightness difference still read as the same color.
const FRACTION_TOLERANCE: f64 = 0.005;

/// A color that passed validation and is ready to be appended.
///
/// The only ways to build one are from a [`ColorSample`] (consistent by construction)
/// or through [`NewColorRecord::validated`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewColorRecord {
    uuid: Option<String>,
    rgb: Rgb,
    hsl: Hsl,
}

impl NewColorRecord {
    pub fn from_sample(sample: &ColorSample, uuid: Option<String>) -> Self {
        Self {
            uuid: normalize_uuid(uuid),
            rgb: sample.rgb(),
            hsl: sample.hsl(),
        }
    }

    /// Checks untrusted fields. Channels must be in `0..=255`, `hex` must encode the
    /// same color as the channels (either case; stored lowercase), hue must lie in
    /// `[0, 360)` and saturation/lightness in `[0, 1]`. The HSL must also describe the
    /// channels, within a rounding tolerance; the stored HSL is recomputed from them.
    pub fn validated(
        uuid: Option<String>,
        hex: &str,
        (r, g, b): (i64, i64, i64),
        hsl: Hsl,
    ) -> Result<Self, ValidationError> {
        let rgb = Rgb::try_from_channels(r, g, b)?;
        if hex_to_rgb(hex)? != rgb {
            return Err(ValidationError::HexMismatch {
                hex: hex.to_string(),
                expected: rgb.hex(),
            });
        }

        check_range("hue", hsl.hue, 0.0, 360.0, false)?;
        check_range("saturation", hsl.saturation, 0.0, 1.0, true)?;
        check_range("lightness", hsl.lightness, 0.0, 1.0, true)?;

        let derived = rgb.hsl();
        check_matches("saturation", hsl.saturation, derived.saturation, FRACTION_TOLERANCE)?;
        check_matches("lightness", hsl.lightness, derived.lightness, FRACTION_TOLERANCE)?;
        // Gray has no hue; any submitted value is accepted.
        if derived.saturation > 0.0 {
            let diff = (hsl.hue - derived.hue).abs();
            if diff.min(360.0 - diff) > HUE_TOLERANCE {
                return Err(ValidationError::HslMismatch {
                    field: "hue",
                    value: hsl.hue,
                    expected: derived.hue,
                });
            }
        }

        Ok(Self {
            uuid: normalize_uuid(uuid),
            rgb,
            hsl: derived,
        })
    }

    pub fn rgb(&self) -> Rgb {
        self.rgb
    }

    /// Stamps the record. A missing client uuid is replaced with a fresh v4 uuid.
    pub fn into_stored(self, created_at: u64) -> StoredColorRecord {
        StoredColorRecord {
            uuid: self
                .uuid
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            hex: self.rgb.hex(),
            rgb: self.rgb,
            hsl: self.hsl,
            created_at,
        }
    }
}

fn normalize_uuid(uuid: Option<String>) -> Option<String> {
    uuid.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}

fn check_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
    max_inclusive: bool,
) -> Result<(), ValidationError> {
    let below_max = if max_inclusive { value <= max } else { value < max };
    if value.is_finite() && value >= min && below_max {
        Ok(())
    } else {
        Err(ValidationError::HslOutOfRange { field, value })
    }
}

fn check_matches(
    field: &'static str,
    value: f64,
    expected: f64,
    tolerance: f64,
) -> Result<(), ValidationError> {
    if (value - expected).abs() <= tolerance {
        Ok(())
    } else {
        Err(ValidationError::HslMismatch {
            field,
            value,
            expected,
        })
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
