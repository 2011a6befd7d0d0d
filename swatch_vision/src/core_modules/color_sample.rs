// THEORY:
// A `ColorSample` is what the picker shows for one sampled region: the averaged RGB
// triple plus the same color as hex, HSL and (optionally) CMYK. RGB is the only input;
// every other field is computed from it in `from_rgb`, and the fields are private so
// nothing can set a hex or HSL value that disagrees with the RGB it came from.
//
// CMYK is carried only when asked for. It is always recomputable from RGB, so the
// clipboard formatter derives it on the fly when the sample was built without it.
//
// A `FrameColorResult` is the fixed six-sample answer for one capture: the center
// sample first, then the five peripheral samples in planner order.

use crate::core_modules::color_math::{Cmyk, Hsl, Rgb};
use crate::core_modules::position_planner::PERIPHERAL_COUNT;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Number of samples in a [`FrameColorResult`].
pub const FRAME_SAMPLE_COUNT: usize = PERIPHERAL_COUNT + 1;

/// One averaged region, in every representation the picker reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorSample {
    hex: String,
    rgb: Rgb,
    hsl: Hsl,
    #[serde(skip_serializing_if = "Option::is_none")]
    cmyk: Option<Cmyk>,
}

impl ColorSample {
    pub fn from_rgb(rgb: Rgb, with_cmyk: bool) -> Self {
        Self {
            hex: rgb.hex(),
            rgb,
            hsl: rgb.hsl(),
            cmyk: with_cmyk.then(|| rgb.cmyk()),
        }
    }

    pub fn hex(&self) -> &str {
        &self.hex
    }

    pub fn rgb(&self) -> Rgb {
        self.rgb
    }

    pub fn hsl(&self) -> Hsl {
        self.hsl
    }

    pub fn cmyk(&self) -> Option<Cmyk> {
        self.cmyk
    }

    /// The text a "copy" action puts on the clipboard for `format`.
    pub fn clipboard_text(&self, format: ColorFormat) -> String {
        match format {
            ColorFormat::Hex => self.hex.clone(),
            ColorFormat::Rgb => format!("rgb({}, {}, {})", self.rgb.r, self.rgb.g, self.rgb.b),
            ColorFormat::Hsl => format!(
                "hsl({:.0}, {:.0}%, {:.0}%)",
                self.hsl.hue,
                self.hsl.saturation * 100.0,
                self.hsl.lightness * 100.0
            ),
            ColorFormat::Cmyk => {
                let cmyk = self.cmyk.unwrap_or_else(|| self.rgb.cmyk());
                format!(
                    "cmyk({:.2}, {:.2}, {:.2}, {:.2})",
                    cmyk.c, cmyk.m, cmyk.y, cmyk.k
                )
            }
        }
    }
}

impl fmt::Display for ColorSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {}  {}",
            self.hex,
            self.clipboard_text(ColorFormat::Rgb),
            self.clipboard_text(ColorFormat::Hsl)
        )?;
        if self.cmyk.is_some() {
            write!(f, "  {}", self.clipboard_text(ColorFormat::Cmyk))?;
        }
        Ok(())
    }
}

/// A representation a sample can be copied as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorFormat {
    Hex,
    Rgb,
    Hsl,
    Cmyk,
}

impl FromStr for ColorFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hex" => Ok(Self::Hex),
            "rgb" => Ok(Self::Rgb),
            "hsl" => Ok(Self::Hsl),
            "cmyk" => Ok(Self::Cmyk),
            other => Err(format!("unknown color format {other:?}, expected hex|rgb|hsl|cmyk")),
        }
    }
}

impl fmt::Display for ColorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hex => "hex",
            Self::Rgb => "rgb",
            Self::Hsl => "hsl",
            Self::Cmyk => "cmyk",
        };
        f.write_str(name)
    }
}

/// The six samples of one capture, center first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FrameColorResult {
    samples: [ColorSample; FRAME_SAMPLE_COUNT],
}

impl FrameColorResult {
    pub fn new(center: ColorSample, peripheral: [ColorSample; PERIPHERAL_COUNT]) -> Self {
        let [p1, p2, p3, p4, p5] = peripheral;
        Self {
            samples: [center, p1, p2, p3, p4, p5],
        }
    }

    pub fn center(&self) -> &ColorSample {
        &self.samples[0]
    }

    pub fn peripheral(&self) -> &[ColorSample] {
        &self.samples[1..]
    }

    pub fn samples(&self) -> &[ColorSample; FRAME_SAMPLE_COUNT] {
        &self.samples
    }

    pub fn get(&self, index: usize) -> Option<&ColorSample> {
        self.samples.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColorSample> {
        self.samples.iter()
    }

}

impl<'a> IntoIterator for &'a FrameColorResult {
    type Item = &'a ColorSample;
    type IntoIter = std::slice::Iter<'a, ColorSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_representation_derives_from_rgb() {
        let sample = ColorSample::from_rgb(Rgb::new(255, 0, 0), true);
        assert_eq!(sample.hex(), "#ff0000");
        assert_eq!(sample.hsl().hue, 0.0);
        assert_eq!(sample.hsl().saturation, 1.0);
        assert_eq!(sample.hsl().lightness, 0.5);
        assert_eq!(
            sample.cmyk(),
            Some(Cmyk {
                c: 0.0,
                m: 1.0,
                y: 1.0,
                k: 0.0
            })
        );
        assert_eq!(ColorSample::from_rgb(Rgb::new(255, 0, 0), false).cmyk(), None);
    }

    #[test]
    fn clipboard_formats() {
        let sample = ColorSample::from_rgb(Rgb::new(0, 128, 255), false);
        assert_eq!(sample.clipboard_text(ColorFormat::Hex), "#0080ff");
        assert_eq!(sample.clipboard_text(ColorFormat::Rgb), "rgb(0, 128, 255)");
        assert_eq!(sample.clipboard_text(ColorFormat::Cmyk), "cmyk(1.00, 0.50, 0.00, 0.00)");
        assert_eq!(
            ColorSample::from_rgb(Rgb::new(255, 0, 0), false).clipboard_text(ColorFormat::Hsl),
            "hsl(0, 100%, 50%)"
        );
    }

    #[test]
    fn format_names_parse_case_insensitively() {
        assert_eq!("HEX".parse::<ColorFormat>(), Ok(ColorFormat::Hex));
        assert_eq!("cmyk".parse::<ColorFormat>(), Ok(ColorFormat::Cmyk));
        assert!("lab".parse::<ColorFormat>().is_err());
        assert_eq!(ColorFormat::Rgb.to_string(), "rgb");
    }

    #[test]
    fn serializes_like_the_persisted_shape() {
        let sample = ColorSample::from_rgb(Rgb::new(1, 2, 3), false);
        let json = serde_json::to_value(&sample).unwrap();
        assert_eq!(json["hex"], "#010203");
        assert_eq!(json["rgb"]["g"], 2);
        assert!(json["hsl"]["lightness"].is_number());
        assert!(json.get("cmyk").is_none());
    }

    #[test]
    fn frame_result_keeps_center_first() {
        let center = ColorSample::from_rgb(Rgb::new(9, 9, 9), false);
        let peripheral =
            std::array::from_fn(|i| ColorSample::from_rgb(Rgb::new(i as u8, 0, 0), false));
        let result = FrameColorResult::new(center.clone(), peripheral);

        assert_eq!(result.samples().len(), 6);
        assert_eq!(result.center(), &center);
        assert_eq!(result.peripheral().len(), 5);
        assert_eq!(result.get(3).unwrap().rgb(), Rgb::new(2, 0, 0));
        assert_eq!(result.iter().count(), 6);
    }
}
