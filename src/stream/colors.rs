//! Stream categories and their color encoding
//!
//! Each category owns one sequential ramp; salience picks the position along
//! that ramp. Ramps are resolved once through the ramp registry when the
//! mapper is built.

use super::palettes::{RampDefinition, RAMP_REGISTRY};
use serde::{Serialize, Serializer};
use std::fmt;

/// Default ramp for streams that sit below the population
pub const DEFAULT_LOW_AMPLITUDE_RAMP: &str = "Greens";

/// Default ramp for streams that sit above the population
pub const DEFAULT_HIGH_AMPLITUDE_RAMP: &str = "Oranges";

/// Default ramp for streams dominated by peaks and troughs
pub const DEFAULT_HIGH_FLUCTUATION_RAMP: &str = "Blues";

/// An opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const WHITE: Rgb = Rgb([255, 255, 255]);
    pub const GREY: Rgb = Rgb([128, 128, 128]);

    /// Parse a hex color string
    ///
    /// Supports `#RRGGBB`, `#RRGGBBAA` (alpha ignored) and both without `#`.
    pub fn parse_hex(hex: &str) -> Option<Rgb> {
        let hex = hex.trim_start_matches('#');

        if hex.len() != 6 && hex.len() != 8 {
            tracing::warn!("Invalid hex color length '{}': {}", hex, hex.len());
            return None;
        }

        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;

        Some(Rgb([r, g, b]))
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.0;
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// How a stream stands out from the rest of the population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamCategory {
    /// Fewer samples above the amplitude threshold than average
    LowAmplitude,
    /// At least as many samples above the amplitude threshold as average
    HighAmplitude,
    /// Volatility outranks the amplitude signal
    HighFluctuation,
}

impl StreamCategory {
    pub const ALL: [StreamCategory; 3] = [
        StreamCategory::LowAmplitude,
        StreamCategory::HighAmplitude,
        StreamCategory::HighFluctuation,
    ];

    fn default_ramp(self) -> &'static str {
        match self {
            StreamCategory::LowAmplitude => DEFAULT_LOW_AMPLITUDE_RAMP,
            StreamCategory::HighAmplitude => DEFAULT_HIGH_AMPLITUDE_RAMP,
            StreamCategory::HighFluctuation => DEFAULT_HIGH_FLUCTUATION_RAMP,
        }
    }
}

/// Ramp names per category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RampSelection {
    pub low_amplitude: String,
    pub high_amplitude: String,
    pub high_fluctuation: String,
}

impl Default for RampSelection {
    fn default() -> Self {
        Self {
            low_amplitude: DEFAULT_LOW_AMPLITUDE_RAMP.to_string(),
            high_amplitude: DEFAULT_HIGH_AMPLITUDE_RAMP.to_string(),
            high_fluctuation: DEFAULT_HIGH_FLUCTUATION_RAMP.to_string(),
        }
    }
}

impl RampSelection {
    fn name_for(&self, category: StreamCategory) -> &str {
        match category {
            StreamCategory::LowAmplitude => self.low_amplitude.as_str(),
            StreamCategory::HighAmplitude => self.high_amplitude.as_str(),
            StreamCategory::HighFluctuation => self.high_fluctuation.as_str(),
        }
    }
}

/// Maps (category, salience) to a color
#[derive(Debug, Clone)]
pub struct ColorMapper {
    low_amplitude: RampDefinition,
    high_amplitude: RampDefinition,
    high_fluctuation: RampDefinition,
}

impl Default for ColorMapper {
    fn default() -> Self {
        Self::new(&RampSelection::default())
    }
}

impl ColorMapper {
    /// Resolve one ramp per category
    ///
    /// An unknown ramp name falls back to the category's default ramp.
    pub fn new(selection: &RampSelection) -> Self {
        Self {
            low_amplitude: resolve_ramp(selection, StreamCategory::LowAmplitude),
            high_amplitude: resolve_ramp(selection, StreamCategory::HighAmplitude),
            high_fluctuation: resolve_ramp(selection, StreamCategory::HighFluctuation),
        }
    }

    /// Color for a category at a given salience in `[0, 1]`
    pub fn color_for(&self, category: StreamCategory, salience: f64) -> Rgb {
        self.ramp(category).interpolate(salience)
    }

    pub fn ramp(&self, category: StreamCategory) -> &RampDefinition {
        match category {
            StreamCategory::LowAmplitude => &self.low_amplitude,
            StreamCategory::HighAmplitude => &self.high_amplitude,
            StreamCategory::HighFluctuation => &self.high_fluctuation,
        }
    }
}

fn resolve_ramp(selection: &RampSelection, category: StreamCategory) -> RampDefinition {
    let requested = selection.name_for(category);
    if let Some(ramp) = RAMP_REGISTRY.get(requested) {
        return ramp.clone();
    }

    let fallback = category.default_ramp();
    tracing::warn!(
        "Unknown color ramp '{}' for {:?}, using '{}'",
        requested,
        category,
        fallback
    );
    RAMP_REGISTRY
        .get(fallback)
        .cloned()
        .unwrap_or_else(|| RampDefinition {
            name: fallback.to_string(),
            ramp_type: super::palettes::RampType::Sequential,
            colors: Vec::new(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dominant_channel(color: Rgb) -> usize {
        let [r, g, b] = color.0;
        if r > g && r > b {
            0
        } else if g > r && g > b {
            1
        } else {
            2
        }
    }

    fn luminance(color: Rgb) -> f64 {
        let [r, g, b] = color.0;
        0.2126 * r as f64 + 0.7152 * g as f64 + 0.0722 * b as f64
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgb::parse_hex("#FF0000"), Some(Rgb([255, 0, 0])));
        assert_eq!(Rgb::parse_hex("1F78B4"), Some(Rgb([31, 120, 180])));
        assert_eq!(Rgb::parse_hex("#440154FF"), Some(Rgb([68, 1, 84])));
        assert_eq!(Rgb::parse_hex("#FFF"), None);
        assert_eq!(Rgb::parse_hex("GGGGGG"), None);
    }

    #[test]
    fn test_hex_round_trip_format() {
        assert_eq!(Rgb([8, 48, 107]).to_hex(), "#08306b");
        assert_eq!(Rgb([8, 48, 107]).to_string(), "#08306b");
        assert_eq!(serde_json::to_string(&Rgb::WHITE).unwrap(), "\"#ffffff\"");
    }

    #[test]
    fn test_ramps_darken_with_salience() {
        let mapper = ColorMapper::default();
        for category in StreamCategory::ALL {
            let mut previous = f64::INFINITY;
            for step in 0..=20 {
                let salience = step as f64 / 20.0;
                let lum = luminance(mapper.color_for(category, salience));
                assert!(
                    lum <= previous,
                    "{:?} got lighter at salience {}",
                    category,
                    salience
                );
                previous = lum;
            }
            let pale = luminance(mapper.color_for(category, 0.1));
            let strong = luminance(mapper.color_for(category, 0.55));
            assert!(strong < pale);
        }
    }

    #[test]
    fn test_categories_distinguishable_at_equal_salience() {
        let mapper = ColorMapper::default();
        for step in 0..=9 {
            let salience = 0.1 + step as f64 * 0.05;
            let low = mapper.color_for(StreamCategory::LowAmplitude, salience);
            let high = mapper.color_for(StreamCategory::HighAmplitude, salience);
            let fluc = mapper.color_for(StreamCategory::HighFluctuation, salience);

            assert_eq!(dominant_channel(low), 1, "low amplitude should be green");
            assert_eq!(dominant_channel(high), 0, "high amplitude should be orange");
            assert_eq!(dominant_channel(fluc), 2, "fluctuation should be blue");
        }
    }

    #[test]
    fn test_custom_selection() {
        let selection = RampSelection {
            high_amplitude: "reds".to_string(),
            ..Default::default()
        };
        let mapper = ColorMapper::new(&selection);
        assert_eq!(mapper.ramp(StreamCategory::HighAmplitude).name, "Reds");
        assert_eq!(mapper.ramp(StreamCategory::LowAmplitude).name, "Greens");
    }

    #[test]
    fn test_unknown_ramp_falls_back_to_default() {
        let selection = RampSelection {
            high_fluctuation: "Rainbow".to_string(),
            ..Default::default()
        };
        let mapper = ColorMapper::new(&selection);
        assert_eq!(mapper.ramp(StreamCategory::HighFluctuation).name, "Blues");
    }
}
