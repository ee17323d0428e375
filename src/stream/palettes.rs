//! Ramp registry for loading and accessing sequential color ramps
//!
//! Loads ramps from ramps.json (embedded at compile time) and provides
//! access by name. Every ramp runs from a pale tint to a saturated, dark
//! shade, so interpolating further along a ramp always reads as "stronger".

use super::colors::Rgb;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;

/// Embedded ramps.json content
const RAMPS_JSON: &str = include_str!("../../ramps.json");

/// Global ramp registry, initialized lazily on first access
pub static RAMP_REGISTRY: Lazy<RampRegistry> = Lazy::new(|| {
    RampRegistry::from_json(RAMPS_JSON).unwrap_or_else(|e| {
        tracing::error!("Failed to load ramps.json: {}", e);
        RampRegistry::default()
    })
});

/// Fallback when a ramp has no usable colors
const FALLBACK_GRAY: Rgb = Rgb([128, 128, 128]);

/// Ramp type as defined in ramps.json
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RampType {
    Sequential,
}

/// A single ramp definition from ramps.json
#[derive(Debug, Clone, Deserialize)]
pub struct RampDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub ramp_type: RampType,
    pub colors: Vec<String>,
}

impl RampDefinition {
    /// Get a stop color by index (clamped to the last stop)
    pub fn get_color(&self, index: usize) -> Rgb {
        if self.colors.is_empty() {
            return FALLBACK_GRAY;
        }
        let idx = index.min(self.colors.len() - 1);
        Rgb::parse_hex(&self.colors[idx]).unwrap_or(FALLBACK_GRAY)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Interpolate a color along the ramp at position t ∈ [0, 1]
    ///
    /// t=0 returns the first stop, t=1 the last. Values in between are
    /// linearly interpolated between the two neighbouring stops.
    pub fn interpolate(&self, t: f64) -> Rgb {
        if self.colors.is_empty() {
            return FALLBACK_GRAY;
        }

        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let n = self.colors.len();

        if n == 1 {
            return self.get_color(0);
        }

        let pos = t * (n - 1) as f64;
        let idx_low = pos.floor() as usize;
        let idx_high = (idx_low + 1).min(n - 1);
        let frac = pos - idx_low as f64;

        let low = self.get_color(idx_low).0;
        let high = self.get_color(idx_high).0;
        let mix = |a: u8, b: u8| (a as f64 * (1.0 - frac) + b as f64 * frac).round() as u8;

        Rgb([
            mix(low[0], high[0]),
            mix(low[1], high[1]),
            mix(low[2], high[2]),
        ])
    }
}

/// Registry of all available ramps
#[derive(Debug, Clone, Default)]
pub struct RampRegistry {
    /// Ramps by lowercase name for case-insensitive lookup
    ramps: HashMap<String, RampDefinition>,
}

impl RampRegistry {
    /// Load ramps from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let definitions: Vec<RampDefinition> = serde_json::from_str(json)?;

        let mut registry = Self::default();
        for def in definitions {
            registry.ramps.insert(def.name.to_lowercase(), def);
        }

        tracing::debug!(count = registry.ramps.len(), "Loaded color ramps");
        Ok(registry)
    }

    /// Get a ramp by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&RampDefinition> {
        self.ramps.get(&name.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_loads() {
        let registry = &*RAMP_REGISTRY;
        for name in ["Greens", "Oranges", "Blues", "Reds", "Purples", "Greys"] {
            let ramp = registry.get(name).unwrap();
            assert_eq!(ramp.ramp_type, RampType::Sequential);
            assert_eq!(ramp.len(), 9);
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(RAMP_REGISTRY.get("blues").is_some());
        assert!(RAMP_REGISTRY.get("BLUES").is_some());
        assert!(RAMP_REGISTRY.get("Viridis").is_none());
    }

    #[test]
    fn test_interpolate_endpoints() {
        let ramp = RAMP_REGISTRY.get("Blues").unwrap();
        assert_eq!(ramp.interpolate(0.0), Rgb([0xf7, 0xfb, 0xff]));
        assert_eq!(ramp.interpolate(1.0), Rgb([0x08, 0x30, 0x6b]));
        // out-of-range input is clamped
        assert_eq!(ramp.interpolate(-3.0), ramp.interpolate(0.0));
        assert_eq!(ramp.interpolate(7.0), ramp.interpolate(1.0));
        assert_eq!(ramp.interpolate(f64::NAN), ramp.interpolate(0.0));
    }

    #[test]
    fn test_interpolate_midpoint_between_stops() {
        let ramp = RampDefinition {
            name: "test".into(),
            ramp_type: RampType::Sequential,
            colors: vec!["#000000".into(), "#c8640a".into()],
        };
        assert_eq!(ramp.interpolate(0.5), Rgb([100, 50, 5]));
    }

    #[test]
    fn test_empty_ramp_falls_back_to_gray() {
        let ramp = RampDefinition {
            name: "empty".into(),
            ramp_type: RampType::Sequential,
            colors: vec![],
        };
        assert!(ramp.is_empty());
        assert_eq!(ramp.interpolate(0.4), FALLBACK_GRAY);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(RampRegistry::from_json("{ not json").is_err());
    }
}
