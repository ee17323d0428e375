//! Stream graph configuration from properties
//!
//! Every value comes from streamgraph.json through the `PropertyReader`;
//! this module only converts and range-checks.

use crate::render::cursor::{IndexResolution, TooltipStyle};
use crate::render::layout::{Margins, RenderOptions};
use crate::stream::colors::RampSelection;
use crate::stream::properties::PropertyReader;
use crate::stream::series::ClassificationThresholds;

/// Largest accepted container edge, in pixels
const MAX_CONTAINER_EDGE: f64 = 20_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct StreamGraphConfig {
    pub thresholds: ClassificationThresholds,

    /// Container width in pixels
    pub container_width: f64,

    /// Container height in pixels
    pub container_height: f64,

    pub render: RenderOptions,

    /// Color ramp per category
    pub ramps: RampSelection,
}

impl Default for StreamGraphConfig {
    fn default() -> Self {
        Self::from_properties(&PropertyReader::new())
    }
}

impl StreamGraphConfig {
    pub fn from_properties(props: &PropertyReader) -> Self {
        let thresholds = ClassificationThresholds {
            amplitude_threshold: props.get_f64("threshold.amplitude"),
            fluctuation_threshold: props.get_f64_in_range(
                "threshold.fluctuation",
                0.0,
                f64::MAX,
            ),
            domain_low: props.get_f64("domain.low"),
            domain_high: props.get_f64("domain.high"),
        };

        let container_width = props.get_f64_in_range("container.width", 1.0, MAX_CONTAINER_EDGE);
        let container_height =
            props.get_f64_in_range("container.height", 1.0, MAX_CONTAINER_EDGE);

        let margins = Margins {
            top: props.get_f64_in_range("margin.top", 0.0, MAX_CONTAINER_EDGE),
            right: props.get_f64_in_range("margin.right", 0.0, MAX_CONTAINER_EDGE),
            bottom: props.get_f64_in_range("margin.bottom", 0.0, MAX_CONTAINER_EDGE),
            left: props.get_f64_in_range("margin.left", 0.0, MAX_CONTAINER_EDGE),
        };

        let tooltip = TooltipStyle {
            width: props.get_f64_in_range("tooltip.width", 1.0, MAX_CONTAINER_EDGE),
            line_height: props.get_f64_in_range("tooltip.line.height", 1.0, 500.0),
            offset: props.get_f64_in_range("tooltip.offset", 0.0, 500.0),
            flip_offset: props.get_f64_in_range("tooltip.flip.offset", 0.0, 500.0),
        };

        let render = RenderOptions {
            margins,
            axis_height: props.get_f64_in_range("axis.height", 0.0, MAX_CONTAINER_EDGE),
            max_ticks: props.get_usize("axis.max.ticks").max(1),
            area_opacity: props.get_f64_in_range("area.opacity", 0.0, 1.0),
            badge_radius: props.get_f64_in_range("badge.radius", 0.0, 100.0),
            badge_offset_x: props.get_f64_in_range("badge.offset.x", 0.0, MAX_CONTAINER_EDGE),
            tooltip,
            index_resolution: IndexResolution::parse(&props.get_enum("cursor.index.resolution")),
        };

        let ramps = RampSelection {
            low_amplitude: props.get_string("color.ramp.low"),
            high_amplitude: props.get_string("color.ramp.high"),
            high_fluctuation: props.get_string("color.ramp.fluctuation"),
        };

        Self {
            thresholds,
            container_width,
            container_height,
            render,
            ramps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_built_in_defaults() {
        let config = StreamGraphConfig::default();
        assert_eq!(config.thresholds, ClassificationThresholds::default());
        assert_eq!(config.render, RenderOptions::default());
        assert_eq!(config.ramps, RampSelection::default());
        assert_eq!(config.container_width, 800.0);
        assert_eq!(config.container_height, 400.0);
    }

    #[test]
    fn test_user_values() {
        let mut props = PropertyReader::new();
        props.set("threshold.amplitude", "0.5").unwrap();
        props.set("margin.left", "50").unwrap();
        props.set("cursor.index.resolution", "floor").unwrap();
        props.set("color.ramp.high", "Reds").unwrap();
        props.set("axis.max.ticks", "24").unwrap();

        let config = StreamGraphConfig::from_properties(&props);
        assert_eq!(config.thresholds.amplitude_threshold, 0.5);
        assert_eq!(config.render.margins.left, 50.0);
        assert_eq!(config.render.index_resolution, IndexResolution::Floor);
        assert_eq!(config.ramps.high_amplitude, "Reds");
        assert_eq!(config.render.max_ticks, 24);
    }

    #[test]
    fn test_out_of_range_values_use_defaults() {
        let mut props = PropertyReader::new();
        props.set("area.opacity", "1.5").unwrap();
        props.set("container.width", "0").unwrap();
        props.set("threshold.fluctuation", "-1").unwrap();

        let config = StreamGraphConfig::from_properties(&props);
        assert_eq!(config.render.area_opacity, 0.8);
        assert_eq!(config.container_width, 800.0);
        assert_eq!(config.thresholds.fluctuation_threshold, 0.25);
    }
}
