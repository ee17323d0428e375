//! Render pipeline shared by the CLI and library callers
//!
//! The pipeline:
//! 1. Parses a visual query result document (`stream_data`, `date_data`)
//! 2. Mounts a stream graph on an in-memory scene surface
//! 3. Serializes the scene to SVG
//! 4. Builds the export document (values, categories, colors)

use crate::config::StreamGraphConfig;
use crate::render::renderer::StreamGraphRenderer;
use crate::render::surface::SceneSurface;
use crate::render::svg;
use crate::stream::classifier::{Classification, PopulationStats};
use crate::stream::colors::{ColorMapper, Rgb, StreamCategory};
use crate::stream::error::{Result, StreamGraphError};
use crate::stream::series::{ClassificationThresholds, DateAxis, SeriesSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Container id used for pipeline renders
pub const CONTAINER_ID: &str = "visual-query-result";

/// Visual query result as returned by the data endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RenderRequest {
    pub stream_data: Vec<Vec<f64>>,
    pub date_data: Vec<String>,
    /// Overrides the configured thresholds when present
    #[serde(default)]
    pub thresholds: Option<ClassificationThresholds>,
}

impl RenderRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Validated inputs of one render
#[derive(Debug, Clone)]
pub struct RenderInputs {
    pub series: SeriesSet,
    pub dates: DateAxis,
    pub thresholds: ClassificationThresholds,
}

impl RenderInputs {
    pub fn from_request(request: RenderRequest, config: &StreamGraphConfig) -> Result<Self> {
        let series = SeriesSet::new(request.stream_data)?;
        let dates = DateAxis::parse(&request.date_data)?;
        dates.check_matches(&series)?;
        let thresholds = request.thresholds.unwrap_or(config.thresholds);
        Ok(Self {
            series,
            dates,
            thresholds,
        })
    }
}

/// One exported stream
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedStream {
    /// 1-based row label
    pub label: usize,
    pub values: Vec<f64>,
    pub category: StreamCategory,
    pub amplitude_score: usize,
    pub fluctuation_score: usize,
    pub raw_salience: f64,
    pub normalized_salience: f64,
    pub color: Rgb,
}

/// Data behind a rendered stream graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportDocument {
    pub dates: Vec<DateTime<Utc>>,
    pub thresholds: ClassificationThresholds,
    pub stats: PopulationStats,
    pub streams: Vec<ExportedStream>,
}

impl ExportDocument {
    pub fn build(inputs: &RenderInputs, classification: &Classification) -> Self {
        let streams = inputs
            .series
            .iter()
            .zip(&classification.results)
            .enumerate()
            .map(|(i, (values, result))| ExportedStream {
                label: i + 1,
                values: values.to_vec(),
                category: result.category,
                amplitude_score: classification.amplitude[i],
                fluctuation_score: classification.fluctuation[i],
                raw_salience: result.raw_salience,
                normalized_salience: result.normalized_salience,
                color: result.color,
            })
            .collect();

        Self {
            dates: inputs.dates.dates().to_vec(),
            thresholds: inputs.thresholds,
            stats: classification.stats,
            streams,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub svg: String,
    pub export: ExportDocument,
}

impl RenderOutput {
    pub fn data_uri(&self) -> String {
        svg::to_data_uri(&self.svg)
    }
}

/// Mount, serialize and dispose a stream graph
pub fn render(inputs: &RenderInputs, config: &StreamGraphConfig) -> Result<RenderOutput> {
    let mut surface = SceneSurface::new();
    surface.add_container(CONTAINER_ID, config.container_width, config.container_height);

    let mut renderer =
        StreamGraphRenderer::new(config.render.clone(), ColorMapper::new(&config.ramps));
    renderer.render(
        &mut surface,
        CONTAINER_ID,
        &inputs.series,
        &inputs.dates,
        &inputs.thresholds,
    )?;

    let svg = svg::to_svg(&surface, CONTAINER_ID)?;
    let export = renderer
        .classification()
        .map(|c| ExportDocument::build(inputs, c))
        .ok_or_else(|| StreamGraphError::InvalidInput("nothing was mounted".to_string()))?;

    renderer.clear_all(&mut surface);

    tracing::debug!(svg_bytes = svg.len(), streams = export.streams.len(), "Rendered");
    Ok(RenderOutput { svg, export })
}

/// Parse a request document and render it
pub fn render_json(json: &str, config: &StreamGraphConfig) -> Result<RenderOutput> {
    let request = RenderRequest::from_json(json)?;
    let inputs = RenderInputs::from_request(request, config)?;
    render(&inputs, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST: &str = r#"{
        "stream_data": [[0, 0, 0], [1, 5, 1]],
        "date_data": ["2021-03-01T00:00:00Z", "2021-03-01T01:00:00Z", "2021-03-01T02:00:00Z"],
        "thresholds": {"amplitude_threshold": 0.5}
    }"#;

    #[test]
    fn test_request_thresholds_override_config() {
        let request = RenderRequest::from_json(REQUEST).unwrap();
        let inputs = RenderInputs::from_request(request, &StreamGraphConfig::default()).unwrap();
        assert_eq!(inputs.thresholds.amplitude_threshold, 0.5);
        // missing fields keep their defaults
        assert_eq!(inputs.thresholds.fluctuation_threshold, 0.25);
        assert_eq!(inputs.series.len(), 2);
        assert_eq!(inputs.dates.len(), 3);
    }

    #[test]
    fn test_render_json_produces_svg_and_export() {
        let output = render_json(REQUEST, &StreamGraphConfig::default()).unwrap();
        assert!(output.svg.starts_with("<svg"));
        assert_eq!(output.svg.matches("<path").count(), 2);
        assert!(output.data_uri().starts_with("data:image/svg+xml;base64,"));

        let export = &output.export;
        assert_eq!(export.streams.len(), 2);
        assert_eq!(export.streams[0].label, 1);
        assert_eq!(export.streams[0].category, StreamCategory::LowAmplitude);
        assert_eq!(export.streams[1].category, StreamCategory::HighAmplitude);
        assert_eq!(export.streams[1].amplitude_score, 3);
        assert_eq!(export.stats.mean_amplitude, 1.5);

        let json: serde_json::Value = serde_json::from_str(&export.to_json().unwrap()).unwrap();
        assert_eq!(json["streams"][0]["category"], "low_amplitude");
        assert_eq!(json["dates"][0], "2021-03-01T00:00:00Z");
        assert!(json["streams"][1]["color"].as_str().unwrap().starts_with('#'));
    }

    #[test]
    fn test_mismatched_request_is_rejected() {
        let json = r#"{"stream_data": [[1, 2]], "date_data": ["2021-03-01"]}"#;
        let err = render_json(json, &StreamGraphConfig::default()).unwrap_err();
        assert!(matches!(err, StreamGraphError::InvalidInput(_)));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = RenderRequest::from_file(Path::new("/nonexistent/request.json")).unwrap_err();
        assert!(matches!(err, StreamGraphError::Io(_)));
    }

    #[test]
    fn test_bad_json_is_rejected() {
        let err = render_json("{", &StreamGraphConfig::default()).unwrap_err();
        assert!(matches!(err, StreamGraphError::Json(_)));
    }
}
