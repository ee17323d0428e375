//! Population-relative classification of streams
//!
//! Every stream is scored twice (amplitude, fluctuation) and then compared
//! against the rest of the set:
//!
//! - below-average amplitude → `LowAmplitude`, salience = distance below the
//!   mean relative to the mean
//! - otherwise → `HighAmplitude`, salience = distance above the mean relative
//!   to the headroom between mean and max
//! - fluctuation salience = score relative to the population max; when it
//!   strictly beats the amplitude salience the stream becomes
//!   `HighFluctuation`
//!
//! The winning salience is remapped from `[0, 1]` into
//! `[MIN_NORMALIZED_SALIENCE, MAX_NORMALIZED_SALIENCE]` so no stream is drawn
//! in a near-white tint.

use super::colors::{ColorMapper, Rgb, StreamCategory};
use super::scores::{amplitude_scores, fluctuation_scores};
use super::series::{ClassificationThresholds, SeriesSet};
use serde::Serialize;

/// Lower bound of the salience handed to the color mapper
pub const MIN_NORMALIZED_SALIENCE: f64 = 0.1;

/// Upper bound of the salience handed to the color mapper
pub const MAX_NORMALIZED_SALIENCE: f64 = 0.55;

/// Classification of one stream
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub category: StreamCategory,
    /// Salience before remapping, in `[0, 1]`
    pub raw_salience: f64,
    /// Salience after remapping, in `[0.1, 0.55]`
    pub normalized_salience: f64,
    pub color: Rgb,
}

/// Aggregate scores of the whole set
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PopulationStats {
    pub mean_amplitude: f64,
    pub max_amplitude: f64,
    pub mean_fluctuation: f64,
    pub max_fluctuation: f64,
}

/// Output of [`classify`]: one result per stream, in input order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub results: Vec<ClassificationResult>,
    pub amplitude: Vec<usize>,
    pub fluctuation: Vec<usize>,
    pub stats: PopulationStats,
}

/// Classify every stream of the set using the default ramps
pub fn classify(series_set: &SeriesSet, thresholds: &ClassificationThresholds) -> Classification {
    classify_with(series_set, thresholds, &ColorMapper::default())
}

/// Classify every stream of the set, coloring with the given mapper
pub fn classify_with(
    series_set: &SeriesSet,
    thresholds: &ClassificationThresholds,
    mapper: &ColorMapper,
) -> Classification {
    let amplitude = amplitude_scores(series_set, thresholds.amplitude_threshold);
    let fluctuation = fluctuation_scores(series_set, thresholds.fluctuation_threshold);

    let (mean_amplitude, max_amplitude) = mean_and_max(&amplitude);
    let (mean_fluctuation, max_fluctuation) = mean_and_max(&fluctuation);
    let stats = PopulationStats {
        mean_amplitude,
        max_amplitude,
        mean_fluctuation,
        max_fluctuation,
    };

    tracing::debug!(
        streams = series_set.len(),
        samples = series_set.sample_count(),
        mean_amplitude,
        max_amplitude,
        mean_fluctuation,
        max_fluctuation,
        "Population scores"
    );

    let results: Vec<ClassificationResult> = amplitude
        .iter()
        .zip(&fluctuation)
        .map(|(&amp, &fluc)| classify_one(amp as f64, fluc as f64, &stats, mapper))
        .collect();

    Classification {
        results,
        amplitude,
        fluctuation,
        stats,
    }
}

fn classify_one(
    amp: f64,
    fluc: f64,
    stats: &PopulationStats,
    mapper: &ColorMapper,
) -> ClassificationResult {
    let (amp_category, amp_salience) = if amp < stats.mean_amplitude {
        (
            StreamCategory::LowAmplitude,
            ratio(stats.mean_amplitude - amp, stats.mean_amplitude),
        )
    } else {
        (
            StreamCategory::HighAmplitude,
            ratio(amp - stats.mean_amplitude, stats.max_amplitude - stats.mean_amplitude),
        )
    };

    let fluc_salience = ratio(fluc, stats.max_fluctuation);

    let (category, raw_salience) = if fluc_salience > amp_salience {
        (StreamCategory::HighFluctuation, fluc_salience)
    } else {
        (amp_category, amp_salience)
    };

    let normalized_salience = normalize_salience(raw_salience);

    ClassificationResult {
        category,
        raw_salience,
        normalized_salience,
        color: mapper.color_for(category, normalized_salience),
    }
}

/// Remap a salience from `[0, 1]` to `[0.1, 0.55]`, clamping the result
pub fn normalize_salience(raw: f64) -> f64 {
    let raw = if raw.is_finite() { raw } else { 0.0 };
    let mapped =
        MIN_NORMALIZED_SALIENCE + raw * (MAX_NORMALIZED_SALIENCE - MIN_NORMALIZED_SALIENCE);
    mapped.clamp(MIN_NORMALIZED_SALIENCE, MAX_NORMALIZED_SALIENCE)
}

/// Division where a zero denominator yields a zero salience term
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

fn mean_and_max(scores: &[usize]) -> (f64, f64) {
    if scores.is_empty() {
        return (0.0, 0.0);
    }
    let sum: usize = scores.iter().sum();
    let max = scores.iter().copied().max().unwrap_or(0);
    (sum as f64 / scores.len() as f64, max as f64)
}
