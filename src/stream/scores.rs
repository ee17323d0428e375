//! Per-series scores used to rank streams against each other
//!
//! - amplitude: how often a stream sits above a level
//! - fluctuation: how often a new peak or trough widens the running spread

use super::series::SeriesSet;

/// Count, for each series, the samples strictly above `threshold`
///
/// Output has one entry per series, each within `[0, sample_count]`.
pub fn amplitude_scores(series_set: &SeriesSet, threshold: f64) -> Vec<usize> {
    series_set
        .iter()
        .map(|series| series.iter().filter(|&&v| v > threshold).count())
        .collect()
}

/// Count, for each series, the local extrema that leave a wide spread
///
/// Running min and max both start at the first sample. Each interior sample
/// strictly below both neighbours becomes the new min, each one strictly
/// above both becomes the new max; whenever that happens and
/// `|max - min| > threshold` the score goes up by one. The first and last
/// samples are never extrema.
pub fn fluctuation_scores(series_set: &SeriesSet, threshold: f64) -> Vec<usize> {
    series_set
        .iter()
        .map(|series| series_fluctuation(series, threshold))
        .collect()
}

fn series_fluctuation(series: &[f64], threshold: f64) -> usize {
    let Some(&seed) = series.first() else {
        return 0;
    };
    let mut running_min = seed;
    let mut running_max = seed;
    let mut score = 0;

    for window in series.windows(3) {
        let (prev, current, next) = (window[0], window[1], window[2]);

        let extremum = if current < prev && current < next {
            running_min = current;
            true
        } else if current > prev && current > next {
            running_max = current;
            true
        } else {
            false
        };

        if extremum && (running_max - running_min).abs() > threshold {
            score += 1;
        }
    }

    score
}
