//! Input model for a visual query result
//!
//! A visual query yields one time series per sample point along the drawn
//! path. All series share a single date axis. The types here validate that
//! shape once, at construction, so downstream code can index freely.

use super::error::{Result, StreamGraphError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ordered set of equal-length series
///
/// Order is display order: series `i` is drawn in row `i` and labelled `i + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSet {
    series: Vec<Vec<f64>>,
    sample_count: usize,
}

impl SeriesSet {
    /// Validate and wrap raw series
    ///
    /// Fails with `InvalidInput` when the set is empty, a series is empty,
    /// lengths disagree, or a sample is not finite.
    pub fn new(series: Vec<Vec<f64>>) -> Result<Self> {
        let first = series
            .first()
            .ok_or_else(|| StreamGraphError::invalid("series set is empty"))?;

        let sample_count = first.len();
        if sample_count == 0 {
            return Err(StreamGraphError::invalid("series have no samples"));
        }

        for (i, s) in series.iter().enumerate() {
            if s.len() != sample_count {
                return Err(StreamGraphError::invalid(format!(
                    "series {} has {} samples, expected {}",
                    i + 1,
                    s.len(),
                    sample_count
                )));
            }
            if let Some(j) = s.iter().position(|v| !v.is_finite()) {
                return Err(StreamGraphError::invalid(format!(
                    "series {} has a non-finite sample at index {}",
                    i + 1,
                    j
                )));
            }
        }

        Ok(Self {
            series,
            sample_count,
        })
    }

    /// Number of series (rows)
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Always false; an empty set cannot be constructed
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Samples per series
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn get(&self, index: usize) -> Option<&[f64]> {
        self.series.get(index).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[f64]> {
        self.series.iter().map(Vec::as_slice)
    }
}

/// Non-decreasing sequence of UTC timestamps, one per sample index
#[derive(Debug, Clone, PartialEq)]
pub struct DateAxis {
    dates: Vec<DateTime<Utc>>,
}

impl DateAxis {
    pub fn new(dates: Vec<DateTime<Utc>>) -> Result<Self> {
        if dates.is_empty() {
            return Err(StreamGraphError::invalid("date axis is empty"));
        }
        if let Some(i) = dates.windows(2).position(|w| w[1] < w[0]) {
            return Err(StreamGraphError::invalid(format!(
                "date axis decreases at index {}",
                i + 1
            )));
        }
        Ok(Self { dates })
    }

    /// Parse dates as delivered by the data endpoint
    ///
    /// Accepts RFC 3339, naive ISO-8601 date-times (taken as UTC) and plain
    /// `YYYY-MM-DD` dates.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Self> {
        let dates = raw
            .iter()
            .map(|s| parse_timestamp(s.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(dates)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first(&self) -> DateTime<Utc> {
        self.dates[0]
    }

    pub fn last(&self) -> DateTime<Utc> {
        self.dates[self.dates.len() - 1]
    }

    pub fn dates(&self) -> &[DateTime<Utc>] {
        &self.dates
    }

    /// Ensure this axis matches the sample count of a series set
    pub fn check_matches(&self, series_set: &SeriesSet) -> Result<()> {
        if self.len() != series_set.sample_count() {
            return Err(StreamGraphError::invalid(format!(
                "date axis has {} entries but series have {} samples",
                self.len(),
                series_set.sample_count()
            )));
        }
        Ok(())
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }

    Err(StreamGraphError::invalid(format!(
        "unrecognised timestamp '{}'",
        raw
    )))
}

/// Classification thresholds and the value domain used for row thickness
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationThresholds {
    /// A sample counts towards amplitude when strictly above this value
    pub amplitude_threshold: f64,
    /// Peak-to-trough spread that counts as one fluctuation
    pub fluctuation_threshold: f64,
    pub domain_low: f64,
    pub domain_high: f64,
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        Self {
            amplitude_threshold: 0.11,
            fluctuation_threshold: 0.25,
            domain_low: 0.0,
            domain_high: 10.0,
        }
    }
}

impl ClassificationThresholds {
    /// Derive thresholds from the value range of the queried raster
    ///
    /// The domain is anchored at zero and extended well past the raster
    /// maximum so the widest stream still fits its row; both thresholds are a
    /// tenth of the domain.
    pub fn from_raster_range(raster_min: f64, raster_max: f64) -> Self {
        let range = raster_max - raster_min;
        let domain_low = 0.0;
        let domain_high = raster_max + range * 2.5;
        let step = (domain_high - domain_low) / 10.0;

        Self {
            amplitude_threshold: step,
            fluctuation_threshold: step,
            domain_low,
            domain_high,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_set_rejects_empty() {
        let err = SeriesSet::new(vec![]).unwrap_err();
        assert!(matches!(err, StreamGraphError::InvalidInput(_)));

        let err = SeriesSet::new(vec![vec![]]).unwrap_err();
        assert!(matches!(err, StreamGraphError::InvalidInput(_)));
    }

    #[test]
    fn test_series_set_rejects_ragged() {
        let err = SeriesSet::new(vec![vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert!(err.to_string().contains("series 2 has 1 samples"));
    }

    #[test]
    fn test_series_set_rejects_nan() {
        let err = SeriesSet::new(vec![vec![1.0, f64::NAN]]).unwrap_err();
        assert!(matches!(err, StreamGraphError::InvalidInput(_)));
    }

    #[test]
    fn test_series_set_accessors() {
        let set = SeriesSet::new(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.sample_count(), 3);
        assert_eq!(set.get(1), Some(&[4.0, 5.0, 6.0][..]));
        assert!(set.get(2).is_none());
    }

    #[test]
    fn test_date_axis_parse_formats() {
        let axis = DateAxis::parse(&[
            "2021-03-01",
            "2021-03-01T06:00:00",
            "2021-03-01T12:00:00Z",
            "2021-03-01T20:00:00+02:00",
        ])
        .unwrap();
        assert_eq!(axis.len(), 4);
        assert_eq!(axis.first().to_rfc3339(), "2021-03-01T00:00:00+00:00");
        assert_eq!(axis.last().to_rfc3339(), "2021-03-01T18:00:00+00:00");
    }

    #[test]
    fn test_date_axis_rejects_decreasing() {
        let err = DateAxis::parse(&["2021-03-02", "2021-03-01"]).unwrap_err();
        assert!(err.to_string().contains("decreases at index 1"));
    }

    #[test]
    fn test_date_axis_rejects_garbage() {
        assert!(DateAxis::parse(&["yesterday"]).is_err());
        assert!(DateAxis::parse::<&str>(&[]).is_err());
    }

    #[test]
    fn test_date_axis_length_check() {
        let set = SeriesSet::new(vec![vec![1.0, 2.0, 3.0]]).unwrap();
        let axis = DateAxis::parse(&["2021-03-01", "2021-03-02"]).unwrap();
        assert!(axis.check_matches(&set).is_err());
    }

    #[test]
    fn test_thresholds_defaults() {
        let t = ClassificationThresholds::default();
        assert_eq!(t.amplitude_threshold, 0.11);
        assert_eq!(t.fluctuation_threshold, 0.25);
        assert_eq!(t.domain_low, 0.0);
        assert_eq!(t.domain_high, 10.0);
    }

    #[test]
    fn test_thresholds_partial_json() {
        let t: ClassificationThresholds =
            serde_json::from_str(r#"{"amplitude_threshold": 0.5}"#).unwrap();
        assert_eq!(t.amplitude_threshold, 0.5);
        assert_eq!(t.fluctuation_threshold, 0.25);
    }

    #[test]
    fn test_thresholds_from_raster_range() {
        let t = ClassificationThresholds::from_raster_range(1.0, 3.0);
        assert_eq!(t.domain_low, 0.0);
        assert_eq!(t.domain_high, 8.0);
        assert!((t.amplitude_threshold - 0.8).abs() < 1e-12);
        assert!((t.fluctuation_threshold - 0.8).abs() < 1e-12);
    }
}
