//! Time axis: index scale, time scale and adaptive ticks
//!
//! Data points are placed by sample index; tick labels are placed by
//! timestamp. Both scales share the same pixel range so a tick at a sample's
//! timestamp lands exactly on that sample when dates are evenly spaced.

use super::series::DateAxis;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Default cap on the number of ticks emitted for one axis
pub const DEFAULT_MAX_TICKS: usize = 400;

const HOUR_SECS: i64 = 3_600;
const DAY_SECS: i64 = 86_400;
const WEEK_SECS: i64 = 7 * DAY_SECS;
/// 1970-01-04T00:00:00Z, the first Sunday after the epoch
const FIRST_SUNDAY_SECS: i64 = 3 * DAY_SECS;

/// Linear map between a numeric domain and a pixel range
///
/// A zero-width domain (or range, when inverting) maps everything to the
/// midpoint of the output interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn apply(&self, value: f64) -> f64 {
        let t = fraction(value, self.domain);
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    /// Like `apply`, but the result never leaves the range
    pub fn apply_clamped(&self, value: f64) -> f64 {
        let t = fraction(value, self.domain).clamp(0.0, 1.0);
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    pub fn invert(&self, pixel: f64) -> f64 {
        let t = fraction(pixel, self.range);
        self.domain.0 + t * (self.domain.1 - self.domain.0)
    }
}

fn fraction(value: f64, (start, end): (f64, f64)) -> f64 {
    let span = end - start;
    if span == 0.0 {
        0.5
    } else {
        (value - start) / span
    }
}

/// Linear map from a time interval to a pixel range
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeScale {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    scale: LinearScale,
}

impl TimeScale {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, range: (f64, f64)) -> Self {
        let domain = (
            start.timestamp_millis() as f64,
            end.timestamp_millis() as f64,
        );
        Self {
            start,
            end,
            scale: LinearScale::new(domain, range),
        }
    }

    pub fn domain(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start, self.end)
    }

    pub fn apply(&self, time: DateTime<Utc>) -> f64 {
        self.scale.apply(time.timestamp_millis() as f64)
    }
}

/// Tick interval, chosen from the number of samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TickGranularity {
    Hourly,
    Daily,
    Weekly,
}

impl TickGranularity {
    /// ≤ 12 samples → hourly, fewer than 305 → daily, otherwise weekly
    pub fn for_sample_count(sample_count: usize) -> Self {
        if sample_count <= 12 {
            TickGranularity::Hourly
        } else if sample_count < 305 {
            TickGranularity::Daily
        } else {
            TickGranularity::Weekly
        }
    }

    pub fn label_format(self) -> &'static str {
        match self {
            TickGranularity::Hourly => "%H:%M",
            TickGranularity::Daily => "%y-%m-%d",
            TickGranularity::Weekly => "%b %d",
        }
    }

    fn step_secs(self) -> i64 {
        match self {
            TickGranularity::Hourly => HOUR_SECS,
            TickGranularity::Daily => DAY_SECS,
            TickGranularity::Weekly => WEEK_SECS,
        }
    }

    fn anchor_secs(self) -> i64 {
        match self {
            TickGranularity::Weekly => FIRST_SUNDAY_SECS,
            _ => 0,
        }
    }

    /// First interval boundary at or after `secs`
    fn ceil(self, secs: i64) -> i64 {
        let step = self.step_secs();
        let anchor = self.anchor_secs();
        let floored = (secs - anchor).div_euclid(step) * step + anchor;
        if floored < secs {
            floored + step
        } else {
            floored
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTick {
    pub time: DateTime<Utc>,
    /// Pixel offset from the content origin
    pub position: f64,
    pub label: String,
}

/// Scales and ticks for one rendered date axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeAxis {
    /// `[0, sample_count - 1]` → `[0, content_width]`
    pub index_scale: LinearScale,
    /// `[first, last]` → `[0, content_width]`, for tick placement only
    pub time_scale: TimeScale,
    pub granularity: TickGranularity,
    pub ticks: Vec<AxisTick>,
}

impl TimeAxis {
    /// Sample index under a pixel offset, truncated towards zero
    pub fn index_at_floor(&self, pixel: f64, sample_count: usize) -> usize {
        clamp_index(self.index_scale.invert(pixel).floor(), sample_count)
    }

    /// Sample index closest to a pixel offset
    pub fn index_at_nearest(&self, pixel: f64, sample_count: usize) -> usize {
        clamp_index(self.index_scale.invert(pixel).round(), sample_count)
    }
}

fn clamp_index(raw: f64, sample_count: usize) -> usize {
    let last = sample_count.saturating_sub(1);
    if raw.is_nan() || raw <= 0.0 {
        0
    } else {
        (raw as usize).min(last)
    }
}

/// Builds a [`TimeAxis`] for a date axis and content width
#[derive(Debug, Clone, Copy)]
pub struct TimeAxisBuilder {
    max_ticks: usize,
}

impl Default for TimeAxisBuilder {
    fn default() -> Self {
        Self {
            max_ticks: DEFAULT_MAX_TICKS,
        }
    }
}

impl TimeAxisBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap on emitted ticks; boundaries beyond it are thinned with a uniform stride
    pub fn max_ticks(mut self, max_ticks: usize) -> Self {
        self.max_ticks = max_ticks.max(1);
        self
    }

    pub fn build(&self, dates: &DateAxis, content_width: f64) -> TimeAxis {
        let sample_count = dates.len();
        let index_scale = LinearScale::new(
            (0.0, sample_count.saturating_sub(1) as f64),
            (0.0, content_width),
        );
        let time_scale = TimeScale::new(dates.first(), dates.last(), (0.0, content_width));
        let granularity = TickGranularity::for_sample_count(sample_count);
        let ticks = self.ticks(&time_scale, granularity);

        tracing::debug!(
            samples = sample_count,
            granularity = ?granularity,
            ticks = ticks.len(),
            "Built time axis"
        );

        TimeAxis {
            index_scale,
            time_scale,
            granularity,
            ticks,
        }
    }

    fn ticks(&self, scale: &TimeScale, granularity: TickGranularity) -> Vec<AxisTick> {
        let (start, end) = scale.domain();
        // round sub-second starts up so no tick precedes the domain
        let start_secs = start.timestamp() + i64::from(start.timestamp_subsec_nanos() > 0);
        let first = granularity.ceil(start_secs);
        let last = end.timestamp();
        if first > last {
            return Vec::new();
        }

        let step = granularity.step_secs();
        let count = ((last - first) / step + 1) as usize;
        let stride = count.div_ceil(self.max_ticks);
        let format = granularity.label_format();

        (0..count)
            .step_by(stride)
            .filter_map(|k| DateTime::<Utc>::from_timestamp(first + k as i64 * step, 0))
            .map(|time| AxisTick {
                position: scale.apply(time),
                label: time.format(format).to_string(),
                time,
            })
            .collect()
    }
}
