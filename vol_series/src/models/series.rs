//! The date-indexed series container and its analytical operations.
//!
//! [`TimeSeries`] wraps an ordered collection of [`Observation`]s. It is a
//! value type: every transforming operation (`align_with`, `resample`, the
//! fetch operations in [`crate::vix`]) returns a new instance rather than
//! mutating in place.
//!
//! Duplicate timestamps are not rejected, but alignment behavior on
//! duplicates is undefined: the right-hand side of a join collapses them
//! (later samples shadow earlier ones).

use std::fmt;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    errors::Error,
    models::{observation::Observation, resample_rule::ResampleRule},
    stats,
};

/// Default bucket count for mutual-information discretization.
pub const DEFAULT_MI_BINS: usize = 10;

/// An immutable, timestamp-ordered series of float values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    observations: Vec<Observation>,
}

/// One row of an aligned pair: a shared timestamp and both column values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedRow {
    pub timestamp: DateTime<Utc>,
    pub series1: f64,
    pub series2: f64,
}

/// Two series restricted to their common timestamps, ordered ascending.
///
/// Transient: produced by [`TimeSeries::align_with`] and consumed immediately
/// by the statistics functions. An empty intersection yields an empty pair;
/// statistics over an empty pair are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPair {
    rows: Vec<AlignedRow>,
}

impl AlignedPair {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[AlignedRow] {
        &self.rows
    }

    /// The first column's values in row order.
    pub fn series1(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.series1).collect()
    }

    /// The second column's values in row order.
    pub fn series2(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.series2).collect()
    }
}

impl TimeSeries {
    /// Build a series from typed observations.
    ///
    /// Observations are sorted by timestamp (stable, duplicates retained).
    pub fn new(mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|o| o.timestamp);
        Self { observations }
    }

    /// Build a series from `(key, value)` records with textual keys.
    ///
    /// Each key must parse as an RFC-3339 timestamp or a `YYYY-MM-DD` date;
    /// any other key fails the whole construction with
    /// [`Error::InvalidIndex`].
    pub fn from_records(records: &[(&str, f64)]) -> Result<Self, Error> {
        let mut observations = Vec::with_capacity(records.len());
        for (key, value) in records {
            let timestamp = parse_timestamp_key(key)?;
            observations.push(Observation::new(timestamp, *value));
        }
        Ok(Self::new(observations))
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Values in timestamp order.
    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    /// Timestamps in ascending order.
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.observations.iter().map(|o| o.timestamp).collect()
    }

    /// First timestamp, if any.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.observations.first().map(|o| o.timestamp)
    }

    /// Last timestamp, if any.
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.observations.last().map(|o| o.timestamp)
    }

    /// Calendar date of the first timestamp, if any.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start().map(|ts| ts.date_naive())
    }

    /// Calendar date of the last timestamp, if any.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end().map(|ts| ts.date_naive())
    }

    /// Inner-join this series with `other` on their timestamp intersection.
    ///
    /// Rows come out ordered by timestamp ascending, with this series as
    /// `series1` and `other` as `series2`.
    pub fn align_with(&self, other: &TimeSeries) -> AlignedPair {
        let mut right: IndexMap<DateTime<Utc>, f64> = IndexMap::new();
        for obs in &other.observations {
            right.insert(obs.timestamp, obs.value);
        }

        let rows = self
            .observations
            .iter()
            .filter_map(|obs| {
                right.get(&obs.timestamp).map(|&value| AlignedRow {
                    timestamp: obs.timestamp,
                    series1: obs.value,
                    series2: value,
                })
            })
            .collect();

        AlignedPair { rows }
    }

    /// Pearson correlation with `other` over the aligned timestamps.
    ///
    /// Symmetric, in [-1, 1]; NaN when the alignment has fewer than 2 rows or
    /// either aligned column has zero variance.
    pub fn compute_correlation(&self, other: &TimeSeries) -> f64 {
        let aligned = self.align_with(other);
        stats::pearson(&aligned.series1(), &aligned.series2())
    }

    /// Mutual information with `other` using [`DEFAULT_MI_BINS`] buckets.
    pub fn compute_mutual_information(&self, other: &TimeSeries) -> f64 {
        self.compute_mutual_information_with_bins(other, DEFAULT_MI_BINS)
    }

    /// Mutual information with `other`, in nats.
    ///
    /// Each aligned column is discretized independently into `bins`
    /// equal-width buckets over its own range, then the discrete mutual
    /// information of the two bucket-label sequences is computed. Symmetric
    /// and non-negative; NaN on an empty alignment.
    pub fn compute_mutual_information_with_bins(&self, other: &TimeSeries, bins: usize) -> f64 {
        let aligned = self.align_with(other);
        let left = stats::bin_equal_width(&aligned.series1(), bins);
        let right = stats::bin_equal_width(&aligned.series2(), bins);
        stats::mutual_information(&left, &right)
    }

    /// Regroup the series into calendar buckets and average each bucket.
    ///
    /// Emits one observation per bucket between the first and last occupied
    /// bucket inclusive, keyed by bucket start; buckets with no observations
    /// carry NaN as the missing-value marker. Returns a new series.
    pub fn resample(&self, rule: ResampleRule) -> TimeSeries {
        if self.observations.is_empty() {
            return TimeSeries::new(Vec::new());
        }

        // Input is sorted, so bucket starts arrive in ascending order and the
        // map preserves that order.
        let mut buckets: IndexMap<DateTime<Utc>, (f64, usize)> = IndexMap::new();
        for obs in &self.observations {
            let start = rule.bucket_start(obs.timestamp);
            let entry = buckets.entry(start).or_insert((0.0, 0));
            entry.0 += obs.value;
            entry.1 += 1;
        }

        let first = *buckets.first().unwrap().0;
        let last = *buckets.last().unwrap().0;

        let mut resampled = Vec::new();
        let mut cursor = first;
        loop {
            let value = match buckets.get(&cursor) {
                Some(&(sum, count)) => sum / count as f64,
                None => f64::NAN,
            };
            resampled.push(Observation::new(cursor, value));
            if cursor >= last {
                break;
            }
            cursor = rule.next_bucket(cursor);
        }

        TimeSeries::new(resampled)
    }
}

fn parse_timestamp_key(key: &str) -> Result<DateTime<Utc>, Error> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(key) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(key, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap()));
    }
    Err(Error::InvalidIndex(format!("not a timestamp key: {key:?}")))
}

impl fmt::Display for TimeSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.start(), self.end()) {
            (Some(start), Some(end)) => {
                write!(f, "TimeSeries(length={}, start={start}, end={end})", self.len())
            }
            _ => write!(f, "TimeSeries(empty)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, d, 0, 0, 0).unwrap()
    }

    fn series(days_and_values: &[(u32, f64)]) -> TimeSeries {
        TimeSeries::new(
            days_and_values
                .iter()
                .map(|&(d, v)| Observation::new(day(d), v))
                .collect(),
        )
    }

    #[test]
    fn construction_sorts_by_timestamp() {
        let ts = TimeSeries::new(vec![
            Observation::new(day(3), 3.0),
            Observation::new(day(1), 1.0),
            Observation::new(day(2), 2.0),
        ]);
        assert_eq!(ts.values(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn from_records_parses_dates_and_rfc3339() {
        let ts = TimeSeries::from_records(&[
            ("2023-01-02", 2.0),
            ("2023-01-01T12:30:00Z", 1.0),
        ])
        .unwrap();
        assert_eq!(ts.len(), 2);
        assert_eq!(ts.start(), Some(Utc.with_ymd_and_hms(2023, 1, 1, 12, 30, 0).unwrap()));
    }

    #[test]
    fn from_records_rejects_non_timestamp_keys() {
        let err = TimeSeries::from_records(&[("2023-01-01", 1.0), ("42", 2.0)]).unwrap_err();
        assert!(matches!(err, Error::InvalidIndex(_)), "got: {err:?}");
    }

    #[test]
    fn align_keeps_only_common_timestamps() {
        let a = series(&[(1, 1.0), (2, 2.0), (3, 3.0)]);
        let b = series(&[(2, 20.0), (3, 30.0), (4, 40.0)]);
        let aligned = a.align_with(&b);
        assert_eq!(aligned.len(), 2);
        assert_eq!(aligned.series1(), vec![2.0, 3.0]);
        assert_eq!(aligned.series2(), vec![20.0, 30.0]);
    }

    #[test]
    fn align_with_disjoint_ranges_is_empty() {
        let a = series(&[(1, 1.0), (2, 2.0)]);
        let b = series(&[(10, 1.0), (11, 2.0)]);
        assert!(a.align_with(&b).is_empty());
        assert!(a.compute_correlation(&b).is_nan());
    }

    #[test]
    fn resample_daily_to_weekly_means() {
        // Mon 2023-01-02 .. Fri 2023-01-06 in one week, Mon 2023-01-09 in the next.
        let ts = series(&[(2, 1.0), (3, 2.0), (4, 3.0), (5, 4.0), (6, 5.0), (9, 12.0)]);
        let weekly = ts.resample("1W".parse().unwrap());
        assert_eq!(weekly.len(), 2);
        assert_eq!(weekly.values(), vec![3.0, 12.0]);
        assert_eq!(weekly.start(), Some(day(2)));
        assert_eq!(weekly.end(), Some(day(9)));
    }

    #[test]
    fn resample_marks_empty_buckets_nan() {
        // Day 1 and day 4, daily rule: days 2 and 3 have no observations.
        let ts = series(&[(1, 10.0), (4, 40.0)]);
        let daily = ts.resample("1D".parse().unwrap());
        assert_eq!(daily.len(), 4);
        let values = daily.values();
        assert_eq!(values[0], 10.0);
        assert!(values[1].is_nan());
        assert!(values[2].is_nan());
        assert_eq!(values[3], 40.0);
    }

    #[test]
    fn resample_empty_series_is_empty() {
        let ts = TimeSeries::new(Vec::new());
        assert!(ts.resample("1D".parse().unwrap()).is_empty());
    }

    #[test]
    fn display_summarizes_length_and_range() {
        let ts = series(&[(1, 1.0), (5, 5.0)]);
        let repr = ts.to_string();
        assert!(repr.starts_with("TimeSeries(length=2"), "got: {repr}");
        assert_eq!(TimeSeries::new(Vec::new()).to_string(), "TimeSeries(empty)");
    }
}
