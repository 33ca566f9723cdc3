//! Calendar-frequency rules for resampling a series.
//!
//! A [`ResampleRule`] pairs a non-zero amount with a [`ResampleUnit`], covering
//! minute, hour, day, week (Monday-based) and month buckets in UTC. These types
//! give a typed alternative to ad-hoc frequency strings when regrouping a
//! series into coarser buckets.
//!
//! Typical usage:
//! ```
//! use vol_series::models::resample_rule::{ResampleRule, ResampleUnit};
//!
//! let rule: ResampleRule = "1W".parse().unwrap();
//! assert_eq!(rule.unit(), ResampleUnit::Week);
//! ```

use std::{fmt, num::NonZeroU32, str::FromStr};

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

use crate::errors::Error;

/// Resampling granularity (calendar-aware where needed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResampleUnit {
    /// UTC minute
    Minute,
    /// UTC hour
    Hour,
    /// UTC day
    Day,
    /// Monday-based, UTC
    Week,
    /// calendar months, UTC
    Month,
}

/// A resample rule = amount × unit (e.g., 5-Minute, 1-Day, 1-Week, 6-Month).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResampleRule {
    pub amount: NonZeroU32,
    pub unit: ResampleUnit,
}

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_DAY: i64 = 86_400;

impl ResampleRule {
    /// Create a new rule.
    pub const fn new(amount: NonZeroU32, unit: ResampleUnit) -> Self {
        Self { amount, unit }
    }
    pub const fn amount(&self) -> NonZeroU32 {
        self.amount
    }
    pub const fn unit(&self) -> ResampleUnit {
        self.unit
    }

    /// The start of the bucket containing `ts`.
    ///
    /// Buckets are anchored at the UTC epoch for minute/hour/day rules, at
    /// Monday weeks for week rules, and at calendar months for month rules.
    pub fn bucket_start(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let n = i64::from(self.amount.get());
        match self.unit {
            ResampleUnit::Minute => truncate_secs(ts, n * SECS_PER_MINUTE),
            ResampleUnit::Hour => truncate_secs(ts, n * SECS_PER_HOUR),
            ResampleUnit::Day => {
                let day = ts.timestamp().div_euclid(SECS_PER_DAY);
                let bucket_day = day - day.rem_euclid(n);
                from_epoch_secs(bucket_day * SECS_PER_DAY)
            }
            ResampleUnit::Week => {
                let day = ts.timestamp().div_euclid(SECS_PER_DAY);
                // Epoch day 0 is a Thursday; (day + 3) makes Monday the week origin.
                let week = (day + 3).div_euclid(7);
                let bucket_monday = (week - week.rem_euclid(n)) * 7 - 3;
                from_epoch_secs(bucket_monday * SECS_PER_DAY)
            }
            ResampleUnit::Month => {
                let months = i64::from(ts.year()) * 12 + i64::from(ts.month0());
                let bucket = months - months.rem_euclid(n);
                let (year, month0) = (bucket.div_euclid(12), bucket.rem_euclid(12));
                let date = NaiveDate::from_ymd_opt(year as i32, month0 as u32 + 1, 1)
                    .expect("bucket month arithmetic stays in calendar range");
                Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
            }
        }
    }

    /// The start of the bucket immediately after the one starting at `start`.
    pub fn next_bucket(&self, start: DateTime<Utc>) -> DateTime<Utc> {
        let n = self.amount.get();
        match self.unit {
            ResampleUnit::Minute => start + chrono::Duration::minutes(i64::from(n)),
            ResampleUnit::Hour => start + chrono::Duration::hours(i64::from(n)),
            ResampleUnit::Day => start + chrono::Duration::days(i64::from(n)),
            ResampleUnit::Week => start + chrono::Duration::weeks(i64::from(n)),
            ResampleUnit::Month => start
                .checked_add_months(chrono::Months::new(n))
                .expect("bucket month arithmetic stays in calendar range"),
        }
    }
}

fn truncate_secs(ts: DateTime<Utc>, step: i64) -> DateTime<Utc> {
    let secs = ts.timestamp();
    from_epoch_secs(secs - secs.rem_euclid(step))
}

fn from_epoch_secs(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs, 0).expect("epoch seconds stay in chrono range")
}

/// Display/parse for frequency-code ergonomics (`"5m"`, `"1D"`, `"6M"`)
impl fmt::Display for ResampleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = self.amount.get();
        let u = match self.unit {
            ResampleUnit::Minute => "m",
            ResampleUnit::Hour => "h",
            ResampleUnit::Day => "D",
            ResampleUnit::Week => "W",
            ResampleUnit::Month => "M",
        };
        write!(f, "{a}{u}")
    }
}

impl FromStr for ResampleRule {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // very small parser: 5m / 3h / 1D / 1W / 6M
        if s.is_empty() {
            return Err(Error::InvalidArgument("empty resample rule".into()));
        }
        let (digits, unit) = s.split_at(s.len() - 1);
        let amount_num: u32 = digits
            .parse()
            .map_err(|_| Error::InvalidArgument(format!("bad resample amount in: {s}")))?;
        let amount = NonZeroU32::new(amount_num)
            .ok_or_else(|| Error::InvalidArgument("resample amount must be > 0".into()))?;
        let unit = match unit {
            "m" => ResampleUnit::Minute,
            "h" => ResampleUnit::Hour,
            "D" => ResampleUnit::Day,
            "W" => ResampleUnit::Week,
            "M" => ResampleUnit::Month,
            _ => return Err(Error::InvalidArgument(format!("unknown resample unit: {unit}"))),
        };
        Ok(ResampleRule::new(amount, unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn parse_and_display_round_trip() {
        for code in ["5m", "3h", "1D", "1W", "6M"] {
            let rule: ResampleRule = code.parse().expect(code);
            assert_eq!(rule.to_string(), code);
        }
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<ResampleRule>().is_err());
        assert!("0D".parse::<ResampleRule>().is_err());
        assert!("1X".parse::<ResampleRule>().is_err());
        assert!("xD".parse::<ResampleRule>().is_err());
    }

    #[test]
    fn day_bucket_truncates_to_midnight() {
        let rule: ResampleRule = "1D".parse().unwrap();
        let got = rule.bucket_start(utc(2023, 6, 15, 13, 45, 12));
        assert_eq!(got, utc(2023, 6, 15, 0, 0, 0));
    }

    #[test]
    fn week_bucket_starts_on_monday() {
        let rule: ResampleRule = "1W".parse().unwrap();
        // 2023-06-15 is a Thursday; its week starts Monday 2023-06-12.
        let got = rule.bucket_start(utc(2023, 6, 15, 13, 45, 12));
        assert_eq!(got, utc(2023, 6, 12, 0, 0, 0));
        // A Monday maps to itself.
        let monday = utc(2023, 6, 12, 0, 0, 0);
        assert_eq!(rule.bucket_start(monday), monday);
    }

    #[test]
    fn month_bucket_truncates_to_first_of_month() {
        let rule: ResampleRule = "1M".parse().unwrap();
        let got = rule.bucket_start(utc(2023, 2, 28, 23, 59, 59));
        assert_eq!(got, utc(2023, 2, 1, 0, 0, 0));
    }

    #[test]
    fn multi_month_buckets_align_to_quarter() {
        let rule: ResampleRule = "3M".parse().unwrap();
        assert_eq!(rule.bucket_start(utc(2023, 5, 20, 0, 0, 0)), utc(2023, 4, 1, 0, 0, 0));
        assert_eq!(rule.bucket_start(utc(2023, 12, 31, 0, 0, 0)), utc(2023, 10, 1, 0, 0, 0));
    }

    #[test]
    fn next_bucket_steps_across_year_boundary() {
        let rule: ResampleRule = "1M".parse().unwrap();
        let got = rule.next_bucket(utc(2023, 12, 1, 0, 0, 0));
        assert_eq!(got, utc(2024, 1, 1, 0, 0, 0));
    }

    #[test]
    fn minute_bucket_truncates_to_step() {
        let rule: ResampleRule = "5m".parse().unwrap();
        let got = rule.bucket_start(utc(2023, 6, 15, 13, 47, 30));
        assert_eq!(got, utc(2023, 6, 15, 13, 45, 0));
    }
}
