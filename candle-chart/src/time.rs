//! UTC calendar helpers used to pick visible bar windows.

use crate::series::{IndexRange, Series};
use chrono::{DateTime, Days, TimeZone, Utc};

/// Midnight UTC of `date`, time component stripped.
pub fn utc_midnight(date: DateTime<Utc>) -> DateTime<Utc> {
    let day = date.date_naive();
    Utc.from_utc_datetime(&day.and_time(chrono::NaiveTime::MIN))
}

/// Ascending `(start, end)` range spanning `days` calendar days counted from `date`, which is
/// itself day one. Positive `days` extend into the future, negative into the past. Ranges
/// reaching past the representable dates saturate at [`DateTime::MAX_UTC`] or
/// [`DateTime::MIN_UTC`].
pub fn utc_date_range(date: DateTime<Utc>, days: i64) -> (DateTime<Utc>, DateTime<Utc>) {
    let first = utc_midnight(date);
    let offset = days - days.signum();
    let other = if offset >= 0 {
        first
            .checked_add_days(Days::new(offset.unsigned_abs()))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    } else {
        first
            .checked_sub_days(Days::new(offset.unsigned_abs()))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    };

    if days > 0 {
        (first, other)
    } else {
        (other, first)
    }
}

/// Bars falling on the last `days` calendar days of `series`, counted back from the day of its
/// final bar. At least the final bar is always included.
pub fn recent_days(series: &Series, days: i64) -> IndexRange {
    let full = series.full_range();
    let Some(last) = series
        .time()
        .last()
        .and_then(|ts| DateTime::<Utc>::from_timestamp(*ts, 0))
    else {
        return full;
    };

    let (start, _) = utc_date_range(last, -days.max(1));
    IndexRange::new(series.index_at_or_after(start.timestamp()), full.max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::tests::sample;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 30, 15).unwrap()
    }

    #[test]
    fn test_utc_midnight() {
        assert_eq!(
            utc_midnight(utc(2019, 3, 10, 17)),
            Utc.with_ymd_and_hms(2019, 3, 10, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_utc_date_range() {
        struct TestCase {
            days: i64,
            expected: ((u32, u32), (u32, u32)),
        }

        let tests = vec![
            TestCase {
                // TC0: one day is the day itself
                days: 1,
                expected: ((3, 10), (3, 10)),
            },
            TestCase {
                // TC1: a week forward
                days: 7,
                expected: ((3, 10), (3, 16)),
            },
            TestCase {
                // TC2: a week back, still ascending
                days: -7,
                expected: ((3, 4), (3, 10)),
            },
            TestCase {
                // TC3: across a month boundary
                days: -30,
                expected: ((2, 9), (3, 10)),
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let (start, end) = utc_date_range(utc(2019, 3, 10, 17), test.days);
            let ((sm, sd), (em, ed)) = test.expected;
            assert_eq!(start, Utc.with_ymd_and_hms(2019, sm, sd, 0, 0, 0).unwrap(), "TC{} failed", index);
            assert_eq!(end, Utc.with_ymd_and_hms(2019, em, ed, 0, 0, 0).unwrap(), "TC{} failed", index);
        }
    }

    #[test]
    fn test_utc_date_range_saturates() {
        let day = utc(2019, 3, 10, 17);
        let midnight = Utc.with_ymd_and_hms(2019, 3, 10, 0, 0, 0).unwrap();

        assert_eq!(
            utc_date_range(day, 1_000_000_000),
            (midnight, DateTime::<Utc>::MAX_UTC)
        );
        assert_eq!(
            utc_date_range(day, -1_000_000_000),
            (DateTime::<Utc>::MIN_UTC, midnight)
        );
        assert_eq!(utc_date_range(day, i64::MIN), (DateTime::<Utc>::MIN_UTC, midnight));
    }

    #[test]
    fn test_recent_days() {
        struct TestCase {
            days: i64,
            expected: IndexRange,
        }

        // Bars on Jan 1, 2, 3, 4 and 7 2019
        let series = sample();

        let tests = vec![
            TestCase {
                // TC0: only the final day
                days: 1,
                expected: IndexRange::new(4, 4),
            },
            TestCase {
                // TC1: Jan 4 to Jan 7
                days: 4,
                expected: IndexRange::new(3, 4),
            },
            TestCase {
                // TC2: longer than the series
                days: 30,
                expected: IndexRange::new(0, 4),
            },
            TestCase {
                // TC3: non-positive counts as one day
                days: 0,
                expected: IndexRange::new(4, 4),
            },
            TestCase {
                // TC4: further back than any representable date
                days: 1_000_000_000,
                expected: IndexRange::new(0, 4),
            },
            TestCase {
                // TC5: largest day count
                days: i64::MAX,
                expected: IndexRange::new(0, 4),
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            assert_eq!(recent_days(&series, test.days), test.expected, "TC{} failed", index);
        }
    }
}
