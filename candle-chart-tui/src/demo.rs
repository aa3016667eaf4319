//! Synthetic daily series for running without data files.

use candle_chart::{time::utc_date_range, Bar, Series, SeriesError};
use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};

const SECONDS_PER_DAY: i64 = 86_400;

/// Symbols shown when no series files are configured: a regular price and a micro price.
pub const DEMO_SYMBOLS: [(&str, f64); 2] = [("GOLD", 1284.7), ("SHIB", 0.000_008_5)];

/// Random walk of `bars` daily candles starting at `start_price`, ending today. Seeded by
/// `symbol`, so the same symbol always draws the same chart.
pub fn demo_series(symbol: &str, bars: usize, start_price: f64) -> Result<Series, SeriesError> {
    demo_series_until(symbol, bars, start_price, Utc::now())
}

pub fn demo_series_until(
    symbol: &str,
    bars: usize,
    start_price: f64,
    until: DateTime<Utc>,
) -> Result<Series, SeriesError> {
    let seed = symbol.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(b)));
    let mut rng = StdRng::seed_from_u64(seed);
    let (first_day, _) = utc_date_range(until, -(bars.max(1) as i64));

    let mut open = start_price;
    let candles: Vec<Bar> = (0..bars)
        .map(|index| {
            let close = open * (1.0 + rng.random_range(-0.03..0.03));
            let high = open.max(close) * (1.0 + rng.random_range(0.0..0.015));
            let low = open.min(close) * (1.0 - rng.random_range(0.0..0.015));
            let volume = start_price * 1_000.0 * rng.random_range(0.5..1.5);

            let bar = Bar {
                time: first_day.timestamp() + index as i64 * SECONDS_PER_DAY,
                open,
                high,
                low,
                close,
                volume,
            };
            open = close;
            bar
        })
        .collect();

    Series::from_bars(&candles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_demo_series_is_valid_and_daily() {
        let until = Utc.with_ymd_and_hms(2019, 3, 10, 17, 0, 0).unwrap();
        let series = demo_series_until("GOLD", 30, 1284.7, until).unwrap();

        assert_eq!(series.len(), 30);
        assert_eq!(series.first_open(), Some(1284.7));
        assert_eq!(
            series.time()[0],
            Utc.with_ymd_and_hms(2019, 2, 9, 0, 0, 0).unwrap().timestamp()
        );
        assert_eq!(
            series.time()[29],
            Utc.with_ymd_and_hms(2019, 3, 10, 0, 0, 0).unwrap().timestamp()
        );

        for index in 0..series.len() {
            let bar = series.bar(index).unwrap();
            assert!(bar.low <= bar.open.min(bar.close));
            assert!(bar.high >= bar.open.max(bar.close));
            assert!(bar.volume > 0.0);
        }
    }

    #[test]
    fn test_demo_series_is_seeded_by_symbol() {
        let until = Utc.with_ymd_and_hms(2019, 3, 10, 0, 0, 0).unwrap();
        let a = demo_series_until("SHIB", 10, 0.000_008_5, until).unwrap();
        let b = demo_series_until("SHIB", 10, 0.000_008_5, until).unwrap();
        let c = demo_series_until("GOLD", 10, 0.000_008_5, until).unwrap();

        assert_eq!(a.bar(9), b.bar(9));
        assert_ne!(a.bar(9), c.bar(9));
    }

    #[test]
    fn test_demo_series_rejects_zero_bars() {
        assert_eq!(
            demo_series("GOLD", 0, 1.0).unwrap_err(),
            SeriesError::Empty
        );
    }
}
