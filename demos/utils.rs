use chrono::{Duration, NaiveDate};
use dca_rs::prelude::*;

/// Generates deterministic daily bars.
pub fn generate_sample_bars(n: i64, seed: i64, base_price: f64) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
    let mut open = base_price;

    (0..n)
        .map(|i| {
            // Slow drift plus two overlapping cycles, so price spends time on
            // both sides of its long moving average
            let drift = 0.03 * (i as f64);
            let cycle = 18.0 * ((i as f64 * 0.021 + seed as f64).sin());
            let wobble = 4.0 * ((i as f64 * 0.17 + seed as f64 * 0.5).sin());

            let close = (base_price + drift + cycle + wobble).max(1.0);
            let wiggle = 0.6 + 0.4 * ((i as f64 * 0.09).cos()).abs();
            let high = open.max(close) + wiggle;
            let low = (open.min(close) - wiggle).max(0.5);
            let volume = 1000.0 + 500.0 * ((i as f64 * 0.2).sin()).abs();

            let bar = BarBuilder::builder()
                .date(start + Duration::days(i))
                .open(open)
                .high(high)
                .low(low)
                .close(close)
                .volume(volume)
                .build()
                .unwrap();

            open = close;
            bar
        })
        .collect()
}
