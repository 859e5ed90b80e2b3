//! Deviation-to-multiplier mapping.
//!
//! The multiplier scales the base per-period cash amount according to how far
//! the closing price has drifted from its trailing moving average. The further
//! the price sits below the average, the more capital gets deployed; far above
//! the average, deployment stops entirely.

/// Multiplier tiers, ordered by deviation. First match wins, upper bound
/// inclusive. The final tier (above +25%) maps to 0.0: skip the period.
const TIERS: [(f64, f64); 6] = [
    (-20.0, 2.2),
    (-10.0, 1.8),
    (0.0, 1.4),
    (5.0, 1.0),
    (15.0, 0.5),
    (25.0, 0.2),
];

/// Maps a percentage deviation from the moving average to an investment
/// multiplier.
///
/// Pure and total: defined for every input, including non-finite values
/// (`NAN` and `+INFINITY` fall through every tier and map to 0.0).
///
/// ### Example
/// ```rust
/// use dca_rs::engine::multiplier_for;
///
/// assert_eq!(multiplier_for(-25.0), 2.2);
/// assert_eq!(multiplier_for(3.0), 1.0);
/// assert_eq!(multiplier_for(30.0), 0.0);
/// ```
pub fn multiplier_for(deviation_pct: f64) -> f64 {
    for (upper_bound, multiplier) in TIERS {
        if deviation_pct <= upper_bound {
            return multiplier;
        }
    }
    0.0
}
