//! # DCA: Dynamic Cost Averaging for Daily Bars
//!
//! **DCA** is a Rust library implementing a periodic, signal-adjusted
//! capital-deployment policy over daily candlestick (OHLCV) data: every few
//! days it deploys a slice of cash into a position, scaling the slice by how
//! far price has drifted from its trailing moving average, and it takes
//! profit (fully or partially, with a cooldown) once the position's realized
//! return crosses a target.
//!
//! ## Core Components
//! | Component   | Description                                                                      |
//! |-------------|----------------------------------------------------------------------------------|
//! | **`Bar`** | Daily OHLCV data for a single time step, validated at build time.                  |
//! | **`Config`** | The policy parameters: base cash, window, cadence, target, ratio, cooldown, sizing. |
//! | **`Sma`** | Windowed moving average tracker, "not ready" until the window fills.                |
//! | **`Ledger`** | Position state plus append-only investment/exit histories.                       |
//! | **`Cadence`** | Day-interval gate between successive purchases.                                 |
//! | **`ProfitTaker`** | Realized-return exit trigger with a cooldown gate.                          |
//! | **`Broker`** | Narrow execution seam: free cash, buy fills, sell fills.                         |
//! | **`Engine`** | The per-bar driver tying the policy together.                                    |
//! | **`Report`** | Post-run digest derived from the histories.                                      |
//!
//! ## The Policy
//! Per bar, in strict order:
//! 1. The moving average tracker is advanced with the bar's close.
//! 2. Profit taking is evaluated (exit before entry within the same bar).
//! 3. If the cadence gate is open, an investment attempt runs: the deviation
//!    of price from the average picks a multiplier, the multiplied base cash
//!    is clipped to the broker's free cash, sized into units, and bought.
//!
//! The deviation tiers range from x2.2 (price 20% or more below the average)
//! down to x0.0 (price more than 25% above it: skip the period entirely).
//! Skipped attempts never advance the cadence baseline; only a completed
//! purchase does.
//!
//! ## Getting Started
//! ```rust
//! use dca_rs::prelude::*;
//! use chrono::{Duration, NaiveDate};
//!
//! fn main() {
//!     let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//!     let bars: Vec<Bar> = (0..240)
//!         .map(|i| {
//!             let close = 100.0 + 10.0 * ((i as f64) * 0.05).sin();
//!             BarBuilder::builder()
//!                 .date(start + Duration::days(i))
//!                 .open(close)
//!                 .high(close + 1.0)
//!                 .low(close - 1.0)
//!                 .close(close)
//!                 .volume(1000.0)
//!                 .build()
//!                 .unwrap()
//!         })
//!         .collect();
//!
//!     let config = ConfigBuilder::builder()
//!         .base_cash_per_period(500.0)
//!         .ma_window(120)
//!         .investment_interval_days(14)
//!         .profit_target_pct(50.0)
//!         .build()
//!         .unwrap();
//!
//!     let broker = SimBroker::new(10_000.0).unwrap();
//!     let mut engine = Engine::new(config, broker);
//!     engine.run(bars).unwrap();
//!
//!     println!("{}", engine.summarize());
//! }
//! ```
//!
//! ## Determinism
//! Given the same bar sequence and configuration, the investment and exit
//! histories are bit-for-bit reproducible. The only randomness in the crate
//! is the id stamped on each [`engine::Intent`], which never feeds back into
//! a decision.
//!
//! ## Error Handling
//! The policy's steady-state branches are not errors: an unready tracker, a
//! zero multiplier, clipped or exhausted cash, and a size that rounds away to
//! nothing all skip quietly. Genuine failures are malformed input (bars out
//! of chronological order, non-finite prices) and invalid configuration,
//! surfaced as [`errors::Error`].
//!
//! ## License
//! MIT
#![warn(missing_docs)]

/// Core decision engine: bars, configuration, ledger, controllers, driver.
pub mod engine;

/// Error types for the library.
pub mod errors;

/// Post-run summary reporting.
pub mod report;

/// Utility functions and helpers.
pub mod utils;

/// Re-exports of commonly used types and traits for convenience.
pub mod prelude {
    pub use super::*;
    pub use crate::engine::*;
    pub use crate::errors::*;
    pub use crate::report::*;
}

use std::ops::{Div, Mul, Sub};

/// Trait for performing percentage-based calculations.
///
/// This trait provides the percentage arithmetic the policy is written in:
/// how much a value changed in percent, and what a percentage of a value is.
pub trait PercentCalculus<Rhs = Self> {
    /// Calculates the absolute value of a percentage.
    ///
    /// ### Arguments
    /// * `percent` - The percentage to calculate (e.g., 10.0 for 10%).
    ///
    /// ### Returns
    /// The absolute value of the given percentage.
    fn how_many(self, percent: Self) -> Self;

    /// Calculates the percentage change between two values.
    ///
    /// ### Arguments
    /// * `new` - The new value to compare with.
    ///
    /// ### Returns
    /// The percentage change from the original value to the new value.
    fn change(self, new: Self) -> Self;
}

impl PercentCalculus for f64 {
    fn how_many(self, percent: Self) -> Self {
        percent.mul(self.div(100.0))
    }

    fn change(self, new: Self) -> Self {
        new.sub(self).div(self).mul(100.0)
    }
}

#[cfg(test)]
mod percent {
    use super::*;

    #[test]
    fn how_many() {
        assert_eq!(10.0, 100.0.how_many(10.0))
    }

    #[test]
    fn change() {
        assert_eq!(10.0, 100.0.change(110.0))
    }

    #[test]
    fn change_is_the_deviation_formula() {
        // (price - ma) / ma * 100
        let ma = 80.0;
        let price = 100.0;
        assert_eq!(ma.change(price), (price - ma) / ma * 100.0);
    }
}
