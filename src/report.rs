//! Post-run summary derived from the event histories.
//!
//! A [`Report`] is a read-only digest of a finished run: period counts,
//! deployed capital, realized profit, and the open position snapshot. It is
//! built from the engine after the bar sequence is exhausted and never feeds
//! back into the decision policy.

use std::fmt;

use crate::engine::*;

/// A digest of a finished run, derived read-only from the accumulated
/// investment and exit histories.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Number of completed purchases.
    pub investment_count: usize,
    /// Number of executed exits.
    pub exit_count: usize,
    /// Total cash deployed across all purchases.
    pub total_deployed: f64,
    /// Total cash received across all exits.
    pub total_proceeds: f64,
    /// Sum of realized profits across all exits.
    pub realized_profit: f64,
    /// Mean deviation at purchase time, in percent. Zero with no purchases.
    pub mean_deviation_pct: f64,
    /// Mean multiplier at purchase time. Zero with no purchases.
    pub mean_multiplier: f64,
    /// Open position at the end of the run.
    pub position: PositionState,
    /// Broker cash at the end of the run.
    pub free_cash: f64,
}

impl<B: Broker> From<&Engine<B>> for Report {
    fn from(engine: &Engine<B>) -> Self {
        let n = engine.investment_count();
        let total_deployed = engine.investment_history().map(|i| i.amount).sum();
        let total_proceeds = engine.exit_history().map(|e| e.proceeds).sum();
        let realized_profit = engine.exit_history().map(|e| e.realized_profit).sum();

        let (mean_deviation_pct, mean_multiplier) = if n == 0 {
            (0.0, 0.0)
        } else {
            (
                engine.investment_history().map(|i| i.deviation_pct).sum::<f64>() / n as f64,
                engine.investment_history().map(|i| i.multiplier).sum::<f64>() / n as f64,
            )
        };

        Self {
            investment_count: n,
            exit_count: engine.exit_count(),
            total_deployed,
            total_proceeds,
            realized_profit,
            mean_deviation_pct,
            mean_multiplier,
            position: *engine.position(),
            free_cash: engine.broker().free_cash(),
        }
    }
}

impl<B: Broker> Engine<B> {
    /// Summarizes the run so far.
    pub fn summarize(&self) -> Report {
        Report::from(self)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Cost Averaging Report ===")?;
        writeln!(f, "Periods invested: {}", self.investment_count)?;
        writeln!(f, "Exits: {}", self.exit_count)?;
        writeln!(f, "Total deployed: {:.2}", self.total_deployed)?;
        writeln!(f, "Total proceeds: {:.2}", self.total_proceeds)?;
        writeln!(f, "Realized profit: {:.2}", self.realized_profit)?;
        writeln!(f, "Mean deviation: {:.1}%", self.mean_deviation_pct)?;
        writeln!(f, "Mean multiplier: {:.2}", self.mean_multiplier)?;
        writeln!(
            f,
            "Open position: {:.4} shares, cost basis {:.2}",
            self.position.total_shares, self.position.total_cost_basis
        )?;
        writeln!(f, "Free cash: {:.2}", self.free_cash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset)
    }

    fn bar(offset: i64, close: f64) -> Bar {
        BarBuilder::builder()
            .date(day(offset))
            .open(close)
            .high(close)
            .low(close)
            .close(close)
            .volume(1.0)
            .build()
            .unwrap()
    }

    #[test]
    fn empty_run_summary() {
        let config = ConfigBuilder::builder().build().unwrap();
        let engine = Engine::new(config, SimBroker::new(1_000.0).unwrap());

        let report = engine.summarize();
        assert_eq!(report.investment_count, 0);
        assert_eq!(report.exit_count, 0);
        assert_eq!(report.total_deployed, 0.0);
        assert_eq!(report.mean_multiplier, 0.0);
        assert_eq!(report.free_cash, 1_000.0);
    }

    #[test]
    fn totals_match_histories() {
        let config = ConfigBuilder::builder()
            .ma_window(2)
            .investment_interval_days(1)
            .build()
            .unwrap();
        let mut engine = Engine::new(config, SimBroker::new(10_000.0).unwrap());
        engine
            .run(vec![bar(0, 100.0), bar(1, 100.0), bar(2, 102.0), bar(3, 160.0)])
            .unwrap();

        let report = engine.summarize();
        assert_eq!(report.investment_count, 2);
        assert_eq!(report.exit_count, 1);
        assert_eq!(report.total_deployed, 1108.0);
        assert_eq!(report.total_proceeds, 1760.0);
        assert_eq!(report.realized_profit, 652.0);
        assert_eq!(report.free_cash, 10_652.0);
        assert!((report.mean_multiplier - 1.2).abs() < 1e-9);
    }

    #[test]
    fn display_renders_every_line() {
        let config = ConfigBuilder::builder().build().unwrap();
        let engine = Engine::new(config, SimBroker::new(1_000.0).unwrap());

        let rendered = engine.summarize().to_string();
        assert!(rendered.contains("Periods invested: 0"));
        assert!(rendered.contains("Free cash: 1000.00"));
    }
}
