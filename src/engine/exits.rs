use chrono::NaiveDate;

use super::ledger::PositionState;
use crate::PercentCalculus;

/// Shares to sell when a profit-taking trigger fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitPlan {
    /// Units to sell, already rounded.
    pub sell_shares: f64,
    /// Realized return of the whole position at trigger time, in percent.
    pub return_pct: f64,
    /// True when the plan liquidates the whole position.
    pub liquidation: bool,
}

/// Profit-taking controller: realized-return trigger with a cooldown gate.
///
/// Evaluated once per bar, before any investment attempt on the same bar.
/// The cooldown strictly blocks a retrigger even while the return still
/// exceeds the target.
#[derive(Debug)]
pub struct ProfitTaker {
    target_pct: f64,
    sell_ratio: f64,
    cooldown_days: i64,
}

impl ProfitTaker {
    pub(crate) fn new(target_pct: f64, sell_ratio: f64, cooldown_days: i64) -> Self {
        Self {
            target_pct,
            sell_ratio,
            cooldown_days,
        }
    }

    /// Returns true while `current_date` is still inside the cooldown window
    /// after the last exit.
    pub fn in_cooldown(&self, last_exit_date: Option<NaiveDate>, current_date: NaiveDate) -> bool {
        match last_exit_date {
            None => false,
            Some(last) => (current_date - last).num_days() < self.cooldown_days,
        }
    }

    /// Evaluates the trigger against the open position at the bar's close.
    ///
    /// Returns `None` when no exit is due this bar: flat position, zero cost
    /// basis, cooldown still running, return below target, or a sell size
    /// that rounds away to nothing.
    pub fn evaluate(&self, state: &PositionState, price: f64, current_date: NaiveDate) -> Option<ExitPlan> {
        if state.is_flat() || state.total_cost_basis <= 0.0 {
            return None;
        }
        if self.in_cooldown(state.last_exit_date, current_date) {
            return None;
        }

        let current_value = state.value_at(price);
        let return_pct = state.total_cost_basis.change(current_value);
        if return_pct < self.target_pct {
            return None;
        }

        let liquidation = self.sell_ratio >= 1.0;
        let sell_shares = if liquidation {
            state.total_shares
        } else {
            round4(state.total_shares * self.sell_ratio)
        };
        if sell_shares <= 0.0 {
            return None;
        }

        Some(ExitPlan {
            sell_shares,
            return_pct,
            liquidation,
        })
    }
}

/// Rounds to 4 decimal places, half away from zero.
pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, day).unwrap()
    }

    fn holding(shares: f64, cost: f64, last_exit: Option<NaiveDate>) -> PositionState {
        PositionState {
            total_shares: shares,
            total_cost_basis: cost,
            total_proceeds: 0.0,
            last_investment_date: Some(date(1)),
            last_exit_date: last_exit,
        }
    }

    #[test]
    fn no_trigger_while_flat_or_zero_cost() {
        let taker = ProfitTaker::new(50.0, 1.0, 0);
        assert_eq!(taker.evaluate(&PositionState::default(), 100.0, date(1)), None);

        // shares without cost basis: return undefined, skip
        let degenerate = holding(1.0, 0.0, None);
        assert_eq!(taker.evaluate(&degenerate, 100.0, date(1)), None);
    }

    #[test]
    fn full_liquidation_at_target() {
        let taker = ProfitTaker::new(50.0, 1.0, 0);
        let state = holding(10.0, 1000.0, None);

        // value 1600, return 60% >= 50%
        let plan = taker.evaluate(&state, 160.0, date(10)).unwrap();
        assert_eq!(plan.sell_shares, 10.0);
        assert!(plan.liquidation);
        assert!((plan.return_pct - 60.0).abs() < 1e-9);
    }

    #[test]
    fn below_target_is_no_trigger() {
        let taker = ProfitTaker::new(50.0, 1.0, 0);
        let state = holding(10.0, 1000.0, None);
        assert_eq!(taker.evaluate(&state, 149.0, date(10)), None);

        // boundary: exactly at target triggers
        assert!(taker.evaluate(&state, 150.0, date(10)).is_some());
    }

    #[test]
    fn partial_plan_rounds_to_four_decimals() {
        let taker = ProfitTaker::new(75.0, 0.5, 30);
        let state = holding(2.2222, 100.0, None);

        let plan = taker.evaluate(&state, 100.0, date(10)).unwrap();
        assert_eq!(plan.sell_shares, 1.1111);
        assert!(!plan.liquidation);
    }

    #[test]
    fn cooldown_strictly_blocks_retrigger() {
        let taker = ProfitTaker::new(75.0, 0.5, 30);

        // exit fired on day 9 (Feb 9 = "day 40" of some run); return still
        // above target 5 days later, but the window has 25 days to go
        let state = holding(5.0, 100.0, Some(date(9)));
        assert!(taker.in_cooldown(state.last_exit_date, date(14)));
        assert_eq!(taker.evaluate(&state, 100.0, date(14)), None);

        // day 29 since: still blocked; day 30: open again
        assert_eq!(taker.evaluate(&state, 100.0, date(9) + chrono::Duration::days(29)), None);
        assert!(taker.evaluate(&state, 100.0, date(9) + chrono::Duration::days(30)).is_some());
    }

    #[test]
    fn dust_position_rounds_away_to_noop() {
        let taker = ProfitTaker::new(0.0, 0.5, 0);
        let state = holding(0.00005, 0.000001, None);
        assert_eq!(taker.evaluate(&state, 100.0, date(10)), None);
    }
}
