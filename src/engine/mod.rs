//! Core decision engine components.
//!
//! This module provides the fundamental types for the sizing/exit policy:
//! - `Bar`: daily OHLCV data, validated at build time.
//! - `Config`: the sizing and exit policy parameters.
//! - `Ledger`: position state plus append-only event histories.
//! - `Cadence` / `ProfitTaker`: the entry and exit gates.
//! - `Broker` / `SimBroker`: the execution seam.
//! - `Engine`: the per-bar driver tying them together.

mod bar;
mod broker;
mod cadence;
mod config;
mod exits;
mod intent;
mod ledger;
mod multiplier;
mod sma;

use chrono::NaiveDate;
use tracing::{debug, trace};

use crate::{
    PercentCalculus,
    errors::{Error, Result},
};

pub use bar::*;
pub use broker::*;
pub use cadence::*;
pub use config::*;
pub use exits::*;
pub use intent::*;
pub use ledger::*;
pub use multiplier::*;
pub use sma::*;

/// Per-bar decision engine for the deviation-adjusted cost averaging policy.
///
/// One engine instance owns the whole decision state of a run: the moving
/// average tracker, the cadence and profit-taking controllers, the cost-basis
/// ledger, and the injected broker. Bars are consumed strictly in
/// chronological order; each call to [`Engine::process_bar`] completes one
/// decision cycle and returns the intents submitted on that bar.
#[derive(Debug)]
pub struct Engine<B: Broker> {
    config: Config,
    broker: B,
    sma: Sma,
    cadence: Cadence,
    profit_taker: ProfitTaker,
    ledger: Ledger,
    last_bar_date: Option<NaiveDate>,
}

impl<B: Broker> Engine<B> {
    /// Creates an engine with an empty position.
    ///
    /// ### Arguments
    /// * `config` - Validated policy parameters.
    /// * `broker` - The execution collaborator; owned for the run's lifetime.
    pub fn new(config: Config, broker: B) -> Self {
        Self {
            broker,
            sma: Sma::new(config.ma_window),
            cadence: Cadence::new(config.investment_interval_days),
            profit_taker: ProfitTaker::new(
                config.profit_target_pct,
                config.exit_sell_ratio,
                config.cooldown_days,
            ),
            ledger: Ledger::default(),
            last_bar_date: None,
            config,
        }
    }

    /// Returns the policy parameters.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the broker.
    pub fn broker(&self) -> &B {
        &self.broker
    }

    /// Returns the broker mutably.
    pub fn broker_mut(&mut self) -> &mut B {
        &mut self.broker
    }

    /// Returns the current position state.
    pub fn position(&self) -> &PositionState {
        self.ledger.state()
    }

    /// Returns an iterator over the executed investments, in order.
    pub fn investment_history(&self) -> std::slice::Iter<'_, InvestmentEvent> {
        self.ledger.investments()
    }

    /// Returns an iterator over the executed exits, in order.
    pub fn exit_history(&self) -> std::slice::Iter<'_, ExitEvent> {
        self.ledger.exits()
    }

    /// Number of completed purchases.
    pub fn investment_count(&self) -> usize {
        self.ledger.investment_count()
    }

    /// Number of executed exits.
    pub fn exit_count(&self) -> usize {
        self.ledger.exit_count()
    }

    /// Runs one decision cycle for the given bar.
    ///
    /// Strict evaluation order: the moving average tracker is advanced with
    /// the bar's close, profit taking is evaluated, then the cadence gate and
    /// the investment attempt. The order is part of the policy: an exit and a
    /// purchase may both fill on the same bar, in that order.
    ///
    /// ### Returns
    /// The intents submitted on this bar, or an error for malformed input
    /// (out-of-order date, non-finite price).
    pub fn process_bar(&mut self, bar: &Bar) -> Result<Vec<Intent>> {
        self.validate(bar)?;

        let mut intents = Vec::new();
        let ma_value = self.sma.next(bar.close());

        self.take_profit(bar, &mut intents)?;
        if self.cadence.is_due(bar.date()) {
            self.invest(bar, ma_value, &mut intents)?;
        }

        Ok(intents)
    }

    /// Consumes a bar sequence, one decision cycle per bar.
    ///
    /// ### Example
    /// ```rust
    /// use dca_rs::prelude::*;
    /// use chrono::NaiveDate;
    ///
    /// let bar = BarBuilder::builder()
    ///     .date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    ///     .open(100.0)
    ///     .high(110.0)
    ///     .low(95.0)
    ///     .close(105.0)
    ///     .volume(1.0)
    ///     .build()
    ///     .unwrap();
    ///
    /// let config = ConfigBuilder::builder().ma_window(1).build().unwrap();
    /// let broker = SimBroker::new(10_000.0).unwrap();
    /// let mut engine = Engine::new(config, broker);
    /// engine.run(vec![bar]).unwrap();
    /// assert_eq!(engine.investment_count(), 1);
    /// ```
    pub fn run<I>(&mut self, bars: I) -> Result<()>
    where
        I: IntoIterator<Item = Bar>,
    {
        let mut consumed = false;
        for bar in bars {
            consumed = true;
            self.process_bar(&bar)?;
        }
        if !consumed {
            return Err(Error::BarDataEmpty);
        }
        Ok(())
    }

    /// Rejects malformed input at ingestion. Bars built through `BarBuilder`
    /// are already well-formed; deserialized ones may not be.
    fn validate(&mut self, bar: &Bar) -> Result<()> {
        if let Some(last) = self.last_bar_date
            && bar.date() <= last
        {
            return Err(Error::BarOutOfOrder(last, bar.date()));
        }
        for price in [bar.open(), bar.high(), bar.low(), bar.close()] {
            if !price.is_finite() {
                return Err(Error::NonFiniteBarValue(price));
            }
            if price <= 0.0 {
                return Err(Error::NegZeroPrice(price));
            }
        }
        self.last_bar_date = Some(bar.date());
        Ok(())
    }

    /// Profit-taking step: evaluated before any entry on the same bar.
    fn take_profit(&mut self, bar: &Bar, intents: &mut Vec<Intent>) -> Result<()> {
        let price = bar.close();
        let Some(plan) = self.profit_taker.evaluate(self.ledger.state(), price, bar.date()) else {
            return Ok(());
        };

        let state = self.ledger.state();
        let proceeds = plan.sell_shares * price;
        let cost_of_sold = if plan.liquidation {
            state.total_cost_basis
        } else {
            (plan.sell_shares / state.total_shares) * state.total_cost_basis
        };

        let intent = Intent::from((IntentSide::Sell, plan.sell_shares, price, bar.date()));
        self.broker.submit_sell(plan.sell_shares, price)?;
        self.ledger.record_exit(
            ExitEvent {
                date: bar.date(),
                price,
                return_pct: plan.return_pct,
                shares_sold: plan.sell_shares,
                proceeds,
                cost_of_sold,
                realized_profit: proceeds - cost_of_sold,
            },
            plan.liquidation,
        );
        debug!(
            date = %bar.date(),
            price,
            return_pct = plan.return_pct,
            shares_sold = plan.sell_shares,
            proceeds,
            "profit taking"
        );
        intents.push(intent);
        Ok(())
    }

    /// Investment step: runs only when the cadence gate is open. The cadence
    /// baseline moves only on a completed purchase.
    fn invest(&mut self, bar: &Bar, ma_value: Option<f64>, intents: &mut Vec<Intent>) -> Result<()> {
        let Some(ma_value) = ma_value else {
            trace!(date = %bar.date(), "tracker not ready, attempt skipped");
            return Ok(());
        };

        let price = bar.close();
        let deviation_pct = ma_value.change(price);
        let multiplier = multiplier_for(deviation_pct);
        let requested = self.config.base_cash_per_period * multiplier;
        let available = requested.min(self.broker.free_cash());
        if multiplier <= 0.0 || available <= 0.0 {
            trace!(date = %bar.date(), deviation_pct, multiplier, "no deployment this period");
            return Ok(());
        }

        let size = self.config.sizing.size(available, price);
        if size <= 0.0 {
            trace!(date = %bar.date(), available, price, "size rounds away to nothing");
            return Ok(());
        }
        let amount = size * price;

        let intent = Intent::from((IntentSide::Buy, size, price, bar.date()));
        self.broker.submit_buy(size, price)?;
        self.ledger.record_investment(InvestmentEvent {
            date: bar.date(),
            price,
            ma_value,
            deviation_pct,
            multiplier,
            amount,
            shares: size,
        });
        self.cadence.mark_invested(bar.date());
        debug!(
            date = %bar.date(),
            price,
            deviation_pct,
            multiplier,
            amount,
            shares = size,
            "investment executed"
        );
        intents.push(intent);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

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

    fn engine(config: Config, cash: f64) -> Engine<SimBroker> {
        Engine::new(config, SimBroker::new(cash).unwrap())
    }

    #[test]
    fn warmup_skips_do_not_advance_cadence() {
        let config = ConfigBuilder::builder()
            .ma_window(3)
            .investment_interval_days(14)
            .build()
            .unwrap();
        let mut engine = engine(config, 10_000.0);

        // tracker ready on the third bar; the first two attempts are skipped
        // without recording a baseline, so the third invests immediately
        engine.run((0..5).map(|i| bar(i, 100.0))).unwrap();

        assert_eq!(engine.investment_count(), 1);
        let first = engine.investment_history().next().unwrap();
        assert_eq!(first.date, day(2));
        assert_eq!(engine.position().last_investment_date, Some(day(2)));
    }

    #[test]
    fn exit_before_entry_on_the_same_bar() {
        let config = ConfigBuilder::builder()
            .base_cash_per_period(500.0)
            .ma_window(2)
            .investment_interval_days(1)
            .profit_target_pct(50.0)
            .exit_sell_ratio(1.0)
            .build()
            .unwrap();
        let mut engine = engine(config, 10_000.0);

        let bars = vec![bar(0, 100.0), bar(1, 100.0), bar(2, 102.0), bar(3, 160.0)];
        engine.run(bars).unwrap();

        // bar 1: ma 100, deviation 0 -> x1.4 -> 700 -> 7 shares
        // bar 2: ma 101, deviation +0.99% -> x1.0 -> 500 -> 4 shares at 102
        // bar 3: return 58.8% >= 50% -> liquidate 11 shares at 160,
        //        then ma 131, deviation +22.1% -> x0.2 -> 100 -> 0 shares
        assert_eq!(engine.investment_count(), 2);
        assert_eq!(engine.exit_count(), 1);

        let investments: Vec<_> = engine.investment_history().collect();
        assert_eq!(investments[0].amount, 700.0);
        assert_eq!(investments[0].shares, 7.0);
        assert_eq!(investments[1].amount, 408.0);
        assert_eq!(investments[1].shares, 4.0);

        let exit = engine.exit_history().next().unwrap();
        assert_eq!(exit.shares_sold, 11.0);
        assert_eq!(exit.proceeds, 1760.0);
        assert_eq!(exit.cost_of_sold, 1108.0);
        assert_eq!(exit.realized_profit, 652.0);
        assert!(exit.return_pct >= 50.0);

        // the degenerate entry on bar 3 left the position flat and the
        // cadence baseline on the last completed purchase
        assert!(engine.position().is_flat());
        assert_eq!(engine.position().total_cost_basis, 0.0);
        assert_eq!(engine.position().last_investment_date, Some(day(2)));
        assert_eq!(engine.broker().balance(), 10_652.0);
    }

    #[test]
    fn requested_amount_clipped_to_free_cash() {
        let config = ConfigBuilder::builder()
            .base_cash_per_period(1000.0)
            .ma_window(2)
            .investment_interval_days(1)
            .build()
            .unwrap();
        let mut engine = engine(config, 300.0);

        // ma 28.5, deviation +1.75% -> x1.0 -> requested 1000, free cash 300
        engine.run(vec![bar(0, 28.0), bar(1, 29.0)]).unwrap();

        assert_eq!(engine.investment_count(), 1);
        let event = engine.investment_history().next().unwrap();
        assert_eq!(event.multiplier, 1.0);
        assert_eq!(event.shares, 10.0);
        assert_eq!(event.amount, 290.0);
        assert_eq!(engine.broker().balance(), 10.0);
    }

    #[test]
    fn zero_multiplier_does_not_advance_cadence() {
        let config = ConfigBuilder::builder()
            .ma_window(2)
            .investment_interval_days(14)
            .build()
            .unwrap();
        let mut engine = engine(config, 10_000.0);

        // bar 1: ma 150, deviation +33% -> x0.0, attempt skipped
        // bar 2: still no baseline, ma 200, deviation 0 -> x1.4, invests
        engine.run(vec![bar(0, 100.0), bar(1, 200.0), bar(2, 200.0)]).unwrap();

        assert_eq!(engine.investment_count(), 1);
        assert_eq!(engine.position().last_investment_date, Some(day(2)));
    }

    #[test]
    fn partial_exits_gated_by_cooldown() {
        let config = ConfigBuilder::builder()
            .ma_window(1)
            .investment_interval_days(1000)
            .profit_target_pct(75.0)
            .exit_sell_ratio(0.5)
            .cooldown_days(30)
            .sizing(Sizing::Fractional)
            .build()
            .unwrap();
        let mut engine = engine(config, 10_000.0);

        // day 0: ma = close, deviation 0 -> x1.4 -> 700 -> 7 shares at 100
        engine.process_bar(&bar(0, 100.0)).unwrap();
        assert_eq!(engine.position().total_shares, 7.0);
        assert_eq!(engine.position().total_cost_basis, 700.0);

        // day 40: return 80% >= 75% -> sell half
        engine.process_bar(&bar(40, 180.0)).unwrap();
        assert_eq!(engine.exit_count(), 1);
        assert_eq!(engine.position().total_shares, 3.5);
        assert_eq!(engine.position().total_cost_basis, 350.0);

        // day 45: return still 80%, but inside the 30-day cooldown
        engine.process_bar(&bar(45, 180.0)).unwrap();
        assert_eq!(engine.exit_count(), 1);

        // day 70: cooldown elapsed, second partial exit
        engine.process_bar(&bar(70, 180.0)).unwrap();
        assert_eq!(engine.exit_count(), 2);
        assert_eq!(engine.position().total_shares, 1.75);
        assert_eq!(engine.position().total_cost_basis, 175.0);

        let exits: Vec<_> = engine.exit_history().collect();
        assert_eq!(exits[0].proceeds, 630.0);
        assert_eq!(exits[0].cost_of_sold, 350.0);
        assert_eq!(exits[1].proceeds, 315.0);
        assert_eq!(exits[1].cost_of_sold, 175.0);
    }

    #[test]
    fn cost_basis_tracks_event_histories() {
        let config = ConfigBuilder::builder()
            .ma_window(2)
            .investment_interval_days(1)
            .profit_target_pct(20.0)
            .exit_sell_ratio(0.5)
            .cooldown_days(10)
            .build()
            .unwrap();
        let mut engine = engine(config, 10_000.0);

        let closes = [100.0, 98.0, 95.0, 104.0, 111.0, 125.0, 118.0, 131.0, 90.0, 97.0];
        engine
            .run(closes.iter().enumerate().map(|(i, &c)| bar(i as i64, c)))
            .unwrap();

        let invested: f64 = engine.investment_history().map(|i| i.amount).sum();
        let exited: f64 = engine.exit_history().map(|e| e.cost_of_sold).sum();
        assert!((engine.position().total_cost_basis - (invested - exited)).abs() < 1e-9);
    }

    #[test]
    fn replay_is_deterministic() {
        let config = ConfigBuilder::builder()
            .ma_window(3)
            .investment_interval_days(2)
            .profit_target_pct(10.0)
            .exit_sell_ratio(0.5)
            .cooldown_days(3)
            .sizing(Sizing::Fractional)
            .build()
            .unwrap();

        let closes = [100.0, 97.0, 103.0, 96.0, 108.0, 115.0, 121.0, 113.0, 127.0, 134.0];
        let bars: Vec<_> = closes.iter().enumerate().map(|(i, &c)| bar(i as i64, c)).collect();

        let mut first = engine(config, 5_000.0);
        first.run(bars.clone()).unwrap();
        let mut second = engine(config, 5_000.0);
        second.run(bars).unwrap();

        let a: Vec<_> = first.investment_history().collect();
        let b: Vec<_> = second.investment_history().collect();
        assert_eq!(a, b);

        let a: Vec<_> = first.exit_history().collect();
        let b: Vec<_> = second.exit_history().collect();
        assert_eq!(a, b);
        assert_eq!(first.position(), second.position());
        assert_eq!(first.broker().balance(), second.broker().balance());
    }

    #[test]
    fn out_of_order_bars_rejected() {
        let config = ConfigBuilder::builder().ma_window(1).build().unwrap();
        let mut engine = engine(config, 1_000.0);

        engine.process_bar(&bar(1, 100.0)).unwrap();
        let result = engine.process_bar(&bar(0, 100.0));
        assert!(matches!(result, Err(Error::BarOutOfOrder(_, _))));

        // duplicate dates are out of order too
        let result = engine.process_bar(&bar(1, 101.0));
        assert!(matches!(result, Err(Error::BarOutOfOrder(_, _))));
    }

    #[test]
    fn empty_run_rejected() {
        let config = ConfigBuilder::builder().build().unwrap();
        let mut engine = engine(config, 1_000.0);
        let result = engine.run(Vec::new());
        assert!(matches!(result, Err(Error::BarDataEmpty)));
    }
}
