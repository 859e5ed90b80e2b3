use chrono::NaiveDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One executed investment. Append-only: created exactly once per completed
/// purchase and never mutated.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvestmentEvent {
    /// Date of the bar on which the purchase filled.
    pub date: NaiveDate,
    /// Closing price paid per share.
    pub price: f64,
    /// Moving average value used for the deviation.
    pub ma_value: f64,
    /// Percentage deviation of price from the moving average.
    pub deviation_pct: f64,
    /// Multiplier applied to the base per-period cash.
    pub multiplier: f64,
    /// Cash actually deployed (after sizing absorbed rounding).
    pub amount: f64,
    /// Shares acquired.
    pub shares: f64,
}

/// One executed exit. Append-only.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitEvent {
    /// Date of the bar on which the sale filled.
    pub date: NaiveDate,
    /// Closing price received per share.
    pub price: f64,
    /// Realized return of the whole position at trigger time, in percent.
    pub return_pct: f64,
    /// Shares sold.
    pub shares_sold: f64,
    /// Cash received (shares_sold * price).
    pub proceeds: f64,
    /// Cost basis attributed to the sold shares (average-cost allocation).
    pub cost_of_sold: f64,
    /// proceeds - cost_of_sold.
    pub realized_profit: f64,
}

/// Snapshot of the open position.
///
/// Mutated only by [`Ledger`] in response to executed investments and exits.
/// Invariant: `total_cost_basis` is zero iff `total_shares` is zero (within
/// floating-point tolerance); whenever shares are held, the average cost per
/// share is `total_cost_basis / total_shares`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PositionState {
    /// Shares currently held.
    pub total_shares: f64,
    /// Capital currently committed, net of exited portions.
    pub total_cost_basis: f64,
    /// Cumulative cash received from exits.
    pub total_proceeds: f64,
    /// Date of the last completed purchase.
    pub last_investment_date: Option<NaiveDate>,
    /// Date of the last executed exit.
    pub last_exit_date: Option<NaiveDate>,
}

impl PositionState {
    /// Returns true while no shares are held.
    pub fn is_flat(&self) -> bool {
        self.total_shares <= 0.0
    }

    /// Average cost per share, or `None` while flat.
    pub fn average_cost(&self) -> Option<f64> {
        if self.is_flat() {
            return None;
        }
        Some(self.total_cost_basis / self.total_shares)
    }

    /// Market value of the held shares at the given price.
    pub fn value_at(&self, price: f64) -> f64 {
        self.total_shares * price
    }
}

/// Cost-basis ledger: owns the position state and the append-only event
/// histories.
#[derive(Debug, Default)]
pub struct Ledger {
    state: PositionState,
    investments: Vec<InvestmentEvent>,
    exits: Vec<ExitEvent>,
}

impl Ledger {
    /// Returns the current position state.
    pub fn state(&self) -> &PositionState {
        &self.state
    }

    /// Returns an iterator over the executed investments, in order.
    pub fn investments(&self) -> std::slice::Iter<'_, InvestmentEvent> {
        self.investments.iter()
    }

    /// Returns an iterator over the executed exits, in order.
    pub fn exits(&self) -> std::slice::Iter<'_, ExitEvent> {
        self.exits.iter()
    }

    /// Number of completed purchases.
    pub fn investment_count(&self) -> usize {
        self.investments.len()
    }

    /// Number of executed exits.
    pub fn exit_count(&self) -> usize {
        self.exits.len()
    }

    /// Records a completed purchase: appends the event and moves the position
    /// state forward.
    pub(crate) fn record_investment(&mut self, event: InvestmentEvent) {
        self.state.total_shares += event.shares;
        self.state.total_cost_basis += event.amount;
        self.state.last_investment_date = Some(event.date);
        self.investments.push(event);
    }

    /// Records an executed exit. `liquidation` resets shares and cost basis
    /// to exactly zero so no floating-point dust survives a full exit.
    pub(crate) fn record_exit(&mut self, event: ExitEvent, liquidation: bool) {
        if liquidation {
            self.state.total_shares = 0.0;
            self.state.total_cost_basis = 0.0;
        } else {
            self.state.total_shares -= event.shares_sold;
            self.state.total_cost_basis -= event.cost_of_sold;
        }
        self.state.total_proceeds += event.proceeds;
        self.state.last_exit_date = Some(event.date);
        self.exits.push(event);
    }
}
