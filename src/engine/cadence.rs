use chrono::NaiveDate;

/// Day-interval gate between successive investment attempts.
///
/// The controller only gates the attempt; it never executes the purchase.
/// Its date is advanced exclusively on a completed purchase, so a skipped
/// attempt (tracker not ready, multiplier 0, no cash, degenerate size) leaves
/// the comparison baseline untouched and the engine re-checks on the next bar.
#[derive(Debug)]
pub struct Cadence {
    interval_days: i64,
    last_investment_date: Option<NaiveDate>,
}

impl Cadence {
    pub(crate) fn new(interval_days: i64) -> Self {
        Self {
            interval_days,
            last_investment_date: None,
        }
    }

    /// Returns true when a new investment attempt is due on `current_date`.
    ///
    /// Due on the first ever evaluation, then whenever at least
    /// `interval_days` whole days have elapsed since the last completed
    /// purchase.
    pub fn is_due(&self, current_date: NaiveDate) -> bool {
        match self.last_investment_date {
            None => true,
            Some(last) => (current_date - last).num_days() >= self.interval_days,
        }
    }

    /// Advances the baseline after a completed purchase.
    pub(crate) fn mark_invested(&mut self, current_date: NaiveDate) {
        self.last_investment_date = Some(current_date);
    }

    /// Date of the last completed purchase, if any.
    pub fn last_investment_date(&self) -> Option<NaiveDate> {
        self.last_investment_date
    }
}
