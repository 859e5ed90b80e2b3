#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Narrow synchronous interface to the execution collaborator.
///
/// The engine reads free cash to clip investment amounts and submits buy and
/// sell intents that are assumed filled immediately and completely at the
/// requested price. No retries, no cancellation.
pub trait Broker {
    /// Cash available for new purchases.
    fn free_cash(&self) -> f64;

    /// Fills a buy of `quantity` units at `price`, debiting the cost.
    fn submit_buy(&mut self, quantity: f64, price: f64) -> Result<()>;

    /// Fills a sell of `quantity` units at `price`, crediting the proceeds.
    fn submit_sell(&mut self, quantity: f64, price: f64) -> Result<()>;
}

/// Deterministic in-memory broker for backtests.
///
/// Fills are simulated at the requested price with no fees or slippage. The
/// engine clips buy amounts to the free cash first, so an insufficient-funds
/// rejection here signals a sizing bug rather than a market condition.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug)]
pub struct SimBroker {
    // Initial balance used for reset
    initial_balance: f64,
    // Available cash
    balance: f64,
}

impl SimBroker {
    /// Creates a broker holding the given starting cash.
    /// Negative or zero balances are rejected.
    pub fn new(balance: f64) -> Result<Self> {
        if balance <= 0.0 || !balance.is_finite() {
            return Err(Error::NegZeroBalance(balance));
        }

        Ok(Self {
            balance,
            initial_balance: balance,
        })
    }

    /// Returns the starting cash.
    pub fn initial_balance(&self) -> f64 {
        self.initial_balance
    }

    /// Returns the current cash balance.
    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Restores the starting cash.
    pub fn reset(&mut self) {
        self.balance = self.initial_balance;
    }

    fn check_fill(quantity: f64, price: f64) -> Result<()> {
        if quantity <= 0.0 || price <= 0.0 || !quantity.is_finite() || !price.is_finite() {
            return Err(Error::BadFill(quantity, price));
        }
        Ok(())
    }
}

impl Broker for SimBroker {
    fn free_cash(&self) -> f64 {
        self.balance
    }

    fn submit_buy(&mut self, quantity: f64, price: f64) -> Result<()> {
        Self::check_fill(quantity, price)?;
        let cost = quantity * price;
        // tolerate the last ulp of a clipped amount
        if cost > self.balance && (cost - self.balance) > 1e-9 {
            return Err(Error::InsufficientFunds(cost, self.balance));
        }
        self.balance = (self.balance - cost).max(0.0);
        Ok(())
    }

    fn submit_sell(&mut self, quantity: f64, price: f64) -> Result<()> {
        Self::check_fill(quantity, price)?;
        self.balance += quantity * price;
        Ok(())
    }
}

#[cfg(test)]
#[test]
fn new_broker_valid_balance() {
    let broker = SimBroker::new(100.0).unwrap();
    assert_eq!(broker.balance(), 100.0);
    assert_eq!(broker.free_cash(), 100.0);
    assert_eq!(broker.initial_balance(), 100.0);
}

#[cfg(test)]
#[test]
fn new_broker_invalid_balance() {
    let result = SimBroker::new(0.0);
    assert!(matches!(result, Err(Error::NegZeroBalance(_))));

    let result = SimBroker::new(-10.0);
    assert!(matches!(result, Err(Error::NegZeroBalance(_))));
}

#[cfg(test)]
#[test]
fn buy_debits_cost() {
    let mut broker = SimBroker::new(1000.0).unwrap();
    broker.submit_buy(7.0, 100.0).unwrap();
    assert_eq!(broker.balance(), 300.0);
    assert_eq!(broker.free_cash(), 300.0);
}

#[cfg(test)]
#[test]
fn buy_insufficient_funds() {
    let mut broker = SimBroker::new(100.0).unwrap();
    let result = broker.submit_buy(2.0, 100.0);
    assert!(matches!(result, Err(Error::InsufficientFunds(_, _))));
    assert_eq!(broker.balance(), 100.0);
}

#[cfg(test)]
#[test]
fn buy_whole_balance_is_allowed() {
    let mut broker = SimBroker::new(290.0).unwrap();
    broker.submit_buy(10.0, 29.0).unwrap();
    assert_eq!(broker.balance(), 0.0);
}

#[cfg(test)]
#[test]
fn sell_credits_proceeds() {
    let mut broker = SimBroker::new(100.0).unwrap();
    broker.submit_sell(10.0, 160.0).unwrap();
    assert_eq!(broker.balance(), 1700.0);
}

#[cfg(test)]
#[test]
fn invalid_fill_rejected() {
    let mut broker = SimBroker::new(100.0).unwrap();
    assert!(matches!(broker.submit_buy(0.0, 100.0), Err(Error::BadFill(_, _))));
    assert!(matches!(broker.submit_sell(1.0, -5.0), Err(Error::BadFill(_, _))));
    assert!(matches!(broker.submit_buy(f64::NAN, 100.0), Err(Error::BadFill(_, _))));
}

#[cfg(test)]
#[test]
fn reset_broker() {
    let mut broker = SimBroker::new(1000.0).unwrap();
    broker.submit_buy(5.0, 100.0).unwrap();
    broker.submit_sell(5.0, 120.0).unwrap();

    broker.reset();
    assert_eq!(broker.balance(), 1000.0);
    assert_eq!(broker.free_cash(), 1000.0);
}
