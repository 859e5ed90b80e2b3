use chrono::NaiveDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::utils::random_id;

/// Represents the side of a trade intent (buy or sell).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntentSide {
    /// Deploy cash into the position.
    Buy,
    /// Reduce exposure.
    Sell,
}

/// A buy or sell instruction submitted to the broker collaborator.
///
/// Intents are assumed filled immediately and completely at the requested
/// price. The id only disambiguates intents within a run; it carries no
/// meaning for the decision policy.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy)]
pub struct Intent {
    id: u32,
    /// Buy or sell.
    pub side: IntentSide,
    /// Units to fill.
    pub quantity: f64,
    /// Requested fill price (the bar's close).
    pub price: f64,
    /// Date of the bar that produced the intent.
    pub date: NaiveDate,
}

impl PartialEq for Intent {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

type I1 = (IntentSide, f64, f64, NaiveDate);
impl From<I1> for Intent {
    fn from((side, quantity, price, date): I1) -> Self {
        Self {
            id: random_id(),
            side,
            quantity,
            price,
            date,
        }
    }
}

impl Intent {
    /// Returns the total cash value of the intent (price * quantity).
    pub fn value(&self) -> f64 {
        self.price * self.quantity
    }
}

#[cfg(test)]
#[test]
fn create_buy_intent() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let intent: Intent = (IntentSide::Buy, 2.0, 100.0, date).into();

    assert_eq!(intent.quantity, 2.0);
    assert_eq!(intent.price, 100.0);
    assert_eq!(intent.value(), 200.0);
    assert_eq!(intent.date, date);
    assert!(matches!(intent.side, IntentSide::Buy));
}

#[cfg(test)]
#[test]
fn intent_equality_is_by_id() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let intent1: Intent = (IntentSide::Sell, 1.0, 50.0, date).into();
    let intent2: Intent = (IntentSide::Sell, 1.0, 50.0, date).into();
    assert_ne!(intent1, intent2);
    assert_eq!(intent1, intent1);
}
