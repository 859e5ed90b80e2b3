#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::exits::round4;
use crate::errors::{Error, Result};

/// How a cash amount is converted into a unit size at the bar's close.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sizing {
    /// Truncate to whole units (stock-like instruments).
    #[default]
    WholeUnits,
    /// Round to 4 decimal places (crypto-like instruments).
    Fractional,
}

impl Sizing {
    /// Converts `available` cash at `price` into a unit size.
    ///
    /// A fractional size never costs more than `available`: when rounding up
    /// would overdraw, the size is stepped down by one ten-thousandth.
    pub(crate) fn size(&self, available: f64, price: f64) -> f64 {
        let raw = available / price;
        match self {
            Self::WholeUnits => raw.trunc(),
            Self::Fractional => {
                let size = round4(raw);
                if size * price > available {
                    round4(size - 0.0001)
                } else {
                    size
                }
            }
        }
    }
}

/// Engine configuration, fixed at construction.
///
/// Defaults reproduce the reference policy: 500 base cash, 120-day moving
/// average, 14-day cadence, full liquidation at +50% with no cooldown,
/// whole-unit sizing.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Cash deployed per period before the multiplier is applied.
    pub base_cash_per_period: f64,
    /// Moving average window, in bars.
    pub ma_window: usize,
    /// Minimum days between completed purchases.
    pub investment_interval_days: i64,
    /// Realized-return threshold that triggers profit taking, in percent.
    pub profit_target_pct: f64,
    /// Fraction of the position sold on a trigger; 1.0 liquidates.
    pub exit_sell_ratio: f64,
    /// Minimum days between successive exits.
    pub cooldown_days: i64,
    /// Unit sizing mode.
    pub sizing: Sizing,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_cash_per_period: 500.0,
            ma_window: 120,
            investment_interval_days: 14,
            profit_target_pct: 50.0,
            exit_sell_ratio: 1.0,
            cooldown_days: 0,
            sizing: Sizing::WholeUnits,
        }
    }
}

/// Builder for [`Config`] with validation.
///
/// ### Example
/// ```rust
/// use dca_rs::prelude::*;
///
/// let config = ConfigBuilder::builder()
///     .base_cash_per_period(250.0)
///     .ma_window(60)
///     .investment_interval_days(7)
///     .profit_target_pct(75.0)
///     .exit_sell_ratio(0.5)
///     .cooldown_days(30)
///     .sizing(Sizing::Fractional)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.investment_interval_days, 7);
/// ```
#[derive(Debug)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a builder holding the default configuration.
    pub fn builder() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Sets the base cash deployed per period.
    pub fn base_cash_per_period(mut self, cash: f64) -> Self {
        self.config.base_cash_per_period = cash;
        self
    }

    /// Sets the moving average window, in bars.
    pub fn ma_window(mut self, window: usize) -> Self {
        self.config.ma_window = window;
        self
    }

    /// Sets the minimum days between completed purchases.
    pub fn investment_interval_days(mut self, days: i64) -> Self {
        self.config.investment_interval_days = days;
        self
    }

    /// Sets the profit-taking trigger threshold, in percent.
    pub fn profit_target_pct(mut self, pct: f64) -> Self {
        self.config.profit_target_pct = pct;
        self
    }

    /// Sets the fraction of the position sold on a trigger.
    pub fn exit_sell_ratio(mut self, ratio: f64) -> Self {
        self.config.exit_sell_ratio = ratio;
        self
    }

    /// Sets the minimum days between successive exits.
    pub fn cooldown_days(mut self, days: i64) -> Self {
        self.config.cooldown_days = days;
        self
    }

    /// Sets the unit sizing mode.
    pub fn sizing(mut self, sizing: Sizing) -> Self {
        self.config.sizing = sizing;
        self
    }

    /// Validates the fields and builds the configuration.
    pub fn build(self) -> Result<Config> {
        let config = self.config;
        if config.base_cash_per_period <= 0.0 || !config.base_cash_per_period.is_finite() {
            return Err(Error::NegZeroBaseCash(config.base_cash_per_period));
        }
        if config.ma_window == 0 {
            return Err(Error::ZeroWindow);
        }
        if config.investment_interval_days < 1 {
            return Err(Error::BadInterval(config.investment_interval_days));
        }
        if !config.profit_target_pct.is_finite() {
            return Err(Error::NonFiniteTarget(config.profit_target_pct));
        }
        if config.exit_sell_ratio <= 0.0 || config.exit_sell_ratio > 1.0 || !config.exit_sell_ratio.is_finite() {
            return Err(Error::BadSellRatio(config.exit_sell_ratio));
        }
        if config.cooldown_days < 0 {
            return Err(Error::NegCooldown(config.cooldown_days));
        }
        Ok(config)
    }
}
