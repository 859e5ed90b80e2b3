use chrono::NaiveDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// A single daily OHLCV bar.
///
/// Bars are immutable once built. Price bounds are validated at build time;
/// chronological ordering is validated by the engine at ingestion.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl Bar {
    /// Returns the bar's date.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the opening price.
    pub fn open(&self) -> f64 {
        self.open
    }

    /// Returns the highest price.
    pub fn high(&self) -> f64 {
        self.high
    }

    /// Returns the lowest price.
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Returns the closing price.
    pub fn close(&self) -> f64 {
        self.close
    }

    /// Returns the traded volume.
    pub fn volume(&self) -> f64 {
        self.volume
    }
}

/// Builder for [`Bar`] with validation.
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
/// assert_eq!(bar.close(), 105.0);
/// ```
#[derive(Debug, Default)]
pub struct BarBuilder {
    date: Option<NaiveDate>,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: Option<f64>,
}

impl BarBuilder {
    /// Creates an empty builder.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Sets the bar's date.
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Sets the opening price.
    pub fn open(mut self, open: f64) -> Self {
        self.open = Some(open);
        self
    }

    /// Sets the highest price.
    pub fn high(mut self, high: f64) -> Self {
        self.high = Some(high);
        self
    }

    /// Sets the lowest price.
    pub fn low(mut self, low: f64) -> Self {
        self.low = Some(low);
        self
    }

    /// Sets the closing price.
    pub fn close(mut self, close: f64) -> Self {
        self.close = Some(close);
        self
    }

    /// Sets the traded volume.
    pub fn volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Validates the fields and builds the bar.
    ///
    /// ### Returns
    /// The bar, or an error describing the first invalid field.
    pub fn build(self) -> Result<Bar> {
        let date = self.date.ok_or(Error::MissingBarField("date"))?;
        let open = self.open.ok_or(Error::MissingBarField("open"))?;
        let high = self.high.ok_or(Error::MissingBarField("high"))?;
        let low = self.low.ok_or(Error::MissingBarField("low"))?;
        let close = self.close.ok_or(Error::MissingBarField("close"))?;
        let volume = self.volume.ok_or(Error::MissingBarField("volume"))?;

        for price in [open, high, low, close] {
            if !price.is_finite() {
                return Err(Error::NonFiniteBarValue(price));
            }
            if price <= 0.0 {
                return Err(Error::NegZeroPrice(price));
            }
        }
        if !volume.is_finite() {
            return Err(Error::NonFiniteBarValue(volume));
        }
        if volume < 0.0 {
            return Err(Error::NegVolume(volume));
        }
        if high < low || open > high || open < low || close > high || close < low {
            return Err(Error::BarPriceBounds(high, low));
        }

        Ok(Bar {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}
