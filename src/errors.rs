use chrono::NaiveDate;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the library.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The bar data provided is empty. A run requires at least one bar.
    #[error("Bar data is empty: a run requires at least one bar")]
    BarDataEmpty,

    /// A required bar field was not set on the builder.
    #[error("Missing bar field: {0}")]
    MissingBarField(&'static str),

    /// A bar price or volume is not a finite number.
    #[error("Non-finite bar value: {0}")]
    NonFiniteBarValue(f64),

    /// A bar price is zero or negative.
    #[error("Bar prices must be positive (got: {0})")]
    NegZeroPrice(f64),

    /// The bar's high is below its low, or open/close fall outside them.
    #[error("Bar price bounds are inconsistent: high {0}, low {1}")]
    BarPriceBounds(f64, f64),

    /// The bar's volume is negative.
    #[error("Bar volume must be non-negative (got: {0})")]
    NegVolume(f64),

    /// Bars must arrive in strictly increasing chronological order.
    #[error("Bar out of order: {1} does not follow {0}")]
    BarOutOfOrder(NaiveDate, NaiveDate),

    /// The per-period base cash must be positive and finite.
    #[error("Base cash per period must be positive (got: {0})")]
    NegZeroBaseCash(f64),

    /// The moving average window must cover at least one bar.
    #[error("Moving average window must be at least 1")]
    ZeroWindow,

    /// The investment interval must be at least one day.
    #[error("Investment interval must be at least 1 day (got: {0})")]
    BadInterval(i64),

    /// The profit target must be a finite percentage.
    #[error("Profit target must be finite (got: {0})")]
    NonFiniteTarget(f64),

    /// The exit sell ratio must be in (0, 1].
    #[error("Exit sell ratio must be in (0, 1] (got: {0})")]
    BadSellRatio(f64),

    /// The profit-taking cooldown must be non-negative.
    #[error("Cooldown must be non-negative (got: {0} days)")]
    NegCooldown(i64),

    /// The initial or current broker balance is not positive.
    #[error("Balance must be positive (got: {0})")]
    NegZeroBalance(f64),

    /// The broker does not hold enough cash to fill the buy.
    /// Expected: {0}, Available: {1}
    #[error("Insufficient funds: required {0}, available {1}")]
    InsufficientFunds(f64, f64),

    /// A submitted intent quantity or price is not a positive finite number.
    #[error("Fill rejected: quantity {0} at price {1}")]
    BadFill(f64, f64),

    /// I/O error occurred.
    // utils.rs
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error occurred.
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
