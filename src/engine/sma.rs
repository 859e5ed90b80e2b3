use std::collections::VecDeque;

/// Windowed simple moving average over closing prices.
///
/// The tracker is "not ready" until the window is full: [`Sma::next`] returns
/// `None` for the first `window - 1` values. Maintains a running sum so each
/// update is O(1).
#[derive(Debug, Clone)]
pub struct Sma {
    window: usize,
    sum: f64,
    values: VecDeque<f64>,
}

impl Sma {
    /// Creates a tracker over the given window of bars.
    /// A window of zero is treated as one.
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            sum: 0.0,
            values: VecDeque::with_capacity(window),
        }
    }

    /// Feeds the next closing price and returns the average, once ready.
    pub fn next(&mut self, close: f64) -> Option<f64> {
        self.values.push_back(close);
        self.sum += close;
        if self.values.len() > self.window {
            // pop cannot fail, len > window >= 1
            if let Some(oldest) = self.values.pop_front() {
                self.sum -= oldest;
            }
        }
        self.value()
    }

    /// Returns the current average, or `None` while the window is filling.
    pub fn value(&self) -> Option<f64> {
        if self.values.len() < self.window {
            return None;
        }
        Some(self.sum / self.window as f64)
    }
}

#[cfg(test)]
#[test]
fn not_ready_until_window_full() {
    let mut sma = Sma::new(3);
    assert_eq!(sma.next(1.0), None);
    assert_eq!(sma.next(2.0), None);
    assert_eq!(sma.next(3.0), Some(2.0));
    assert_eq!(sma.next(4.0), Some(3.0));
    assert_eq!(sma.value(), Some(3.0));
}

#[cfg(test)]
#[test]
fn window_of_one_tracks_price() {
    let mut sma = Sma::new(1);
    assert_eq!(sma.next(10.0), Some(10.0));
    assert_eq!(sma.next(20.0), Some(20.0));
}

#[cfg(test)]
#[test]
fn matches_reference_indicator_after_warmup() {
    use ta::Next;
    use ta::indicators::SimpleMovingAverage;

    let mut sma = Sma::new(5);
    let mut reference = SimpleMovingAverage::new(5).unwrap();

    for i in 0..200 {
        let close = 100.0 + 5.0 * ((i as f64) * 0.3).sin();
        let ours = sma.next(close);
        let theirs = reference.next(close);
        if let Some(value) = ours {
            assert!((value - theirs).abs() < 1e-9);
        }
    }
}
