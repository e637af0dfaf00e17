use std::time::Duration;

/// Whole milliseconds since startup plus the fractional carry.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Runtime {
    millis: u64,
    sub_millis: f64,
}

impl Runtime {
    /// Add `elapsed`; whole milliseconds move into the counter and the fraction is carried.
    pub fn advance(&mut self, elapsed: Duration) {
        self.sub_millis += elapsed.as_secs_f64() * 1000.0;
        if self.sub_millis >= 1.0 {
            let whole = self.sub_millis.trunc();
            self.millis = self.millis.saturating_add(whole as u64);
            self.sub_millis -= whole;
        }
    }

    /// Whole milliseconds.
    pub fn milliseconds(&self) -> u64 {
        self.millis
    }

    /// Fraction of a millisecond not yet counted, in `[0, 1)`.
    pub fn sub_milliseconds(&self) -> f64 {
        self.sub_millis
    }
}
