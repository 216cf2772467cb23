pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// Supplier of decoded bus signal values, one snapshot per control cycle.
pub trait SignalSource {
    /// Move to the next bus update. Returns `Ok(false)` once the source is exhausted.
    fn advance(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    /// Latest live value for `signal` of `message`, or `None` when the source has none.
    fn value(&self, message: &str, signal: &str) -> Option<f64>;
}

/// Longitudinal speed estimator fed once per cycle with the raw wheel-speed mean.
pub trait SpeedFilter {
    /// Returns `(filtered_speed, acceleration)`.
    fn update(&mut self, raw_speed: f64) -> (f64, f64);
    fn reset(&mut self);
}
