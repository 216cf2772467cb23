//! Test and helper mocks for carstate_core

use std::collections::HashMap;
use std::time::Duration;

use carstate_traits::{SignalSource, SpeedFilter};

/// A source that serves the same values every cycle, optionally for a bounded
/// number of cycles.
#[derive(Debug, Clone, Default)]
pub struct FixedSource {
    values: HashMap<(String, String), f64>,
    remaining: Option<u64>,
}

impl FixedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, message: &str, signal: &str, value: f64) -> Self {
        self.set(message, signal, value);
        self
    }

    /// Report exhaustion after `n` successful advances.
    pub fn cycles(mut self, n: u64) -> Self {
        self.remaining = Some(n);
        self
    }

    pub fn set(&mut self, message: &str, signal: &str, value: f64) {
        self.values
            .insert((message.to_string(), signal.to_string()), value);
    }
}

impl SignalSource for FixedSource {
    fn advance(
        &mut self,
        _timeout: Duration,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        match self.remaining.as_mut() {
            Some(0) => Ok(false),
            Some(n) => {
                *n -= 1;
                Ok(true)
            }
            None => Ok(true),
        }
    }

    fn value(&self, message: &str, signal: &str) -> Option<f64> {
        self.values
            .get(&(message.to_string(), signal.to_string()))
            .copied()
    }
}

/// A source whose every advance fails; useful for exercising runner error paths.
pub struct FailingSource {
    pub message: &'static str,
}

impl SignalSource for FailingSource {
    fn advance(
        &mut self,
        _timeout: Duration,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other(self.message)))
    }

    fn value(&self, _message: &str, _signal: &str) -> Option<f64> {
        None
    }
}

/// Filter that reports the raw speed unchanged and zero acceleration.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughFilter;

impl SpeedFilter for PassthroughFilter {
    fn update(&mut self, raw_speed: f64) -> (f64, f64) {
        (raw_speed, 0.0)
    }

    fn reset(&mut self) {}
}
