//! Replays a recorded signal log frame by frame.
//!
//! Values latch: a signal keeps its last logged value until a later frame updates it,
//! the way a bus decoder holds the latest decoded message.

use std::collections::HashMap;

use carstate_config::LoggedFrame;
use carstate_traits::SignalSource;

use crate::faults::FaultPlan;

pub struct ReplaySource {
    frames: std::vec::IntoIter<LoggedFrame>,
    latest: HashMap<(String, String), f64>,
    current_frame: Option<u64>,
    advances: u64,
    faults: FaultPlan,
}

impl ReplaySource {
    pub fn new(frames: Vec<LoggedFrame>) -> Self {
        tracing::debug!(frames = frames.len(), "replay source loaded");
        Self {
            frames: frames.into_iter(),
            latest: HashMap::new(),
            current_frame: None,
            advances: 0,
            faults: FaultPlan::none(),
        }
    }

    pub fn with_faults(mut self, faults: FaultPlan) -> Self {
        self.faults = faults;
        self
    }

    /// Frame index of the most recently applied log frame.
    pub fn current_frame(&self) -> Option<u64> {
        self.current_frame
    }

    /// Frames not yet replayed.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl SignalSource for ReplaySource {
    fn advance(
        &mut self,
        _timeout: std::time::Duration,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        self.advances += 1;
        self.faults.check(self.advances)?;

        let Some(frame) = self.frames.next() else {
            return Ok(false);
        };
        for v in frame.values {
            self.latest.insert((v.message, v.signal), v.value);
        }
        self.current_frame = Some(frame.frame);
        Ok(true)
    }

    fn value(&self, message: &str, signal: &str) -> Option<f64> {
        self.latest
            .get(&(message.to_owned(), signal.to_owned()))
            .copied()
    }
}
