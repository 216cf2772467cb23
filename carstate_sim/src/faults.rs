use crate::error::{Result, SimError};

/// Deterministic bus faults for exercising the runner's error budget.
#[derive(Debug, Clone, Default)]
pub struct FaultPlan {
    dropout_every: Option<u64>,
    timeouts: Vec<u64>,
}

impl FaultPlan {
    pub fn none() -> Self {
        Self::default()
    }

    /// Fail every `n`th advance with an injected dropout. `n == 0` disables.
    pub fn dropout_every(mut self, n: u64) -> Self {
        self.dropout_every = (n > 0).then_some(n);
        self
    }

    /// Fail the advance with this 1-based index as a timeout.
    pub fn timeout_at(mut self, advance: u64) -> Self {
        self.timeouts.push(advance);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.dropout_every.is_none() && self.timeouts.is_empty()
    }

    /// Fault scheduled for the given 1-based advance, if any.
    pub(crate) fn check(&self, advance: u64) -> Result<()> {
        if self.timeouts.contains(&advance) {
            return Err(SimError::Timeout);
        }
        if let Some(n) = self.dropout_every
            && advance % n == 0
        {
            return Err(SimError::Injected(format!("bus dropout at advance {advance}")));
        }
        Ok(())
    }
}
