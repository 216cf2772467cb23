//! One cycle's worth of signal values, with registered defaults filled in.

use std::collections::HashMap;

use carstate_traits::SignalSource;

use crate::signals::SignalSpec;

/// Values keyed by message, then signal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalFrame {
    values: HashMap<String, HashMap<String, f64>>,
}

impl SignalFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame holding every registered signal at its default.
    pub fn defaults(spec: &SignalSpec) -> Self {
        let mut frame = Self::new();
        for e in spec {
            frame.set(e.message, e.signal, e.default);
        }
        frame
    }

    /// Snapshot the source for every registered signal. Absent or non-finite live
    /// values are replaced by the registered default.
    pub fn collect<S: SignalSource + ?Sized>(source: &S, spec: &SignalSpec) -> Self {
        let mut frame = Self::new();
        let mut substituted = 0usize;
        for e in spec {
            let value = match source.value(e.message, e.signal) {
                Some(v) if v.is_finite() => v,
                _ => {
                    substituted += 1;
                    e.default
                }
            };
            frame.set(e.message, e.signal, value);
        }
        if substituted > 0 {
            tracing::trace!(substituted, "signals defaulted this cycle");
        }
        frame
    }

    pub fn set(&mut self, message: &str, signal: &str, value: f64) {
        self.values
            .entry(message.to_string())
            .or_default()
            .insert(signal.to_string(), value);
    }

    /// Builder-style `set`, handy for assembling frames in tests and tools.
    pub fn with(mut self, message: &str, signal: &str, value: f64) -> Self {
        self.set(message, signal, value);
        self
    }

    pub fn get(&self, message: &str, signal: &str) -> Option<f64> {
        self.values.get(message)?.get(signal).copied()
    }

    pub fn len(&self) -> usize {
        self.values.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::FixedSource;
    use crate::signals::{msg, sig};
    use crate::state::CruiseButtons;
    use crate::variant::{CarVariant, VehicleConfig};

    #[test]
    fn collect_fills_defaults_for_missing_and_garbled() {
        let spec = SignalSpec::for_vehicle(&VehicleConfig::new(CarVariant::Malibu, false));
        let source = FixedSource::new()
            .with(msg::BRAKE_PEDAL, sig::BRAKE_PEDAL_POSITION, 50.0)
            .with(msg::STEERING_BUTTON, sig::ACC_BUTTONS, f64::NAN)
            .with("Unregistered", "Signal", 9.0);
        let frame = SignalFrame::collect(&source, &spec);

        assert_eq!(frame.len(), spec.len());
        assert_eq!(frame.get(msg::BRAKE_PEDAL, sig::BRAKE_PEDAL_POSITION), Some(50.0));
        assert_eq!(
            frame.get(msg::STEERING_BUTTON, sig::ACC_BUTTONS),
            Some(CruiseButtons::UNPRESS as f64)
        );
        assert_eq!(frame.get("Unregistered", "Signal"), None);
    }

    #[test]
    fn defaults_frame_covers_every_signal() {
        let spec = SignalSpec::for_vehicle(&VehicleConfig::new(CarVariant::Volt, true));
        let frame = SignalFrame::defaults(&spec);
        assert_eq!(frame.len(), spec.len());
        assert_eq!(frame.get(msg::GAS_SENSOR, sig::INTERCEPTOR_GAS2), Some(0.0));
    }
}
