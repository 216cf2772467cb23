//! Signal registry: which signals to read from which bus messages, with defaults.
//!
//! The list is resolved once from `VehicleConfig` into a flat immutable `SignalSpec`.
//! Variant and hardware conditionals live here only; the normalizer reads by name.

use serde::Serialize;

use crate::state::CruiseButtons;
use crate::variant::VehicleConfig;

/// Bus message names.
pub mod msg {
    pub const BRAKE_PEDAL: &str = "EBCMBrakePedalPosition";
    pub const DOOR_BELT: &str = "BCMDoorBeltStatus";
    pub const TURN_SIGNALS: &str = "BCMTurnSignals";
    pub const ACCELERATOR: &str = "AcceleratorPedal";
    pub const ACC_STATUS: &str = "ASCMActiveCruiseControlStatus";
    pub const STEERING_BUTTON: &str = "ASCMSteeringButton";
    pub const STEERING_ANGLE: &str = "PSCMSteeringAngle";
    pub const WHEEL_SPEED_FRONT: &str = "EBCMWheelSpdFront";
    pub const WHEEL_SPEED_REAR: &str = "EBCMWheelSpdRear";
    pub const PRNDL: &str = "ECMPRDNL";
    pub const PSCM_STATUS: &str = "PSCMStatus";
    pub const ESP_STATUS: &str = "ESPStatus";
    pub const EPB_STATUS: &str = "EPBStatus";
    pub const ENGINE_STATUS: &str = "ECMEngineStatus";
    pub const REGEN_PADDLE: &str = "EBCMRegenPaddle";
    pub const GAS_SENSOR: &str = "GAS_SENSOR";
}

/// Signal names, grouped by the message they belong to.
pub mod sig {
    pub const BRAKE_PEDAL_POSITION: &str = "BrakePedalPosition";
    pub const FRONT_LEFT_DOOR: &str = "FrontLeftDoor";
    pub const FRONT_RIGHT_DOOR: &str = "FrontRightDoor";
    pub const REAR_LEFT_DOOR: &str = "RearLeftDoor";
    pub const REAR_RIGHT_DOOR: &str = "RearRightDoor";
    pub const LEFT_SEAT_BELT: &str = "LeftSeatBelt";
    pub const RIGHT_SEAT_BELT: &str = "RightSeatBelt";
    pub const TURN_SIGNALS: &str = "TurnSignals";
    pub const ACCELERATOR_PEDAL: &str = "AcceleratorPedal";
    pub const ACC_CMD_ACTIVE: &str = "ACCCmdActive";
    pub const ACC_BUTTONS: &str = "ACCButtons";
    pub const STEERING_WHEEL_ANGLE: &str = "SteeringWheelAngle";
    pub const FL_WHEEL_SPD: &str = "FLWheelSpd";
    pub const FR_WHEEL_SPD: &str = "FRWheelSpd";
    pub const RL_WHEEL_SPD: &str = "RLWheelSpd";
    pub const RR_WHEEL_SPD: &str = "RRWheelSpd";
    pub const PRNDL: &str = "PRNDL";
    pub const DRIVER_TORQUE: &str = "LKADriverAppldTrq";
    pub const TORQUE_DELIVERED_STATUS: &str = "LKATorqueDeliveredStatus";
    pub const TRACTION_CONTROL_ON: &str = "TractionControlOn";
    pub const EPB_CLOSED: &str = "EPBClosed";
    pub const CRUISE_MAIN_ON: &str = "CruiseMainOn";
    pub const REGEN_PADDLE: &str = "RegenPaddle";
    pub const INTERCEPTOR_GAS: &str = "INTERCEPTOR_GAS";
    pub const INTERCEPTOR_GAS2: &str = "INTERCEPTOR_GAS2";
}

/// One registered signal: `signal` of bus message `message`, and the value to use
/// whenever the source has nothing live for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalEntry {
    pub signal: &'static str,
    pub message: &'static str,
    pub default: f64,
}

const fn entry(signal: &'static str, message: &'static str, default: f64) -> SignalEntry {
    SignalEntry {
        signal,
        message,
        default,
    }
}

const BASE_SIGNALS: [SignalEntry; 22] = [
    entry(sig::BRAKE_PEDAL_POSITION, msg::BRAKE_PEDAL, 0.0),
    entry(sig::FRONT_LEFT_DOOR, msg::DOOR_BELT, 0.0),
    entry(sig::FRONT_RIGHT_DOOR, msg::DOOR_BELT, 0.0),
    entry(sig::REAR_LEFT_DOOR, msg::DOOR_BELT, 0.0),
    entry(sig::REAR_RIGHT_DOOR, msg::DOOR_BELT, 0.0),
    entry(sig::LEFT_SEAT_BELT, msg::DOOR_BELT, 0.0),
    entry(sig::RIGHT_SEAT_BELT, msg::DOOR_BELT, 0.0),
    entry(sig::TURN_SIGNALS, msg::TURN_SIGNALS, 0.0),
    entry(sig::ACCELERATOR_PEDAL, msg::ACCELERATOR, 0.0),
    entry(sig::ACC_CMD_ACTIVE, msg::ACC_STATUS, 0.0),
    entry(
        sig::ACC_BUTTONS,
        msg::STEERING_BUTTON,
        CruiseButtons::UNPRESS as f64,
    ),
    entry(sig::STEERING_WHEEL_ANGLE, msg::STEERING_ANGLE, 0.0),
    entry(sig::FL_WHEEL_SPD, msg::WHEEL_SPEED_FRONT, 0.0),
    entry(sig::FR_WHEEL_SPD, msg::WHEEL_SPEED_FRONT, 0.0),
    entry(sig::RL_WHEEL_SPD, msg::WHEEL_SPEED_REAR, 0.0),
    entry(sig::RR_WHEEL_SPD, msg::WHEEL_SPEED_REAR, 0.0),
    entry(sig::PRNDL, msg::PRNDL, 0.0),
    entry(sig::DRIVER_TORQUE, msg::PSCM_STATUS, 0.0),
    entry(sig::TORQUE_DELIVERED_STATUS, msg::PSCM_STATUS, 0.0),
    entry(sig::TRACTION_CONTROL_ON, msg::ESP_STATUS, 0.0),
    entry(sig::EPB_CLOSED, msg::EPB_STATUS, 0.0),
    entry(sig::CRUISE_MAIN_ON, msg::ENGINE_STATUS, 0.0),
];

const REGEN_SIGNALS: [SignalEntry; 1] = [entry(sig::REGEN_PADDLE, msg::REGEN_PADDLE, 0.0)];

const INTERCEPTOR_SIGNALS: [SignalEntry; 2] = [
    entry(sig::INTERCEPTOR_GAS, msg::GAS_SENSOR, 0.0),
    entry(sig::INTERCEPTOR_GAS2, msg::GAS_SENSOR, 0.0),
];

/// Ordered, immutable list of signals the source must track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalSpec {
    entries: Vec<SignalEntry>,
}

impl SignalSpec {
    /// Base set plus the extension blocks selected by variant and interceptor flag.
    pub fn for_vehicle(vehicle: &VehicleConfig) -> Self {
        let mut entries = BASE_SIGNALS.to_vec();
        if vehicle.variant.has_regen_paddle() {
            entries.extend_from_slice(&REGEN_SIGNALS);
        }
        if vehicle.enable_gas_interceptor {
            entries.extend_from_slice(&INTERCEPTOR_SIGNALS);
        }
        tracing::debug!(
            variant = %vehicle.variant,
            interceptor = vehicle.enable_gas_interceptor,
            signals = entries.len(),
            "signal registry built"
        );
        Self { entries }
    }

    pub fn entries(&self) -> &[SignalEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &SignalEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, message: &str, signal: &str) -> bool {
        self.find(message, signal).is_some()
    }

    /// Registered default for a signal, `None` when it is not registered.
    pub fn default_for(&self, message: &str, signal: &str) -> Option<f64> {
        self.find(message, signal).map(|e| e.default)
    }

    /// Distinct message names in first-appearance order.
    pub fn messages(&self) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = Vec::new();
        for e in &self.entries {
            if !out.contains(&e.message) {
                out.push(e.message);
            }
        }
        out
    }

    fn find(&self, message: &str, signal: &str) -> Option<&SignalEntry> {
        self.entries
            .iter()
            .find(|e| e.message == message && e.signal == signal)
    }
}

impl<'a> IntoIterator for &'a SignalSpec {
    type Item = &'a SignalEntry;
    type IntoIter = std::slice::Iter<'a, SignalEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::CarVariant;
    use rstest::rstest;

    #[rstest]
    #[case(CarVariant::Malibu, false, 22)]
    #[case(CarVariant::Volt, false, 23)]
    #[case(CarVariant::Bolt, false, 23)]
    #[case(CarVariant::Acadia, true, 24)]
    #[case(CarVariant::Volt, true, 25)]
    fn size_follows_additive_rules(
        #[case] variant: CarVariant,
        #[case] interceptor: bool,
        #[case] expected: usize,
    ) {
        let spec = SignalSpec::for_vehicle(&VehicleConfig::new(variant, interceptor));
        assert_eq!(spec.len(), expected);
        assert_eq!(
            spec.contains(msg::REGEN_PADDLE, sig::REGEN_PADDLE),
            variant.has_regen_paddle()
        );
        assert_eq!(spec.contains(msg::GAS_SENSOR, sig::INTERCEPTOR_GAS2), interceptor);
    }

    #[test]
    fn extensions_are_appended_after_base() {
        let spec = SignalSpec::for_vehicle(&VehicleConfig::new(CarVariant::Volt, true));
        let tail: Vec<_> = spec.entries()[22..].iter().map(|e| e.signal).collect();
        assert_eq!(
            tail,
            vec![sig::REGEN_PADDLE, sig::INTERCEPTOR_GAS, sig::INTERCEPTOR_GAS2]
        );
        assert_eq!(&spec.entries()[..22], &BASE_SIGNALS[..]);
    }

    #[test]
    fn cruise_buttons_default_to_unpressed() {
        let spec = SignalSpec::for_vehicle(&VehicleConfig::new(CarVariant::Malibu, false));
        assert_eq!(
            spec.default_for(msg::STEERING_BUTTON, sig::ACC_BUTTONS),
            Some(CruiseButtons::UNPRESS as f64)
        );
        assert_eq!(spec.default_for(msg::GAS_SENSOR, sig::INTERCEPTOR_GAS), None);
    }

    #[test]
    fn messages_are_deduplicated_in_order() {
        let spec = SignalSpec::for_vehicle(&VehicleConfig::new(CarVariant::Malibu, false));
        let messages = spec.messages();
        assert_eq!(messages[0], msg::BRAKE_PEDAL);
        assert_eq!(messages[1], msg::DOOR_BELT);
        assert_eq!(messages.len(), 14);
    }
}
