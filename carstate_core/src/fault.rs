//! Steering-assist fault classification from the EPS torque-delivery status.

use crate::calibration::exact_code;
use crate::variant::{CarVariant, VariantFamily};

/// Decoded `LKATorqueDeliveredStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TorqueDeliveryStatus {
    Inactive,
    Active,
    TemporarilyLimited,
    Failed,
    /// Codes outside the documented four; some EPS firmwares use them for healthy states.
    Extended(i64),
}

impl TorqueDeliveryStatus {
    pub const fn from_raw(code: i64) -> Self {
        match code {
            0 => TorqueDeliveryStatus::Inactive,
            1 => TorqueDeliveryStatus::Active,
            2 => TorqueDeliveryStatus::TemporarilyLimited,
            3 => TorqueDeliveryStatus::Failed,
            other => TorqueDeliveryStatus::Extended(other),
        }
    }

    pub const fn is_ok_for(self, family: VariantFamily) -> bool {
        use TorqueDeliveryStatus::*;
        match (family, self) {
            (_, Inactive | Active) => true,
            (_, TemporarilyLimited | Failed) => false,
            (VariantFamily::SuperCruise, Extended(4..=6)) => true,
            (VariantFamily::SuperCruise, Extended(_)) => false,
            (VariantFamily::Standard, Extended(_)) => false,
        }
    }
}

/// True when steering assist should be reported degraded for this status code.
pub const fn steer_fault_degraded(raw_status: i64, variant: CarVariant) -> bool {
    !TorqueDeliveryStatus::from_raw(raw_status).is_ok_for(variant.family())
}

/// Same as [`steer_fault_degraded`] for the signal value as read; a value that is not
/// an exact status code is degraded.
pub fn steer_fault_degraded_value(raw: f64, variant: CarVariant) -> bool {
    exact_code(raw).is_none_or(|code| steer_fault_degraded(code, variant))
}
