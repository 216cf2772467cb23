//! Calibration constants for pedal, speed and steering signals.

use crate::variant::CarVariant;

/// Brake potentiometer full-scale reading (0xd0).
pub const BRAKE_FULL_SCALE: f64 = 208.0;
/// Normalized brake below this is potentiometer rest noise and reads as 0.
pub const BRAKE_DEADBAND: f64 = 10.0 / BRAKE_FULL_SCALE;
/// Accelerator pedal full-scale reading.
pub const GAS_FULL_SCALE: f64 = 254.0;
pub const PEDAL_PRESSED_EPSILON: f64 = 1e-5;
/// Interceptor average (raw units) above which the gas pedal counts as pressed.
/// The interceptor reads below zero at rest, so this stays raw until it is recalibrated.
pub const INTERCEPTOR_GAS_PRESSED_THRESHOLD: f64 = 20.0;
pub const KPH_TO_MS: f64 = 1.0 / 3.6;
/// Raw speed (m/s) below which the car is considered stopped.
pub const STANDSTILL_SPEED: f64 = 0.01;
/// 2^63; finite values in `[-2^63, 2^63)` convert to `i64` without loss of range.
const I64_RANGE: f64 = 9_223_372_036_854_775_808.0;

/// Integer code carried by a raw signal value.
///
/// `None` for fractional, non-finite or out-of-range values: those carry no
/// valid enumerated code.
#[allow(clippy::cast_possible_truncation)]
pub fn exact_code(raw: f64) -> Option<i64> {
    (raw.fract() == 0.0 && (-I64_RANGE..I64_RANGE).contains(&raw)).then(|| raw as i64)
}

/// True only when `raw` is exactly the enumerated `code`.
pub fn is_code(raw: f64, code: i64) -> bool {
    exact_code(raw) == Some(code)
}

/// Thresholds the normalizer applies that may be tuned per installation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub interceptor_gas_threshold: f64,
    pub steer_threshold: f64,
}

impl Calibration {
    pub const fn for_variant(variant: CarVariant) -> Self {
        Self {
            interceptor_gas_threshold: INTERCEPTOR_GAS_PRESSED_THRESHOLD,
            steer_threshold: variant.steer_threshold(),
        }
    }

    /// Brake pedal position normalized to 0..1 with the rest deadband applied.
    pub const fn normalize_brake(raw: f64) -> f64 {
        let brake = raw / BRAKE_FULL_SCALE;
        if brake < BRAKE_DEADBAND { 0.0 } else { brake }
    }

    pub const fn normalize_gas(raw: f64) -> f64 {
        raw / GAS_FULL_SCALE
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            interceptor_gas_threshold: INTERCEPTOR_GAS_PRESSED_THRESHOLD,
            steer_threshold: crate::variant::STEER_THRESHOLD,
        }
    }
}
