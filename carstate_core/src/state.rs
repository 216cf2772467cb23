//! Normalized per-cycle vehicle state.

use serde::Serialize;

use crate::gear::GearShifter;

/// Raw `ACCButtons` codes.
pub struct CruiseButtons;

impl CruiseButtons {
    pub const INIT: i64 = 0;
    pub const UNPRESS: i64 = 1;
    pub const RES_ACCEL: i64 = 2;
    pub const DECEL_SET: i64 = 3;
    pub const MAIN: i64 = 5;
    pub const CANCEL: i64 = 6;
}

/// `ACCCmdActive` codes. Any value other than `OFF` means cruise is engaged.
pub struct AccState;

impl AccState {
    pub const OFF: i64 = 0;
    pub const ACTIVE: i64 = 1;
    /// Holding at a stop; still engaged.
    pub const STANDSTILL: i64 = 4;
}

/// Wheel speeds in m/s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WheelSpeeds {
    pub fl: f64,
    pub fr: f64,
    pub rl: f64,
    pub rr: f64,
}

impl WheelSpeeds {
    pub const fn mean(&self) -> f64 {
        (self.fl + self.fr + self.rl + self.rr) / 4.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CruiseState {
    /// Cruise main switch on.
    pub available: bool,
    /// ACC activation value is anything but `AccState::OFF`.
    pub enabled: bool,
    pub standstill: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarState {
    pub wheel_speeds: WheelSpeeds,
    /// Mean of the four wheel speeds (m/s).
    pub v_ego_raw: f64,
    /// Filtered speed (m/s).
    pub v_ego: f64,
    /// Filtered acceleration (m/s^2).
    pub a_ego: f64,
    pub standstill: bool,

    pub steering_angle_deg: f64,
    pub steering_torque: f64,
    pub steering_pressed: bool,
    /// Steering assist degraded per the EPS torque-delivery status.
    pub steer_warning: bool,

    pub gear_shifter: GearShifter,

    /// Brake pedal position, 0..1 with rest noise removed.
    pub brake: f64,
    pub brake_pressed: bool,
    /// Accelerator position 0..1, or the interceptor average in raw units when fitted.
    pub gas: f64,
    pub gas_pressed: bool,
    pub regen_pressed: bool,

    pub door_open: bool,
    pub seatbelt_unlatched: bool,
    pub left_blinker: bool,
    pub right_blinker: bool,
    pub park_brake: bool,
    pub esp_disabled: bool,

    pub main_on: bool,
    /// Raw ACC activation value as read.
    pub acc_status: f64,
    pub cruise_state: CruiseState,

    pub cruise_buttons: i64,
    pub prev_cruise_buttons: i64,
}

impl CarState {
    /// State to seed the first cycle with: buttons unpressed, everything else zero.
    pub fn initial() -> Self {
        Self {
            cruise_buttons: CruiseButtons::UNPRESS,
            prev_cruise_buttons: CruiseButtons::UNPRESS,
            ..Self::default()
        }
    }

    /// `(previous, current)` button codes when they changed this cycle.
    pub fn cruise_button_changed(&self) -> Option<(i64, i64)> {
        (self.cruise_buttons != self.prev_cruise_buttons)
            .then_some((self.prev_cruise_buttons, self.cruise_buttons))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_has_no_button_edge() {
        let s = CarState::initial();
        assert_eq!(s.cruise_buttons, CruiseButtons::UNPRESS);
        assert_eq!(s.cruise_button_changed(), None);
        assert_eq!(s.gear_shifter, GearShifter::Unknown);
    }

    #[test]
    fn button_edge_reports_both_codes() {
        let s = CarState {
            prev_cruise_buttons: CruiseButtons::UNPRESS,
            cruise_buttons: CruiseButtons::DECEL_SET,
            ..CarState::initial()
        };
        assert_eq!(
            s.cruise_button_changed(),
            Some((CruiseButtons::UNPRESS, CruiseButtons::DECEL_SET))
        );
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(CarState::initial()).unwrap();
        assert!(json.get("vEgoRaw").is_some());
        assert!(json.get("prevCruiseButtons").is_some());
        assert_eq!(json["gearShifter"], "unknown");
    }
}
