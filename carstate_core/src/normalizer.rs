//! Per-cycle transformation from raw signal values to a normalized `CarState`.
//!
//! `update` is total: every input, including missing or non-finite values, yields a
//! definite state. The only cross-cycle inputs are the previous state's button code
//! and the caller-owned speed filter.

use carstate_traits::SpeedFilter;

use crate::calibration::{
    Calibration, KPH_TO_MS, PEDAL_PRESSED_EPSILON, STANDSTILL_SPEED, exact_code, is_code,
};
use crate::fault::steer_fault_degraded_value;
use crate::frame::SignalFrame;
use crate::gear::GearTable;
use crate::signals::{SignalSpec, msg, sig};
use crate::state::{AccState, CarState, CruiseButtons, CruiseState, WheelSpeeds};
use crate::variant::VehicleConfig;

/// Immutable decoder for one vehicle, built once at startup.
#[derive(Debug, Clone)]
pub struct CarStateNormalizer {
    pub(crate) vehicle: VehicleConfig,
    pub(crate) spec: SignalSpec,
    pub(crate) gears: GearTable,
    pub(crate) calibration: Calibration,
}

impl CarStateNormalizer {
    /// Normalizer with built-in gear table and calibration for the variant.
    pub fn new(vehicle: VehicleConfig) -> Self {
        Self {
            spec: SignalSpec::for_vehicle(&vehicle),
            gears: GearTable::for_variant(vehicle.variant),
            calibration: Calibration::for_variant(vehicle.variant),
            vehicle,
        }
    }

    pub const fn vehicle(&self) -> &VehicleConfig {
        &self.vehicle
    }

    /// Signals the source must supply each cycle.
    pub const fn signal_spec(&self) -> &SignalSpec {
        &self.spec
    }

    pub const fn gear_table(&self) -> &GearTable {
        &self.gears
    }

    pub const fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Normalize one cycle.
    ///
    /// Order matters only for speed: wheel speeds, then their mean, then exactly one
    /// filter update with that mean.
    pub fn update(
        &self,
        frame: &SignalFrame,
        prev: &CarState,
        filter: &mut dyn SpeedFilter,
    ) -> CarState {
        let read = |message: &str, signal: &str| self.read(frame, message, signal);
        let flag = |message: &str, signal: &str| read(message, signal) != 0.0;
        let is = |message: &str, signal: &str, code: i64| is_code(read(message, signal), code);

        let wheel_speeds = WheelSpeeds {
            fl: read(msg::WHEEL_SPEED_FRONT, sig::FL_WHEEL_SPD) * KPH_TO_MS,
            fr: read(msg::WHEEL_SPEED_FRONT, sig::FR_WHEEL_SPD) * KPH_TO_MS,
            rl: read(msg::WHEEL_SPEED_REAR, sig::RL_WHEEL_SPD) * KPH_TO_MS,
            rr: read(msg::WHEEL_SPEED_REAR, sig::RR_WHEEL_SPD) * KPH_TO_MS,
        };
        let v_ego_raw = wheel_speeds.mean();
        let (v_ego, a_ego) = filter.update(v_ego_raw);

        let brake =
            Calibration::normalize_brake(read(msg::BRAKE_PEDAL, sig::BRAKE_PEDAL_POSITION));

        let (gas, gas_pressed) = if self.vehicle.enable_gas_interceptor {
            let user_gas = (read(msg::GAS_SENSOR, sig::INTERCEPTOR_GAS)
                + read(msg::GAS_SENSOR, sig::INTERCEPTOR_GAS2))
                / 2.0;
            (user_gas, user_gas > self.calibration.interceptor_gas_threshold)
        } else {
            let gas =
                Calibration::normalize_gas(read(msg::ACCELERATOR, sig::ACCELERATOR_PEDAL));
            (gas, gas > PEDAL_PRESSED_EPSILON)
        };

        let steering_torque = read(msg::PSCM_STATUS, sig::DRIVER_TORQUE);

        // 1 - open, 0 - closed
        let door_open = [
            sig::FRONT_LEFT_DOOR,
            sig::FRONT_RIGHT_DOOR,
            sig::REAR_LEFT_DOOR,
            sig::REAR_RIGHT_DOOR,
        ]
        .into_iter()
        .any(|door| is(msg::DOOR_BELT, door, 1));

        let main_on = flag(msg::ENGINE_STATUS, sig::CRUISE_MAIN_ON);
        let acc_status = read(msg::ACC_STATUS, sig::ACC_CMD_ACTIVE);

        let regen_pressed = self.vehicle.variant.has_regen_paddle()
            && flag(msg::REGEN_PADDLE, sig::REGEN_PADDLE);

        CarState {
            wheel_speeds,
            v_ego_raw,
            v_ego,
            a_ego,
            standstill: v_ego_raw < STANDSTILL_SPEED,

            steering_angle_deg: read(msg::STEERING_ANGLE, sig::STEERING_WHEEL_ANGLE),
            steering_torque,
            steering_pressed: steering_torque.abs() > self.calibration.steer_threshold,
            steer_warning: steer_fault_degraded_value(
                read(msg::PSCM_STATUS, sig::TORQUE_DELIVERED_STATUS),
                self.vehicle.variant,
            ),

            gear_shifter: self.gears.decode(read(msg::PRNDL, sig::PRNDL)),

            brake,
            // Regen paddle braking is not distinguished from friction braking here.
            brake_pressed: brake > PEDAL_PRESSED_EPSILON,
            gas,
            gas_pressed,
            regen_pressed,

            door_open,
            // 1 - latched
            seatbelt_unlatched: is(msg::DOOR_BELT, sig::LEFT_SEAT_BELT, 0),
            left_blinker: is(msg::TURN_SIGNALS, sig::TURN_SIGNALS, 1),
            right_blinker: is(msg::TURN_SIGNALS, sig::TURN_SIGNALS, 2),
            park_brake: flag(msg::EPB_STATUS, sig::EPB_CLOSED),
            esp_disabled: !is(msg::ESP_STATUS, sig::TRACTION_CONTROL_ON, 1),

            main_on,
            acc_status,
            cruise_state: CruiseState {
                available: main_on,
                enabled: !is_code(acc_status, AccState::OFF),
                standstill: false,
            },

            // a button value that is not an exact code reads as released
            cruise_buttons: exact_code(read(msg::STEERING_BUTTON, sig::ACC_BUTTONS))
                .unwrap_or(CruiseButtons::UNPRESS),
            prev_cruise_buttons: prev.cruise_buttons,
        }
    }

    /// Live value, else the registered default, else 0.
    fn read(&self, frame: &SignalFrame, message: &str, signal: &str) -> f64 {
        match frame.get(message, signal) {
            Some(v) if v.is_finite() => v,
            _ => self.spec.default_for(message, signal).unwrap_or(0.0),
        }
    }
}
