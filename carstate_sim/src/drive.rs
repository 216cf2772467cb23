//! Synthetic drive: park, pull away, cruise on ACC, brake to a stop.
//!
//! Every cycle is a pure function of its index, so runs are reproducible.

use std::collections::HashMap;

use carstate_traits::SignalSource;

use crate::faults::FaultPlan;

// Raw PRNDL codes.
const PARK: f64 = 1.0;
const DRIVE: f64 = 4.0;

// Raw ACCButtons codes.
const UNPRESS: f64 = 1.0;
const DECEL_SET: f64 = 3.0;
const CANCEL: f64 = 6.0;

/// Phase boundaries, in cycles.
pub const PARKED_UNTIL: u64 = 50;
pub const ACCEL_UNTIL: u64 = 350;
pub const CRUISE_UNTIL: u64 = 650;
pub const BRAKE_UNTIL: u64 = 800;

/// Top speed of the profile in km/h.
pub const CRUISE_KPH: f64 = 60.0;

/// One full profile, parked through stopped.
pub const DEFAULT_CYCLES: u64 = 900;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Parked,
    Accelerating,
    Cruising,
    Braking,
    Stopped,
}

impl Phase {
    pub fn at(cycle: u64) -> Self {
        match cycle {
            c if c < PARKED_UNTIL => Phase::Parked,
            c if c < ACCEL_UNTIL => Phase::Accelerating,
            c if c < CRUISE_UNTIL => Phase::Cruising,
            c if c < BRAKE_UNTIL => Phase::Braking,
            _ => Phase::Stopped,
        }
    }
}

pub struct ScriptedDrive {
    cycles: u64,
    interceptor: bool,
    regen: bool,
    cycle: Option<u64>,
    advances: u64,
    values: Values,
    faults: FaultPlan,
}

impl ScriptedDrive {
    pub fn new(cycles: u64) -> Self {
        Self {
            cycles,
            interceptor: false,
            regen: false,
            cycle: None,
            advances: 0,
            values: HashMap::new(),
            faults: FaultPlan::none(),
        }
    }

    /// Also publish the two interceptor gas channels.
    pub fn with_interceptor(mut self, enabled: bool) -> Self {
        self.interceptor = enabled;
        self
    }

    /// Also publish the regen paddle, pulled during the braking phase.
    pub fn with_regen_paddle(mut self, enabled: bool) -> Self {
        self.regen = enabled;
        self
    }

    pub fn with_faults(mut self, faults: FaultPlan) -> Self {
        self.faults = faults;
        self
    }

    /// Zero-based index of the cycle currently published.
    pub fn cycle(&self) -> Option<u64> {
        self.cycle
    }

    fn publish(&mut self, t: u64) {
        let phase = Phase::at(t);
        let speed_kph = speed_kph(t);
        let v = &mut self.values;

        for (m, s) in [
            ("EBCMWheelSpdFront", "FLWheelSpd"),
            ("EBCMWheelSpdFront", "FRWheelSpd"),
            ("EBCMWheelSpdRear", "RLWheelSpd"),
            ("EBCMWheelSpdRear", "RRWheelSpd"),
        ] {
            set(v, m, s, speed_kph);
        }

        set(
            v,
            "ECMPRDNL",
            "PRNDL",
            if phase == Phase::Parked { PARK } else { DRIVE },
        );
        set(
            v,
            "EPBStatus",
            "EPBClosed",
            f64::from(u8::from(phase == Phase::Parked)),
        );
        set(v, "ESPStatus", "TractionControlOn", 1.0);

        // Driver door open and belt unlatched while getting in.
        set(v, "BCMDoorBeltStatus", "FrontLeftDoor", f64::from(u8::from(t < 20)));
        for door in ["FrontRightDoor", "RearLeftDoor", "RearRightDoor"] {
            set(v, "BCMDoorBeltStatus", door, 0.0);
        }
        set(v, "BCMDoorBeltStatus", "LeftSeatBelt", f64::from(u8::from(t >= 30)));

        let gas_raw = if phase == Phase::Accelerating { 120.0 } else { 0.0 };
        set(v, "AcceleratorPedal", "AcceleratorPedal", gas_raw);
        if self.interceptor {
            // Channels disagree slightly, as redundant sensors do.
            set(v, "GAS_SENSOR", "INTERCEPTOR_GAS", gas_raw * 2.0 + 1.0);
            set(v, "GAS_SENSOR", "INTERCEPTOR_GAS2", gas_raw * 2.0 - 1.0);
        }

        let brake_raw = match phase {
            Phase::Braking => 80.0,
            Phase::Stopped => 40.0,
            // Pedal potentiometer noise at rest.
            _ => 4.0,
        };
        set(v, "EBCMBrakePedalPosition", "BrakePedalPosition", brake_raw);
        if self.regen {
            set(
                v,
                "EBCMRegenPaddle",
                "RegenPaddle",
                f64::from(u8::from(phase == Phase::Braking)),
            );
        }

        // Gentle lane-keeping wiggle while moving.
        let angle = if speed_kph > 0.0 {
            2.0 * (t as f64 / 50.0).sin()
        } else {
            0.0
        };
        set(v, "PSCMSteeringAngle", "SteeringWheelAngle", angle);
        set(v, "PSCMStatus", "LKADriverAppldTrq", angle * 0.1);
        set(v, "PSCMStatus", "LKATorqueDeliveredStatus", 1.0);

        let turn = if (450..500).contains(&t) { 1.0 } else { 0.0 };
        set(v, "BCMTurnSignals", "TurnSignals", turn);

        let main_on = t >= ACCEL_UNTIL - 10 && t < BRAKE_UNTIL;
        set(v, "ECMEngineStatus", "CruiseMainOn", f64::from(u8::from(main_on)));
        let acc_active = (ACCEL_UNTIL + 50..CRUISE_UNTIL).contains(&t);
        set(
            v,
            "ASCMActiveCruiseControlStatus",
            "ACCCmdActive",
            f64::from(u8::from(acc_active)),
        );
        let button = match t {
            t if (ACCEL_UNTIL + 45..ACCEL_UNTIL + 50).contains(&t) => DECEL_SET,
            t if (CRUISE_UNTIL - 5..CRUISE_UNTIL).contains(&t) => CANCEL,
            _ => UNPRESS,
        };
        set(v, "ASCMSteeringButton", "ACCButtons", button);
    }
}

/// message -> signal -> value
type Values = HashMap<&'static str, HashMap<&'static str, f64>>;

fn set(values: &mut Values, message: &'static str, signal: &'static str, value: f64) {
    values.entry(message).or_default().insert(signal, value);
}

/// Wheel speed in km/h at cycle `t`.
pub fn speed_kph(t: u64) -> f64 {
    match Phase::at(t) {
        Phase::Parked | Phase::Stopped => 0.0,
        Phase::Accelerating => {
            CRUISE_KPH * (t - PARKED_UNTIL) as f64 / (ACCEL_UNTIL - PARKED_UNTIL) as f64
        }
        Phase::Cruising => CRUISE_KPH,
        Phase::Braking => {
            CRUISE_KPH * (BRAKE_UNTIL - t) as f64 / (BRAKE_UNTIL - CRUISE_UNTIL) as f64
        }
    }
}

impl SignalSource for ScriptedDrive {
    fn advance(
        &mut self,
        _timeout: std::time::Duration,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        self.advances += 1;
        self.faults.check(self.advances)?;

        let next = self.cycle.map_or(0, |c| c + 1);
        if next >= self.cycles {
            return Ok(false);
        }
        self.publish(next);
        self.cycle = Some(next);
        Ok(true)
    }

    fn value(&self, message: &str, signal: &str) -> Option<f64> {
        self.values.get(message)?.get(signal).copied()
    }
}
