//! Conversions bridging `carstate_config` types to `carstate_core` types.

use std::time::Duration;

use crate::calibration::Calibration;
use crate::error::Result;
use crate::gear::PowertrainSchema;
use crate::normalizer::CarStateNormalizer;
use crate::runner::RunParams;
use crate::speed_filter::SpeedFilterCfg;
use crate::variant::VehicleConfig;

// ── VehicleConfig ────────────────────────────────────────────────────────────

impl TryFrom<&carstate_config::Vehicle> for VehicleConfig {
    type Error = crate::error::ConfigError;

    fn try_from(v: &carstate_config::Vehicle) -> std::result::Result<Self, Self::Error> {
        VehicleConfig::from_identifier(&v.variant, v.gas_interceptor)
    }
}

// ── SpeedFilterCfg ───────────────────────────────────────────────────────────

impl From<&carstate_config::SpeedFilterCfg> for SpeedFilterCfg {
    fn from(c: &carstate_config::SpeedFilterCfg) -> Self {
        Self {
            dt_s: c.dt_s,
            gain_speed: c.gain_speed,
            gain_accel: c.gain_accel,
            reset_threshold_ms: c.reset_threshold_ms,
        }
    }
}

// ── RunParams ────────────────────────────────────────────────────────────────

impl From<&carstate_config::RunnerCfg> for RunParams {
    fn from(c: &carstate_config::RunnerCfg) -> Self {
        Self {
            rate_hz: c.rate_hz,
            paced: c.paced,
            max_consecutive_errors: c.max_consecutive_errors,
            source_timeout: Duration::from_millis(c.source_timeout_ms),
            max_cycles: None,
        }
    }
}

// ── PowertrainSchema ─────────────────────────────────────────────────────────

impl From<&[carstate_config::GearEntry]> for PowertrainSchema {
    fn from(entries: &[carstate_config::GearEntry]) -> Self {
        Self {
            prndl: entries.iter().map(|g| (g.code, g.label.clone())).collect(),
        }
    }
}

// ── Calibration ──────────────────────────────────────────────────────────────

impl Calibration {
    /// Variant defaults with any configured overrides applied.
    pub fn with_overrides(self, c: &carstate_config::CalibrationCfg) -> Self {
        Self {
            interceptor_gas_threshold: c
                .interceptor_gas_threshold
                .unwrap_or(self.interceptor_gas_threshold),
            steer_threshold: c.steer_threshold.unwrap_or(self.steer_threshold),
        }
    }
}

// ── CarStateNormalizer ───────────────────────────────────────────────────────

impl CarStateNormalizer {
    /// Build from a loaded config. An unknown variant is a hard error.
    pub fn from_config(cfg: &carstate_config::Config) -> Result<Self> {
        let vehicle = VehicleConfig::try_from(&cfg.vehicle)?;
        let calibration =
            Calibration::for_variant(vehicle.variant).with_overrides(&cfg.calibration);
        let mut builder = CarStateNormalizer::builder()
            .with_vehicle(vehicle)
            .with_calibration(calibration);
        if !cfg.gears.is_empty() {
            builder = builder.with_gear_schema(PowertrainSchema::from(cfg.gears.as_slice()));
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::gear::GearShifter;
    use crate::variant::CarVariant;

    #[test]
    fn from_config_applies_overrides_and_gear_schema() {
        let cfg = carstate_config::load_toml(
            r#"
[vehicle]
variant = "CHEVROLET BOLT EV PREMIER 2018"
gas_interceptor = true

[calibration]
steer_threshold = 2.5

[[gears]]
code = 9
label = "D"
"#,
        )
        .unwrap();
        let n = CarStateNormalizer::from_config(&cfg).unwrap();
        assert_eq!(n.vehicle().variant, CarVariant::Bolt);
        assert!(n.vehicle().enable_gas_interceptor);
        assert_eq!(n.calibration().steer_threshold, 2.5);
        assert_eq!(n.calibration().interceptor_gas_threshold, 20.0);
        assert_eq!(n.gear_table().lookup(9), GearShifter::Drive);
        assert_eq!(n.gear_table().lookup(4), GearShifter::Unknown);
    }

    #[test]
    fn unknown_variant_fails_fast() {
        let cfg = carstate_config::load_toml("[vehicle]\nvariant = \"pinto\"\n").unwrap();
        let err = CarStateNormalizer::from_config(&cfg).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::UnknownVariant("pinto".into()))
        );
    }

    #[test]
    fn runner_params_from_config() {
        let cfg = carstate_config::RunnerCfg {
            rate_hz: 50,
            paced: true,
            max_consecutive_errors: 2,
            source_timeout_ms: 7,
        };
        let p = RunParams::from(&cfg);
        assert_eq!(p.rate_hz, 50);
        assert!(p.paced);
        assert_eq!(p.source_timeout, Duration::from_millis(7));
        assert_eq!(p.max_cycles, None);
    }
}
