//! Type-state builder for `CarStateNormalizer`.
//!
//! The builder enforces at compile time that a vehicle config is provided before
//! `build()` is available. `try_build()` is always available for dynamic checks.

use std::marker::PhantomData;

use crate::calibration::Calibration;
use crate::error::{BuildError, ConfigError, Result};
use crate::gear::{GearTable, PowertrainSchema};
use crate::normalizer::CarStateNormalizer;
use crate::signals::SignalSpec;
use crate::variant::VehicleConfig;

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `CarStateNormalizer`. All fields are validated on `build()`.
pub struct NormalizerBuilder<V> {
    vehicle: Option<VehicleConfig>,
    calibration: Option<Calibration>,
    gear_schema: Option<PowertrainSchema>,
    _v: PhantomData<V>,
}

impl Default for NormalizerBuilder<Missing> {
    fn default() -> Self {
        Self {
            vehicle: None,
            calibration: None,
            gear_schema: None,
            _v: PhantomData,
        }
    }
}

impl CarStateNormalizer {
    /// Start building a normalizer.
    pub fn builder() -> NormalizerBuilder<Missing> {
        NormalizerBuilder::default()
    }
}

impl<V> NormalizerBuilder<V> {
    pub fn with_vehicle(self, vehicle: VehicleConfig) -> NormalizerBuilder<Set> {
        NormalizerBuilder {
            vehicle: Some(vehicle),
            calibration: self.calibration,
            gear_schema: self.gear_schema,
            _v: PhantomData,
        }
    }

    /// Override the variant's built-in thresholds.
    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = Some(calibration);
        self
    }

    /// Override the built-in PRNDL value descriptions.
    pub fn with_gear_schema(mut self, schema: PowertrainSchema) -> Self {
        self.gear_schema = Some(schema);
        self
    }

    /// Validate and build, reporting a missing vehicle at runtime.
    pub fn try_build(self) -> Result<CarStateNormalizer> {
        let vehicle = self
            .vehicle
            .ok_or_else(|| eyre::Report::new(BuildError::MissingVehicle))?;
        validate_and_build(vehicle, self.calibration, self.gear_schema)
    }
}

impl NormalizerBuilder<Set> {
    pub fn build(self) -> Result<CarStateNormalizer> {
        self.try_build()
    }
}

fn validate_and_build(
    vehicle: VehicleConfig,
    calibration: Option<Calibration>,
    gear_schema: Option<PowertrainSchema>,
) -> Result<CarStateNormalizer> {
    let calibration = calibration.unwrap_or_else(|| Calibration::for_variant(vehicle.variant));
    if !(calibration.interceptor_gas_threshold.is_finite()
        && calibration.interceptor_gas_threshold >= 0.0)
    {
        return Err(eyre::Report::new(ConfigError::InvalidCalibration(
            "interceptor_gas_threshold must be finite and >= 0",
        )));
    }
    if !(calibration.steer_threshold.is_finite() && calibration.steer_threshold > 0.0) {
        return Err(eyre::Report::new(ConfigError::InvalidCalibration(
            "steer_threshold must be finite and > 0",
        )));
    }

    let gears = match gear_schema {
        Some(schema) => GearTable::from_schema(&schema)?,
        None => GearTable::for_variant(vehicle.variant),
    };

    let spec = SignalSpec::for_vehicle(&vehicle);
    tracing::info!(
        variant = %vehicle.variant,
        interceptor = vehicle.enable_gas_interceptor,
        signals = spec.len(),
        gear_codes = gears.len(),
        interceptor_gas_threshold = calibration.interceptor_gas_threshold,
        steer_threshold = calibration.steer_threshold,
        "car state normalizer ready"
    );

    Ok(CarStateNormalizer {
        vehicle,
        spec,
        gears,
        calibration,
    })
}
