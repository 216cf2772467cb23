//! Supported vehicle variants and the static per-vehicle configuration.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ConfigError;

/// Closed set of vehicle models the decoder knows how to special-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CarVariant {
    HoldenAstra,
    Volt,
    Bolt,
    CadillacAts,
    Malibu,
    Acadia,
    BuickRegal,
    CadillacCt6,
}

/// Grouping used by the steering fault classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantFamily {
    Standard,
    /// Cars with the hands-free steering stack; their EPS reports extra healthy states.
    SuperCruise,
}

/// Driver torque above which steering counts as pressed, shared by all variants.
pub const STEER_THRESHOLD: f64 = 1.0;

impl CarVariant {
    pub const ALL: [CarVariant; 8] = [
        CarVariant::HoldenAstra,
        CarVariant::Volt,
        CarVariant::Bolt,
        CarVariant::CadillacAts,
        CarVariant::Malibu,
        CarVariant::Acadia,
        CarVariant::BuickRegal,
        CarVariant::CadillacCt6,
    ];

    pub const fn fingerprint(self) -> &'static str {
        match self {
            CarVariant::HoldenAstra => "HOLDEN ASTRA RS-V BK 2017",
            CarVariant::Volt => "CHEVROLET VOLT PREMIER 2017",
            CarVariant::Bolt => "CHEVROLET BOLT EV PREMIER 2018",
            CarVariant::CadillacAts => "CADILLAC ATS Premium Performance 2018",
            CarVariant::Malibu => "CHEVROLET MALIBU PREMIER 2017",
            CarVariant::Acadia => "GMC ACADIA DENALI 2018",
            CarVariant::BuickRegal => "BUICK REGAL ESSENCE 2018",
            CarVariant::CadillacCt6 => "CADILLAC CT6 SUPERCRUISE 2018",
        }
    }

    pub const fn short_name(self) -> &'static str {
        match self {
            CarVariant::HoldenAstra => "holden_astra",
            CarVariant::Volt => "volt",
            CarVariant::Bolt => "bolt",
            CarVariant::CadillacAts => "cadillac_ats",
            CarVariant::Malibu => "malibu",
            CarVariant::Acadia => "acadia",
            CarVariant::BuickRegal => "buick_regal",
            CarVariant::CadillacCt6 => "cadillac_ct6",
        }
    }

    pub const fn family(self) -> VariantFamily {
        match self {
            CarVariant::CadillacCt6 => VariantFamily::SuperCruise,
            CarVariant::HoldenAstra
            | CarVariant::Volt
            | CarVariant::Bolt
            | CarVariant::CadillacAts
            | CarVariant::Malibu
            | CarVariant::Acadia
            | CarVariant::BuickRegal => VariantFamily::Standard,
        }
    }

    /// Electrified variants with a steering-wheel regen paddle on the bus.
    pub const fn has_regen_paddle(self) -> bool {
        matches!(self, CarVariant::Volt | CarVariant::Bolt)
    }

    pub const fn steer_threshold(self) -> f64 {
        STEER_THRESHOLD
    }
}

impl fmt::Display for CarVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for CarVariant {
    type Err = ConfigError;

    /// Accepts either the short name or the full fingerprint (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        CarVariant::ALL
            .into_iter()
            .find(|v| {
                v.short_name().eq_ignore_ascii_case(needle)
                    || v.fingerprint().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| ConfigError::UnknownVariant(needle.to_string()))
    }
}

/// Static per-vehicle parameters, fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleConfig {
    pub variant: CarVariant,
    pub enable_gas_interceptor: bool,
}

impl VehicleConfig {
    pub const fn new(variant: CarVariant, enable_gas_interceptor: bool) -> Self {
        Self {
            variant,
            enable_gas_interceptor,
        }
    }

    /// Resolve a variant identifier; unknown identifiers are a hard configuration error.
    pub fn from_identifier(
        identifier: &str,
        enable_gas_interceptor: bool,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(identifier.parse()?, enable_gas_interceptor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_names_and_fingerprints() {
        for v in CarVariant::ALL {
            assert_eq!(v.short_name().parse::<CarVariant>().unwrap(), v);
            assert_eq!(v.fingerprint().parse::<CarVariant>().unwrap(), v);
        }
        assert_eq!(
            " Chevrolet Volt Premier 2017 ".parse::<CarVariant>().unwrap(),
            CarVariant::Volt
        );
    }

    #[test]
    fn unknown_identifier_is_config_error() {
        let err = VehicleConfig::from_identifier("DELOREAN DMC-12", false).unwrap_err();
        assert_eq!(err, ConfigError::UnknownVariant("DELOREAN DMC-12".into()));
    }

    #[test]
    fn only_volt_and_bolt_have_regen_paddle() {
        let with_paddle: Vec<_> = CarVariant::ALL
            .into_iter()
            .filter(|v| v.has_regen_paddle())
            .collect();
        assert_eq!(with_paddle, vec![CarVariant::Volt, CarVariant::Bolt]);
    }
}
