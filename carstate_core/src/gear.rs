//! Gear-selector decoding: raw PRNDL code -> symbolic gear.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::calibration::exact_code;
use crate::error::ConfigError;
use crate::variant::CarVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GearShifter {
    #[default]
    Unknown,
    Park,
    Drive,
    Neutral,
    Reverse,
    Sport,
    Low,
    Brake,
    Eco,
    Manumatic,
}

impl GearShifter {
    /// Map a schema value-description label to a gear. Unrecognised labels
    /// (including transient ones such as "Shifting") are `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "P" | "PARK" => GearShifter::Park,
            "R" | "REVERSE" => GearShifter::Reverse,
            "N" | "NEUTRAL" => GearShifter::Neutral,
            "D" | "DRIVE" => GearShifter::Drive,
            "S" | "SPORT" => GearShifter::Sport,
            "L" | "LOW" => GearShifter::Low,
            "B" | "BRAKE" => GearShifter::Brake,
            "E" | "ECO" => GearShifter::Eco,
            "M" | "T" | "MANUMATIC" => GearShifter::Manumatic,
            _ => GearShifter::Unknown,
        }
    }
}

/// Value descriptions for the PRNDL signal as published by the vehicle schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowertrainSchema {
    pub prndl: Vec<(i64, String)>,
}

impl PowertrainSchema {
    /// Built-in description shared by every supported variant's powertrain bus.
    pub fn for_variant(variant: CarVariant) -> Self {
        match variant {
            CarVariant::HoldenAstra
            | CarVariant::Volt
            | CarVariant::Bolt
            | CarVariant::CadillacAts
            | CarVariant::Malibu
            | CarVariant::Acadia
            | CarVariant::BuickRegal
            | CarVariant::CadillacCt6 => Self::from_pairs([
                (0, "Shifting"),
                (1, "P"),
                (2, "R"),
                (3, "N"),
                (4, "D"),
                (6, "L"),
            ]),
        }
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (i64, &'a str)>) -> Self {
        Self {
            prndl: pairs
                .into_iter()
                .map(|(code, label)| (code, label.to_string()))
                .collect(),
        }
    }
}

/// Immutable raw-code -> gear lookup built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GearTable {
    codes: BTreeMap<i64, GearShifter>,
}

impl GearTable {
    pub fn from_schema(schema: &PowertrainSchema) -> Result<Self, ConfigError> {
        let mut codes = BTreeMap::new();
        for (code, label) in &schema.prndl {
            if codes.insert(*code, GearShifter::from_label(label)).is_some() {
                return Err(ConfigError::DuplicateGearCode(*code));
            }
        }
        Ok(Self { codes })
    }

    pub fn for_variant(variant: CarVariant) -> Self {
        // The built-in schema has unique codes by construction.
        let schema = PowertrainSchema::for_variant(variant);
        let codes = schema
            .prndl
            .iter()
            .map(|(code, label)| (*code, GearShifter::from_label(label)))
            .collect();
        Self { codes }
    }

    /// Codes absent from the table decode to `Unknown`; never an error.
    pub fn lookup(&self, code: i64) -> GearShifter {
        self.codes.get(&code).copied().unwrap_or_default()
    }

    /// Decode the PRNDL value as read; only exact registered codes map to a gear.
    pub fn decode(&self, raw: f64) -> GearShifter {
        exact_code(raw).map_or(GearShifter::Unknown, |code| self.lookup(code))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
