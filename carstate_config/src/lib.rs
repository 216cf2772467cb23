#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and signal-log parsing for the car state normalizer.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Signal-log CSV loader enforces headers and groups rows into per-cycle frames.
use serde::Deserialize;

/// Signal-log CSV schema.
///
/// Expected headers:
/// frame,message,signal,value
///
/// Example:
/// frame,message,signal,value
/// 0,EBCMWheelSpdFront,FLWheelSpd,10.0
/// 0,EBCMBrakePedalPosition,BrakePedalPosition,50
#[derive(Debug, Deserialize, Clone)]
pub struct SignalLogRow {
    pub frame: u64,
    pub message: String,
    pub signal: String,
    pub value: f64,
}

/// One decoded value inside a logged frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedValue {
    pub message: String,
    pub signal: String,
    pub value: f64,
}

/// All values logged for a single bus update.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedFrame {
    pub frame: u64,
    pub values: Vec<LoggedValue>,
}

#[derive(Debug, Deserialize)]
pub struct Vehicle {
    /// Short variant name ("volt") or full fingerprint ("CHEVROLET VOLT PREMIER 2017").
    pub variant: String,
    /// Auxiliary gas interceptor hardware fitted.
    #[serde(default)]
    pub gas_interceptor: bool,
}

/// Calibration overrides. Absent values keep the built-in constants.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct CalibrationCfg {
    /// Interceptor average (raw units) above which the gas pedal counts as pressed.
    pub interceptor_gas_threshold: Option<f64>,
    /// Driver torque magnitude above which steering counts as pressed.
    pub steer_threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SpeedFilterCfg {
    /// Filter step in seconds (one control cycle).
    pub dt_s: f64,
    /// Steady-state Kalman gain on speed.
    pub gain_speed: f64,
    /// Steady-state Kalman gain on acceleration.
    pub gain_accel: f64,
    /// Reset the estimate when the raw speed jumps by more than this (m/s).
    pub reset_threshold_ms: f64,
}

impl Default for SpeedFilterCfg {
    fn default() -> Self {
        Self {
            dt_s: 0.01,
            gain_speed: 0.122_876_73,
            gain_accel: 0.296_663_09,
            reset_threshold_ms: 2.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RunnerCfg {
    /// Bus update rate in Hz, used for pacing.
    pub rate_hz: u32,
    /// Sleep between cycles to hold `rate_hz` (replays run flat out otherwise).
    pub paced: bool,
    /// Abort after this many consecutive failed source reads.
    pub max_consecutive_errors: u32,
    /// Max wait per source advance (ms).
    pub source_timeout_ms: u64,
}

impl Default for RunnerCfg {
    fn default() -> Self {
        Self {
            rate_hz: 100,
            paced: false,
            max_consecutive_errors: 5,
            source_timeout_ms: 50,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

/// Gear-selector value description overriding the built-in schema.
#[derive(Debug, Deserialize, Clone)]
pub struct GearEntry {
    pub code: i64,
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub vehicle: Vehicle,
    #[serde(default)]
    pub calibration: CalibrationCfg,
    #[serde(default)]
    pub speed_filter: SpeedFilterCfg,
    #[serde(default)]
    pub runner: RunnerCfg,
    #[serde(default)]
    pub logging: Logging,
    /// Optional PRNDL value descriptions; empty keeps the built-in table.
    #[serde(default)]
    pub gears: Vec<GearEntry>,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Group signal-log rows into frames. Rows must be ordered by non-decreasing frame index.
pub fn group_rows(rows: Vec<SignalLogRow>) -> eyre::Result<Vec<LoggedFrame>> {
    let mut frames: Vec<LoggedFrame> = Vec::new();
    for (idx, row) in rows.into_iter().enumerate() {
        let value = LoggedValue {
            message: row.message,
            signal: row.signal,
            value: row.value,
        };
        match frames.last_mut() {
            Some(last) if last.frame == row.frame => last.values.push(value),
            Some(last) if last.frame > row.frame => {
                eyre::bail!(
                    "signal log frames must be non-decreasing: frame {} after {} at row {}",
                    row.frame,
                    last.frame,
                    idx + 2
                );
            }
            _ => frames.push(LoggedFrame {
                frame: row.frame,
                values: vec![value],
            }),
        }
    }
    Ok(frames)
}

pub fn load_signal_log_csv(path: &std::path::Path) -> eyre::Result<Vec<LoggedFrame>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open signal log CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["frame", "message", "signal", "value"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "signal log CSV must have headers 'frame,message,signal,value', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<SignalLogRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }

    group_rows(rows)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Vehicle
        if self.vehicle.variant.trim().is_empty() {
            eyre::bail!("vehicle.variant must not be empty");
        }

        // Calibration
        if let Some(thr) = self.calibration.interceptor_gas_threshold
            && !(thr.is_finite() && thr >= 0.0)
        {
            eyre::bail!("calibration.interceptor_gas_threshold must be finite and >= 0");
        }
        if let Some(thr) = self.calibration.steer_threshold
            && !(thr.is_finite() && thr > 0.0)
        {
            eyre::bail!("calibration.steer_threshold must be finite and > 0");
        }

        // Speed filter
        let sf = &self.speed_filter;
        if !(sf.dt_s.is_finite() && sf.dt_s > 0.0 && sf.dt_s <= 1.0) {
            eyre::bail!("speed_filter.dt_s must be in (0.0, 1.0]");
        }
        if !(sf.gain_speed.is_finite() && sf.gain_speed > 0.0 && sf.gain_speed <= 1.0) {
            eyre::bail!("speed_filter.gain_speed must be in (0.0, 1.0]");
        }
        if !(sf.gain_accel.is_finite() && sf.gain_accel >= 0.0) {
            eyre::bail!("speed_filter.gain_accel must be finite and >= 0");
        }
        if !(sf.reset_threshold_ms.is_finite() && sf.reset_threshold_ms > 0.0) {
            eyre::bail!("speed_filter.reset_threshold_ms must be finite and > 0");
        }

        // Runner
        if self.runner.rate_hz == 0 {
            eyre::bail!("runner.rate_hz must be > 0");
        }
        if self.runner.rate_hz > 10_000 {
            eyre::bail!("runner.rate_hz is unreasonably large (>10kHz)");
        }
        if self.runner.max_consecutive_errors == 0 {
            eyre::bail!("runner.max_consecutive_errors must be >= 1");
        }
        if self.runner.source_timeout_ms == 0 {
            eyre::bail!("runner.source_timeout_ms must be >= 1");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        // Gears: codes must be unique
        for (i, g) in self.gears.iter().enumerate() {
            if g.label.trim().is_empty() {
                eyre::bail!("gears[{i}].label must not be empty");
            }
            if self.gears[..i].iter().any(|p| p.code == g.code) {
                eyre::bail!("gears code {} is defined more than once", g.code);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(frame: u64, signal: &str, value: f64) -> SignalLogRow {
        SignalLogRow {
            frame,
            message: "EBCMWheelSpdFront".into(),
            signal: signal.into(),
            value,
        }
    }

    #[test]
    fn groups_consecutive_rows_by_frame() {
        let frames = group_rows(vec![
            row(0, "FLWheelSpd", 1.0),
            row(0, "FRWheelSpd", 2.0),
            row(3, "FLWheelSpd", 3.0),
        ])
        .unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].values.len(), 2);
        assert_eq!(frames[1].frame, 3);
    }

    #[test]
    fn rejects_decreasing_frames() {
        let err = group_rows(vec![row(2, "FLWheelSpd", 1.0), row(1, "FLWheelSpd", 1.0)])
            .expect_err("decreasing frame index");
        assert!(err.to_string().contains("non-decreasing"));
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = load_toml("[vehicle]\nvariant = \"volt\"\n").unwrap();
        assert!(!cfg.vehicle.gas_interceptor);
        assert_eq!(cfg.runner.rate_hz, 100);
        assert!(cfg.gears.is_empty());
        cfg.validate().unwrap();
    }
}
