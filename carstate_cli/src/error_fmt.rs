//! Human-readable error descriptions and structured JSON error formatting.

use carstate_core::error::{BuildError, ConfigError, StateError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(ce) = err.downcast_ref::<ConfigError>() {
        return match ce {
            ConfigError::UnknownVariant(name) => format!(
                "What happened: Unknown vehicle variant '{name}'.\nLikely causes: Typo in [vehicle].variant or an unsupported car.\nHow to fix: Use a short name such as 'volt' or a full fingerprint; `carstate signals` lists the registry once the variant resolves."
            ),
            ConfigError::DuplicateGearCode(code) => format!(
                "What happened: Gear code {code} is mapped more than once.\nLikely causes: Repeated [[gears]] entries in the config.\nHow to fix: Keep one label per code."
            ),
            ConfigError::InvalidCalibration(msg) => format!(
                "What happened: Invalid calibration ({msg}).\nLikely causes: Out-of-range values under [calibration].\nHow to fix: Edit the config file, then rerun."
            ),
        };
    }

    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingVehicle => {
                "What happened: No vehicle was provided to the normalizer.\nLikely causes: The builder was not configured with a vehicle.\nHow to fix: Pass a VehicleConfig via with_vehicle(...).".to_string()
            }
        };
    }

    if let Some(se) = err.downcast_ref::<StateError>() {
        return match se {
            StateError::Config(msg) => format!(
                "What happened: Configuration is invalid ({msg}).\nLikely causes: Missing [vehicle] section, a typo, or out-of-range values.\nHow to fix: Edit the TOML config and try again."
            ),
            StateError::Timeout => {
                "What happened: The signal source stopped delivering bus updates.\nLikely causes: Bus quiet, decoder stalled, or runner.source_timeout_ms too low.\nHow to fix: Check the bus connection and consider raising runner.source_timeout_ms.".to_string()
            }
            other => format!(
                "What happened: {other}.\nLikely causes: The signal source failed runner.max_consecutive_errors times in a row.\nHow to fix: Re-run with --log-level=debug to see each skipped cycle."
            ),
        };
    }

    // String-based heuristics for errors coming from file loading
    let msg = format!("{err:#}");
    let lower = msg.to_ascii_lowercase();

    if lower.contains("signal log csv must have headers") {
        return "Invalid headers in signal log CSV. Expected 'frame,message,signal,value'."
            .to_string();
    }
    if lower.contains("open signal log csv") {
        return format!(
            "What happened: Could not open the signal log.\nHow to fix: Check the --log path. Original: {msg}"
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 2 for configuration problems, 3 for source failures, 1 otherwise.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<ConfigError>().is_some() || err.downcast_ref::<BuildError>().is_some() {
        return 2;
    }
    match err.downcast_ref::<StateError>() {
        Some(StateError::Config(_)) => 2,
        Some(_) => 3,
        None => 1,
    }
}

/// Short machine-readable name of the error class.
pub fn reason_name(err: &eyre::Report) -> &'static str {
    if let Some(ce) = err.downcast_ref::<ConfigError>() {
        return match ce {
            ConfigError::UnknownVariant(_) => "UnknownVariant",
            ConfigError::DuplicateGearCode(_) => "DuplicateGearCode",
            ConfigError::InvalidCalibration(_) => "InvalidCalibration",
        };
    }
    if err.downcast_ref::<BuildError>().is_some() {
        return "Build";
    }
    match err.downcast_ref::<StateError>() {
        Some(StateError::Config(_)) => "Config",
        Some(StateError::Timeout) => "Timeout",
        Some(StateError::Source(_) | StateError::SourceFault(_) | StateError::Io(_)) => "Source",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_exit_with_2() {
        let e = eyre::Report::new(ConfigError::UnknownVariant("pinto".into()));
        assert_eq!(exit_code_for_error(&e), 2);
        assert!(humanize(&e).contains("Unknown vehicle variant 'pinto'"));
        let e = eyre::Report::new(StateError::Config("vehicle.variant must not be empty".into()));
        assert_eq!(exit_code_for_error(&e), 2);
    }

    #[test]
    fn bad_calibration_is_a_config_error() {
        let e = eyre::Report::new(ConfigError::InvalidCalibration(
            "steer_threshold must be finite and > 0",
        ));
        assert_eq!(exit_code_for_error(&e), 2);
        assert_eq!(reason_name(&e), "InvalidCalibration");
        assert!(humanize(&e).contains("[calibration]"));
    }

    #[test]
    fn source_errors_exit_with_3() {
        let e = eyre::Report::new(StateError::SourceFault("injected".into()));
        assert_eq!(exit_code_for_error(&e), 3);
        assert_eq!(reason_name(&e), "Source");
    }

    #[test]
    fn untyped_errors_exit_with_1() {
        let e = eyre::eyre!("disk on fire");
        assert_eq!(exit_code_for_error(&e), 1);
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&e)).unwrap();
        assert_eq!(v["reason"], "Error");
        assert!(v["message"].as_str().unwrap().contains("disk on fire"));
    }
}
