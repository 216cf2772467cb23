//! Command execution: config mapping, source assembly, and output.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use carstate_core::error::{Result as CoreResult, StateError};
use carstate_core::{CarState, CarStateNormalizer, KalmanSpeedFilter, RunParams, RunSummary};
use carstate_sim::{FaultPlan, ReplaySource, ScriptedDrive};
use carstate_traits::SignalSource;
use carstate_traits::clock::MonotonicClock;
use eyre::WrapErr;
use serde_json::json;

/// Read, parse and validate the config file. Failures are configuration errors.
pub fn load_config(path: &Path) -> CoreResult<carstate_config::Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| config_error(format!("read config {}: {e}", path.display())))?;
    let cfg = carstate_config::load_toml(&text)
        .map_err(|e: toml::de::Error| config_error(format!("parse config: {e}")))?;
    cfg.validate().map_err(|e| config_error(format!("{e:#}")))?;
    Ok(cfg)
}

fn config_error(msg: String) -> eyre::Report {
    eyre::Report::new(StateError::Config(msg))
}

pub fn print_signals(cfg: &carstate_config::Config, json_out: bool) -> CoreResult<()> {
    let n = CarStateNormalizer::from_config(cfg)?;
    for e in n.signal_spec() {
        if json_out {
            println!(
                "{}",
                json!({ "message": e.message, "signal": e.signal, "default": e.default })
            );
        } else {
            println!("{:<32} {:<28} default={}", e.message, e.signal, e.default);
        }
    }
    if !json_out {
        println!(
            "{} signals across {} messages for {}",
            n.signal_spec().len(),
            n.signal_spec().messages().len(),
            n.vehicle().variant.fingerprint()
        );
    }
    Ok(())
}

pub fn self_check(cfg: &carstate_config::Config, json_out: bool) -> CoreResult<()> {
    let n = CarStateNormalizer::from_config(cfg)?;
    tracing::info!(
        variant = %n.vehicle().variant,
        signals = n.signal_spec().len(),
        gear_codes = n.gear_table().len(),
        "self-check passed"
    );
    if json_out {
        println!(
            "{}",
            json!({
                "status": "ok",
                "variant": n.vehicle().variant,
                "signals": n.signal_spec().len(),
                "gear_codes": n.gear_table().len(),
            })
        );
    } else {
        println!("ok");
    }
    Ok(())
}

pub fn replay(
    cfg: &carstate_config::Config,
    log: &Path,
    max_cycles: Option<u64>,
    json_out: bool,
    shutdown: Arc<AtomicBool>,
) -> CoreResult<RunSummary> {
    let frames = carstate_config::load_signal_log_csv(log)
        .wrap_err_with(|| format!("load signal log {}", log.display()))?;
    tracing::info!(frames = frames.len(), path = %log.display(), "replay start");
    let mut source = ReplaySource::new(frames);
    drive(cfg, &mut source, max_cycles, json_out, &shutdown)
}

pub fn simulate(
    cfg: &carstate_config::Config,
    cycles: u64,
    dropout_every: u64,
    json_out: bool,
    shutdown: Arc<AtomicBool>,
) -> CoreResult<RunSummary> {
    let vehicle = carstate_core::VehicleConfig::try_from(&cfg.vehicle)?;
    let mut source = ScriptedDrive::new(cycles)
        .with_interceptor(vehicle.enable_gas_interceptor)
        .with_regen_paddle(vehicle.variant.has_regen_paddle())
        .with_faults(FaultPlan::none().dropout_every(dropout_every));
    tracing::info!(cycles, dropout_every, "simulation start");
    drive(cfg, &mut source, None, json_out, &shutdown)
}

fn drive(
    cfg: &carstate_config::Config,
    source: &mut dyn SignalSource,
    max_cycles: Option<u64>,
    json_out: bool,
    shutdown: &AtomicBool,
) -> CoreResult<RunSummary> {
    let normalizer = CarStateNormalizer::from_config(cfg)?;
    let mut filter = KalmanSpeedFilter::new((&cfg.speed_filter).into());
    let params = RunParams {
        max_cycles,
        ..RunParams::from(&cfg.runner)
    };

    let summary = carstate_core::run_cycles(
        source,
        &normalizer,
        &mut filter,
        &params,
        &MonotonicClock::new(),
        shutdown,
        |cycle, state| print_state(cycle, state, json_out),
    )?;

    if shutdown.load(Ordering::Relaxed) {
        tracing::warn!(cycles = summary.cycles, "interrupted");
    }
    if json_out {
        println!(
            "{}",
            json!({
                "summary": {
                    "cycles": summary.cycles,
                    "skipped": summary.skipped,
                    "last_state": summary.last_state,
                }
            })
        );
    } else {
        println!(
            "normalized {} cycles ({} skipped)",
            summary.cycles, summary.skipped
        );
    }
    Ok(summary)
}

fn print_state(cycle: u64, s: &CarState, json_out: bool) {
    if json_out {
        println!("{}", json!({ "cycle": cycle, "state": s }));
        return;
    }
    println!(
        "#{cycle:<6} v={:6.2} m/s a={:6.2} gear={:<8} brake={:.3}{} gas={:.3}{} steer={:7.2}{}{}{}{}",
        s.v_ego,
        s.a_ego,
        format!("{:?}", s.gear_shifter),
        s.brake,
        if s.brake_pressed { "*" } else { " " },
        s.gas,
        if s.gas_pressed { "*" } else { " " },
        s.steering_angle_deg,
        if s.standstill { " standstill" } else { "" },
        if s.cruise_state.enabled { " acc" } else { "" },
        if s.door_open { " door" } else { "" },
        if s.steer_warning { " steer-warn" } else { "" },
    );
}

/// Install the Ctrl-C handler; shutdown is observed between cycles.
pub fn install_shutdown_handler() -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = flag.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_flag.store(true, Ordering::Relaxed)) {
        tracing::warn!(error = %e, "failed to install Ctrl-C handler");
    }
    flag
}
