//! Control-cycle driver: advance the source, snapshot, normalize, hand off.
//!
//! Single-threaded. Cancellation is checked between cycles only; a cycle in progress
//! always completes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use carstate_traits::clock::Clock;
use carstate_traits::{SignalSource, SpeedFilter};

use crate::error::Result as CoreResult;
use crate::frame::SignalFrame;
use crate::normalizer::CarStateNormalizer;
use crate::source_error::map_source_error;
use crate::state::CarState;

#[derive(Debug, Clone)]
pub struct RunParams {
    /// Bus update rate; sets the pacing period.
    pub rate_hz: u32,
    /// Sleep out the remainder of each period.
    pub paced: bool,
    /// Abort once this many source reads in a row have failed.
    pub max_consecutive_errors: u32,
    pub source_timeout: Duration,
    /// Stop after this many normalized cycles.
    pub max_cycles: Option<u64>,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            rate_hz: 100,
            paced: false,
            max_consecutive_errors: 5,
            source_timeout: Duration::from_millis(50),
            max_cycles: None,
        }
    }
}

/// Pacing period for a bus rate. A zero rate is treated as 1 Hz and the period never
/// drops below 1 µs.
pub fn cycle_period(rate_hz: u32) -> Duration {
    Duration::from_micros((1_000_000 / u64::from(rate_hz.max(1))).max(1))
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Cycles that produced a state.
    pub cycles: u64,
    /// Cycles lost to source errors.
    pub skipped: u64,
    pub last_state: CarState,
}

/// Run until the source is exhausted, `max_cycles` is reached, `shutdown` is set,
/// or the source fails `max_consecutive_errors` times in a row.
pub fn run_cycles<S, C>(
    source: &mut S,
    normalizer: &CarStateNormalizer,
    filter: &mut dyn SpeedFilter,
    params: &RunParams,
    clock: &C,
    shutdown: &AtomicBool,
    mut on_state: impl FnMut(u64, &CarState),
) -> CoreResult<RunSummary>
where
    S: SignalSource + ?Sized,
    C: Clock + ?Sized,
{
    let period = cycle_period(params.rate_hz);
    let mut prev = CarState::initial();
    let mut cycles: u64 = 0;
    let mut skipped: u64 = 0;
    let mut consecutive_errors: u32 = 0;
    tracing::debug!(
        period_us = u64::try_from(period.as_micros()).unwrap_or(u64::MAX),
        paced = params.paced,
        max_cycles = ?params.max_cycles,
        "runner starting"
    );

    loop {
        if shutdown.load(Ordering::Relaxed) {
            tracing::debug!(cycles, "runner received shutdown signal");
            break;
        }
        if params.max_cycles.is_some_and(|max| cycles >= max) {
            break;
        }

        let started = clock.now();
        match source.advance(params.source_timeout) {
            Ok(false) => {
                tracing::debug!(cycles, "signal source exhausted");
                break;
            }
            Ok(true) => {
                consecutive_errors = 0;
                let frame = SignalFrame::collect(&*source, normalizer.signal_spec());
                let state = normalizer.update(&frame, &prev, filter);
                cycles += 1;
                tracing::debug!(
                    cycle = cycles,
                    v_ego = state.v_ego,
                    brake = state.brake,
                    gas = state.gas,
                    gear = ?state.gear_shifter,
                    "cycle normalized"
                );
                if let Some((prev_btn, btn)) = state.cruise_button_changed() {
                    tracing::debug!(cycle = cycles, prev_btn, btn, "cruise button edge");
                }
                on_state(cycles, &state);
                prev = state;
            }
            Err(e) => {
                let mapped = map_source_error(e.as_ref());
                skipped += 1;
                consecutive_errors += 1;
                if consecutive_errors >= params.max_consecutive_errors {
                    tracing::error!(
                        error = %mapped,
                        consecutive_errors,
                        "signal source failing repeatedly; aborting"
                    );
                    return Err(eyre::Report::new(mapped));
                }
                tracing::warn!(error = %mapped, consecutive_errors, "skipping cycle");
            }
        }

        if params.paced {
            let elapsed = clock.now().saturating_duration_since(started);
            if elapsed < period {
                clock.sleep(period - elapsed);
            }
        }
    }

    Ok(RunSummary {
        cycles,
        skipped,
        last_state: prev,
    })
}
