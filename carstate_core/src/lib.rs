#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Car state normalization (bus-agnostic).
//!
//! This crate turns one cycle of decoded GM bus signals into a `CarState`. All bus
//! access goes through the `carstate_traits::SignalSource` trait.
//!
//! ## Architecture
//!
//! - **Variants**: supported platforms and their families (`variant` module)
//! - **Signal registry**: which (message, signal) pairs each variant subscribes to (`signals`)
//! - **Gear mapping**: PRNDL code to `GearShifter` (`gear`)
//! - **Fault classification**: EPS torque-delivery status to a steer-warning flag (`fault`)
//! - **Normalization**: raw frame plus previous state to a new `CarState` (`normalizer`)
//! - **Runner**: drives a source cycle by cycle with pacing and error budgets (`runner`)
//!
//! ## Purity
//!
//! `CarStateNormalizer::update` reads only its inputs. The speed filter is the one
//! piece of carried state and is passed in by the caller.

pub mod builder;
pub mod calibration;
pub mod conversions;
pub mod error;
pub mod fault;
pub mod frame;
pub mod gear;
pub mod mocks;
pub mod normalizer;
pub mod runner;
pub mod signals;
pub mod source_error;
pub mod speed_filter;
pub mod state;
pub mod variant;

pub use builder::{Missing, NormalizerBuilder, Set};
pub use calibration::Calibration;
pub use error::{BuildError, ConfigError, Report, Result, StateError};
pub use fault::{TorqueDeliveryStatus, steer_fault_degraded, steer_fault_degraded_value};
pub use frame::SignalFrame;
pub use gear::{GearShifter, GearTable, PowertrainSchema};
pub use normalizer::CarStateNormalizer;
pub use runner::{RunParams, RunSummary, cycle_period, run_cycles};
pub use signals::{SignalEntry, SignalSpec};
pub use speed_filter::{KalmanSpeedFilter, SpeedFilterCfg};
pub use state::{AccState, CarState, CruiseButtons, CruiseState, WheelSpeeds};
pub use variant::{CarVariant, VariantFamily, VehicleConfig};
