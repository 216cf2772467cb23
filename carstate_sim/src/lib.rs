//! Signal sources that stand in for a live bus decoder.
//!
//! - `ReplaySource` plays back a recorded signal log.
//! - `ScriptedDrive` synthesizes a deterministic drive profile.
//!
//! Both accept a `FaultPlan` to inject timeouts and dropouts.
pub mod drive;
pub mod error;
pub mod faults;
pub mod replay;

pub use drive::ScriptedDrive;
pub use error::SimError;
pub use faults::FaultPlan;
pub use replay::ReplaySource;
