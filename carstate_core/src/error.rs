use thiserror::Error;

/// Runner-level failures. The normalizer itself never produces these.
#[derive(Debug, Error, Clone)]
pub enum StateError {
    #[error("signal source error: {0}")]
    Source(String),
    #[error("signal source fault: {0}")]
    SourceFault(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("timeout waiting for signal source")]
    Timeout,
    #[error("io error: {0}")]
    Io(String),
}

/// Problems detected while setting up the signal map and calibration. Fatal at startup.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown vehicle variant: {0}")]
    UnknownVariant(String),
    #[error("gear code {0} is defined more than once")]
    DuplicateGearCode(i64),
    #[error("invalid calibration: {0}")]
    InvalidCalibration(&'static str),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing vehicle config")]
    MissingVehicle,
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
