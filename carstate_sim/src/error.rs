use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("signal source timeout")]
    Timeout,
    #[error("injected fault: {0}")]
    Injected(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
