use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum ControlError {
    #[error("sensor transport: {0}")]
    Transport(String),
    #[error("sensor timeout")]
    SensorTimeout,
    #[error("sensor failed {0} consecutive reads")]
    SensorRetries(u32),
    #[error("device fault: {0}")]
    DeviceFault(String),
    #[error("invalid state: {0}")]
    State(String),
}

impl ControlError {
    /// Transient errors are retried at the next scheduled cycle; everything
    /// else escalates to shutdown.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::SensorTimeout)
    }
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing sensor")]
    MissingSensor,
    #[error("missing motor")]
    MissingMotor,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
