use tracing_appender::rolling::InitError;
use tracing_subscriber::util::TryInitError;

/// Failures while assembling or installing the global subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("Invalid logger configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Failed to create log file appender: {0}")]
    Appender(#[from] InitError),

    #[error("Failed to install global subscriber: {0}")]
    Subscriber(#[from] TryInitError),

    #[error("Internal logger error: {0}")]
    Internal(String),
}
