/// Failures raised by the event bus.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventBusError {
    #[error("Channel buffer capacity must be at least 1")]
    InvalidCapacity,

    #[error("Stored channel for '{0}' has an unexpected sender type")]
    TypeMismatch(&'static str),
}
