use thiserror::Error;

/// Boxed error a receiver reports a failed invocation with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The result of a single receiver invocation.
pub type ReceiveResult = Result<(), BoxError>;

#[derive(Error, Debug)]
pub enum SignalError {
    /// A bound method was requested for a method the object does not respond to.
    #[error("{type_name} has no method named `{method}`")]
    UnknownMethod { type_name: &'static str, method: String },
    /// A receiver failed during emission and the signal propagates errors.
    #[error("receiver at priority {priority} failed: {source}")]
    Receiver {
        priority: i32,
        #[source]
        source: BoxError,
    },
}

impl SignalError {
    /// Borrow the receiver's own error, if this is a receiver failure
    pub fn receiver_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            SignalError::Receiver { source, .. } => Some(source.as_ref()),
            SignalError::UnknownMethod { .. } => None,
        }
    }
}
