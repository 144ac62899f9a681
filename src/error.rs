use std::error::Error;

/// Boxed error raised from inside an operation body
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Errors that can occur while assigning properties
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// A matched getter or setter failed when invoked
    #[error("invocation of `{operation}` failed: {source}")]
    Invocation {
        operation: String,
        #[source]
        source: InvokeError,
    },
    /// The operation could not be invoked on the receiver it was given
    #[error("access to `{operation}` denied: {reason}")]
    Access {
        operation: String,
        reason: AccessDenied,
    },
}

impl MapError {
    /// Name of the operation that failed
    pub fn operation(&self) -> &str {
        match self {
            MapError::Invocation { operation, .. } | MapError::Access { operation, .. } => {
                operation
            }
        }
    }

    /// Sort a low-level invoker failure into the right variant
    pub(crate) fn from_invoke(operation: &str, error: InvokeError) -> Self {
        match error {
            InvokeError::Denied(reason) => MapError::Access {
                operation: operation.to_string(),
                reason,
            },
            source => MapError::Invocation {
                operation: operation.to_string(),
                source,
            },
        }
    }
}

/// Failure reported by a single operation invocation
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    /// The operation body itself returned an error
    #[error("{0}")]
    Failed(#[source] BoxError),
    /// A setter was asked to accept a value but declares no parameter
    #[error("operation declares no parameter to receive the value")]
    MissingParameter,
    #[error("expected {expected} argument(s), found {found}")]
    Arity { expected: usize, found: usize },
    #[error("expected argument of type `{expected}`, found `{found}`")]
    ArgumentType {
        expected: &'static str,
        found: &'static str,
    },
    /// The operation produced a value of a different type than it declares
    #[error("expected result of type `{expected}`, found `{found}`")]
    ReturnType {
        expected: &'static str,
        found: &'static str,
    },
    #[error("receiver is not a `{expected}`")]
    ReceiverType { expected: &'static str },
    #[error("{0}")]
    Denied(AccessDenied),
}

impl InvokeError {
    /// Wrap an error raised by an operation body
    pub fn failed<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        InvokeError::Failed(error.into())
    }
}

/// Why an invocation was refused before running
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    #[error("operation is not public")]
    NotPublic,
    /// The operation takes `&mut self` but only a shared borrow is held
    #[error("operation needs exclusive access to its receiver")]
    ExclusiveReceiver,
}
