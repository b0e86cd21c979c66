//! Error types for client invocations.

use thiserror::Error;

use crate::outcome::Fault;
use crate::protocol::ProtocolError;
use crate::transport::TransportError;

/// Errors surfaced when an invocation is rejected instead of answered.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The request could not be encoded or the response decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The transport rejected the invocation.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl InvokeError {
    /// Returns the stable classification code carried into a [`Fault`].
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Protocol(_) => "protocol",
            Self::Transport(TransportError::NoHandler { .. }) => "no-handler",
            Self::Transport(TransportError::Rejected { .. }) => "rejected",
            Self::Transport(_) => "transport",
        }
    }
}

impl From<InvokeError> for Fault {
    fn from(error: InvokeError) -> Self {
        Self::with_code(error.to_string(), error.code())
    }
}
