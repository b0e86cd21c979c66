//! Error types for server registration.

use thiserror::Error;

use crate::transport::TransportError;

/// Errors surfaced while binding a dispatcher to a channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServerError {
    /// This server already holds a registration for its channel.
    #[error("attempted to register a second handler for '{channel}'")]
    AlreadyRegistered {
        /// Channel the server is bound to.
        channel: String,
    },

    /// The transport refused the operation.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ServerError {
    /// Creates a duplicate registration error.
    pub fn already_registered(channel: impl Into<String>) -> Self {
        Self::AlreadyRegistered {
            channel: channel.into(),
        }
    }
}
