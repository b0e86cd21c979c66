//! Error types for request dispatch failures.
//!
//! Every variant is a rejection: it travels back over the transport's
//! response path instead of being encoded as an [`Outcome`](crate::Outcome).

use thiserror::Error;

use crate::protocol::ProtocolError;
use crate::transport::TransportError;

use super::handler::HandlerError;

/// Errors surfaced while routing a request to its handler.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The request could not be parsed or its options decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The command is not present in the handler set.
    #[error("unknown command '{command}' for '{spec}'")]
    UnknownCommand {
        /// Spec the dispatcher serves.
        spec: &'static str,
        /// Command named by the request.
        command: String,
    },

    /// A handler set was built without handlers for some commands.
    #[error("no handlers for {commands:?} in '{spec}'")]
    MissingHandlers {
        /// Spec the set was built for.
        spec: &'static str,
        /// Commands lacking a handler.
        commands: Vec<&'static str>,
    },

    /// The handler rejected instead of producing an outcome.
    #[error("handler for '{command}' failed: {source}")]
    HandlerRejected {
        /// Command whose handler rejected.
        command: String,
        /// Error raised by the handler.
        #[source]
        source: HandlerError,
    },

    /// A single-use dispatcher was invoked after it had already served.
    #[error("no handler registered for '{channel}'")]
    Unavailable {
        /// Channel the spent dispatcher was bound to.
        channel: String,
    },

    /// A single-use dispatcher could not unbind itself before serving.
    #[error("single-use handler for '{channel}' could not unregister: {source}")]
    Unregister {
        /// Channel the single-use dispatcher was bound to.
        channel: String,
        /// Error raised by the transport while unbinding.
        #[source]
        source: TransportError,
    },
}

impl DispatchError {
    /// Creates an unknown command error.
    pub fn unknown_command(spec: &'static str, command: impl Into<String>) -> Self {
        Self::UnknownCommand {
            spec,
            command: command.into(),
        }
    }

    /// Creates a handler rejection error.
    pub fn handler_rejected(command: impl Into<String>, source: HandlerError) -> Self {
        Self::HandlerRejected {
            command: command.into(),
            source,
        }
    }

    /// Creates an unavailable dispatcher error.
    pub fn unavailable(channel: impl Into<String>) -> Self {
        Self::Unavailable {
            channel: channel.into(),
        }
    }

    /// Creates an error for a single-use dispatcher that could not unbind.
    pub fn unregister(channel: impl Into<String>, source: TransportError) -> Self {
        Self::Unregister {
            channel: channel.into(),
            source,
        }
    }
}
