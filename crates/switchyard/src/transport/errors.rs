//! Error types for transport operations.

use thiserror::Error;

/// Errors surfaced by a transport while registering or delivering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// No listener answers the channel.
    #[error("no handler registered for '{channel}'")]
    NoHandler {
        /// Channel that was invoked.
        channel: String,
    },

    /// The channel already has a listener.
    #[error("attempted to register a second handler for '{channel}'")]
    AlreadyRegistered {
        /// Channel that was registered.
        channel: String,
    },

    /// The listener rejected the request.
    #[error("error invoking remote method '{channel}': {message}")]
    Rejected {
        /// Channel that was invoked.
        channel: String,
        /// Rejection reported by the listener.
        message: String,
    },

    /// The transport could not deliver the request or its response.
    #[error("delivery on '{channel}' failed: {message}")]
    Delivery {
        /// Channel in use.
        channel: String,
        /// Description of the failure.
        message: String,
    },

    /// The transport's registration table was poisoned by a panic.
    #[error("handler table poisoned while accessing '{channel}'")]
    Poisoned {
        /// Channel in use.
        channel: String,
    },
}

impl TransportError {
    /// Creates a missing handler error.
    pub fn no_handler(channel: impl Into<String>) -> Self {
        Self::NoHandler {
            channel: channel.into(),
        }
    }

    /// Creates a duplicate registration error.
    pub fn already_registered(channel: impl Into<String>) -> Self {
        Self::AlreadyRegistered {
            channel: channel.into(),
        }
    }

    /// Creates a rejection error.
    pub fn rejected(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            channel: channel.into(),
            message: message.into(),
        }
    }

    /// Creates a delivery error.
    pub fn delivery(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Delivery {
            channel: channel.into(),
            message: message.into(),
        }
    }

    /// Creates a poisoned table error.
    pub fn poisoned(channel: impl Into<String>) -> Self {
        Self::Poisoned {
            channel: channel.into(),
        }
    }

    /// Returns the channel the error concerns.
    #[must_use]
    pub fn channel(&self) -> &str {
        match self {
            Self::NoHandler { channel }
            | Self::AlreadyRegistered { channel }
            | Self::Rejected { channel, .. }
            | Self::Delivery { channel, .. }
            | Self::Poisoned { channel } => channel.as_str(),
        }
    }
}
