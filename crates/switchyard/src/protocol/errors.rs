//! Errors raised while encoding or decoding wire messages.

use serde_json::Value;
use thiserror::Error;

use super::{COMMAND_KEY, json_kind};

/// Failures of the request/outcome codec.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The request was not a JSON object.
    #[error("request must be a JSON object, found {found}")]
    NotAnObject {
        /// JSON type that was received.
        found: &'static str,
    },

    /// The request lacked the `$cmd` key.
    #[error("request is missing the '{key}' field", key = COMMAND_KEY)]
    MissingCommand,

    /// The `$cmd` value was not a string.
    #[error("'{key}' must be a string, found {found}", key = COMMAND_KEY)]
    CommandNotString {
        /// JSON type that was received.
        found: &'static str,
    },

    /// The `$cmd` value was blank.
    #[error("'{key}' must not be empty", key = COMMAND_KEY)]
    EmptyCommand,

    /// Options for a command did not serialise to an object.
    #[error("options for '{command}' must serialise to an object, found {found}")]
    OptionsNotObject {
        /// Command being encoded.
        command: String,
        /// JSON type the options produced.
        found: &'static str,
    },

    /// Options used the reserved `$cmd` key.
    #[error("options for '{command}' must not contain the reserved '{key}' field", key = COMMAND_KEY)]
    ReservedKey {
        /// Command being encoded.
        command: String,
    },

    /// Options failed to serialise.
    #[error("failed to encode options for '{command}': {source}")]
    EncodeOptions {
        /// Command being encoded.
        command: String,
        /// Underlying serde failure.
        #[source]
        source: serde_json::Error,
    },

    /// Options did not match the command's options type.
    #[error("invalid options for '{command}': {source}")]
    DecodeOptions {
        /// Command being decoded.
        command: String,
        /// Underlying serde failure.
        #[source]
        source: serde_json::Error,
    },

    /// A handler outcome failed to serialise.
    #[error("failed to encode outcome of '{command}': {source}")]
    EncodeOutcome {
        /// Command whose outcome was encoded.
        command: String,
        /// Underlying serde failure.
        #[source]
        source: serde_json::Error,
    },

    /// A response did not match the command's outcome type.
    #[error("invalid response for '{command}': {source}")]
    DecodeOutcome {
        /// Command whose response was decoded.
        command: String,
        /// Underlying serde failure.
        #[source]
        source: serde_json::Error,
    },
}

impl ProtocolError {
    /// Creates a non-object request error.
    pub(crate) const fn not_an_object(request: &Value) -> Self {
        Self::NotAnObject {
            found: json_kind(request),
        }
    }

    /// Creates a non-string command error.
    pub(crate) const fn command_not_string(command: &Value) -> Self {
        Self::CommandNotString {
            found: json_kind(command),
        }
    }

    /// Creates a non-object options error.
    pub(crate) fn options_not_object(command: &str, options: &Value) -> Self {
        Self::OptionsNotObject {
            command: command.to_owned(),
            found: json_kind(options),
        }
    }

    /// Creates an options encoding error.
    pub(crate) fn encode_options(command: &str, source: serde_json::Error) -> Self {
        Self::EncodeOptions {
            command: command.to_owned(),
            source,
        }
    }

    /// Creates an options decoding error.
    pub(crate) fn decode_options(command: &str, source: serde_json::Error) -> Self {
        Self::DecodeOptions {
            command: command.to_owned(),
            source,
        }
    }
}
