//! Channel name validation shared by clients and servers.

use thiserror::Error;

/// Errors raised when constructing a client or server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// The channel name is empty or only whitespace.
    #[error("channel name must not be empty")]
    Empty,
}

/// Returns an owned copy of `channel` once it is known to be usable.
pub(crate) fn validate(channel: &str) -> Result<String, ChannelError> {
    if channel.trim().is_empty() {
        return Err(ChannelError::Empty);
    }
    Ok(channel.to_owned())
}
