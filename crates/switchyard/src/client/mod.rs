//! Sending side: typed invocations over one channel.
//!
//! A [`Client`] is bound to a spec and a channel. [`Client::invoke`] accepts
//! only commands of that spec, so the options and return types are fixed by
//! the command marker. Failed outcomes come back as data; rejections come
//! back as [`InvokeError`] and can be folded into the outcome with
//! [`IntoOutcome::into_outcome`](crate::IntoOutcome::into_outcome).

mod errors;


use std::fmt;
use std::marker::PhantomData;

use tracing::{debug, warn};

use crate::channel::{self, ChannelError};
use crate::command::{Command, CommandSpec};
use crate::outcome::Outcome;
use crate::protocol;
use crate::transport::Invoker;

pub use self::errors::InvokeError;

/// Tracing target for client operations.
const CLIENT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::client");

/// Creates a client for the command spec `S` on `channel`.
///
/// # Errors
///
/// Returns [`ChannelError::Empty`] when `channel` is blank.
pub fn create_client<S, I>(channel: &str, invoker: I) -> Result<Client<S, I>, ChannelError>
where
    S: CommandSpec,
    I: Invoker,
{
    Ok(Client {
        channel: channel::validate(channel)?,
        invoker,
        spec: PhantomData,
    })
}

/// Typed sending endpoint for the command spec `S`.
pub struct Client<S, I> {
    channel: String,
    invoker: I,
    spec: PhantomData<fn() -> S>,
}

impl<S, I> Client<S, I>
where
    S: CommandSpec,
    I: Invoker,
{
    /// Returns the channel requests are sent on.
    #[must_use]
    pub fn channel(&self) -> &str {
        self.channel.as_str()
    }

    /// Invokes command `C` and awaits its outcome.
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError::Transport`] when no handler answers the channel
    /// or the handler rejects, and [`InvokeError::Protocol`] when the options
    /// or the response do not fit the command's types.
    pub async fn invoke<C>(&self, options: C::Opts) -> Result<Outcome<C::Ret>, InvokeError>
    where
        C: Command<Spec = S>,
    {
        let request = protocol::encode_request::<C>(&options)?;
        debug!(
            target: CLIENT_TARGET,
            channel = self.channel(),
            command = C::NAME,
            "invoking command"
        );
        let response = match self.invoker.invoke(&self.channel, request).await {
            Ok(response) => response,
            Err(error) => {
                warn!(
                    target: CLIENT_TARGET,
                    channel = self.channel(),
                    command = C::NAME,
                    %error,
                    "invocation rejected"
                );
                return Err(error.into());
            }
        };
        Ok(protocol::decode_outcome(C::NAME, response)?)
    }
}

impl<S, I: Clone> Clone for Client<S, I> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
            invoker: self.invoker.clone(),
            spec: PhantomData,
        }
    }
}

impl<S: CommandSpec, I> fmt::Debug for Client<S, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("spec", &S::NAME)
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}
