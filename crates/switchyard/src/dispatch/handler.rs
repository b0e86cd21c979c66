//! Handler signatures and their type-erased form.

use std::error::Error as StdError;
use std::future::Future;
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::command::Command;
use crate::outcome::Outcome;
use crate::protocol;

use super::DISPATCH_TARGET;
use super::errors::DispatchError;

/// What a handler resolves to.
///
/// `Ok(outcome)` is the normal path, business failures included.
/// `Err(HandlerError)` rejects the invocation instead; the client sees it as
/// a rejected call rather than a failed outcome.
pub type HandlerResult<T> = Result<Outcome<T>, HandlerError>;

/// Error a handler raises to reject an invocation.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl HandlerError {
    /// Creates a rejection with a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps an underlying error, keeping it as the source.
    #[must_use]
    pub fn from_error<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    }

    /// Returns the rejection message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Response future produced by an erased handler or dispatcher.
pub type ResponseFuture = BoxFuture<'static, Result<Value, DispatchError>>;

/// A handler with its command types erased to JSON.
pub(crate) type ErasedHandler<Ev> =
    Arc<dyn Fn(Ev, Map<String, Value>) -> ResponseFuture + Send + Sync + 'static>;

/// Wraps a typed handler for command `C` so it accepts and returns JSON.
///
/// Option decoding happens before the handler runs; a decoding failure is a
/// rejection and the handler is never called.
pub(crate) fn erase<C, Ev, F, Fut>(handler: F) -> ErasedHandler<Ev>
where
    C: Command,
    Ev: Send + 'static,
    F: Fn(Ev, C::Opts) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult<C::Ret>> + Send + 'static,
{
    Arc::new(move |event: Ev, options: Map<String, Value>| {
        let decoded = match protocol::decode_options::<C::Opts>(C::NAME, options) {
            Ok(decoded) => decoded,
            Err(error) => return future::ready(Err(DispatchError::from(error))).boxed(),
        };
        let pending = handler(event, decoded);
        async move {
            let outcome = pending
                .await
                .map_err(|source| DispatchError::handler_rejected(C::NAME, source))?;
            debug!(
                target: DISPATCH_TARGET,
                command = C::NAME,
                ok = outcome.is_ok(),
                "handler completed"
            );
            Ok(protocol::encode_outcome(C::NAME, &outcome)?)
        }
        .boxed()
    })
}
