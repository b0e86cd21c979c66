//! Routing of an incoming request to the handler for its `$cmd`.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use futures::future::{self, FutureExt};
use serde_json::Value;
use tracing::{debug, warn};

use crate::command::CommandSpec;
use crate::protocol::RequestEnvelope;
use crate::transport::Listener;

use super::DISPATCH_TARGET;
use super::errors::DispatchError;
use super::handler::{ErasedHandler, ResponseFuture};

/// The single function bound to a channel for the command spec `S`.
///
/// A dispatcher parses the request envelope, looks up the handler named by
/// `$cmd` and returns that handler's response unchanged. Cloning is cheap;
/// clones share the same handlers.
pub struct Dispatcher<S, Ev> {
    handlers: Arc<HashMap<&'static str, ErasedHandler<Ev>>>,
    spec: PhantomData<fn() -> S>,
}

impl<S, Ev> Dispatcher<S, Ev>
where
    S: CommandSpec,
    Ev: Send + 'static,
{
    pub(crate) fn from_handlers(handlers: HashMap<&'static str, ErasedHandler<Ev>>) -> Self {
        Self {
            handlers: Arc::new(handlers),
            spec: PhantomData,
        }
    }

    /// Routes one request.
    ///
    /// Envelope errors and unknown commands are rejected immediately;
    /// otherwise the matching handler runs with `(event, options)`.
    pub fn dispatch(&self, event: Ev, request: Value) -> ResponseFuture {
        let envelope = match RequestEnvelope::parse(request) {
            Ok(envelope) => envelope,
            Err(error) => {
                warn!(target: DISPATCH_TARGET, spec = S::NAME, %error, "malformed request");
                return future::ready(Err(error.into())).boxed();
            }
        };
        let (command, options) = envelope.into_parts();
        let Some(handler) = self.handlers.get(command.as_str()) else {
            warn!(
                target: DISPATCH_TARGET,
                spec = S::NAME,
                command = command.as_str(),
                "unknown command"
            );
            return future::ready(Err(DispatchError::unknown_command(S::NAME, command))).boxed();
        };
        debug!(
            target: DISPATCH_TARGET,
            spec = S::NAME,
            command = command.as_str(),
            "dispatching request"
        );
        handler(event, options)
    }

    /// Returns `true` when a handler exists for `command`.
    #[must_use]
    pub fn handles(&self, command: &str) -> bool {
        self.handlers.contains_key(command)
    }

    /// Returns the handled command names, sorted.
    #[must_use]
    pub fn commands(&self) -> Vec<&'static str> {
        let mut commands: Vec<_> = self.handlers.keys().copied().collect();
        commands.sort_unstable();
        commands
    }

    /// Erases the command spec, producing the raw listener a transport stores.
    #[must_use]
    pub fn into_listener(self) -> Listener<Ev> {
        Arc::new(move |event: Ev, request: Value| self.dispatch(event, request))
    }
}

impl<S, Ev> Clone for Dispatcher<S, Ev> {
    fn clone(&self) -> Self {
        Self {
            handlers: Arc::clone(&self.handlers),
            spec: PhantomData,
        }
    }
}

impl<S: CommandSpec, Ev> fmt::Debug for Dispatcher<S, Ev> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut commands: Vec<_> = self.handlers.keys().collect();
        commands.sort_unstable();
        f.debug_struct("Dispatcher")
            .field("spec", &S::NAME)
            .field("commands", &commands)
            .finish()
    }
}
