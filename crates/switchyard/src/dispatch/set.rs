//! Builder collecting one handler per command.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use crate::command::{Command, CommandSpec};

use super::dispatcher::Dispatcher;
use super::errors::DispatchError;
use super::handler::{ErasedHandler, HandlerResult, erase};

/// Mapping from command name to handler for the command spec `S`.
///
/// Handlers receive the transport's event value `Ev` as their context.
/// [`define_commands!`](crate::define_commands) generates a handlers trait
/// that fills a set completely; building a set by hand is useful when
/// handlers are closures.
///
/// # Example
///
/// ```
/// use switchyard::{HandlerSet, NoOptions, Outcome, define_commands};
///
/// define_commands! {
///     Greeter with GreeterHandlers {
///         hello => Hello { ret: String },
///     }
/// }
///
/// let dispatcher = HandlerSet::<Greeter, ()>::new()
///     .on::<Hello, _, _>(|(), _options: NoOptions| async {
///         Ok(Outcome::ok("hello".to_owned()))
///     })
///     .build()
///     .expect("every command handled");
/// assert!(dispatcher.handles("hello"));
/// ```
pub struct HandlerSet<S, Ev> {
    handlers: HashMap<&'static str, ErasedHandler<Ev>>,
    spec: PhantomData<fn() -> S>,
}

impl<S, Ev> HandlerSet<S, Ev>
where
    S: CommandSpec,
    Ev: Send + 'static,
{
    /// Creates an empty handler set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            spec: PhantomData,
        }
    }

    /// Sets the handler for command `C`, replacing any previous one.
    #[must_use]
    pub fn on<C, F, Fut>(mut self, handler: F) -> Self
    where
        C: Command<Spec = S>,
        F: Fn(Ev, C::Opts) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult<C::Ret>> + Send + 'static,
    {
        self.handlers.insert(C::NAME, erase::<C, Ev, F, Fut>(handler));
        self
    }

    /// Returns `true` when a handler is set for `command`.
    #[must_use]
    pub fn contains(&self, command: &str) -> bool {
        self.handlers.contains_key(command)
    }

    /// Returns the declared commands that still lack a handler.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        S::COMMANDS
            .iter()
            .copied()
            .filter(|name| !self.handlers.contains_key(name))
            .collect()
    }

    /// Builds a dispatcher after checking every declared command is handled.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MissingHandlers`] listing the commands that
    /// have no handler.
    pub fn build(self) -> Result<Dispatcher<S, Ev>, DispatchError> {
        let missing = self.missing();
        if !missing.is_empty() {
            return Err(DispatchError::MissingHandlers {
                spec: S::NAME,
                commands: missing,
            });
        }
        Ok(self.into_dispatcher())
    }

    /// Builds a dispatcher without the completeness check.
    ///
    /// Requests for commands without a handler are rejected with
    /// [`DispatchError::UnknownCommand`].
    #[must_use]
    pub fn into_dispatcher(self) -> Dispatcher<S, Ev> {
        Dispatcher::from_handlers(self.handlers)
    }
}

impl<S, Ev> Default for HandlerSet<S, Ev>
where
    S: CommandSpec,
    Ev: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CommandSpec, Ev> fmt::Debug for HandlerSet<S, Ev> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut commands: Vec<_> = self.handlers.keys().collect();
        commands.sort_unstable();
        f.debug_struct("HandlerSet")
            .field("spec", &S::NAME)
            .field("commands", &commands)
            .finish()
    }
}
