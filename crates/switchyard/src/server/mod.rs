//! Receiving side: binds one dispatcher to one channel.
//!
//! A [`Server`] owns an explicit [`ChannelState`]. Registering while the
//! state is [`ChannelState::Registered`] fails before the transport is
//! touched, so a channel never has its dispatcher replaced silently.
//!
//! [`Server::handle_once`] binds a single-use dispatcher: the first request
//! unregisters the channel before the wrapped dispatcher runs, which lets the
//! handler register a successor for the same channel. The bound listener
//! keeps the server's state alive until it fires or is removed, so dropping
//! every [`Server`] handle still lets the channel revert.
//!
//! The state tracks this server's own registrations only. The transport
//! table is shared, so another server or direct use of the [`Registrar`] can
//! unbind the channel without this server observing it.

mod errors;


use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::{self, FutureExt};
use serde_json::Value;
use tracing::{debug, warn};

use crate::channel::{self, ChannelError};
use crate::command::CommandSpec;
use crate::dispatch::{DispatchError, Dispatcher, ResponseFuture};
use crate::transport::{Listener, Registrar, TransportError};

pub use self::errors::ServerError;

/// Tracing target for server operations.
const SERVER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::server");

/// Registration state of a server's channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelState {
    /// No dispatcher is bound.
    Unregistered,
    /// A dispatcher is bound and answers requests.
    Registered,
}

/// Creates a server for the command spec `S` on `channel`.
///
/// # Errors
///
/// Returns [`ChannelError::Empty`] when `channel` is blank.
pub fn create_server<S, R>(channel: &str, registrar: R) -> Result<Server<S, R>, ChannelError>
where
    S: CommandSpec,
    R: Registrar,
{
    Ok(Server::new(channel::validate(channel)?, registrar))
}

/// Typed receiving endpoint for the command spec `S`.
///
/// Clones share the same channel state.
pub struct Server<S, R> {
    core: Arc<ServerCore<R>>,
    spec: PhantomData<fn() -> S>,
}

struct ServerCore<R> {
    channel: String,
    registrar: R,
    registered: AtomicBool,
    generation: AtomicU64,
}

impl<R: Registrar> ServerCore<R> {
    /// Moves the state to registered, returning the new registration's
    /// generation.
    fn claim(&self) -> Result<u64, ServerError> {
        self.registered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ServerError::already_registered(self.channel.as_str()))?;
        Ok(self.generation.fetch_add(1, Ordering::AcqRel).wrapping_add(1))
    }

    fn bind(&self, listener: Listener<R::Event>) -> Result<(), ServerError> {
        if let Err(error) = self.registrar.handle(&self.channel, listener) {
            self.registered.store(false, Ordering::Release);
            warn!(
                target: SERVER_TARGET,
                channel = self.channel.as_str(),
                %error,
                "transport refused registration"
            );
            return Err(error.into());
        }
        Ok(())
    }

    fn release(&self) -> Result<(), TransportError> {
        self.registrar.remove_handler(&self.channel)?;
        self.registered.store(false, Ordering::Release);
        Ok(())
    }

    /// Releases the channel only if `generation` is still the live
    /// registration.
    fn release_generation(&self, generation: u64) -> Result<(), TransportError> {
        if self.generation.load(Ordering::Acquire) != generation
            || !self.registered.load(Ordering::Acquire)
        {
            return Ok(());
        }
        self.release()
    }
}

impl<S, R> Server<S, R>
where
    S: CommandSpec,
    R: Registrar,
{
    /// Creates a server on an already validated channel.
    fn new(channel: String, registrar: R) -> Self {
        Self {
            core: Arc::new(ServerCore {
                channel,
                registrar,
                registered: AtomicBool::new(false),
                generation: AtomicU64::new(0),
            }),
            spec: PhantomData,
        }
    }

    /// Returns the channel this server answers.
    #[must_use]
    pub fn channel(&self) -> &str {
        self.core.channel.as_str()
    }

    /// Returns the current registration state.
    #[must_use]
    pub fn state(&self) -> ChannelState {
        if self.core.registered.load(Ordering::Acquire) {
            ChannelState::Registered
        } else {
            ChannelState::Unregistered
        }
    }

    /// Returns `true` when a dispatcher is bound.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.state() == ChannelState::Registered
    }

    /// Binds `dispatcher` as the channel's handler.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::AlreadyRegistered`] when this server already
    /// has a dispatcher bound, and [`ServerError::Transport`] when the
    /// transport refuses the registration.
    pub fn handle(&self, dispatcher: Dispatcher<S, R::Event>) -> Result<(), ServerError> {
        self.core.claim()?;
        self.core.bind(dispatcher.into_listener())?;
        debug!(
            target: SERVER_TARGET,
            channel = self.channel(),
            spec = S::NAME,
            "handler registered"
        );
        Ok(())
    }

    /// Binds `dispatcher` for exactly one request.
    ///
    /// The first request unregisters the channel and then runs `dispatcher`.
    /// A request that races past the first one is rejected with
    /// [`DispatchError::Unavailable`]. When the transport cannot unbind the
    /// channel, the first request is rejected with
    /// [`DispatchError::Unregister`] and `dispatcher` does not run.
    ///
    /// # Errors
    ///
    /// Fails like [`Server::handle`].
    pub fn handle_once(&self, dispatcher: Dispatcher<S, R::Event>) -> Result<(), ServerError> {
        let generation = self.core.claim()?;
        let core = Arc::clone(&self.core);
        let channel = self.core.channel.clone();
        let fired = AtomicBool::new(false);
        let listener: Listener<R::Event> =
            Arc::new(move |event: R::Event, request: Value| -> ResponseFuture {
                if fired.swap(true, Ordering::AcqRel) {
                    warn!(
                        target: SERVER_TARGET,
                        channel = channel.as_str(),
                        "single-use handler already spent"
                    );
                    return future::ready(Err(DispatchError::unavailable(channel.as_str())))
                        .boxed();
                }
                if let Err(error) = core.release_generation(generation) {
                    warn!(
                        target: SERVER_TARGET,
                        channel = channel.as_str(),
                        %error,
                        "single-use handler could not unregister"
                    );
                    return future::ready(Err(DispatchError::unregister(channel.as_str(), error)))
                        .boxed();
                }
                debug!(target: SERVER_TARGET, channel = channel.as_str(), "single-use handler fired");
                dispatcher.dispatch(event, request)
            });
        self.core.bind(listener)?;
        debug!(
            target: SERVER_TARGET,
            channel = self.channel(),
            spec = S::NAME,
            "single-use handler registered"
        );
        Ok(())
    }

    /// Unbinds whatever dispatcher answers the channel.
    ///
    /// Removing when nothing is bound is not an error. The transport unbinds
    /// the channel whichever server registered it, but only this server's
    /// state changes: a server whose listener was removed this way stays
    /// [`ChannelState::Registered`] until its own `remove_handler` runs.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Transport`] when the transport cannot update
    /// its registration table.
    pub fn remove_handler(&self) -> Result<(), ServerError> {
        self.core.release()?;
        debug!(target: SERVER_TARGET, channel = self.channel(), "handler removed");
        Ok(())
    }
}

impl<S, R> Clone for Server<S, R> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
            spec: PhantomData,
        }
    }
}

impl<S: CommandSpec, R> fmt::Debug for Server<S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Server")
            .field("spec", &S::NAME)
            .field("channel", &self.core.channel)
            .field("registered", &self.core.registered.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}
