//! The channel primitive the protocol is layered over.
//!
//! A transport is consumed through two seams only: [`Invoker`] sends a request
//! on a named channel and awaits its single response, and [`Registrar`]
//! binds or unbinds the one [`Listener`] that answers a channel. Transports
//! own delivery, correlation and any timeout policy; this crate adds none.
//!
//! [`LocalBus`] implements both seams inside one process.

mod errors;
mod local;


use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::dispatch::ResponseFuture;

pub use self::errors::TransportError;
pub use self::local::{InvokeEvent, LocalBus};

/// Tracing target for transport operations.
pub(crate) const TRANSPORT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");

/// The untyped function a transport calls for each request on a channel.
///
/// The synchronous part of the call runs when the request arrives;
/// transports must not hold internal locks while calling a listener, so a
/// listener may register or remove handlers before returning its future.
pub type Listener<Ev> = Arc<dyn Fn(Ev, Value) -> ResponseFuture + Send + Sync + 'static>;

/// Sending side of a transport.
pub trait Invoker: Send + Sync {
    /// Sends `request` on `channel` and resolves with the single response.
    ///
    /// The returned future fails with [`TransportError::NoHandler`] when
    /// nothing answers the channel and [`TransportError::Rejected`] when the
    /// listener rejects.
    fn invoke(&self, channel: &str, request: Value) -> BoxFuture<'static, Result<Value, TransportError>>;
}

/// Receiving side of a transport.
pub trait Registrar: Send + Sync + 'static {
    /// Context value handed to listeners with each request.
    type Event: Send + 'static;

    /// Binds `listener` to `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::AlreadyRegistered`] when the channel already
    /// has a listener. Transports never overwrite silently.
    fn handle(&self, channel: &str, listener: Listener<Self::Event>)
    -> Result<(), TransportError>;

    /// Unbinds whatever listener answers `channel`, if any.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the registration table is unusable.
    /// Removing from an unbound channel is not an error.
    fn remove_handler(&self, channel: &str) -> Result<(), TransportError>;
}

impl<T: Invoker + ?Sized> Invoker for Arc<T> {
    fn invoke(&self, channel: &str, request: Value) -> BoxFuture<'static, Result<Value, TransportError>> {
        (**self).invoke(channel, request)
    }
}

impl<T: Registrar + ?Sized> Registrar for Arc<T> {
    type Event = T::Event;

    fn handle(&self, channel: &str, listener: Listener<Self::Event>) -> Result<(), TransportError> {
        (**self).handle(channel, listener)
    }

    fn remove_handler(&self, channel: &str) -> Result<(), TransportError> {
        (**self).remove_handler(channel)
    }
}
