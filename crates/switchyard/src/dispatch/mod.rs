//! Handler sets and the dispatcher derived from them.
//!
//! A [`HandlerSet`] maps each command of a spec to an async handler. Turning
//! it into a [`Dispatcher`] yields the single function a server binds to its
//! channel: given `(event, request)` it reads `$cmd`, decodes the options for
//! that command, runs the handler and encodes the [`Outcome`](crate::Outcome)
//! it resolves to.
//!
//! ## Failure paths
//!
//! Handler outcomes, failed ones included, are returned as data. Everything
//! else is a [`DispatchError`] rejection: malformed envelopes, options that do
//! not decode, commands without a handler, and handlers that resolve to
//! `Err(HandlerError)`.

mod dispatcher;
mod errors;
mod handler;
mod set;

#[cfg(test)]
mod tests;

pub use self::dispatcher::Dispatcher;
pub use self::errors::DispatchError;
pub use self::handler::{HandlerError, HandlerResult, ResponseFuture};
pub use self::set::HandlerSet;

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");
