//! Typed command dispatch over a single request/response channel.
//!
//! Switchyard multiplexes many named commands over one channel. Both sides
//! share a static command spec declared with [`define_commands!`]. The
//! client can only invoke declared commands, with the options and return
//! types fixed by their declarations, and the server must supply a handler
//! for every one of them before it compiles.
//!
//! On the wire a request is the command's options object with the command
//! name added under the reserved `$cmd` key. The server's [`Dispatcher`]
//! reads `$cmd`, runs the matching handler and answers with the encoded
//! [`Outcome`] the handler produced.
//!
//! ## Outcomes and rejections
//!
//! Business failures are data: a handler resolves to [`Outcome::err`] and
//! the caller receives `Ok(Outcome::Failure(..))`. Protocol and lifecycle
//! failures (nothing registered on the channel, a handler that raises
//! [`HandlerError`], a malformed request) are rejections and reach the
//! caller as `Err(InvokeError)`. [`IntoOutcome::into_outcome`] folds a
//! rejection into a failed outcome carrying a [`Fault`] when callers prefer
//! a single shape.
//!
//! ## Transports
//!
//! The channel primitive is abstracted by the [`Invoker`] and [`Registrar`]
//! traits. [`LocalBus`] implements both for in-process use; other transports
//! only need to route a JSON value to the single listener bound to a
//! channel name and return its response.

mod channel;
pub mod client;
mod command;
pub mod dispatch;
mod outcome;
pub mod protocol;
pub mod server;
pub mod telemetry;
pub mod transport;

#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod tests;

pub use channel::ChannelError;
pub use client::{Client, InvokeError, create_client};
pub use command::{Command, CommandSpec, NoOptions, declares};
pub use dispatch::{
    DispatchError, Dispatcher, HandlerError, HandlerResult, HandlerSet, ResponseFuture,
};
pub use outcome::{Fault, IntoOutcome, Outcome};
pub use protocol::{ProtocolError, RequestEnvelope};
pub use server::{ChannelState, Server, ServerError, create_server};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use transport::{InvokeEvent, Invoker, Listener, LocalBus, Registrar, TransportError};
