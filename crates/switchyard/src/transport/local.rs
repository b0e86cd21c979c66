//! In-process transport binding listeners to channel names.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{self, BoxFuture, FutureExt};
use serde_json::Value;
use tracing::debug;

use crate::dispatch::DispatchError;

use super::errors::TransportError;
use super::{Invoker, Listener, Registrar, TRANSPORT_TARGET};

/// Event handed to listeners registered on a [`LocalBus`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvokeEvent {
    channel: String,
    request_id: u64,
}

impl InvokeEvent {
    /// Returns the channel the request arrived on.
    #[must_use]
    pub fn channel(&self) -> &str {
        self.channel.as_str()
    }

    /// Returns the bus-wide sequence number of the request.
    #[must_use]
    pub const fn request_id(&self) -> u64 {
        self.request_id
    }
}

type ListenerTable = HashMap<String, Listener<InvokeEvent>>;

/// Request/response bus shared by clients and servers in one process.
///
/// Clones share the same listener table. At most one listener answers each
/// channel. The table lock is released before a listener runs, so listeners
/// may register or remove handlers, their own channel included.
#[derive(Clone, Default)]
pub struct LocalBus {
    inner: Arc<BusInner>,
}

#[derive(Default)]
struct BusInner {
    listeners: Mutex<ListenerTable>,
    next_request: AtomicU64,
}

impl LocalBus {
    /// Creates a bus with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when a listener answers `channel`.
    #[must_use]
    pub fn is_registered(&self, channel: &str) -> bool {
        self.lock(channel)
            .map(|table| table.contains_key(channel))
            .unwrap_or(false)
    }

    /// Returns the channels with a listener, sorted.
    #[must_use]
    pub fn channels(&self) -> Vec<String> {
        let Ok(table) = self.inner.listeners.lock() else {
            return Vec::new();
        };
        let mut channels: Vec<_> = table.keys().cloned().collect();
        channels.sort_unstable();
        channels
    }

    fn lock(&self, channel: &str) -> Result<MutexGuard<'_, ListenerTable>, TransportError> {
        self.inner
            .listeners
            .lock()
            .map_err(|_| TransportError::poisoned(channel))
    }

    fn listener(&self, channel: &str) -> Result<Listener<InvokeEvent>, TransportError> {
        let table = self.lock(channel)?;
        table
            .get(channel)
            .map(Arc::clone)
            .ok_or_else(|| TransportError::no_handler(channel))
    }
}

impl Invoker for LocalBus {
    fn invoke(&self, channel: &str, request: Value) -> BoxFuture<'static, Result<Value, TransportError>> {
        let listener = match self.listener(channel) {
            Ok(listener) => listener,
            Err(error) => return future::ready(Err(error)).boxed(),
        };
        let event = InvokeEvent {
            channel: channel.to_owned(),
            request_id: self.inner.next_request.fetch_add(1, Ordering::Relaxed),
        };
        debug!(
            target: TRANSPORT_TARGET,
            channel,
            request_id = event.request_id,
            "delivering request"
        );
        let owned_channel = channel.to_owned();
        listener(event, request)
            .map(move |response| response.map_err(|error| reject(owned_channel, &error)))
            .boxed()
    }
}

impl Registrar for LocalBus {
    type Event = InvokeEvent;

    fn handle(&self, channel: &str, listener: Listener<InvokeEvent>) -> Result<(), TransportError> {
        let mut table = self.lock(channel)?;
        if table.contains_key(channel) {
            return Err(TransportError::already_registered(channel));
        }
        table.insert(channel.to_owned(), listener);
        debug!(target: TRANSPORT_TARGET, channel, "listener registered");
        Ok(())
    }

    fn remove_handler(&self, channel: &str) -> Result<(), TransportError> {
        let removed = self.lock(channel)?.remove(channel);
        if removed.is_some() {
            debug!(target: TRANSPORT_TARGET, channel, "listener removed");
        }
        Ok(())
    }
}

impl fmt::Debug for LocalBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalBus")
            .field("channels", &self.channels())
            .finish_non_exhaustive()
    }
}

/// Converts a listener rejection into the error an invoker reports.
///
/// A spent single-use listener reports the channel as unhandled, matching
/// what an invoker sees once the listener is gone from the table.
fn reject(channel: String, error: &DispatchError) -> TransportError {
    match error {
        DispatchError::Unavailable { .. } => TransportError::NoHandler { channel },
        other => TransportError::Rejected {
            channel,
            message: other.to_string(),
        },
    }
}
