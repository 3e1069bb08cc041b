//! # Event Bus
//!
//! A thread-safe, typed publish/subscribe bus. Channels are broadcast
//! (fan-out) and indexed by the event's [`TypeId`]; publishing an event type
//! nobody subscribed to is not an error, the event is simply dropped.
//!
//! Slices use this to stay decoupled: the POS slice publishes `SalesSynced`
//! after a webhook lands, and the ledger slice posts the matching journal
//! entry without either crate depending on the other.
//!
//! ## Example
//! ```rust
//! use brigade_events::EventBus;
//!
//! #[derive(Debug)]
//! struct SaleRecorded(u64);
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), brigade_events::EventBusError> {
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe::<SaleRecorded>()?;
//! bus.publish(SaleRecorded(42))?;
//! assert_eq!(rx.recv().await.unwrap().0, 42);
//! # Ok(())
//! # }
//! ```

mod error;

pub use error::EventBusError;

use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::trace;

/// A safe default for channel buffers; enough for domain events in a slice.
const DEFAULT_CAPACITY: usize = 128;

/// Marker trait for types that can travel across the [`EventBus`].
///
/// Blanket-implemented for every `Send + Sync + 'static` type.
pub trait Event: Any + Send + Sync + 'static {}
impl<T: Any + Send + Sync + 'static> Event for T {}

/// A thread-safe broadcast event bus keyed by event type.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    channels: Arc<RwLock<FxHashMap<TypeId, Box<dyn Any + Send + Sync>>>>,
}

impl EventBus {
    /// Creates a new, empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to events of type `T` with the default buffer capacity.
    ///
    /// # Errors
    /// Returns [`EventBusError::TypeMismatch`] if the stored sender for `T`
    /// has an unexpected type (indicates bus misuse across crate versions).
    pub fn subscribe<T: Event>(&self) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        self.subscribe_with_capacity::<T>(DEFAULT_CAPACITY)
    }

    /// Subscribes to events of type `T` with an explicit buffer capacity.
    ///
    /// The capacity is fixed by whichever call touches the channel first;
    /// later subscribers reuse the existing channel.
    ///
    /// # Errors
    /// Returns [`EventBusError::InvalidCapacity`] when `capacity` is zero, or
    /// [`EventBusError::TypeMismatch`] on a sender downcast failure.
    pub fn subscribe_with_capacity<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        Ok(self.sender::<T>(capacity)?.subscribe())
    }

    /// Publishes an event, returning how many subscribers received it.
    ///
    /// Zero subscribers is fine; the event is dropped with a trace log.
    ///
    /// # Errors
    /// Returns [`EventBusError::TypeMismatch`] on a sender downcast failure.
    pub fn publish<T: Event>(&self, event: T) -> Result<usize, EventBusError> {
        self.publish_arc(Arc::new(event))
    }

    /// Publishes an already-shared event without re-wrapping.
    ///
    /// # Errors
    /// Returns [`EventBusError::TypeMismatch`] on a sender downcast failure.
    pub fn publish_arc<T: Event>(&self, event: Arc<T>) -> Result<usize, EventBusError> {
        let sender = self.sender::<T>(DEFAULT_CAPACITY)?;
        match sender.send(event) {
            Ok(count) => {
                trace!(event = std::any::type_name::<T>(), count, "Event dispatched");
                Ok(count)
            },
            Err(_) => {
                trace!(event = std::any::type_name::<T>(), "Event dropped: no active subscribers");
                Ok(0)
            },
        }
    }

    /// Drops every channel, disconnecting all subscribers.
    ///
    /// Returns the number of channels that were closed.
    #[must_use]
    pub fn shutdown(&self) -> usize {
        let mut channels = self.channels.write();
        let count = channels.len();
        channels.clear();
        count
    }

    fn sender<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
        if capacity == 0 {
            return Err(EventBusError::InvalidCapacity);
        }

        let id = TypeId::of::<T>();

        // Fast path: channel already exists.
        {
            let channels = self.channels.read();
            if let Some(existing) = channels.get(&id) {
                return downcast_sender::<T>(existing);
            }
        }

        let mut channels = self.channels.write();
        let entry = channels.entry(id).or_insert_with(|| {
            trace!(event = std::any::type_name::<T>(), capacity, "Initializing event channel");
            let (tx, _) = broadcast::channel::<Arc<T>>(capacity);
            Box::new(tx)
        });
        downcast_sender::<T>(entry)
    }
}

fn downcast_sender<T: Event>(
    stored: &(dyn Any + Send + Sync),
) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
    stored
        .downcast_ref::<broadcast::Sender<Arc<T>>>()
        .cloned()
        .ok_or_else(|| EventBusError::TypeMismatch(std::any::type_name::<T>()))
}
