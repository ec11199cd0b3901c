//! In-flight request table (client side).
//!
//! Maps a correlation key to a pending slot consisting of the request
//! context and a single-shot delivery channel. A [`tokio::sync::oneshot`]
//! models the "1-buffered, single consumer" channel the original design
//! calls for directly: sending consumes the sender, so there's no need for
//! the original's separate `IsClosedOrDelivered` non-blocking-read check —
//! "already delivered" is simply `None` where a sender used to be.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, oneshot};
use tracing::debug;
use uuid::Uuid;

use crate::context::RequestContext;

struct Slot<M> {
    request_ctx_id: Uuid,
    sender: Option<oneshot::Sender<M>>,
}

/// Table of in-flight client transactions, keyed by correlation key.
///
/// Invariant: every key present has exactly one live slot; a key is removed
/// only by its originating `Wait` (or, on timeout, by the same `Wait`'s
/// deferred cleanup).
pub struct InFlightTable<M> {
    slots: RwLock<HashMap<String, Slot<M>>>,
}

impl<M> Default for InFlightTable<M> {
    fn default() -> Self {
        Self { slots: RwLock::default() }
    }
}

impl<M: Send + 'static> InFlightTable<M> {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pending slot at `key`, returning the receiving half of its
    /// delivery channel.
    ///
    /// If a slot already exists at `key` it is replaced — see the Open
    /// Question on re-issue vs. collision semantics in `DESIGN.md`.
    pub async fn add(self: &Arc<Self>, ctx: &RequestContext<M>, key: String) -> oneshot::Receiver<M> {
        let (tx, rx) = oneshot::channel();
        let mut slots = self.slots.write().await;
        slots.insert(key, Slot { request_ctx_id: ctx.id, sender: Some(tx) });
        rx
    }

    /// Remove the slot at `key`, if any.
    pub async fn remove(&self, key: &str) {
        self.slots.write().await.remove(key);
    }

    /// Deliver `message` to the slot at `key`, if one is present and has
    /// not already been satisfied.
    ///
    /// A missing or already-satisfied slot is logged at debug level and the
    /// message is dropped — this is the "unmatched response" / "duplicate
    /// response" path from the failure semantics table.
    pub async fn deliver(&self, key: &str, message: M) {
        let mut slots = self.slots.write().await;
        let Some(slot) = slots.get_mut(key) else {
            debug!(key, "unmatched response: no in-flight slot for key");
            return;
        };
        let Some(sender) = slot.sender.take() else {
            debug!(key, request_ctx_id = %slot.request_ctx_id, "duplicate response: slot already delivered");
            return;
        };
        if sender.send(message).is_err() {
            debug!(key, request_ctx_id = %slot.request_ctx_id, "delivery failed: waiter already gone");
        }
    }

    /// Number of slots currently registered (used by tests and metrics).
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    /// `true` if no slots are registered.
    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn deliver_wakes_the_waiter() {
        let table: Arc<InFlightTable<u32>> = Arc::new(InFlightTable::new());
        let ctx = RequestContext::new(Uuid::new_v4(), 1u32);
        let rx = table.add(&ctx, "key".to_string()).await;

        table.deliver("key", 42).await;

        let got = tokio::time::timeout(Duration::from_millis(100), rx).await;
        assert_eq!(got.expect("no timeout").expect("not dropped"), 42);
    }

    #[tokio::test]
    async fn second_delivery_to_the_same_key_is_dropped() {
        let table: Arc<InFlightTable<u32>> = Arc::new(InFlightTable::new());
        let ctx = RequestContext::new(Uuid::new_v4(), 1u32);
        let rx = table.add(&ctx, "key".to_string()).await;

        table.deliver("key", 1).await;
        table.deliver("key", 2).await;

        assert_eq!(rx.await.expect("not dropped"), 1);
    }

    #[tokio::test]
    async fn remove_drops_pending_slot() {
        let table: Arc<InFlightTable<u32>> = Arc::new(InFlightTable::new());
        let ctx = RequestContext::new(Uuid::new_v4(), 1u32);
        let _rx = table.add(&ctx, "key".to_string()).await;
        assert_eq!(table.len().await, 1);

        table.remove("key").await;
        assert!(table.is_empty().await);
    }

    #[tokio::test]
    async fn unmatched_delivery_is_a_no_op() {
        let table: Arc<InFlightTable<u32>> = Arc::new(InFlightTable::new());
        table.deliver("missing", 1).await;
        assert!(table.is_empty().await);
    }
}
