use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;
use serde_json::json;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::events::types::{ClientIdentity, Envelope, EventName};
use crate::models::enums::ClientRole;

struct ClientHandle {
    identity: ClientIdentity,
    sender: mpsc::Sender<Envelope>,
}

/// Fan-out hub for server-sent events. Owned by `AppState`; handlers and
/// services publish through it, the SSE route registers subscribers.
///
/// Delivery is fire-and-forget and at most once: a subscriber whose
/// queue is full or whose receiver is gone is dropped from the registry
/// on the spot, and nothing is buffered or replayed for it.
pub struct EventBroker {
    clients: DashMap<Uuid, ClientHandle>,
    queue_capacity: usize,
}

impl EventBroker {
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            clients: DashMap::new(),
            queue_capacity,
        }
    }

    /// Adds a subscriber and hands back its id and event queue. The
    /// `connected` event is already waiting in the queue on return.
    pub fn register(&self, identity: ClientIdentity) -> (Uuid, mpsc::Receiver<Envelope>) {
        let id = Uuid::new_v4();
        let (sender, receiver) = mpsc::channel(self.queue_capacity);

        // Fresh channel with capacity >= 1, cannot fail.
        let _ = sender.try_send(Envelope {
            event: EventName::Connected,
            payload: json!({ "client_id": id }).to_string(),
        });

        self.clients.insert(id, ClientHandle { identity, sender });
        info!(client_id = %id, ?identity, "Event stream client registered");
        (id, receiver)
    }

    pub fn unregister(&self, id: Uuid) {
        if self.clients.remove(&id).is_some() {
            info!(client_id = %id, "Event stream client unregistered");
        }
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    pub fn broadcast<T: Serialize>(&self, event: EventName, payload: &T) -> usize {
        self.deliver_if(event, payload, |_| true)
    }

    pub fn deliver_to_role<T: Serialize>(
        &self,
        role: ClientRole,
        event: EventName,
        payload: &T,
    ) -> usize {
        self.deliver_if(event, payload, |identity| identity.role == role)
    }

    pub fn deliver_to_member<T: Serialize>(
        &self,
        member_id: i32,
        event: EventName,
        payload: &T,
    ) -> usize {
        self.deliver_if(event, payload, |identity| {
            identity.role == ClientRole::Member && identity.user_id == Some(member_id)
        })
    }

    pub fn deliver_to_vendor<T: Serialize>(
        &self,
        vendor_id: i32,
        event: EventName,
        payload: &T,
    ) -> usize {
        self.deliver_if(event, payload, |identity| {
            identity.role == ClientRole::Partner && identity.vendor_id == Some(vendor_id)
        })
    }

    /// Serializes once, then queues the envelope to every subscriber the
    /// filter accepts. Returns how many queues accepted it. Subscribers
    /// that refuse the send (queue full or receiver dropped) are evicted.
    fn deliver_if<T, F>(&self, event: EventName, payload: &T, filter: F) -> usize
    where
        T: Serialize,
        F: Fn(&ClientIdentity) -> bool,
    {
        let payload = match serde_json::to_string(payload) {
            Ok(p) => p,
            Err(e) => {
                error!(%event, "Failed to serialize event payload: {}", e);
                return 0;
            }
        };

        let mut delivered = 0;
        let mut dead = Vec::new();

        for entry in self.clients.iter() {
            if !filter(&entry.identity) {
                continue;
            }
            let envelope = Envelope {
                event,
                payload: payload.clone(),
            };
            match entry.sender.try_send(envelope) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    debug!(client_id = %entry.key(), %event, "Dropping client: {}", e);
                    dead.push(*entry.key());
                }
            }
        }

        // Removal happens after iteration; removing mid-iteration would
        // contend on the shard lock held by the iterator.
        for id in dead {
            self.unregister(id);
        }

        delivered
    }

    /// Periodic keep-alive broadcast. Carries no payload; its second job
    /// is flushing dead subscribers out of the registry, since a failed
    /// send unregisters.
    pub fn spawn_heartbeat(broker: Arc<Self>, interval_secs: u64) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(interval_secs.max(1)));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let reached = broker.broadcast(EventName::Heartbeat, &json!({}));
                debug!(reached, "Heartbeat broadcast");
            }
        })
    }
}
