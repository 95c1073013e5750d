/*
[INPUT]:  Subscription keys, payloads, callbacks and inbound messages for one channel
[OUTPUT]: Control messages on the transport and callback invocations
[POS]:    WebSocket layer - channel-agnostic subscription bookkeeping and dispatch
[UPDATE]: When changing subscription lifecycle, dispatch or teardown semantics
*/

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::http::{OceanError, Result};
use crate::ws::message::{Channel, ControlMessage, SEND_CHANNEL, channel_id_of};
use crate::ws::transport::Transport;

/// Payload field asking the backend for a full initial state
pub const SNAPSHOT_FIELD: &str = "snapshot";

/// Callback invoked with every inbound message routed to a subscription
pub type Callback = Arc<dyn Fn(&Value) + Send + Sync>;

/// Identifier of one subscription within a channel.
///
/// `Display` must render the wire `channelId`, and `from_channel_id` must
/// recover the same key from it.
pub trait SubscriptionKey: Clone + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {
    fn from_channel_id(channel: Channel, channel_id: &str) -> Option<Self>;
}

struct Entry<K, T> {
    callback: Callback,
    handle: SubscriptionHandle<K, T>,
}

struct Shared<K, T> {
    channel: Channel,
    transport: T,
    subscriptions: Mutex<HashMap<K, Entry<K, T>>>,
}

impl<K: SubscriptionKey, T: Transport> Shared<K, T> {
    fn emit(&self, message: ControlMessage) -> Result<()> {
        self.transport.emit(SEND_CHANNEL, &message)
    }
}

/// Active subscriptions of one channel bound to one transport.
///
/// The map is guarded by a mutex, but callbacks run after the lock is
/// released so they may subscribe or unsubscribe re-entrantly.
pub struct SubscriptionRegistry<K, T> {
    shared: Arc<Shared<K, T>>,
}

impl<K: SubscriptionKey, T: Transport> SubscriptionRegistry<K, T> {
    pub fn new(channel: Channel, transport: T) -> Self {
        Self {
            shared: Arc::new(Shared {
                channel,
                transport,
                subscriptions: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn channel(&self) -> Channel {
        self.shared.channel
    }

    pub fn transport(&self) -> &T {
        &self.shared.transport
    }

    /// Emit `{type: subscribe, channel, payload}`. Registers nothing.
    pub fn send_subscribe(&self, payload: Value) -> Result<()> {
        let message = ControlMessage::subscribe(self.shared.channel, payload);
        debug!(channel = %self.shared.channel, payload = %message.payload, "subscribing");
        self.shared.emit(message)
    }

    /// Store a subscription under `key`, replacing any record already there.
    ///
    /// `unsubscription_params` is sent verbatim on unsubscribe;
    /// `subscribe_payload` is re-sent with the snapshot flag cleared on resubscribe.
    pub fn add_subscription<F>(
        &self,
        key: K,
        unsubscription_params: Value,
        subscribe_payload: Value,
        callback: F,
    ) -> SubscriptionHandle<K, T>
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let handle = SubscriptionHandle {
            key: key.clone(),
            channel: self.shared.channel,
            unsubscription_params,
            subscribe_payload,
            registry: Arc::downgrade(&self.shared),
        };
        let entry = Entry {
            callback: Arc::new(callback),
            handle: handle.clone(),
        };

        let replaced = self.shared.subscriptions.lock().insert(key, entry);
        if replaced.is_some() {
            debug!(channel = %self.shared.channel, channel_id = %handle.key, "replaced existing subscription");
        }
        handle
    }

    /// Unsubscribe every record once, then leave the registry empty.
    ///
    /// Emission continues past failures; the first one is returned.
    pub fn unsubscribe_all(&self) -> Result<()> {
        let drained: Vec<SubscriptionHandle<K, T>> = {
            let mut subscriptions = self.shared.subscriptions.lock();
            subscriptions.drain().map(|(_, entry)| entry.handle).collect()
        };

        let mut first_error = None;
        for handle in drained {
            if let Err(err) = handle.emit_unsubscribe(&self.shared) {
                warn!(channel = %self.shared.channel, channel_id = %handle.key, error = %err, "unsubscribe emit failed");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Resubscribe every record without touching the registry.
    pub fn resubscribe_all(&self) -> Result<()> {
        let mut first_error = None;
        for handle in self.handles() {
            if let Err(err) = handle.resubscribe() {
                warn!(channel = %self.shared.channel, channel_id = %handle.key, error = %err, "resubscribe emit failed");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Route one inbound message to its subscriber.
    ///
    /// Returns `false` when nothing is registered for the message's `channelId`;
    /// such messages are dropped.
    pub fn handle_message(&self, message: &Value) -> bool {
        let channel = self.shared.channel;
        let Some(channel_id) = channel_id_of(message) else {
            debug!(%channel, "received message without channel id");
            return false;
        };

        let callback = K::from_channel_id(channel, channel_id).and_then(|key| {
            self.shared
                .subscriptions
                .lock()
                .get(&key)
                .map(|entry| entry.callback.clone())
        });

        match callback {
            Some(callback) => {
                callback(message);
                true
            }
            None => {
                debug!(%channel, channel_id, "no handler for message");
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.shared.subscriptions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.subscriptions.lock().is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.shared.subscriptions.lock().contains_key(key)
    }

    /// Handles of every live subscription, in no particular order
    pub fn handles(&self) -> Vec<SubscriptionHandle<K, T>> {
        self.shared
            .subscriptions
            .lock()
            .values()
            .map(|entry| entry.handle.clone())
            .collect()
    }
}

impl<K, T> fmt::Debug for SubscriptionRegistry<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionRegistry")
            .field("channel", &self.shared.channel)
            .field("subscriptions", &self.shared.subscriptions.lock().len())
            .finish()
    }
}

/// Unsubscribe/resubscribe actions of one subscription.
///
/// Holds only a weak reference to its registry; once the registry is
/// dropped both actions fail with `StreamClosed`.
pub struct SubscriptionHandle<K, T> {
    key: K,
    channel: Channel,
    unsubscription_params: Value,
    subscribe_payload: Value,
    registry: Weak<Shared<K, T>>,
}

impl<K: SubscriptionKey, T: Transport> SubscriptionHandle<K, T> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn unsubscription_params(&self) -> &Value {
        &self.unsubscription_params
    }

    pub fn subscribe_payload(&self) -> &Value {
        &self.subscribe_payload
    }

    /// Whether a record is currently registered under this handle's key
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|shared| shared.subscriptions.lock().contains_key(&self.key))
    }

    /// Emit `{type: unsubscribe}` with the stored params and drop the record.
    ///
    /// Emits on every call; removing an absent record is a no-op.
    /// Removal is by key, so a handle kept from a replaced subscription
    /// removes whichever record now holds that key.
    pub fn unsubscribe(&self) -> Result<()> {
        let shared = self.registry.upgrade().ok_or(OceanError::StreamClosed)?;
        self.emit_unsubscribe(&shared)?;
        shared.subscriptions.lock().remove(&self.key);
        Ok(())
    }

    /// Re-emit the original subscribe payload with `snapshot: false`.
    pub fn resubscribe(&self) -> Result<()> {
        let shared = self.registry.upgrade().ok_or(OceanError::StreamClosed)?;
        let payload = without_snapshot(&self.subscribe_payload);
        debug!(channel = %self.channel, channel_id = %self.key, %payload, "resubscribing");
        shared.emit(ControlMessage::subscribe(self.channel, payload))
    }

    fn emit_unsubscribe(&self, shared: &Shared<K, T>) -> Result<()> {
        debug!(channel = %self.channel, channel_id = %self.key, params = %self.unsubscription_params, "unsubscribing");
        shared.emit(ControlMessage::unsubscribe(
            self.channel,
            self.unsubscription_params.clone(),
        ))
    }
}

impl<K: Clone, T> Clone for SubscriptionHandle<K, T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            channel: self.channel,
            unsubscription_params: self.unsubscription_params.clone(),
            subscribe_payload: self.subscribe_payload.clone(),
            registry: self.registry.clone(),
        }
    }
}

impl<K: fmt::Debug, T> fmt::Debug for SubscriptionHandle<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("key", &self.key)
            .field("channel", &self.channel)
            .field("unsubscription_params", &self.unsubscription_params)
            .finish()
    }
}

fn without_snapshot(payload: &Value) -> Value {
    let mut payload = payload.clone();
    if let Value::Object(fields) = &mut payload {
        fields.insert(SNAPSHOT_FIELD.to_string(), Value::Bool(false));
    }
    payload
}
