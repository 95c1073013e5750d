/*
[INPUT]:  A feed specification (key + unsubscription rules) and a transport
[OUTPUT]: Typed subscribe API on top of the generic registry
[POS]:    WebSocket layer - per-feed-family multiplexer
[UPDATE]: When adding feed families or changing subscribe flow
*/

use serde::Serialize;
use serde_json::Value;

use crate::http::Result;
use crate::ws::message::Channel;
use crate::ws::registry::{SubscriptionHandle, SubscriptionKey, SubscriptionRegistry};
use crate::ws::transport::Transport;

/// Rules that specialise the registry to one feed family
pub trait FeedSpec: Send + Sync + 'static {
    /// Full subscribe payload
    type Payload: Serialize;
    type Key: SubscriptionKey;
    /// Subset of the payload the backend needs to stop the feed
    type Unsubscription: Serialize;

    fn channel(&self) -> Channel;

    /// Reject payloads before anything is emitted
    fn validate(&self, payload: &Self::Payload) -> Result<()>;

    /// Pure function of the channel and the payload's identity fields
    fn channel_id(&self, payload: &Self::Payload) -> Self::Key;

    fn unsubscription_params(&self, payload: &Self::Payload) -> Self::Unsubscription;
}

/// Multiplexer for one feed family, owning its own registry
#[derive(Debug)]
pub struct Feed<F: FeedSpec, T> {
    spec: F,
    registry: SubscriptionRegistry<F::Key, T>,
}

impl<F: FeedSpec, T: Transport> Feed<F, T> {
    pub fn new(spec: F, transport: T) -> Self {
        let registry = SubscriptionRegistry::new(spec.channel(), transport);
        Self { spec, registry }
    }

    pub fn channel(&self) -> Channel {
        self.registry.channel()
    }

    pub fn spec(&self) -> &F {
        &self.spec
    }

    pub fn registry(&self) -> &SubscriptionRegistry<F::Key, T> {
        &self.registry
    }

    pub fn channel_id(&self, payload: &F::Payload) -> F::Key {
        self.spec.channel_id(payload)
    }

    /// Emit a subscribe message, then route messages for the payload's
    /// identifier to `callback`.
    ///
    /// A payload already subscribed replaces the previous callback.
    pub fn subscribe<C>(&self, payload: &F::Payload, callback: C) -> Result<SubscriptionHandle<F::Key, T>>
    where
        C: Fn(&Value) + Send + Sync + 'static,
    {
        self.spec.validate(payload)?;
        let key = self.spec.channel_id(payload);
        let subscribe_payload = serde_json::to_value(payload)?;
        let unsubscription_params = serde_json::to_value(self.spec.unsubscription_params(payload))?;

        self.registry.send_subscribe(subscribe_payload.clone())?;
        Ok(self
            .registry
            .add_subscription(key, unsubscription_params, subscribe_payload, callback))
    }

    pub fn unsubscribe_all(&self) -> Result<()> {
        self.registry.unsubscribe_all()
    }

    pub fn resubscribe_all(&self) -> Result<()> {
        self.registry.resubscribe_all()
    }

    pub fn handle_message(&self, message: &Value) -> bool {
        self.registry.handle_message(message)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}
