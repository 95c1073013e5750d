/*
[INPUT]:  Base/quote token addresses and optional feed-selection fields
[OUTPUT]: Pair-keyed order book, trade history and ticker multiplexers
[POS]:    WebSocket layer - token-pair feed family
[UPDATE]: When changing pair identifiers or subscribe payload fields
*/

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::http::{OceanError, Result};
use crate::types::TokenPair;
use crate::ws::feed::{Feed, FeedSpec};
use crate::ws::message::Channel;
use crate::ws::registry::{SNAPSHOT_FIELD, SubscriptionHandle, SubscriptionKey};
use crate::ws::transport::Transport;

/// Separator of the wire `channelId`; token addresses may not contain it
const ID_SEPARATOR: char = '_';

/// Payload keys owned by the typed fields; `extra` may not shadow them
const RESERVED_FIELDS: [&str; 3] = ["baseTokenAddress", "quoteTokenAddress", SNAPSHOT_FIELD];

/// Identifier of a pair subscription within a channel
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairChannelId {
    pub channel: Channel,
    pub base_token_address: String,
    pub quote_token_address: String,
}

impl PairChannelId {
    pub fn new(channel: Channel, pair: &TokenPair) -> Self {
        Self {
            channel,
            base_token_address: pair.base_token_address.clone(),
            quote_token_address: pair.quote_token_address.clone(),
        }
    }

    pub fn pair(&self) -> TokenPair {
        TokenPair::new(&self.base_token_address, &self.quote_token_address)
    }
}

impl fmt::Display for PairChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.channel,
            self.base_token_address,
            self.quote_token_address,
            sep = ID_SEPARATOR
        )
    }
}

impl SubscriptionKey for PairChannelId {
    fn from_channel_id(channel: Channel, channel_id: &str) -> Option<Self> {
        let rest = channel_id
            .strip_prefix(channel.as_str())?
            .strip_prefix(ID_SEPARATOR)?;
        let (base, quote) = rest.split_once(ID_SEPARATOR)?;
        if base.is_empty() || quote.is_empty() || quote.contains(ID_SEPARATOR) {
            return None;
        }
        Some(Self {
            channel,
            base_token_address: base.to_string(),
            quote_token_address: quote.to_string(),
        })
    }
}

/// Subscribe payload for a pair feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairSubscription {
    pub base_token_address: String,
    pub quote_token_address: String,
    /// Ask for a full initial snapshot
    #[serde(default = "default_snapshot")]
    pub snapshot: bool,
    /// Other feed-selection fields, forwarded untouched; must not repeat a typed key
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PairSubscription {
    pub fn new(base_token_address: impl Into<String>, quote_token_address: impl Into<String>) -> Self {
        Self {
            base_token_address: base_token_address.into(),
            quote_token_address: quote_token_address.into(),
            snapshot: default_snapshot(),
            extra: Map::new(),
        }
    }

    pub fn with_snapshot(mut self, snapshot: bool) -> Self {
        self.snapshot = snapshot;
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    pub fn pair(&self) -> TokenPair {
        TokenPair::new(&self.base_token_address, &self.quote_token_address)
    }
}

impl From<TokenPair> for PairSubscription {
    fn from(pair: TokenPair) -> Self {
        Self::new(pair.base_token_address, pair.quote_token_address)
    }
}

fn default_snapshot() -> bool {
    true
}

/// Feed family keyed by (channel, base token, quote token)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairFeed {
    channel: Channel,
}

impl PairFeed {
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }
}

impl FeedSpec for PairFeed {
    type Payload = PairSubscription;
    type Key = PairChannelId;
    type Unsubscription = TokenPair;

    fn channel(&self) -> Channel {
        self.channel
    }

    fn validate(&self, payload: &PairSubscription) -> Result<()> {
        let pair = payload.pair();
        pair.validate()?;
        for address in [&pair.base_token_address, &pair.quote_token_address] {
            if address.contains(ID_SEPARATOR) {
                return Err(OceanError::invalid_input(format!(
                    "token address {address:?} must not contain {ID_SEPARATOR:?}"
                )));
            }
        }
        if let Some(field) = RESERVED_FIELDS
            .into_iter()
            .find(|field| payload.extra.contains_key(*field))
        {
            return Err(OceanError::invalid_input(format!(
                "extra field {field:?} would override the typed subscription field"
            )));
        }
        Ok(())
    }

    fn channel_id(&self, payload: &PairSubscription) -> PairChannelId {
        PairChannelId::new(self.channel, &payload.pair())
    }

    fn unsubscription_params(&self, payload: &PairSubscription) -> TokenPair {
        payload.pair()
    }
}

/// Pair-keyed multiplexer over a shared transport
pub type PairStream<T> = Feed<PairFeed, T>;

/// Handle type returned by pair streams
pub type PairHandle<T> = SubscriptionHandle<PairChannelId, T>;

/// One live pair subscription, as reported by [`Feed::subscriptions`]
#[derive(Debug)]
pub struct PairSubscriptionInfo<T> {
    pub base_token_address: String,
    pub quote_token_address: String,
    pub handle: PairHandle<T>,
}

impl<T: Transport> PairSubscriptionInfo<T> {
    pub fn unsubscribe(&self) -> Result<()> {
        self.handle.unsubscribe()
    }

    pub fn resubscribe(&self) -> Result<()> {
        self.handle.resubscribe()
    }
}

impl<T: Transport> Feed<PairFeed, T> {
    pub fn order_book(transport: T) -> Self {
        Self::new(PairFeed::new(Channel::OrderBook), transport)
    }

    pub fn trade_history(transport: T) -> Self {
        Self::new(PairFeed::new(Channel::TradeHistory), transport)
    }

    pub fn ticker(transport: T) -> Self {
        Self::new(PairFeed::new(Channel::Ticker), transport)
    }

    /// Every live subscription with its token pair and actions
    pub fn subscriptions(&self) -> Vec<PairSubscriptionInfo<T>> {
        self.registry()
            .handles()
            .into_iter()
            .map(|handle| PairSubscriptionInfo {
                base_token_address: handle.key().base_token_address.clone(),
                quote_token_address: handle.key().quote_token_address.clone(),
                handle,
            })
            .collect()
    }
}
