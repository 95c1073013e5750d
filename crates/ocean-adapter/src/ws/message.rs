/*
[INPUT]:  Channel names and subscription payloads
[OUTPUT]: Outbound control messages and inbound event envelopes
[POS]:    WebSocket layer - wire shapes shared by transport and multiplexer
[UPDATE]: When adding new channels or changing control message format
*/

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::OceanError;

/// Transport event name every control message is emitted on
pub const SEND_CHANNEL: &str = "message";

/// Inbound field naming the subscription a message belongs to
pub const CHANNEL_ID_FIELD: &str = "channelId";

/// Feed family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    #[serde(rename = "orderbook")]
    OrderBook,
    #[serde(rename = "trade_history")]
    TradeHistory,
    #[serde(rename = "ticker")]
    Ticker,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::OrderBook, Channel::TradeHistory, Channel::Ticker];

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::OrderBook => "orderbook",
            Channel::TradeHistory => "trade_history",
            Channel::Ticker => "ticker",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|channel| channel.as_str() == name)
    }
}

impl std::str::FromStr for Channel {
    type Err = OceanError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_name(value).ok_or_else(|| OceanError::invalid_input(format!("unknown channel: {value}")))
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlType {
    Subscribe,
    Unsubscribe,
}

/// `{type, channel, payload}` sent to the backend to start or stop a feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlMessage {
    #[serde(rename = "type")]
    pub kind: ControlType,
    pub channel: Channel,
    pub payload: Value,
}

impl ControlMessage {
    pub fn subscribe(channel: Channel, payload: Value) -> Self {
        Self {
            kind: ControlType::Subscribe,
            channel,
            payload,
        }
    }

    pub fn unsubscribe(channel: Channel, payload: Value) -> Self {
        Self {
            kind: ControlType::Unsubscribe,
            channel,
            payload,
        }
    }
}

/// One named message delivered by the transport
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub event: String,
    pub data: Value,
}

impl InboundEvent {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    /// The routing field, when present and a string
    pub fn channel_id(&self) -> Option<&str> {
        channel_id_of(&self.data)
    }
}

pub(crate) fn channel_id_of(message: &Value) -> Option<&str> {
    message.get(CHANNEL_ID_FIELD).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_control_message_wire_shape() {
        let message = ControlMessage::subscribe(
            Channel::OrderBook,
            json!({"baseTokenAddress": "0xAAA", "quoteTokenAddress": "0xBBB"}),
        );
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "type": "subscribe",
                "channel": "orderbook",
                "payload": {"baseTokenAddress": "0xAAA", "quoteTokenAddress": "0xBBB"}
            })
        );
    }

    #[test]
    fn test_channel_names_round_trip_through_from_name() {
        for channel in Channel::ALL {
            assert_eq!(Channel::from_name(channel.as_str()), Some(channel));
            assert_eq!(
                serde_json::to_value(channel).unwrap(),
                Value::String(channel.to_string())
            );
        }
        assert_eq!(Channel::from_name("candles"), None);
        assert_eq!("trade_history".parse::<Channel>().unwrap(), Channel::TradeHistory);
        assert!("candles".parse::<Channel>().unwrap_err().is_input_error());
    }

    #[test]
    fn test_inbound_channel_id() {
        let event = InboundEvent::new("orderbook", json!({"channelId": "orderbook_0xAAA_0xBBB"}));
        assert_eq!(event.channel_id(), Some("orderbook_0xAAA_0xBBB"));

        let missing = InboundEvent::new("orderbook", json!({"channelId": 7}));
        assert_eq!(missing.channel_id(), None);
    }
}
