/*
[INPUT]:  Socket connection and per-feed subscription requests
[OUTPUT]: Identifiable, resumable topic subscriptions over one connection
[POS]:    WebSocket layer - real-time subscription multiplexing
[UPDATE]: When adding new feed families or changing connection logic
*/

pub mod client;
pub mod feed;
pub mod message;
pub mod pairs;
pub mod registry;
pub mod streams;
pub mod transport;

pub use client::{ConnectionState, OceanWebSocket};
pub use feed::{Feed, FeedSpec};
pub use message::{CHANNEL_ID_FIELD, Channel, ControlMessage, ControlType, InboundEvent, SEND_CHANNEL};
pub use pairs::{PairChannelId, PairFeed, PairHandle, PairStream, PairSubscription, PairSubscriptionInfo};
pub use registry::{Callback, SNAPSHOT_FIELD, SubscriptionHandle, SubscriptionKey, SubscriptionRegistry};
pub use streams::OceanStreams;
pub use transport::{MemoryTransport, Transport};
