/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Ocean adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod config;
pub mod http;
pub mod types;
pub mod ws;

pub use config::{ApiEndpoints, Network, OceanConfig};

// Re-export commonly used types from http
pub use http::{ClientConfig, OceanClient, OceanError, Result};

// Re-export all types
pub use types::*;

// Re-export commonly used types from ws
pub use ws::{
    Channel,
    ConnectionState,
    ControlMessage,
    ControlType,
    Feed,
    FeedSpec,
    InboundEvent,
    MemoryTransport,
    OceanStreams,
    OceanWebSocket,
    PairChannelId,
    PairFeed,
    PairHandle,
    PairStream,
    PairSubscription,
    PairSubscriptionInfo,
    SubscriptionHandle,
    SubscriptionKey,
    SubscriptionRegistry,
    Transport,
};
