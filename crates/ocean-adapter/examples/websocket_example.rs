/*
[INPUT]:  Socket URL and a token pair
[OUTPUT]: Order book updates routed to a callback
[POS]:    Examples - subscription multiplexer over a live socket
[UPDATE]: When WebSocket API changes
*/

use std::sync::Arc;

use ocean_adapter::*;
use tokio::time::{Duration, timeout};

/// Example: one socket, one order book subscription
#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Ocean WebSocket Example ===\n");

    let config = OceanConfig::default();
    let mut ws = OceanWebSocket::new();
    let mut events = ws.take_receiver().ok_or(OceanError::NotConnected)?;
    ws.connect(config.ws_base_url()?.as_str()).await?;
    println!("✓ Connected");

    let ws = Arc::new(ws);
    let streams = OceanStreams::new(ws.clone());
    let pair = PairSubscription::new(
        "0xe41d2489571d322189246dafa5ebde1f4699f498",
        "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
    );
    streams.order_book.subscribe(&pair, |message| {
        println!("order book update: {}", message);
    })?;
    println!("✓ Subscribed to {}", streams.order_book.channel_id(&pair));

    // Route whatever arrives in the next 10 seconds.
    while let Ok(Some(event)) = timeout(Duration::from_secs(10), events.recv()).await {
        streams.route(&event);
    }

    streams.unsubscribe_all()?;
    ws.close();
    println!("\n✓ WebSocket example complete");
    Ok(())
}
