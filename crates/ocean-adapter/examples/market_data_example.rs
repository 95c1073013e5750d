/*
[INPUT]:  Token pair addresses
[OUTPUT]: Market data (pairs, tickers, order book)
[POS]:    Examples - public market data queries
[UPDATE]: When adding new market data endpoints
*/

use ocean_adapter::*;

/// Example: Query market data over REST
#[tokio::main]
async fn main() {
    println!("=== Ocean Market Data Example ===\n");

    let client = match OceanClient::new() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };
    println!("✓ HTTP client created\n");

    println!("Querying token pairs...");
    match client.get_pairs().await {
        Ok(pairs) => println!("✓ Pairs: {}", pairs),
        Err(e) => println!("✗ Error: {}", e),
    }

    println!("\nQuerying tickers...");
    match client.get_tickers().await {
        Ok(tickers) => println!("✓ Tickers: {}", tickers),
        Err(e) => println!("✗ Error: {}", e),
    }

    let query = OrderBookQuery {
        pair: TokenPair::new(
            "0xe41d2489571d322189246dafa5ebde1f4699f498",
            "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
        ),
        depth: Some(10),
    };
    println!("\nQuerying order book...");
    match client.get_order_book(&query).await {
        Ok(book) => println!("✓ Order book: {}", book),
        Err(e) => println!("✗ Error: {}", e),
    }

    println!("\n✓ Market data example complete");
}
