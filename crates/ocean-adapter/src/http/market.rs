/*
[INPUT]:  Token pairs, order hashes and query parameters
[OUTPUT]: Market data (pairs, tickers, order book, trades, candlesticks, orders, balances)
[POS]:    HTTP layer - read-only market endpoints
[UPDATE]: When adding new endpoints or changing query parameters
*/

use crate::http::{OceanError, OceanClient, Result};
use crate::types::{BalanceQuery, CandlestickQuery, OrderBookQuery, TokenPair};
use reqwest::Method;
use serde_json::Value;

impl OceanClient {
    /// List tradable token pairs
    ///
    /// GET {token_pairs}
    pub async fn get_pairs(&self) -> Result<Value> {
        let builder = self.request(Method::GET, &self.config().endpoints.token_pairs)?;
        self.send_json(builder).await
    }

    /// Ticker for a single pair
    ///
    /// GET {ticker}?baseTokenAddress=..&quoteTokenAddress=..
    pub async fn get_ticker(&self, pair: &TokenPair) -> Result<Value> {
        let builder = self
            .request(Method::GET, &self.config().endpoints.ticker)?
            .query(pair);
        self.send_json(builder).await
    }

    /// Tickers for every pair
    ///
    /// GET {tickers}
    pub async fn get_tickers(&self) -> Result<Value> {
        let builder = self.request(Method::GET, &self.config().endpoints.tickers)?;
        self.send_json(builder).await
    }

    /// Order book snapshot
    ///
    /// GET {order_book}?baseTokenAddress=..&quoteTokenAddress=..&depth=..
    pub async fn get_order_book(&self, query: &OrderBookQuery) -> Result<Value> {
        query.pair.validate()?;
        let builder = self
            .request(Method::GET, &self.config().endpoints.order_book)?
            .query(query);
        self.send_json(builder).await
    }

    /// Recent trades for a pair
    ///
    /// GET {trade_history}?baseTokenAddress=..&quoteTokenAddress=..
    pub async fn get_trade_history(&self, pair: &TokenPair) -> Result<Value> {
        let builder = self
            .request(Method::GET, &self.config().endpoints.trade_history)?
            .query(pair);
        self.send_json(builder).await
    }

    /// Candlestick series over a time range
    ///
    /// GET {candlesticks}?baseTokenAddress=..&quoteTokenAddress=..&startTime=..&endTime=..&interval=..
    pub async fn get_candlesticks(&self, query: &CandlestickQuery) -> Result<Value> {
        query.validate()?;
        let builder = self
            .request(Method::GET, &self.config().endpoints.candlesticks)?
            .query(query);
        self.send_json(builder).await
    }

    /// Order details by hash
    ///
    /// GET {order_info}/{order_hash}
    pub async fn get_order_info(&self, order_hash: &str) -> Result<Value> {
        if order_hash.trim().is_empty() {
            return Err(OceanError::invalid_input("order hash must not be empty"));
        }
        let builder = self.request_with_segment(
            Method::GET,
            &self.config().endpoints.order_info,
            order_hash,
        )?;
        self.send_json(builder).await
    }

    /// Balance of a token available for trading
    ///
    /// GET {available_balance}?tokenAddress=..&userAddress=..
    pub async fn get_available_balance(&self, query: &BalanceQuery) -> Result<Value> {
        let builder = self
            .request(Method::GET, &self.config().endpoints.available_balance)?
            .query(query);
        self.send_json(builder).await
    }
}

#[cfg(test)]
mod tests {
    use crate::http::{OceanClient, OceanError};
    use crate::types::{BalanceQuery, CandlestickQuery, OrderBookQuery, TokenPair};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OceanClient {
        OceanClient::with_base_url(&server.uri()).expect("client init")
    }

    #[tokio::test]
    async fn test_get_pairs() {
        let server = MockServer::start().await;
        let body = serde_json::json!([
            {
                "baseToken": {"address": "0xAAA", "symbol": "ZRX", "decimals": "18"},
                "quoteToken": {"address": "0xBBB", "symbol": "WETH", "decimals": "18"}
            }
        ]);

        Mock::given(method("GET"))
            .and(path("/token_pairs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server).get_pairs().await.expect("get_pairs failed");
        assert_eq!(response, body);
    }

    #[tokio::test]
    async fn test_get_order_book_forwards_pair_and_depth() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "bids": [{"price": "0.0021", "amount": "100"}],
            "asks": [{"price": "0.0022", "amount": "50"}]
        });

        Mock::given(method("GET"))
            .and(path("/order_book"))
            .and(query_param("baseTokenAddress", "0xAAA"))
            .and(query_param("quoteTokenAddress", "0xBBB"))
            .and(query_param("depth", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let query = OrderBookQuery {
            pair: TokenPair::new("0xAAA", "0xBBB"),
            depth: Some(20),
        };
        let response = client_for(&server)
            .get_order_book(&query)
            .await
            .expect("get_order_book failed");
        assert_eq!(response, body);
    }

    #[tokio::test]
    async fn test_get_order_book_rejects_empty_token_before_io() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let query = OrderBookQuery {
            pair: TokenPair::new("", "0xBBB"),
            depth: None,
        };
        let err = client_for(&server).get_order_book(&query).await.unwrap_err();
        assert!(err.is_input_error());
    }

    #[tokio::test]
    async fn test_get_candlesticks() {
        let server = MockServer::start().await;
        let body = serde_json::json!([{"open": "1", "close": "2", "startBlock": 10}]);

        Mock::given(method("GET"))
            .and(path("/candlesticks"))
            .and(query_param("baseTokenAddress", "0xAAA"))
            .and(query_param("quoteTokenAddress", "0xBBB"))
            .and(query_param("startTime", "1700000000"))
            .and(query_param("endTime", "1700003600"))
            .and(query_param("interval", "300"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let query = CandlestickQuery {
            pair: TokenPair::new("0xAAA", "0xBBB"),
            start_time: 1_700_000_000,
            end_time: 1_700_003_600,
            interval: 300,
        };
        let response = client_for(&server)
            .get_candlesticks(&query)
            .await
            .expect("get_candlesticks failed");
        assert_eq!(response, body);
    }

    #[tokio::test]
    async fn test_get_order_info_appends_hash_segment() {
        let server = MockServer::start().await;
        let body = serde_json::json!({"orderHash": "0xfeed", "status": "open"});

        Mock::given(method("GET"))
            .and(path("/order/0xfeed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .get_order_info("0xfeed")
            .await
            .expect("get_order_info failed");
        assert_eq!(response, body);
    }

    #[tokio::test]
    async fn test_get_available_balance() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/available_balance"))
            .and(query_param("tokenAddress", "0xAAA"))
            .and(query_param("userAddress", "0xC0FFEE"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"availableBalance": "42"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let query = BalanceQuery {
            token_address: "0xAAA".to_string(),
            user_address: "0xC0FFEE".to_string(),
        };
        let response = client_for(&server)
            .get_available_balance(&query)
            .await
            .expect("get_available_balance failed");
        assert_eq!(response["availableBalance"], "42");
    }

    #[tokio::test]
    async fn test_non_success_status_maps_to_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/tickers"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = client_for(&server).get_tickers().await.unwrap_err();
        match err {
            OceanError::Api { code, message } => {
                assert_eq!(code, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("Expected Api error variant, got {other:?}"),
        }
    }
}
