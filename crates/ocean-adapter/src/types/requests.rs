/*
[INPUT]:  REST query parameter definitions and serde requirements
[OUTPUT]: Typed Rust query structs serialized as camelCase query strings
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new query types added
*/

use serde::{Deserialize, Serialize};

use crate::http::{OceanError, Result};

/// Base/quote token pair identifying a market
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub base_token_address: String,
    pub quote_token_address: String,
}

impl TokenPair {
    pub fn new(base_token_address: impl Into<String>, quote_token_address: impl Into<String>) -> Self {
        Self {
            base_token_address: base_token_address.into(),
            quote_token_address: quote_token_address.into(),
        }
    }

    /// Both token identifiers must be non-empty
    pub fn validate(&self) -> Result<()> {
        if self.base_token_address.trim().is_empty() || self.quote_token_address.trim().is_empty() {
            return Err(OceanError::invalid_input(format!(
                "expected 2 non-empty token addresses, actual: {:?}, {:?}",
                self.base_token_address, self.quote_token_address
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBookQuery {
    #[serde(flatten)]
    pub pair: TokenPair,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandlestickQuery {
    #[serde(flatten)]
    pub pair: TokenPair,
    /// Unix seconds
    pub start_time: u64,
    /// Unix seconds
    pub end_time: u64,
    /// Bucket width in seconds
    pub interval: u64,
}

impl CandlestickQuery {
    pub fn validate(&self) -> Result<()> {
        self.pair.validate()?;
        if self.end_time < self.start_time {
            return Err(OceanError::invalid_input(format!(
                "candlestick range ends before it starts: {} < {}",
                self.end_time, self.start_time
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceQuery {
    pub token_address: String,
    pub user_address: String,
}
