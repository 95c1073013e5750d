/*
[INPUT]:  YAML configuration text or file, network selection
[OUTPUT]: Resolved REST/socket base URLs and endpoint URLs
[POS]:    Configuration layer - endpoint templates and network selection
[UPDATE]: When adding endpoints, networks, or connection options
*/

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::http::{ClientConfig, OceanError, Result};

const MAINNET_API_URL: &str = "https://api.theocean.trade/api/v1/";
const MAINNET_WS_URL: &str = "wss://ws.theocean.trade/ws/v1";
const KOVAN_API_URL: &str = "https://kovan.theocean.trade/api/v1/";
const KOVAN_WS_URL: &str = "wss://kovan-ws.theocean.trade/ws/v1";

/// Backend network the SDK talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Kovan,
}

impl Network {
    pub fn default_api_url(self) -> &'static str {
        match self {
            Network::Mainnet => MAINNET_API_URL,
            Network::Kovan => KOVAN_API_URL,
        }
    }

    pub fn default_ws_url(self) -> &'static str {
        match self {
            Network::Mainnet => MAINNET_WS_URL,
            Network::Kovan => KOVAN_WS_URL,
        }
    }
}

impl std::str::FromStr for Network {
    type Err = OceanError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "kovan" => Ok(Network::Kovan),
            other => Err(OceanError::Config(format!("unknown network: {other}"))),
        }
    }
}

/// Endpoint templates, relative to the API base URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiEndpoints {
    pub token_pairs: String,
    pub ticker: String,
    pub tickers: String,
    pub order_book: String,
    pub trade_history: String,
    pub candlesticks: String,
    pub order_info: String,
    pub available_balance: String,
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            token_pairs: "token_pairs".to_string(),
            ticker: "ticker".to_string(),
            tickers: "tickers".to_string(),
            order_book: "order_book".to_string(),
            trade_history: "trade_history".to_string(),
            candlesticks: "candlesticks".to_string(),
            order_info: "order".to_string(),
            available_balance: "available_balance".to_string(),
        }
    }
}

/// Top-level SDK configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OceanConfig {
    pub network: Network,
    /// Overrides the network's REST base URL
    pub api_url: Option<String>,
    /// Overrides the network's socket URL
    pub ws_url: Option<String>,
    pub endpoints: ApiEndpoints,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for OceanConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            api_url: None,
            ws_url: None,
            endpoints: ApiEndpoints::default(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl OceanConfig {
    pub fn for_network(network: Network) -> Self {
        Self {
            network,
            ..Self::default()
        }
    }

    /// Parse configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|err| OceanError::Config(err.to_string()))
    }

    /// Load configuration from YAML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|err| OceanError::Config(format!("read {path}: {err}")))?;
        Self::from_yaml_str(&content)
    }

    /// REST base URL, always with a trailing slash so templates join below it
    pub fn api_base_url(&self) -> Result<Url> {
        let raw = self
            .api_url
            .as_deref()
            .unwrap_or_else(|| self.network.default_api_url());
        if raw.ends_with('/') {
            Ok(Url::parse(raw)?)
        } else {
            Ok(Url::parse(&format!("{raw}/"))?)
        }
    }

    pub fn ws_base_url(&self) -> Result<Url> {
        let raw = self
            .ws_url
            .as_deref()
            .unwrap_or_else(|| self.network.default_ws_url());
        Ok(Url::parse(raw)?)
    }

    /// Resolve an endpoint template against the REST base URL
    pub fn endpoint_url(&self, template: &str) -> Result<Url> {
        Ok(self.api_base_url()?.join(template.trim_start_matches('/'))?)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_resolve_mainnet() {
        let config = OceanConfig::default();
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.api_base_url().unwrap().as_str(), MAINNET_API_URL);
        assert_eq!(config.ws_base_url().unwrap().as_str(), MAINNET_WS_URL);
    }

    #[test]
    fn test_endpoint_url_joins_below_base_path() {
        let config = OceanConfig {
            api_url: Some("http://localhost:8080/api/v1".to_string()),
            ..OceanConfig::default()
        };
        let url = config.endpoint_url(&config.endpoints.order_book).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/v1/order_book");

        let leading_slash = config.endpoint_url("/ticker").unwrap();
        assert_eq!(leading_slash.as_str(), "http://localhost:8080/api/v1/ticker");
    }

    #[test]
    fn test_from_yaml_partial_overrides() {
        let yaml = r#"
network: kovan
endpoints:
  tickers: all_tickers
request_timeout_secs: 5
"#;
        let config = OceanConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.network, Network::Kovan);
        assert_eq!(config.endpoints.tickers, "all_tickers");
        assert_eq!(config.endpoints.ticker, "ticker");
        assert_eq!(config.client_config().timeout, Duration::from_secs(5));
        assert_eq!(config.api_base_url().unwrap().as_str(), KOVAN_API_URL);
    }

    #[test]
    fn test_from_yaml_rejects_unknown_network() {
        let err = OceanConfig::from_yaml_str("network: ropsten").unwrap_err();
        assert!(matches!(err, OceanError::Config(_)));
    }

    #[test]
    fn test_network_from_str() {
        assert_eq!("Kovan".parse::<Network>().unwrap(), Network::Kovan);
        assert!("nope".parse::<Network>().is_err());
    }
}
