/*
[INPUT]:  Command-line arguments and optional YAML configuration file
[OUTPUT]: Parsed commands and resolved SDK configuration
[POS]:    CLI layer - argument parsing and config resolution
[UPDATE]: When adding subcommands or flags
*/

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ocean_adapter::{Channel, Network, OceanConfig, PairSubscription, TokenPair};

#[derive(Parser, Debug)]
#[command(name = "ocean-feed", version, about = "Ocean market data queries and live feeds")]
pub struct Cli {
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config_path: Option<PathBuf>,
    /// Overrides the network in the config file
    #[arg(long = "network", value_name = "NETWORK", global = true)]
    pub network: Option<Network>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info", global = true)]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List tradable token pairs
    Pairs,
    /// Show tickers for every pair
    Tickers,
    /// Fetch an order book snapshot
    OrderBook {
        #[command(flatten)]
        pair: PairArgs,
        #[arg(long)]
        depth: Option<u32>,
    },
    /// Stream a pair feed until interrupted
    Watch {
        #[arg(long, value_name = "CHANNEL")]
        channel: Channel,
        #[command(flatten)]
        pair: PairArgs,
        /// Ask for a full snapshot on the first subscribe
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        snapshot: bool,
        #[arg(long = "max-retries", default_value_t = 10)]
        max_retries: u32,
    },
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct PairArgs {
    /// Base token address
    #[arg(long = "base", value_name = "ADDRESS")]
    pub base_token_address: String,
    /// Quote token address
    #[arg(long = "quote", value_name = "ADDRESS")]
    pub quote_token_address: String,
}

impl PairArgs {
    pub fn token_pair(&self) -> TokenPair {
        TokenPair::new(&self.base_token_address, &self.quote_token_address)
    }

    pub fn subscription(&self, snapshot: bool) -> PairSubscription {
        PairSubscription::from(self.token_pair()).with_snapshot(snapshot)
    }
}

impl Cli {
    /// Config file (or defaults) with the `--network` override applied
    pub fn resolve_config(&self) -> Result<OceanConfig> {
        let mut config = match &self.config_path {
            Some(path) => {
                let path_str = path.to_str().context("config path must be valid utf-8")?;
                OceanConfig::from_file(path_str).context("load config")?
            }
            None => OceanConfig::default(),
        };
        if let Some(network) = self.network {
            config.network = network;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_watch_command() {
        let cli = Cli::try_parse_from([
            "ocean-feed",
            "watch",
            "--channel",
            "orderbook",
            "--base",
            "0xAAA",
            "--quote",
            "0xBBB",
            "--snapshot",
            "false",
        ])
        .expect("parse");

        match cli.command {
            Command::Watch {
                channel,
                pair,
                snapshot,
                max_retries,
            } => {
                assert_eq!(channel, Channel::OrderBook);
                assert_eq!(pair.token_pair(), TokenPair::new("0xAAA", "0xBBB"));
                assert!(!snapshot);
                assert_eq!(max_retries, 10);
                assert!(!pair.subscription(snapshot).snapshot);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_channel() {
        let result = Cli::try_parse_from([
            "ocean-feed", "watch", "--channel", "candles", "--base", "0xAAA", "--quote", "0xBBB",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_network_flag_overrides_default() {
        let cli = Cli::try_parse_from(["ocean-feed", "--network", "kovan", "pairs"]).expect("parse");
        let config = cli.resolve_config().expect("config");
        assert_eq!(config.network, Network::Kovan);
        assert_eq!(cli.log_level, "info");
    }
}
