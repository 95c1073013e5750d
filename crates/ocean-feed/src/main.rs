/*
[INPUT]:  CLI arguments, YAML configuration file, OS shutdown signals
[OUTPUT]: REST query results or a live feed printed as JSON
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use ocean_adapter::{OceanClient, OrderBookQuery};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ocean_feed::{Cli, Command, WatchOptions, watch_feed};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let config = args.resolve_config()?;
    info!(network = ?config.network, "configuration loaded");

    match args.command {
        Command::Pairs => {
            let client = OceanClient::with_config(config).context("create client")?;
            print_json(&client.get_pairs().await.context("get pairs")?)?;
        }
        Command::Tickers => {
            let client = OceanClient::with_config(config).context("create client")?;
            print_json(&client.get_tickers().await.context("get tickers")?)?;
        }
        Command::OrderBook { pair, depth } => {
            let client = OceanClient::with_config(config).context("create client")?;
            let query = OrderBookQuery {
                pair: pair.token_pair(),
                depth,
            };
            print_json(&client.get_order_book(&query).await.context("get order book")?)?;
        }
        Command::Watch {
            channel,
            pair,
            snapshot,
            max_retries,
        } => {
            let ws_url = config.ws_base_url().context("resolve socket url")?;
            let shutdown = CancellationToken::new();
            setup_signal_handlers(shutdown.clone());

            let options = WatchOptions {
                channel,
                subscription: pair.subscription(snapshot),
                max_retries,
            };
            watch_feed(ws_url.as_str(), options, shutdown, |message: &Value| {
                if let Err(err) = print_json(message) {
                    warn!(error = %err, "failed to print message");
                }
            })
            .await?;
        }
    }

    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
