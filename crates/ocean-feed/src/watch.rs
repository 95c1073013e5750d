/*
[INPUT]:  Socket URL, one pair feed to follow, shutdown token
[OUTPUT]: Feed messages delivered to a callback across reconnects
[POS]:    Feed layer - reconnection policy wrapped around the multiplexer
[UPDATE]: When changing reconnection backoff or shutdown semantics
*/

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use ocean_adapter::{
    Channel, ConnectionState, FeedSpec, InboundEvent, OceanStreams, OceanWebSocket, PairFeed,
    PairSubscription,
};
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A connection that stays up this long resets the retry budget
const STABLE_CONNECTION: Duration = Duration::from_secs(10);

/// What to follow and how hard to try reconnecting
#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub channel: Channel,
    pub subscription: PairSubscription,
    /// Consecutive failed or short-lived connections before giving up
    pub max_retries: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamExit {
    Disconnected,
    Shutdown,
}

/// Follow one pair feed until `shutdown` fires.
///
/// After every reconnect all subscriptions are resubscribed with the
/// snapshot flag cleared; local callbacks are kept. Every reconnect,
/// including one after a dropped connection, waits out the backoff first.
pub async fn watch_feed<C>(
    ws_url: &str,
    options: WatchOptions,
    shutdown: CancellationToken,
    callback: C,
) -> Result<()>
where
    C: Fn(&Value) + Clone + Send + Sync + 'static,
{
    PairFeed::new(options.channel)
        .validate(&options.subscription)
        .context("invalid subscription")?;

    let mut ws = OceanWebSocket::new();
    let mut events = ws
        .take_receiver()
        .context("OceanWebSocket receiver already taken")?;
    let mut connection_state = ws.subscribe_connection_state();
    let ws = Arc::new(ws);
    let streams = OceanStreams::new(ws.clone());

    let mut subscribed = false;
    let mut retry_count: u32 = 0;

    'run: loop {
        if shutdown.is_cancelled() {
            break 'run;
        }

        info!(%ws_url, channel = %options.channel, "connecting feed");
        let failure = match ws.connect(ws_url).await {
            Ok(()) => {
                let connected_at = Instant::now();

                if subscribed {
                    if let Err(err) = streams.resubscribe_all() {
                        warn!(error = %err, "resubscribe after reconnect failed");
                    }
                } else {
                    let stream = streams.stream(options.channel);
                    match stream.subscribe(&options.subscription, callback.clone()) {
                        Ok(handle) => {
                            subscribed = true;
                            info!(channel_id = %handle.key(), "feed subscribed");
                        }
                        Err(err) => warn!(error = %err, "subscribe failed; retrying on next connect"),
                    }
                }

                let exit = if *connection_state.borrow_and_update() == ConnectionState::Disconnected {
                    StreamExit::Disconnected
                } else {
                    stream_loop(&streams, &mut events, &mut connection_state, &shutdown).await
                };
                if exit == StreamExit::Shutdown {
                    break 'run;
                }

                let uptime = connected_at.elapsed();
                if uptime >= STABLE_CONNECTION {
                    retry_count = 0;
                }
                warn!(?uptime, "feed connection dropped");
                format!("connection dropped after {uptime:?}")
            }
            Err(err) => err.to_string(),
        };

        retry_count = retry_count.saturating_add(1);
        if retry_count >= options.max_retries {
            return Err(anyhow!(failure)).context(format!(
                "gave up reconnecting after {retry_count} attempts"
            ));
        }

        let backoff = backoff_duration(retry_count);
        warn!(retry_count, ?backoff, error = %failure, "feed reconnecting with backoff");
        tokio::select! {
            _ = shutdown.cancelled() => break 'run,
            _ = tokio::time::sleep(backoff) => {}
        }
    }

    if let Err(err) = streams.unsubscribe_all() {
        debug!(error = %err, "unsubscribe on shutdown failed");
    }
    ws.close();
    info!("feed stopped");
    Ok(())
}

async fn stream_loop(
    streams: &OceanStreams<Arc<OceanWebSocket>>,
    events: &mut mpsc::Receiver<InboundEvent>,
    connection_state: &mut watch::Receiver<ConnectionState>,
    shutdown: &CancellationToken,
) -> StreamExit {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                debug!("feed shutdown requested");
                return StreamExit::Shutdown;
            }
            event = events.recv() => {
                match event {
                    Some(event) => {
                        streams.route(&event);
                    }
                    None => return StreamExit::Shutdown,
                }
            }
            changed = connection_state.changed() => {
                if changed.is_err()
                    || *connection_state.borrow_and_update() == ConnectionState::Disconnected
                {
                    return StreamExit::Disconnected;
                }
            }
        }
    }
}

pub(crate) fn backoff_duration(retry_count: u32) -> Duration {
    let exp = retry_count.saturating_sub(1).min(63);
    let secs = 1u64 << exp;
    Duration::from_secs(secs.min(30))
}
