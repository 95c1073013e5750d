/*
[INPUT]:  WebSocket URL, control messages to emit
[OUTPUT]: Named inbound events via channel; Transport implementation for the multiplexer
[POS]:    WebSocket layer - socket connection handling
[UPDATE]: When changing frame format or connection logic
*/

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info};

use crate::http::{OceanError, Result};
use crate::ws::message::{ControlMessage, InboundEvent};
use crate::ws::transport::Transport;

const INBOUND_BUFFER: usize = 1024;
const SEND_LOG_LIMIT: usize = 10;
const PARSE_FAIL_LOG_LIMIT: usize = 3;
const RAW_LOG_MAX_BYTES: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

/// Socket connection carrying `[event, payload]` JSON text frames both ways.
///
/// The same instance may `connect` again after a disconnect; the inbound
/// receiver survives reconnects.
#[derive(Debug)]
pub struct OceanWebSocket {
    event_tx: mpsc::Sender<InboundEvent>,
    event_rx: Option<mpsc::Receiver<InboundEvent>>,
    outbound_tx: Arc<Mutex<Option<Outbound>>>,
    connection_state: Arc<watch::Sender<ConnectionState>>,
    generation: AtomicU64,
    log_sampler: Arc<LogSampler>,
}

/// Writer half of one connection, tagged so a stale task cannot clear a newer one
#[derive(Debug)]
struct Outbound {
    generation: u64,
    tx: mpsc::UnboundedSender<WsMessage>,
}

impl OceanWebSocket {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INBOUND_BUFFER);
        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            event_tx: tx,
            event_rx: Some(rx),
            outbound_tx: Arc::new(Mutex::new(None)),
            connection_state: Arc::new(connection_state),
            generation: AtomicU64::new(0),
            log_sampler: Arc::new(LogSampler::default()),
        }
    }

    /// Get the inbound event receiver
    pub fn take_receiver(&mut self) -> Option<mpsc::Receiver<InboundEvent>> {
        self.event_rx.take()
    }

    pub fn is_connected(&self) -> bool {
        self.outbound_tx.lock().is_some()
    }

    /// Subscribe to connection state changes
    pub fn subscribe_connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.connection_state.subscribe()
    }

    /// Open the socket and spawn the read/write task
    pub async fn connect(&self, url: &str) -> Result<()> {
        if self.is_connected() {
            return Err(OceanError::WebSocket("WebSocket already connected".to_string()));
        }

        let (ws_stream, _response) = connect_async(url)
            .await
            .map_err(|err| OceanError::WebSocket(err.to_string()))?;
        let (mut write, mut read) = ws_stream.split();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;

        {
            let mut guard = self.outbound_tx.lock();
            if guard.is_some() {
                return Err(OceanError::WebSocket("WebSocket already connected".to_string()));
            }
            *guard = Some(Outbound {
                generation,
                tx: outbound_tx,
            });
        }
        self.connection_state.send_replace(ConnectionState::Connected);
        info!(%url, "websocket connected");

        let event_tx = self.event_tx.clone();
        let outbound_state = self.outbound_tx.clone();
        let connection_state = self.connection_state.clone();
        let log_sampler = self.log_sampler.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    outbound = outbound_rx.recv() => {
                        match outbound {
                            Some(message) => {
                                if write.send(message).await.is_err() {
                                    break;
                                }
                            }
                            None => {
                                let _ = write.send(WsMessage::Close(None)).await;
                                break;
                            }
                        }
                    }
                    incoming = read.next() => {
                        match incoming {
                            Some(Ok(WsMessage::Close(_))) => {
                                let _ = write.send(WsMessage::Close(None)).await;
                                break;
                            }
                            Some(Ok(WsMessage::Ping(_))) | Some(Ok(WsMessage::Pong(_))) => {}
                            Some(Ok(message)) => {
                                if let Some(event) = parse_frame(message, &log_sampler)
                                    && event_tx.send(event).await.is_err()
                                {
                                    break;
                                }
                            }
                            Some(Err(_)) | None => {
                                break;
                            }
                        }
                    }
                }
            }

            let mut guard = outbound_state.lock();
            if guard.as_ref().is_none_or(|outbound| outbound.generation == generation) {
                *guard = None;
                connection_state.send_replace(ConnectionState::Disconnected);
                info!(generation, "websocket disconnected");
            }
        });

        Ok(())
    }

    /// Ask the connection task to send a close frame and stop
    pub fn close(&self) {
        self.outbound_tx.lock().take();
    }
}

impl Default for OceanWebSocket {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for OceanWebSocket {
    fn emit(&self, event: &str, message: &ControlMessage) -> Result<()> {
        let frame = encode_frame(event, message)?;
        let sender = self
            .outbound_tx
            .lock()
            .as_ref()
            .map(|outbound| outbound.tx.clone())
            .ok_or(OceanError::NotConnected)?;
        sender
            .send(WsMessage::Text(frame.into()))
            .map_err(|_| OceanError::WebSocket("WebSocket send channel closed".to_string()))?;
        self.log_sampler.sent(message);
        Ok(())
    }
}

pub(crate) fn encode_frame(event: &str, message: &ControlMessage) -> Result<String> {
    Ok(serde_json::to_string(&(event, message))?)
}

pub(crate) fn decode_frame(text: &str) -> std::result::Result<InboundEvent, String> {
    let value: Value = serde_json::from_str(text).map_err(|err| err.to_string())?;
    match value {
        Value::Array(mut parts) if parts.len() == 2 => {
            let data = parts.pop().unwrap_or(Value::Null);
            match parts.pop() {
                Some(Value::String(event)) => Ok(InboundEvent { event, data }),
                _ => Err("event name is not a string".to_string()),
            }
        }
        _ => Err("expected [event, data] frame".to_string()),
    }
}

fn parse_frame(message: WsMessage, log_sampler: &LogSampler) -> Option<InboundEvent> {
    let text: String = match message {
        WsMessage::Text(text) => text.to_string(),
        WsMessage::Binary(bytes) => String::from_utf8(bytes.to_vec()).ok()?,
        _ => return None,
    };

    match decode_frame(&text) {
        Ok(event) => Some(event),
        Err(err) => {
            log_sampler.parse_failed(&err, &text);
            None
        }
    }
}

/// Per-connection log sampling so a noisy feed cannot flood the logs
#[derive(Debug, Default)]
struct LogSampler {
    sent: AtomicUsize,
    parse_failed: AtomicUsize,
}

impl LogSampler {
    fn sent(&self, message: &ControlMessage) {
        let count = self.sent.fetch_add(1, Ordering::Relaxed);
        if count >= SEND_LOG_LIMIT {
            return;
        }
        info!(
            sample_index = count + 1,
            sample_limit = SEND_LOG_LIMIT,
            action = ?message.kind,
            channel = %message.channel,
            "ws control message sent"
        );
    }

    fn parse_failed(&self, err: &str, raw: &str) {
        let count = self.parse_failed.fetch_add(1, Ordering::Relaxed);
        if count >= PARSE_FAIL_LOG_LIMIT {
            return;
        }
        info!(
            sample_index = count + 1,
            sample_limit = PARSE_FAIL_LOG_LIMIT,
            error = %err,
            bytes = raw.len(),
            "ws frame parse failed"
        );
        let preview = truncate_for_log(raw, RAW_LOG_MAX_BYTES);
        debug!(
            sample_index = count + 1,
            sample_limit = PARSE_FAIL_LOG_LIMIT,
            message = %preview,
            "ws frame parse failed"
        );
    }
}

fn truncate_for_log(value: &str, max_len: usize) -> String {
    if value.len() <= max_len {
        return value.to_string();
    }
    let mut end = max_len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = String::with_capacity(end + 3);
    out.push_str(&value[..end]);
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ws::message::{Channel, SEND_CHANNEL};
    use serde_json::json;

    #[test]
    fn test_encode_frame_wraps_event_name() {
        let message = ControlMessage::subscribe(Channel::OrderBook, json!({"baseTokenAddress": "0xAAA"}));
        let frame = encode_frame(SEND_CHANNEL, &message).unwrap();
        let value: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(
            value,
            json!(["message", {"type": "subscribe", "channel": "orderbook", "payload": {"baseTokenAddress": "0xAAA"}}])
        );
    }

    #[test]
    fn test_decode_frame() {
        let event = decode_frame(r#"["orderbook", {"channelId": "orderbook_0xAAA_0xBBB"}]"#).unwrap();
        assert_eq!(event.event, "orderbook");
        assert_eq!(event.channel_id(), Some("orderbook_0xAAA_0xBBB"));

        assert!(decode_frame(r#"{"channelId": "x"}"#).is_err());
        assert!(decode_frame(r#"[1, {}]"#).is_err());
        assert!(decode_frame("not json").is_err());
    }

    #[test]
    fn test_emit_without_connection_fails() {
        let ws = OceanWebSocket::new();
        let message = ControlMessage::subscribe(Channel::Ticker, json!({}));
        assert!(matches!(ws.emit(SEND_CHANNEL, &message), Err(OceanError::NotConnected)));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundaries() {
        assert_eq!(truncate_for_log("short", 10), "short");
        assert_eq!(truncate_for_log("ééé", 3), "é...");
    }
}
