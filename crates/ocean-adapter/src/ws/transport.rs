/*
[INPUT]:  Control messages produced by the subscription multiplexer
[OUTPUT]: Messages handed to a duplex connection (or recorded in memory)
[POS]:    WebSocket layer - outbound transport seam
[UPDATE]: When changing the emit contract or adding transport implementations
*/

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::http::{OceanError, Result};
use crate::ws::message::ControlMessage;

/// Outbound half of a duplex connection.
///
/// `emit` is fire-and-forget: `Ok` means the message was handed over, not
/// that the backend received it.
pub trait Transport: Send + Sync {
    fn emit(&self, event: &str, message: &ControlMessage) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn emit(&self, event: &str, message: &ControlMessage) -> Result<()> {
        (**self).emit(event, message)
    }
}

/// Transport that records every emitted message
#[derive(Debug, Default)]
pub struct MemoryTransport {
    sent: Mutex<Vec<(String, ControlMessage)>>,
    failing: AtomicBool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent emits fail with `NotConnected`
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Messages emitted so far, oldest first
    pub fn sent(&self) -> Vec<ControlMessage> {
        self.sent.lock().iter().map(|(_, message)| message.clone()).collect()
    }

    /// Messages emitted so far with their event names
    pub fn sent_events(&self) -> Vec<(String, ControlMessage)> {
        self.sent.lock().clone()
    }

    /// Drain recorded messages
    pub fn take(&self) -> Vec<ControlMessage> {
        self.sent
            .lock()
            .drain(..)
            .map(|(_, message)| message)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sent.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.lock().is_empty()
    }
}

impl Transport for MemoryTransport {
    fn emit(&self, event: &str, message: &ControlMessage) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(OceanError::NotConnected);
        }
        self.sent.lock().push((event.to_string(), message.clone()));
        Ok(())
    }
}
