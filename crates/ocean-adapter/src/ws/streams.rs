/*
[INPUT]:  One shared transport and the inbound events it delivers
[OUTPUT]: Order book, trade history and ticker streams with event routing
[POS]:    WebSocket layer - bundle of feed multiplexers over one connection
[UPDATE]: When adding feed families or changing event routing
*/

use tracing::debug;

use crate::http::Result;
use crate::ws::message::{Channel, InboundEvent};
use crate::ws::pairs::PairStream;
use crate::ws::transport::Transport;

/// All feed families multiplexed over one connection.
///
/// Each stream keeps its own registry; events are routed by name.
#[derive(Debug)]
pub struct OceanStreams<T> {
    pub order_book: PairStream<T>,
    pub trade_history: PairStream<T>,
    pub ticker: PairStream<T>,
}

impl<T: Transport + Clone> OceanStreams<T> {
    pub fn new(transport: T) -> Self {
        Self {
            order_book: PairStream::order_book(transport.clone()),
            trade_history: PairStream::trade_history(transport.clone()),
            ticker: PairStream::ticker(transport),
        }
    }
}

impl<T: Transport> OceanStreams<T> {
    pub fn stream(&self, channel: Channel) -> &PairStream<T> {
        match channel {
            Channel::OrderBook => &self.order_book,
            Channel::TradeHistory => &self.trade_history,
            Channel::Ticker => &self.ticker,
        }
    }

    /// Hand an inbound event to the stream named by its event name
    pub fn route(&self, event: &InboundEvent) -> bool {
        match Channel::from_name(&event.event) {
            Some(channel) => self.stream(channel).handle_message(&event.data),
            None => {
                debug!(event = %event.event, "no stream for event");
                false
            }
        }
    }

    /// Unsubscribe every stream; all streams are visited even if one fails
    pub fn unsubscribe_all(&self) -> Result<()> {
        self.for_each_stream(|stream| stream.unsubscribe_all())
    }

    /// Resubscribe every stream, typically right after a reconnect
    pub fn resubscribe_all(&self) -> Result<()> {
        self.for_each_stream(|stream| stream.resubscribe_all())
    }

    pub fn len(&self) -> usize {
        Channel::ALL.iter().map(|channel| self.stream(*channel).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn for_each_stream(&self, op: impl Fn(&PairStream<T>) -> Result<()>) -> Result<()> {
        let mut first_error = None;
        for channel in Channel::ALL {
            if let Err(err) = op(self.stream(channel)) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
