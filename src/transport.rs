// src/transport.rs
//! Stream transport seam between the generator and the processor.
//!
//! The real transport (an external at-least-once stream) lives outside this
//! crate. [`in_memory`] gives a bounded channel with the same shape, used by
//! the binary and the tests.

use std::fmt;

use anyhow::{anyhow, Context, Result};
use tokio::sync::mpsc;

#[async_trait::async_trait]
pub trait StreamTransport: Send + Sync {
    /// Hand one serialized batch to the stream.
    async fn publish(&self, body: String) -> Result<()>;
    fn hub_name(&self) -> &str;
}

/// Opaque connection handle for the external stream. Never inspected.
#[derive(Clone)]
pub struct StreamConnection(String);

impl StreamConnection {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Read the handle from the environment variable named `setting`.
    pub fn from_env(setting: &str) -> Result<Self> {
        std::env::var(setting)
            .map(Self)
            .with_context(|| format!("missing stream connection setting {setting}"))
    }

    /// Raw value, for handing to a transport client.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StreamConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StreamConnection(<redacted>)")
    }
}

/// Publishing half of the in-memory stream.
#[derive(Debug, Clone)]
pub struct InMemoryStream {
    hub: String,
    tx: mpsc::Sender<Vec<u8>>,
}

#[async_trait::async_trait]
impl StreamTransport for InMemoryStream {
    async fn publish(&self, body: String) -> Result<()> {
        self.tx
            .send(body.into_bytes())
            .await
            .map_err(|_| anyhow!("stream {} is closed", self.hub))
    }

    fn hub_name(&self) -> &str {
        &self.hub
    }
}

/// Receiving half; groups queued events into deliveries.
#[derive(Debug)]
pub struct StreamReceiver {
    rx: mpsc::Receiver<Vec<u8>>,
    max_delivery: usize,
}

impl StreamReceiver {
    /// Wait for one event, then take whatever else is already queued, up to
    /// `max_delivery` events. `None` once every publisher is gone and the
    /// queue is drained.
    pub async fn next_delivery(&mut self) -> Option<Vec<Vec<u8>>> {
        let first = self.rx.recv().await?;
        let mut delivery = vec![first];
        while delivery.len() < self.max_delivery {
            match self.rx.try_recv() {
                Ok(ev) => delivery.push(ev),
                Err(_) => break,
            }
        }
        Some(delivery)
    }
}

/// Bounded in-memory stream named `hub`.
pub fn in_memory(
    hub: impl Into<String>,
    capacity: usize,
    max_delivery: usize,
) -> (InMemoryStream, StreamReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        InMemoryStream {
            hub: hub.into(),
            tx,
        },
        StreamReceiver {
            rx,
            max_delivery: max_delivery.max(1),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn deliveries_group_queued_events() {
        let (tx, mut rx) = in_memory("news", 8, 2);
        for body in ["a", "b", "c"] {
            tx.publish(body.to_string()).await.unwrap();
        }
        drop(tx);

        assert_eq!(rx.next_delivery().await.unwrap(), vec![b"a".to_vec(), b"b".to_vec()]);
        assert_eq!(rx.next_delivery().await.unwrap(), vec![b"c".to_vec()]);
        assert!(rx.next_delivery().await.is_none());
    }

    #[tokio::test]
    async fn publish_fails_once_receiver_is_gone() {
        let (tx, rx) = in_memory("news", 1, 1);
        drop(rx);
        assert!(tx.publish("[]".into()).await.is_err());
        assert_eq!(tx.hub_name(), "news");
    }

    #[test]
    fn connection_debug_is_redacted() {
        let c = StreamConnection::new("Endpoint=sb://secret;SharedAccessKey=abc");
        assert_eq!(format!("{c:?}"), "StreamConnection(<redacted>)");
        assert!(c.expose().contains("secret"));
    }
}
