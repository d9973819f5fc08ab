use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, info};
use uuid::Uuid;

/// Outbound buffer per connection. Events beyond this are dropped, never awaited.
const CONNECTION_BUFFER: usize = 32;

/// Everything pushed to a progress client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    Connected { connection_id: Uuid },
    Progress { percentage: u8 },
    Complete { url: String },
    Failed { error: String },
}

/// Where a job reports its percentage-complete.
pub trait ProgressSink: Send + Sync {
    fn publish(&self, percentage: u8);
}

/// Sink bound to one client connection.
///
/// Publishing never blocks: if the client is gone or its buffer is full the
/// event is dropped.
#[derive(Debug, Clone, Default)]
pub struct ConnectionSink {
    sender: Option<mpsc::Sender<ServerEvent>>,
}

impl ConnectionSink {
    pub fn notify(&self, event: ServerEvent) {
        let Some(sender) = &self.sender else {
            return;
        };
        if let Err(e) = sender.try_send(event) {
            debug!("Dropping progress event: {}", e);
        }
    }
}

impl ProgressSink for ConnectionSink {
    fn publish(&self, percentage: u8) {
        self.notify(ServerEvent::Progress {
            percentage: percentage.min(100),
        });
    }
}

/// Registry of live progress connections, keyed by connection id.
#[derive(Default)]
pub struct ProgressHub {
    connections: RwLock<HashMap<Uuid, mpsc::Sender<ServerEvent>>>,
}

impl ProgressHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection. The `Connected` event is already queued on the
    /// returned receiver.
    pub async fn register(&self) -> (Uuid, mpsc::Receiver<ServerEvent>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(CONNECTION_BUFFER);
        let _ = tx.try_send(ServerEvent::Connected { connection_id: id });
        self.connections.write().await.insert(id, tx);
        (id, rx)
    }

    pub async fn remove(&self, id: Uuid) {
        self.connections.write().await.remove(&id);
    }

    /// Sink for a job started by `id`. Unknown or absent ids give a detached sink.
    pub async fn sink(&self, id: Option<Uuid>) -> ConnectionSink {
        let sender = match id {
            Some(id) => self.connections.read().await.get(&id).cloned(),
            None => None,
        };
        ConnectionSink { sender }
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Drop every sender so each socket's writer sees its channel close.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        conns.clear();
        info!(count, "Closed all progress connections");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_reach_only_their_connection() {
        let hub = ProgressHub::new();
        let (a, mut rx_a) = hub.register().await;
        let (_b, mut rx_b) = hub.register().await;

        assert_eq!(rx_a.recv().await, Some(ServerEvent::Connected { connection_id: a }));
        assert!(matches!(rx_b.recv().await, Some(ServerEvent::Connected { .. })));

        hub.sink(Some(a)).await.publish(40);

        assert_eq!(rx_a.recv().await, Some(ServerEvent::Progress { percentage: 40 }));
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn publishing_after_disconnect_is_a_no_op() {
        let hub = ProgressHub::new();
        let (id, rx) = hub.register().await;
        let sink = hub.sink(Some(id)).await;

        drop(rx);
        hub.remove(id).await;

        sink.publish(10);
        hub.sink(Some(id)).await.publish(20);
        assert_eq!(hub.connection_count().await, 0);
    }

    #[tokio::test]
    async fn full_buffer_never_blocks() {
        let hub = ProgressHub::new();
        let (id, mut rx) = hub.register().await;
        let sink = hub.sink(Some(id)).await;

        for pct in 0..=100 {
            sink.publish(pct);
        }

        let mut received = 0;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        assert_eq!(received, CONNECTION_BUFFER);
    }

    #[test]
    fn percentages_are_clamped() {
        let (tx, mut rx) = mpsc::channel(1);
        let sink = ConnectionSink { sender: Some(tx) };
        sink.publish(250);
        assert_eq!(rx.try_recv().unwrap(), ServerEvent::Progress { percentage: 100 });
    }

    #[test]
    fn events_serialize_with_tag_and_data() {
        let json = serde_json::to_value(ServerEvent::Progress { percentage: 42 }).unwrap();
        assert_eq!(json, serde_json::json!({"event": "progress", "data": {"percentage": 42}}));
    }
}
