// In-process connections for driving the hub without a socket.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use threeup::ws::{ConnId, ConnectionHub};
use tokio::sync::mpsc;
use uuid::Uuid;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// A fake connection: the hub delivers into an mpsc channel.
pub struct TestConn {
    pub id: ConnId,
    rx: mpsc::Receiver<threeup::ws::ServerMsg>,
}

impl TestConn {
    pub fn connect(hub: &ConnectionHub) -> Self {
        let (tx, rx) = mpsc::channel(64);
        let id = Uuid::new_v4();
        hub.connect(id, Arc::new(tx));
        Self { id, rx }
    }

    /// Next delivered message as JSON.
    pub async fn next(&mut self) -> Value {
        let msg = tokio::time::timeout(RECV_TIMEOUT, self.rx.recv())
            .await
            .expect("timed out waiting for a message")
            .expect("mailbox closed");
        serde_json::to_value(&msg).expect("server message serializes")
    }

    /// Skip messages until one matches `pred`.
    pub async fn next_matching(&mut self, pred: impl Fn(&Value) -> bool) -> Value {
        loop {
            let msg = self.next().await;
            if pred(&msg) {
                return msg;
            }
        }
    }

    pub async fn next_of_type(&mut self, kind: &str) -> Value {
        self.next_matching(|m| m["type"] == kind).await
    }

    /// True when nothing is waiting in the mailbox.
    pub fn is_drained(&mut self) -> bool {
        self.rx.try_recv().is_err()
    }
}
