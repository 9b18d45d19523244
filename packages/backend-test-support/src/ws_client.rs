//! JSON websocket client for end-to-end tests.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

pub type TestResult<T> = Result<T, Box<dyn std::error::Error>>;

pub const RECV_TIMEOUT: Duration = Duration::from_secs(2);

pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    /// Connect, retrying until the server accepts or `timeout` elapses.
    pub async fn connect_retry(url: &str, timeout: Duration) -> TestResult<Self> {
        let start = tokio::time::Instant::now();
        loop {
            match connect_async(url).await {
                Ok((stream, _)) => return Ok(Self { stream }),
                Err(err) => {
                    if start.elapsed() >= timeout {
                        return Err(Box::new(err));
                    }
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
            }
        }
    }

    pub async fn send_text(&mut self, text: &str) -> TestResult<()> {
        self.stream.send(Message::Text(text.to_owned().into())).await?;
        Ok(())
    }

    pub async fn send_json(&mut self, value: &Value) -> TestResult<()> {
        self.send_text(&value.to_string()).await
    }

    /// Next JSON text frame. Control frames are skipped; `None` means the
    /// server closed the socket.
    pub async fn recv_json(&mut self) -> TestResult<Option<Value>> {
        loop {
            let next = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .map_err(|_| "timeout waiting for message")?;
            match next {
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(serde_json::from_str(text.as_str())?));
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue,
                Some(Err(err)) => return Err(Box::new(err)),
            }
        }
    }

    /// Skip messages until one with `"type": kind` arrives.
    pub async fn recv_type(&mut self, kind: &str) -> TestResult<Value> {
        loop {
            match self.recv_json().await? {
                Some(msg) if msg["type"] == kind => return Ok(msg),
                Some(_) => continue,
                None => return Err(format!("socket closed before a {kind} message").into()),
            }
        }
    }

    /// Skip messages until one matches `pred`.
    pub async fn recv_until(&mut self, pred: impl Fn(&Value) -> bool) -> TestResult<Value> {
        loop {
            match self.recv_json().await? {
                Some(msg) if pred(&msg) => return Ok(msg),
                Some(_) => continue,
                None => return Err("socket closed before the expected message".into()),
            }
        }
    }

    pub async fn close(&mut self) -> TestResult<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}
