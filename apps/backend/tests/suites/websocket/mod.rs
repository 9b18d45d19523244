mod connection_tests;
mod game_flow_tests;
mod reconnect_tests;

use std::time::Duration;

use backend_test_support::ws_client::{TestResult, WsClient};
use serde_json::{json, Value};

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Connect and consume the `welcome` greeting.
pub async fn connect(url: &str) -> TestResult<WsClient> {
    let mut client = WsClient::connect_retry(url, CONNECT_TIMEOUT).await?;
    let welcome = client.recv_type("welcome").await?;
    assert_eq!(welcome["protocol"], 1);
    Ok(client)
}

/// Join `room` as `name`; returns `(joined, first state_view)`.
pub async fn join(client: &mut WsClient, room: &str, name: &str) -> TestResult<(Value, Value)> {
    client
        .send_json(&json!({"type": "join", "session_id": room, "display_name": name}))
        .await?;
    let joined = client.recv_json().await?.ok_or("closed before joined")?;
    assert_eq!(joined["type"], "joined", "unexpected reply: {joined}");
    let view = client.recv_type("state_view").await?;
    Ok((joined, view))
}

/// Wait for the first `state_view` with the game active.
pub async fn active_view(client: &mut WsClient) -> TestResult<Value> {
    client
        .recv_until(|m| m["type"] == "state_view" && m["status"] == "active")
        .await
}

/// A legal move for the player whose view this is: the first playable card
/// (declaring red for wilds), or a draw.
pub fn legal_move(view: &Value) -> Value {
    match view["playable"].as_array().and_then(|cards| cards.first()) {
        Some(card) => {
            let card = card.as_str().unwrap_or_default();
            if card.starts_with('W') {
                json!({"type": "play_card", "cards": [card], "declared_color": "red"})
            } else {
                json!({"type": "play_card", "cards": [card]})
            }
        }
        None => json!({"type": "draw"}),
    }
}
