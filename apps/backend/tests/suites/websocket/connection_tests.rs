// Handshake, join and malformed-input handling.

use std::time::Duration;

use serde_json::json;
use threeup::domain::rules::RuleTable;
use threeup::state::app_state::AppState;

use super::{connect, join};
use crate::common::slow_session_config;
use crate::support::server::start_test_server;

#[tokio::test]
async fn welcome_then_join_gets_joined_and_view() -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(RuleTable::classic(), slow_session_config());
    let room = state.registry().create()?;
    let server = start_test_server(state)?;

    let mut client = connect(&server.ws_url()).await?;
    let (joined, view) = join(&mut client, room.as_str(), "ana").await?;
    assert_eq!(joined["session_id"], room.as_str());
    assert_eq!(joined["player_id"], 1);
    assert_eq!(view["you"], 1);
    assert_eq!(view["status"], "waiting");
    assert_eq!(view["visible_hand"], json!([]));

    client.close().await?;
    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn unknown_room_is_rejected_and_socket_stays_open() -> Result<(), Box<dyn std::error::Error>>
{
    let state = AppState::new(RuleTable::classic(), slow_session_config());
    let room = state.registry().create()?;
    let server = start_test_server(state)?;

    let mut client = connect(&server.ws_url()).await?;
    client
        .send_json(&json!({"type": "join", "session_id": "ZZZZZZ", "display_name": "ana"}))
        .await?;
    let rejected = client.recv_type("rejected").await?;
    assert_eq!(rejected["reason"], "SESSION_NOT_FOUND");

    // A failed join can be retried on the same connection.
    join(&mut client, room.as_str(), "ana").await?;

    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn moves_before_join_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(RuleTable::classic(), slow_session_config());
    let server = start_test_server(state)?;

    let mut client = connect(&server.ws_url()).await?;
    client.send_json(&json!({"type": "draw"})).await?;
    let rejected = client.recv_type("rejected").await?;
    assert_eq!(rejected["reason"], "NOT_JOINED");

    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn malformed_json_errors_and_closes() -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(RuleTable::classic(), slow_session_config());
    let server = start_test_server(state)?;

    let mut client = connect(&server.ws_url()).await?;
    client.send_text("{not json").await?;
    let error = client.recv_json().await?.ok_or("closed without an error")?;
    assert_eq!(error["type"], "error");
    assert_eq!(error["code"], "BAD_REQUEST");
    assert!(client.recv_json().await?.is_none(), "socket should close");

    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn bad_card_notation_errors_but_keeps_the_socket() -> Result<(), Box<dyn std::error::Error>>
{
    let state = AppState::new(RuleTable::classic(), slow_session_config());
    let room = state.registry().create()?;
    let server = start_test_server(state)?;

    let mut client = connect(&server.ws_url()).await?;
    client
        .send_json(&json!({"type": "play_card", "cards": ["Q9"]}))
        .await?;
    let error = client.recv_type("error").await?;
    assert_eq!(error["code"], "PARSE_CARD");

    client.send_json(&json!({"type": "dance"})).await?;
    let error = client.recv_type("error").await?;
    assert_eq!(error["code"], "BAD_REQUEST");

    join(&mut client, room.as_str(), "ana").await?;

    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn server_stops_promptly_with_sockets_open() -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(RuleTable::classic(), slow_session_config());
    let room = state.registry().create()?;
    let server = start_test_server(state)?;

    let mut client = connect(&server.ws_url()).await?;
    join(&mut client, room.as_str(), "ana").await?;

    tokio::time::timeout(Duration::from_secs(5), server.stop()).await?;
    Ok(())
}
