// Transport loss mid-game: inactive seats, reconnection and forfeit.

use threeup::domain::rules::RuleTable;
use threeup::state::app_state::AppState;

use super::{active_view, connect, join};
use crate::common::{seat, short_grace_session_config, slow_session_config};
use crate::support::server::start_test_server;

#[tokio::test]
async fn closed_socket_can_reclaim_its_seat() -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(RuleTable::classic(), slow_session_config());
    let room = state.registry().create()?;
    let server = start_test_server(state)?;

    let mut ana = connect(&server.ws_url()).await?;
    let mut bob = connect(&server.ws_url()).await?;
    join(&mut ana, room.as_str(), "ana").await?;
    join(&mut bob, room.as_str(), "bob").await?;
    ana.send_json(&serde_json::json!({"type": "start"})).await?;
    active_view(&mut ana).await?;
    let bob_view = active_view(&mut bob).await?;
    let bob_hand = bob_view["visible_hand"].clone();

    bob.close().await?;
    let seen = ana
        .recv_until(|m| m["type"] == "state_view" && seat(m, 2)["presence"] == "inactive")
        .await?;
    assert_eq!(seen["status"], "active");

    let mut bob_again = connect(&server.ws_url()).await?;
    let (joined, view) = join(&mut bob_again, room.as_str(), "bob").await?;
    assert_eq!(joined["player_id"], 2);
    assert_eq!(view["you"], 2);
    assert_eq!(view["visible_hand"], bob_hand);

    let seen = ana
        .recv_until(|m| m["type"] == "state_view" && seat(m, 2)["presence"] == "active")
        .await?;
    assert_eq!(seen["recent"][0]["kind"], "reconnected");

    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn grace_expiry_forfeits_and_ends_heads_up() -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(RuleTable::classic(), short_grace_session_config());
    let room = state.registry().create()?;
    let server = start_test_server(state)?;

    let mut ana = connect(&server.ws_url()).await?;
    let mut bob = connect(&server.ws_url()).await?;
    join(&mut ana, room.as_str(), "ana").await?;
    join(&mut bob, room.as_str(), "bob").await?;
    ana.send_json(&serde_json::json!({"type": "start"})).await?;
    active_view(&mut ana).await?;
    active_view(&mut bob).await?;

    bob.close().await?;
    let over = ana.recv_type("game_over").await?;
    assert_eq!(over["winner"], 1);

    server.stop().await;
    Ok(())
}
