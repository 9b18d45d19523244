// Starting a game and playing moves over the socket.

use serde_json::json;
use threeup::domain::rules::RuleTable;
use threeup::state::app_state::AppState;

use super::{active_view, connect, join, legal_move};
use crate::common::{seat, slow_session_config};
use crate::support::server::start_test_server;

#[tokio::test]
async fn host_start_deals_and_turn_player_moves() -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(RuleTable::classic(), slow_session_config());
    let room = state.registry().create()?;
    let server = start_test_server(state)?;

    let mut ana = connect(&server.ws_url()).await?;
    let mut bob = connect(&server.ws_url()).await?;
    join(&mut ana, room.as_str(), "ana").await?;
    join(&mut bob, room.as_str(), "bob").await?;

    bob.send_json(&json!({"type": "start"})).await?;
    let rejected = bob.recv_type("rejected").await?;
    assert_eq!(rejected["reason"], "NOT_HOST");

    ana.send_json(&json!({"type": "start"})).await?;
    let ana_view = active_view(&mut ana).await?;
    let bob_view = active_view(&mut bob).await?;
    assert_eq!(ana_view["version"], bob_view["version"]);
    assert_eq!(ana_view["visible_hand"].as_array().map(Vec::len), Some(7));
    assert_eq!(bob_view["visible_hand"].as_array().map(Vec::len), Some(7));
    assert_eq!(ana_view["discard_top"], bob_view["discard_top"]);

    let turn = ana_view["turn_player"].as_u64().ok_or("no turn player")?;
    let (mover, mover_view, waiter, waiter_view) = if turn == 1 {
        (&mut ana, ana_view, &mut bob, bob_view)
    } else {
        (&mut bob, bob_view, &mut ana, ana_view)
    };
    assert_eq!(waiter_view["playable"], json!([]));

    // Out of turn: rejected, nothing broadcast.
    waiter.send_json(&json!({"type": "draw"})).await?;
    let rejected = waiter.recv_type("rejected").await?;
    assert_eq!(rejected["reason"], "NOT_YOUR_TURN");

    let version = mover_view["version"].as_u64().ok_or("no version")?;
    mover.send_json(&legal_move(&mover_view)).await?;
    let after_mover = mover.recv_type("state_view").await?;
    let after_waiter = waiter.recv_type("state_view").await?;
    assert_eq!(after_mover["version"], version + 1);
    assert_eq!(after_waiter["version"], version + 1);
    assert_eq!(after_waiter["recent"][0]["player"], turn);
    assert_eq!(
        seat(&after_waiter, turn)["cards"].as_u64(),
        after_mover["visible_hand"].as_array().map(|h| h.len() as u64)
    );

    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn playing_a_card_not_in_hand_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(RuleTable::classic(), slow_session_config());
    let room = state.registry().create()?;
    let server = start_test_server(state)?;

    let mut ana = connect(&server.ws_url()).await?;
    let mut bob = connect(&server.ws_url()).await?;
    join(&mut ana, room.as_str(), "ana").await?;
    join(&mut bob, room.as_str(), "bob").await?;
    ana.send_json(&json!({"type": "start"})).await?;
    let ana_view = active_view(&mut ana).await?;
    let bob_view = active_view(&mut bob).await?;

    let (mover, view) = if ana_view["turn_player"] == 1 {
        (&mut ana, ana_view)
    } else {
        (&mut bob, bob_view)
    };
    // Seven cards cannot cover all eight candidates.
    let hand: Vec<String> = view["visible_hand"]
        .as_array()
        .ok_or("no hand")?
        .iter()
        .filter_map(|c| c.as_str().map(str::to_string))
        .collect();
    let missing = ["R9", "Y9", "G9", "B9", "R8", "Y8", "G8", "B8"]
        .into_iter()
        .find(|c| !hand.iter().any(|h| h == c))
        .ok_or("hand holds every candidate")?;

    mover
        .send_json(&json!({"type": "play_card", "cards": [missing]}))
        .await?;
    let rejected = mover.recv_type("rejected").await?;
    assert_eq!(rejected["reason"], "CARD_NOT_IN_HAND");

    server.stop().await;
    Ok(())
}
