// HTTP route tests: health and room lifecycle.
//
//   cargo test --test routes_tests

mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::Value;
use threeup::domain::rules::RuleTable;
use threeup::routes;
use threeup::state::app_state::AppState;

use crate::common::slow_session_config;

fn test_state() -> AppState {
    AppState::new(RuleTable::classic(), slow_session_config())
}

#[actix_web::test]
async fn health_reports_version_and_room_count() {
    let state = test_state();
    state.registry().create().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["app_version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["sessions"], 1);
    assert!(body["time"].is_string());
}

#[actix_web::test]
async fn create_room_then_fetch_its_summary() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post().uri("/api/rooms").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let room_id = created["room_id"].as_str().unwrap().to_string();
    assert_eq!(room_id.len(), 6);

    let req = test::TestRequest::get()
        .uri(&format!("/api/rooms/{}", room_id.to_lowercase()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let summary: Value = test::read_body_json(resp).await;
    assert_eq!(summary["room_id"], room_id.as_str());
    assert_eq!(summary["status"], "waiting");
    assert_eq!(summary["players"], Value::Array(vec![]));
    assert_eq!(summary["version"], 0);
}

#[actix_web::test]
async fn unknown_room_is_problem_details_404() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::configure),
    )
    .await;

    for uri in ["/api/rooms/ZZZZZZ", "/api/rooms/not-a-room"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "application/problem+json"
        );
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "SESSION_NOT_FOUND");
        assert_eq!(body["status"], 404);
        assert_eq!(body["title"], "Session Not Found");
    }
}
