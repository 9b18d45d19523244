//! Room lifecycle over plain HTTP. Play itself happens on the websocket.

use actix_web::{web, HttpResponse};
use serde::Serialize;
use tracing::info;

use crate::domain::SessionId;
use crate::error::AppError;
use crate::errors::SessionError;
use crate::game::room_code::parse_room_code;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct CreatedRoom {
    room_id: SessionId,
}

/// POST /api/rooms
async fn create_room(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let room_id = app_state.registry().create()?;
    info!(session_id = %room_id, "Room created");
    Ok(HttpResponse::Created().json(CreatedRoom { room_id }))
}

/// GET /api/rooms/{room_id}
///
/// Public summary only: seat names, presence and card counts. A malformed code
/// is reported the same way as an unknown one.
async fn get_room(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let raw = path.into_inner();
    let id = parse_room_code(&raw)
        .map_err(|_| SessionError::SessionNotFound(SessionId::new(raw.as_str())))?;
    let handle = app_state.registry().get(&id)?;
    let summary = handle
        .summary()
        .await
        .map_err(|_| SessionError::SessionNotFound(id))?;
    Ok(HttpResponse::Ok().json(summary))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::post().to(create_room)));
    cfg.service(web::resource("/{room_id}").route(web::get().to(get_room)));
}
