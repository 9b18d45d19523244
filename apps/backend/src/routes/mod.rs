use actix_web::web;

pub mod health;
pub mod realtime;
pub mod rooms;

/// Register every HTTP and websocket route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check routes: /health
    cfg.configure(health::configure_routes);

    // Room routes: /api/rooms/**
    cfg.service(web::scope("/api/rooms").configure(rooms::configure_routes));

    // Realtime routes: /ws
    cfg.configure(realtime::configure_routes);
}
