use std::env;

use actix_cors::Cors;
use actix_web::http::header;

/// Build CORS middleware from `THREEUP_CORS_ORIGINS` (comma-separated).
/// Falls back to localhost origins when nothing valid is configured.
pub fn cors_middleware() -> Cors {
    let allowed_raw = env::var("THREEUP_CORS_ORIGINS").unwrap_or_default();

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    for origin in effective_origins(&allowed_raw) {
        cors = cors.allowed_origin(&origin);
    }

    cors
}

/// Parse and lightly validate origins, ignoring empty and "null" entries.
fn effective_origins(raw: &str) -> Vec<String> {
    let allowed: Vec<String> = raw
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(|s| s.to_string())
        .collect();

    if allowed.is_empty() {
        vec![
            "http://localhost:3000".to_string(),
            "http://127.0.0.1:3000".to_string(),
        ]
    } else {
        allowed
    }
}
