use actix_web::{web, App, HttpServer};
use threeup::config::{rules_from_env, ServerConfig};
use threeup::middleware::cors::cors_middleware;
use threeup::middleware::structured_logger::StructuredLogger;
use threeup::routes;
use threeup::state::app_state::AppState;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    let rules = match rules_from_env(config.rules_path.as_deref()) {
        Ok(rules) => rules,
        Err(e) => {
            eprintln!("❌ Failed to load rule table: {e}");
            std::process::exit(1);
        }
    };

    println!(
        "🚀 Starting threeup on http://{}:{}",
        config.host, config.port
    );

    let app_state = AppState::from_config(&config, rules);
    let registry = app_state.registry().clone();
    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind(config.bind_addr())?
    .run()
    .await?;

    registry.shutdown_all().await;
    Ok(())
}
