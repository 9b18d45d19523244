// Live HTTP + websocket server for end-to-end tests.

use std::net::{SocketAddr, TcpListener};

use actix_web::dev::ServerHandle;
use actix_web::{web, App, HttpServer};
use threeup::middleware::structured_logger::StructuredLogger;
use threeup::routes;
use threeup::state::app_state::AppState;

pub struct TestServer {
    pub handle: ServerHandle,
    pub addr: SocketAddr,
    join: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub async fn stop(self) {
        // Open websockets would hold a graceful stop until its timeout.
        self.handle.stop(false).await;
        let _ = self.join.await;
    }
}

/// Bind a real server on an ephemeral port and run it in the background.
pub fn start_test_server(state: AppState) -> Result<TestServer, Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let data = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(StructuredLogger)
            .configure(routes::configure)
    })
    .workers(1)
    .shutdown_timeout(1)
    .listen(listener)?
    .run();

    let handle = server.handle();
    let join = tokio::spawn(server);
    Ok(TestServer { handle, addr, join })
}
