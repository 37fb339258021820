//! main file for the server

pub mod model;
mod controller;
mod state;
mod store;
mod stream;
mod util;

use actix_web::{middleware::Logger, web, App, HttpServer};
use log::{error, info};
use tokio_util::sync::CancellationToken;
use crate::server::model::config::ServerConfig;
use crate::server::state::AppState;

/// Run the server until Ctrl-C
pub async fn run(ServerConfig { addr, stream, shutdown_timeout }: ServerConfig) -> std::io::Result<()> {
    let shutdown = CancellationToken::new();
    let state = web::Data::new(AppState::new(stream, shutdown.clone()));

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(controller::configure)
    })
        .bind(addr)?
        .shutdown_timeout(shutdown_timeout.as_secs())
        .disable_signals()
        .run();

    let handle = server.handle();
    actix_web::rt::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for shutdown signal, {}", e);
            return;
        }
        info!("received shutdown signal, closing live streams");
        // streams never finish on their own, end them so workers can drain
        shutdown.cancel();
        handle.stop(true).await;
    });

    info!("listening on {}", addr);
    server.await
}
