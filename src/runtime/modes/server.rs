//! Server mode
//!
//! This module contains the HTTP server startup logic.

use actix_web::{App, HttpServer, middleware::Compress, web};
use anyhow::Result;
use tracing::warn;

use crate::api::middleware::{CorsHeaders, RequestIdMiddleware};
use crate::api::services::lookup_routes;
use crate::config::StaticConfig;
use crate::runtime::lifetime;

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: &StaticConfig) -> Result<()> {
    let startup = lifetime::startup::prepare_startup(config)
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {}", e);
            e
        })?;

    let locator = startup.locator.clone();

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(CorsHeaders)
            .wrap(RequestIdMiddleware) // 最外层，span 覆盖整个请求
            .app_data(web::Data::new(locator.clone()))
            .service(lookup_routes())
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count)
    .disable_signals()
    .bind(&bind_address)?
    .run();

    warn!("Starting server at http://{}", bind_address);

    // 信号由 listen_for_shutdown 统一处理
    tokio::spawn(lifetime::shutdown::listen_for_shutdown(server.handle()));
    server.await?;

    warn!("Graceful shutdown: server stopped");
    Ok(())
}
