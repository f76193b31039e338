use std::{
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
    time::Duration,
};

use adapter::{database::connect_database_with, redis::RedisClient};
use anyhow::{Context, Result};
use api::route::{
    auth::build_auth_routers, health::build_health_check_routers, v1::build_v1_routers,
};
use axum::Router;
use chrono::Utc;
use registry::AppRegistry;
use shared::{config::AppConfig, logging::init_logger};
use tokio::net::TcpListener;
use tower_http::{
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::Level;

#[tokio::main]
async fn main() -> Result<()> {
    init_logger()?;
    bootstrap().await
}

async fn bootstrap() -> Result<()> {
    let app_config = AppConfig::new()?;
    let pool = connect_database_with(&app_config.database);
    pool.migrate().await.context("failed to run database migrations")?;
    let kv = Arc::new(RedisClient::new(&app_config.redis)?);

    let registry = AppRegistry::new(pool, kv, &app_config);

    tokio::spawn(retention_loop(
        registry.clone(),
        Duration::from_secs(app_config.retention.interval_secs),
    ));

    let app = Router::new()
        .merge(build_health_check_routers())
        .merge(build_auth_routers())
        .merge(build_v1_routers())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .with_state(registry);

    let addr = SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), app_config.server.port);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app)
        .await
        .context("Unexpected error happened in server")
        .inspect_err(|e| {
            tracing::error!(
                error.cause_chain = ?e,error.message = %e, "Unexpected error"
            )
        })
}

// The first tick fires immediately, so expired bookings are swept at startup.
async fn retention_loop(registry: AppRegistry, period: Duration) {
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        let cutoff = registry.retention_policy().cutoff(Utc::now());
        match registry
            .booking_repository()
            .sweep_expired(cutoff, false)
            .await
        {
            Ok(report) => {
                tracing::info!(deleted = report.deleted, %cutoff, "retention sweep finished")
            }
            Err(e) => tracing::warn!(error.message = %e, "retention sweep failed"),
        }
    }
}
