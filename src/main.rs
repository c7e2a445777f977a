use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use feedguard::api::UpstreamClient;
use feedguard::core::{logging, Config};
use feedguard::feeds::{FeedCache, FeedScheduler, FeedService};
use feedguard::health::HealthMonitor;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    logging::init_logging(&config.monitoring.log_level);

    tracing::info!("🚀 feedguard starting...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Upstream: {}", config.upstream.base_url);

    let monitor = HealthMonitor::new(Duration::from_secs(config.health.warmup_grace_secs));
    let client = Arc::new(UpstreamClient::new(&config.upstream));
    let service = Arc::new(FeedService::new(
        client,
        monitor.clone(),
        Duration::from_secs(config.upstream.request_timeout_secs),
    ));

    let scheduler = FeedScheduler::start(service, &config.polling);

    // Start status endpoint
    let status_monitor = monitor.clone();
    let cache = scheduler.cache();
    let port = config.monitoring.status_port;
    tokio::spawn(async move { serve_status(status_monitor, cache, port).await });

    tracing::info!("✅ Status endpoint running on port {}", port);

    // Log the aggregate once a minute until ctrl-c
    let mut ticker = tokio::time::interval(Duration::from_secs(60));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                let snapshot = monitor.snapshot();
                tracing::info!(
                    "Data sources: {} ({} live / {} fallback{})",
                    snapshot.overall.as_str(),
                    snapshot.live_count,
                    snapshot.fallback_count,
                    if snapshot.warming { ", warming" } else { "" },
                );
            }
        }
    }

    tracing::info!("Shutting down...");
    scheduler.shutdown().await;
    monitor.shutdown();
    Ok(())
}

async fn serve_status(monitor: HealthMonitor, cache: FeedCache, port: u16) {
    use warp::Filter;

    let health = warp::path("health")
        .and(warp::any().map(move || monitor.clone()))
        .and_then(|monitor: HealthMonitor| async move {
            Ok::<_, warp::Rejection>(warp::reply::json(&monitor.snapshot()))
        });

    let feeds = warp::path("feeds")
        .and(warp::any().map(move || cache.clone()))
        .and_then(|cache: FeedCache| async move {
            let latest = cache.read().await.clone();
            Ok::<_, warp::Rejection>(warp::reply::json(&latest))
        });

    warp::serve(health.or(feeds)).run(([0, 0, 0, 0], port)).await;
}
