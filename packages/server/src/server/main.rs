// Main entry point for the matching pipeline server

use anyhow::{Context, Result};
use matcher_core::config::Config;
use matcher_core::domains::directory::HttpProfileDirectory;
use matcher_core::domains::matching::events::{
    APPLICANTS_STREAM, APPLICANT_CREATED_SUBJECT, APPLICANT_MATCHED_SUBJECT, MATCHER_CONSUMER,
    MATCHES_STREAM, SINK_CONSUMER,
};
use matcher_core::domains::matching::models::notification::PgNotificationStore;
use matcher_core::domains::matching::{
    ApplicantEventConsumer, ConsumerSettings, NotificationSink,
};
use matcher_core::kernel::{
    ensure_pull_consumer, NatsClientPublisher, ServerDeps, StreamHub, StreamHubPush,
};
use matcher_core::server::{build_app, AxumAppState};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,matcher_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Talent Match Notifier");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    // Connect to NATS and bind the two durable consumers
    let nats = async_nats::connect(&config.nats_url)
        .await
        .context("Failed to connect to NATS")?;
    let jetstream = async_nats::jetstream::new(nats.clone());

    let applicant_messages = ensure_pull_consumer(
        &jetstream,
        APPLICANTS_STREAM,
        APPLICANT_CREATED_SUBJECT,
        MATCHER_CONSUMER,
    )
    .await
    .context("Failed to bind applicant consumer")?;
    let match_messages = ensure_pull_consumer(
        &jetstream,
        MATCHES_STREAM,
        APPLICANT_MATCHED_SUBJECT,
        SINK_CONSUMER,
    )
    .await
    .context("Failed to bind match consumer")?;

    // Wire dependencies
    let stream_hub = StreamHub::new();
    let directory = HttpProfileDirectory::new(
        config.directory_url.clone(),
        config.directory_token.clone(),
        config.directory_timeout,
        config.directory_cache_ttl,
    )
    .context("Failed to build directory client")?;

    let deps = ServerDeps::new(
        Arc::new(PgNotificationStore::new(pool.clone())),
        Arc::new(directory),
        Arc::new(NatsClientPublisher::new(nats.clone())),
        Arc::new(StreamHubPush::new(stream_hub.clone())),
        stream_hub,
    );

    // Spawn the pipeline workers
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let consumer = ApplicantEventConsumer::new(
        &deps,
        ConsumerSettings {
            emission_concurrency: config.emission_concurrency,
            max_deliveries: config.max_deliveries,
        },
    );
    let consumer_shutdown = shutdown_rx.clone();
    let consumer_handle =
        tokio::spawn(async move { consumer.run(applicant_messages, consumer_shutdown).await });

    let sink = NotificationSink::new(&deps, config.max_deliveries);
    let sink_shutdown = shutdown_rx.clone();
    let sink_handle = tokio::spawn(async move { sink.run(match_messages, sink_shutdown).await });

    // Start HTTP server
    let app = build_app(AxumAppState {
        deps,
        db_pool: pool,
        nats,
    });
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Stop intake and drain in-flight work
    tracing::info!("Shutting down, draining pipeline workers...");
    let _ = shutdown_tx.send(true);
    for (name, handle) in [("consumer", consumer_handle), ("sink", sink_handle)] {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(worker = name, error = %e, "worker exited with error"),
            Err(e) => tracing::warn!(worker = name, error = %e, "worker task panicked"),
        }
    }
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
