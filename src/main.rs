use taskhub_api::database::DatabaseManager;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = taskhub_api::config::config();
    tracing::info!("Starting Taskhub API in {:?} mode", config.environment);

    // The server still starts without a reachable database; /health reports
    // degraded until one appears
    if let Err(e) = DatabaseManager::migrate().await {
        tracing::warn!("Skipping migrations: {}", e);
    }

    let app = taskhub_api::app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("TASKHUB_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Taskhub API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
