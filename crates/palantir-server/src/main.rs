use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use palantir_server::state::AppState;

/// `palantir health`: liveness probe for container health checks.
///
/// Calls `GET http://localhost:$PALANTIR_PORT/health` and exits 0 on HTTP 200,
/// 1 otherwise.
fn run_health_check() -> ! {
    let port = std::env::var("PALANTIR_PORT").unwrap_or_else(|_| "3000".to_string());
    let url = format!("http://localhost:{}/health", port);
    match ureq::get(&url).call() {
        Ok(resp) if resp.status() == 200 => std::process::exit(0),
        _ => std::process::exit(1),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(|s| s.as_str()) == Some("health") {
        run_health_check();
    }

    // Structured JSON logs; RUST_LOG overrides the default level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("palantir=info".parse()?),
        )
        .json()
        .init();

    let cfg = palantir_server::config::Config::from_env()?;

    std::fs::create_dir_all(&cfg.data_dir)?;
    let db_path = format!("{}/palantir.db", cfg.data_dir);
    let db = palantir_duckdb::DuckDbBackend::open(&db_path, &cfg.duckdb_memory_limit)?;

    info!(
        service = %cfg.service_name,
        public_url = %cfg.public_url,
        breakdown_limit = cfg.breakdown_limit,
        "Configuration loaded"
    );

    let addr = format!("0.0.0.0:{}", cfg.port);
    let port = cfg.port;
    let state = Arc::new(AppState::new(db, cfg));
    let app = palantir_server::app::build_app(state);

    info!(port, "Palantir listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    info!("Shut down cleanly");
    Ok(())
}
