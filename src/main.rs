use clap::Parser;
use shelf::config::{Cli, Config};
use shelf::db::Database;
use shelf::handler::AppState;
use shelf::routes;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // .env first so PORT can come from it
    dotenvy::dotenv().ok();
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    tracing::info!("shelf.svc starting");

    let cfg = Config::from_cli(&args).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to load config");
        std::process::exit(1);
    });

    let db = if args.in_memory {
        Database::in_memory()
    } else {
        let path = cfg.database_path();
        Database::open(&path).await.unwrap_or_else(|e| {
            tracing::error!(error = %e, path = ?path, "failed to open database");
            std::process::exit(1);
        })
    };

    let app = routes::app(AppState::new(db));

    let address = format!("0.0.0.0:{}", cfg.app.get_port());
    let listener = tokio::net::TcpListener::bind(&address).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup tcp listener");
        std::process::exit(1);
    });

    tracing::info!("shelf.svc running on {}", &address);
    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl+c");
        }
        tracing::info!("ctrl+c signal received, preparing to shutdown");
    };

    if let Err(err) = axum::serve(listener, app).with_graceful_shutdown(shutdown).await {
        tracing::error!(error = %err, "server error");
        std::process::exit(1);
    }

    tracing::info!("shelf.svc going off, graceful shutdown complete");
}
