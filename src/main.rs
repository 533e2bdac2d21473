//! Configuration service
//!
//! ```text
//!   startup                         ┌──────────────────────────────┐
//!   ───────                         │          HTTP server         │
//!   .env ──▶ bootstrap ──▶ store ──▶│ GET  /config/                │
//!                 │          │      │ POST /config/{section}/{key} │
//!          template copy     │      │ POST /config/reload          │
//!                            ▼      └──────────────┬───────────────┘
//!                        settings ◀── reload ──────┘
//!                            ▲
//!                       SIGHUP reload
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use doctor_config::lifecycle::{self, signals, Shutdown, StartupOptions};
use doctor_config::observability::{logging, metrics};
use doctor_config::HttpServer;

#[derive(Parser)]
#[command(name = "doctor-config")]
#[command(about = "Serve and manage the slow query doctor configuration", long_about = None)]
struct Args {
    /// Config file to use instead of searching the default locations.
    #[arg(short, long, env = "DOCTOR_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Template written on first run instead of the bundled default.
    #[arg(long)]
    template: Option<PathBuf>,

    /// Environment file loaded before settings are resolved.
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load before tracing so RUST_LOG from the file applies.
    let env_file = lifecycle::load_env_file(args.env_file.as_deref())?;
    logging::init_tracing();

    tracing::info!("doctor-config v{} starting", env!("CARGO_PKG_VERSION"));
    if let Some(path) = env_file {
        tracing::info!(path = %path.display(), "Loaded environment file");
    }

    let options = StartupOptions {
        config_path: args.config,
        template: args.template,
    };
    let state = lifecycle::initialize(&options)?;
    let settings = state.settings.current();

    tracing::info!(
        config_path = %state.store.path().display(),
        bind_address = %settings.bind_address(),
        llm_model = %settings.ollama_model,
        "Configuration loaded"
    );

    if settings.metrics_enabled {
        match settings.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %settings.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(settings.bind_address()).await?;

    let shutdown = Shutdown::new();
    let reloader = signals::spawn_reload_on_hangup(state.settings.clone(), shutdown.subscribe());
    let server = HttpServer::new(state);
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    signals::wait_for_termination().await;
    shutdown.trigger();

    server_task.await??;
    let _ = reloader.await;

    tracing::info!("Shutdown complete");
    Ok(())
}
