//! Bookshelf server.
//!
//! # Architecture Overview
//!
//! ```text
//!   routes/ (convention)      manifest (location → module)
//!          │                          │
//!          └──────────┬───────────────┘
//!                     ▼
//!               ┌───────────┐    ┌──────────────┐    ┌─────────────┐
//!               │ RouteTree │───▶│ TableBuilder │───▶│ RouteTable  │
//!               └───────────┘    └──────────────┘    └──────┬──────┘
//!                                                           │ frozen, shared
//!                                                           ▼
//!   Client ───▶ trace / request-id / body limit ───▶ Dispatcher ───▶ Chain
//!                                                                 m1..mk → handler
//! ```
//!
//! Startup aborts on any route table error; no listener is bound until the
//! table is complete.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use shelf_server::app::{self, Services};
use shelf_server::config::{load_config, AppConfig};
use shelf_server::http::HttpServer;
use shelf_server::lifecycle::Shutdown;
use shelf_server::observability::logging;
use shelf_server::routing::{RouteState, RouteTable};

#[derive(Parser)]
#[command(name = "shelf-server", version, about = "Bookshelf server with convention-based routing")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Build the route table and serve it (default)
    Serve,
    /// Build the route table, print it and exit
    Routes,
}

fn print_routes(table: &RouteTable) {
    for entry in table.iter() {
        let marker = match entry.state {
            RouteState::Active => "",
            RouteState::Disabled => "  (reserved)",
        };
        let middleware = entry.chain.middleware_names().join(" → ");
        println!(
            "{:<7} {:<32} [{}] {}{}",
            entry.method.as_str(),
            entry.path,
            middleware,
            entry.origin,
            marker
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    logging::init(&config.observability);
    tracing::info!("shelf-server v{} starting", env!("CARGO_PKG_VERSION"));

    let services = Services::bootstrap(&config).await?;
    let table = match app::build_table(&config, &services) {
        Ok(table) => Arc::new(table),
        Err(e) => {
            tracing::error!(error = %e, "Route table rejected, not starting");
            return Err(e.into());
        }
    };

    if let Some(Command::Routes) = cli.command {
        print_routes(&table);
        return Ok(());
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        max_body_bytes = config.http.max_body_bytes,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server = HttpServer::new(table, config.http.max_body_bytes);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
