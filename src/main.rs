//! Remote Memory Manager Server
//!
//! Reserves a fixed arena, starts the RPC transport, and runs the
//! background sweeper until asked to shut down.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Arg, Command};
use tokio::signal;
use tracing::{error, info, warn};

use remote_memory_manager::allocator::Allocator;
use remote_memory_manager::core::Config;
use remote_memory_manager::{init_tracing, rpc, sweeper};

#[tokio::main]
async fn main() -> ExitCode {
    let matches = Command::new("remote-memory-manager")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Remote memory manager: typed regions over RPC, backed by a single arena")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path"),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config").map(|s| s.as_str());
    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("configuration error: {error}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.logging);

    info!("starting remote-memory-manager v{}", env!("CARGO_PKG_VERSION"));
    info!(memsize_mb = config.arena.memsize_mb, "reserving arena");

    let allocator = Arc::new(Allocator::new(config.arena.arena_size_bytes()));

    let sweeper_handle = sweeper::spawn(
        allocator.clone(),
        config.arena.dump_folder.clone(),
        config.arena.sweep_interval(),
    );

    let state = rpc::AppState {
        allocator: allocator.clone(),
        dump_folder: config.arena.dump_folder.clone(),
    };
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.server.port));

    let server_task = tokio::spawn(async move { rpc::start_server(addr, state).await });

    tokio::select! {
        _ = signal::ctrl_c() => {
            warn!("received shutdown signal");
        }
        result = server_task => {
            match result {
                Ok(Ok(())) => warn!("server exited"),
                Ok(Err(error)) => {
                    error!(%error, "server failed");
                    sweeper_handle.shutdown().await;
                    return ExitCode::FAILURE;
                }
                Err(error) => error!(%error, "server task panicked"),
            }
        }
    }

    // Sweeper must finish its current iteration (and stop touching the
    // arena) before the process exits and the arena is dropped.
    sweeper_handle.shutdown().await;
    info!("shutdown complete");
    ExitCode::SUCCESS
}
