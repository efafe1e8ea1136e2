use std::path::Path;

use seatwatch::admin;
use seatwatch::utils::async_task::spawn_task;
use seatwatch::utils::file_io::open_file_for_append;
use seatwatch::EngineBuilder;
use seatwatch::Error;
use seatwatch::Result;
use seatwatch::SeatWatchConfig;
use tokio::signal::unix::signal;
use tokio::signal::unix::SignalKind;
use tokio::sync::watch;
use tracing::error;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;

const LOG_FILE_NAME: &str = "seatwatch.log";

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<()> {
    let settings = SeatWatchConfig::new()?.validate()?;

    // Initializing Logs
    let _guard = init_observability(&settings.service.log_dir)?;

    // Initializing Shutdown Signal
    let (graceful_tx, mut graceful_rx) = watch::channel(());

    let engine = EngineBuilder::new(settings.clone()).build()?;
    let restored = engine.start();
    info!(restored, "watch engine running. Waiting for shutdown signal...");

    let mut handles = Vec::new();
    if settings.service.admin_enabled {
        let admin_engine = engine.clone();
        let admin_rx = graceful_rx.clone();
        let addr = settings.service.admin_listen_address;
        spawn_task(
            "admin_server",
            move || admin::start_server(addr, admin_engine, admin_rx),
            Some(&mut handles),
        );
    }

    // Listen on Shutdown Signal
    spawn_task("graceful_shutdown", move || graceful_shutdown(graceful_tx), None);

    let _ = graceful_rx.changed().await;

    let report = engine.shutdown().await;
    info!(joined = report.joined, aborted = report.aborted, "pollers stopped");

    for handle in handles {
        if let Err(e) = handle.await {
            error!("admin server task failed: {:?}", e);
        }
    }

    println!("Exiting program.");
    Ok(())
}

async fn graceful_shutdown(graceful_tx: watch::Sender<()>) -> Result<()> {
    let mut sigint = signal(SignalKind::interrupt()).map_err(|e| Error::Fatal(format!("SIGINT handler: {e}")))?;
    let mut sigterm = signal(SignalKind::terminate()).map_err(|e| Error::Fatal(format!("SIGTERM handler: {e}")))?;
    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT detected.");
        },
        _ = sigterm.recv() => {
            info!("SIGTERM detected.");
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl+C detected.");
        },
    }

    graceful_tx.send(()).map_err(|e| {
        error!("Failed to send shutdown signal: {}", e);
        Error::Fatal(format!("Failed to send shutdown signal: {}", e))
    })?;

    info!("Shutdown signal sent");
    Ok(())
}

fn init_observability(log_dir: &Path) -> Result<WorkerGuard> {
    let log_path = log_dir.join(LOG_FILE_NAME);
    let log_file = open_file_for_append(&log_path)
        .map_err(|e| Error::Fatal(format!("could not open log file {}: {e}", log_path.display())))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);
    let base_subscriber = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::from_default_env());
    tracing_subscriber::registry().with(base_subscriber).init();

    Ok(guard)
}
