//! NTRIP bridge
//!
//! Relays RTCM corrections from an NTRIP caster to a GNSS receiver on a
//! serial port and reports the receiver's position back to the caster.
//!
//! Threads:
//! - `relay`: caster session and correction relay
//! - `serial-ingest`: position sentences from the receiver
//! - `health-check`: liveness watchdog and operator stop
//! - `status`: one status line per second
//!
//! The main thread runs a small tokio runtime for signals and the optional
//! HTTP status endpoint.
//!
//! Signals:
//! - Ctrl-C: shut down
//! - SIGUSR1: drop and re-establish the caster connection

mod cli;
mod error;
mod health;
mod logging;
mod reporter;
mod serial;

use std::io::{self, Write};
use std::process;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use clap::Parser;
use ntrip_relay::config::BridgeSettings;
use ntrip_relay::prelude::*;
use tracing::{error, info, warn};

use crate::cli::Cli;
use crate::error::BridgeError;
use crate::reporter::StatusReporter;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        error!(error = %e, "bridge stopped");
        eprintln!("Error: {e}");
        process::exit(e.exit_code());
    }
}

fn run(cli: &Cli) -> Result<(), BridgeError> {
    let _logging = logging::init_logging(cli.log_file.as_deref()).map_err(BridgeError::Logging)?;
    let settings = cli.settings()?;
    info!(
        caster = %settings.caster.address(),
        mountpoint = %settings.caster.mountpoint,
        serial = settings.serial_port.as_deref().unwrap_or("none"),
        "starting bridge"
    );

    let status = Arc::new(SharedStatus::new());
    let shutdown = Signal::new();
    let operator_stop = Signal::new();
    let mut workers = Vec::new();

    let sink: Box<dyn Write + Send> = match &settings.serial_port {
        Some(path) => {
            let port = serial::open(path, settings.serial_baud)?;
            let ingest = SerialIngest::new(port.reader, status.clone())
                .with_prefix(settings.sentence_prefix.clone());
            workers.push(spawn("serial-ingest", &shutdown, move |stop| ingest.run(stop))?);
            Box::new(port.writer)
        }
        None => {
            warn!("no serial port configured, corrections are discarded");
            Box::new(io::sink())
        }
    };

    let relay = relay_loop(&settings, sink, status.clone());
    workers.push(spawn("relay", &shutdown, move |stop| relay.run(stop))?);

    let monitor = HealthMonitor::new(status.clone(), operator_stop.clone());
    workers.push(spawn("health-check", &shutdown, move |stop| monitor.run(stop))?);

    let reporter = StatusReporter::new(status.clone());
    workers.push(spawn("status", &shutdown, move |stop| reporter.run(stop))?);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(BridgeError::Runtime)?;
    let waited = runtime.block_on(async {
        if let Some(bind) = settings.status_bind {
            let status = status.clone();
            tokio::spawn(async move {
                if let Err(e) = health::start_health_server(bind, status).await {
                    error!(%bind, error = %e, "status endpoint failed");
                }
            });
        }
        wait_for_shutdown(&operator_stop).await
    });

    info!("shutting down");
    shutdown.raise();
    for worker in workers {
        if worker.join().is_err() {
            error!("worker thread panicked");
        }
    }
    waited.map_err(BridgeError::Runtime)
}

fn relay_loop(
    settings: &BridgeSettings,
    sink: Box<dyn Write + Send>,
    status: Arc<SharedStatus>,
) -> RelayLoop<TcpConnector, Box<dyn Write + Send>> {
    let connector = TcpConnector::new()
        .connect_timeout(settings.connect_timeout)
        .write_timeout(settings.write_timeout);
    let session = NtripSession::new(settings.caster.clone(), connector);
    RelayLoop::new(session, sink, status)
}

/// Spawn a named worker thread that runs until `shutdown` is raised.
fn spawn<F>(name: &'static str, shutdown: &Signal, task: F) -> Result<JoinHandle<()>, BridgeError>
where
    F: FnOnce(&Signal) + Send + 'static,
{
    let shutdown = shutdown.clone();
    thread::Builder::new()
        .name(name.to_string())
        .spawn(move || task(&shutdown))
        .map_err(|source| BridgeError::Spawn { name, source })
}

/// Wait for Ctrl-C, raising `operator_stop` on every SIGUSR1 meanwhile.
#[cfg(unix)]
async fn wait_for_shutdown(operator_stop: &Signal) -> io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut usr1 = signal(SignalKind::user_defined1())?;
    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => return result,
            received = usr1.recv() => match received {
                Some(()) => {
                    info!("operator stop requested");
                    operator_stop.raise();
                }
                None => return tokio::signal::ctrl_c().await,
            },
        }
    }
}

/// Wait for Ctrl-C.
#[cfg(not(unix))]
async fn wait_for_shutdown(_operator_stop: &Signal) -> io::Result<()> {
    tokio::signal::ctrl_c().await
}
