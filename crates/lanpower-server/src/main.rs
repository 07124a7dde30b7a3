//! lanpower-server entry point.
//!
//! Serves a three-endpoint JSON API that wakes a LAN machine with a
//! Wake-on-LAN magic packet, suspends it over SSH, and reports whether it
//! answers ping.
//!
//! # Usage
//!
//! ```text
//! lanpower-server --wake-mac 00:11:22:33:44:55 --sleep-host 192.168.1.20 --ssh-pass secret
//! ```
//!
//! # Environment variables
//!
//! Every flag can also be set through the environment.  A `.env` file in the
//! working directory is loaded first; it never overrides variables that are
//! already set.  Flags take precedence over both.
//!
//! | Variable          | Default                                                      |
//! |-------------------|--------------------------------------------------------------|
//! | `PORT`            | `8080`                                                       |
//! | `BIND_ADDRESS`    | `0.0.0.0`                                                    |
//! | `WAKE_MAC`        | required                                                     |
//! | `WAKE_BROADCAST`  | `255.255.255.255`                                            |
//! | `WAKE_PORT`       | `9`                                                          |
//! | `SLEEP_HOST`      | required                                                     |
//! | `SSH_PORT`        | `22`                                                         |
//! | `SSH_USER`        | `root`                                                       |
//! | `SSH_PASS`        | required                                                     |
//! | `SLEEP_COMMAND`   | `/usr/sbin/ethtool -s nic0 wol g && /bin/systemctl suspend`  |
//! | `STATIC_DIR`      | unset                                                        |
//! | `LOG_FORMAT`      | `json`                                                       |
//!
//! An invalid or missing value is logged as a single `server_config_error`
//! event and the process exits with status 1 before any socket is bound.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

use lanpower_server::application::PowerService;
use lanpower_server::domain::{RawSettings, ServerConfig};
use lanpower_server::infrastructure::{
    run_server, verify_static_dir, RusshCommandRunner, SystemProcessRunner, UdpWakeTransmitter,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Output format of the log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    /// One JSON object per line.
    Json,
    /// Human-readable single-line records.
    Text,
}

/// Wake, sleep, and probe one machine on the local network over HTTP.
///
/// Values are kept as raw strings here; defaults and range checks are applied
/// by [`RawSettings::validate`] so that every failure is reported the same
/// way.
#[derive(Debug, Parser)]
#[command(
    name = "lanpower-server",
    about = "HTTP control surface to wake, sleep, and probe a LAN machine",
    version
)]
struct Cli {
    /// HTTP listen port.
    #[arg(long, env = "PORT")]
    port: Option<String>,

    /// Interface address the HTTP listener binds to.
    #[arg(long, env = "BIND_ADDRESS")]
    bind_address: Option<String>,

    /// MAC address of the machine to wake, any separators.
    #[arg(long, env = "WAKE_MAC")]
    wake_mac: Option<String>,

    /// Broadcast address the magic packet is sent to.
    #[arg(long, env = "WAKE_BROADCAST")]
    wake_broadcast: Option<String>,

    /// UDP port the magic packet is sent to.
    #[arg(long, env = "WAKE_PORT")]
    wake_port: Option<String>,

    /// Host that runs the sleep command; also the target of the status ping.
    #[arg(long, env = "SLEEP_HOST")]
    sleep_host: Option<String>,

    #[arg(long, env = "SSH_PORT")]
    ssh_port: Option<String>,

    #[arg(long, env = "SSH_USER")]
    ssh_user: Option<String>,

    /// SSH password.  Prefer the environment over the flag so it stays out of
    /// the process list.
    #[arg(long, env = "SSH_PASS", hide_env_values = true)]
    ssh_pass: Option<String>,

    /// Shell command executed on the remote host to suspend it.
    #[arg(long, env = "SLEEP_COMMAND")]
    sleep_command: Option<String>,

    /// Directory of static files served for every non-API path.
    #[arg(long, env = "STATIC_DIR")]
    static_dir: Option<PathBuf>,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    log_format: LogFormat,
}

impl Cli {
    /// Hands the raw values to the domain layer for validation.
    fn into_raw_settings(self) -> RawSettings {
        RawSettings {
            port: self.port,
            bind_address: self.bind_address,
            wake_mac: self.wake_mac,
            wake_broadcast: self.wake_broadcast,
            wake_port: self.wake_port,
            sleep_host: self.sleep_host,
            ssh_port: self.ssh_port,
            ssh_user: self.ssh_user,
            ssh_pass: self.ssh_pass,
            sleep_command: self.sleep_command,
            static_dir: self.static_dir,
        }
    }
}

/// Validates the settings, including the filesystem check on `static_dir`.
fn load_config(raw: RawSettings) -> Result<ServerConfig, lanpower_server::domain::ConfigError> {
    let config = raw.validate()?;
    verify_static_dir(&config)?;
    Ok(config)
}

/// WARN and ERROR go to stderr, everything else to stdout.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .or_else(std::io::stdout);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

/// Resolves on Ctrl+C, or on SIGTERM where that exists.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Startup runs Unconfigured → Validated → Listening exactly once:
///
/// 1. Load `.env`, parse flags and environment.
/// 2. Initialise logging in the requested format.
/// 3. Validate; any error is logged and the process exits with status 1.
/// 4. Wire the production adapters into a [`PowerService`] and serve.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing `.env` is the normal case.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = match load_config(cli.into_raw_settings()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "server_config_error");
            std::process::exit(1);
        }
    };

    info!(
        mac = %config.wake.mac,
        sleep_host = %config.ssh.host,
        "lanpower-server starting"
    );

    let service = Arc::new(PowerService::new(
        Arc::new(config),
        Arc::new(UdpWakeTransmitter::new()),
        Arc::new(RusshCommandRunner::new()),
        Arc::new(SystemProcessRunner),
    ));

    run_server(service, shutdown_signal()).await
}

// ── Tests ─────────────────────────────────────────────────────────────────────
