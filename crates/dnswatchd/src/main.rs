// # dnswatchd - DNS Watch Daemon
//
// The dnswatchd daemon is responsible for:
// 1. Reading daemon configuration from environment variables
// 2. Loading the watch configuration file
// 3. Wiring the resolver and notifier into the engine
// 4. Running check passes (one-shot or on an interval)
//
// This is a thin integration layer only. All checking logic lives in
// dnswatch-core; resolution and alert delivery live in their adapter
// crates.
//
// ## Configuration
//
// All daemon configuration is done via environment variables:
//
// ### Watch Configuration
// - `DNSWATCH_CONFIG`: Path to the JSON watch configuration (default: config.json)
//
// ### Notifications
// - `DNSWATCH_WEBHOOK_URL`: Incoming-webhook endpoint for alerts.
//   Unset means alerts cannot be delivered; checks still run.
//
// ### Scheduling
// - `DNSWATCH_INTERVAL_SECS`: Seconds between check passes.
//   Unset means run a single pass and exit.
//
// ### Resolution
// - `DNSWATCH_LOOKUP_TIMEOUT_SECS`: Per-lookup timeout in seconds (default: 5)
//
// ### Operation
// - `DNSWATCH_MODE`: live or dry-run (default: live)
// - `DNSWATCH_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export DNSWATCH_CONFIG=/etc/dnswatch/config.json
// export DNSWATCH_WEBHOOK_URL=https://hooks.example.com/services/T0/B0/secret
// export DNSWATCH_INTERVAL_SECS=300
//
// dnswatchd
// ```
//
// ## Exit Codes
//
// - 0: clean shutdown (pass completed, or shutdown signal received)
// - 1: configuration or startup error
// - 2: runtime error

use anyhow::Result;
use std::env;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use dnswatch_core::{PassReport, WatchConfig, WatchEngine};
use dnswatch_notify_webhook::WebhookNotifier;
use dnswatch_resolver_hickory::HickoryResolver;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::IntervalStream;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Default per-lookup timeout in seconds
const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 5;

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum WatchExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<WatchExitCode> for ExitCode {
    fn from(code: WatchExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    config_path: String,
    webhook_url: Option<String>,
    interval_secs: Option<u64>,
    lookup_timeout_secs: u64,
    mode: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            config_path: env::var("DNSWATCH_CONFIG")
                .unwrap_or_else(|_| "config.json".to_string()),
            webhook_url: env::var("DNSWATCH_WEBHOOK_URL")
                .ok()
                .filter(|v| !v.is_empty()),
            // 0 means the same as unset: one pass, then exit
            interval_secs: parse_env_u64("DNSWATCH_INTERVAL_SECS")?.filter(|&v| v != 0),
            lookup_timeout_secs: parse_env_u64("DNSWATCH_LOOKUP_TIMEOUT_SECS")?
                .unwrap_or(DEFAULT_LOOKUP_TIMEOUT_SECS),
            mode: env::var("DNSWATCH_MODE").unwrap_or_else(|_| "live".to_string()),
            log_level: env::var("DNSWATCH_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    ///
    /// Covers value enumeration, numeric ranges, and URL scheme checks.
    /// The watch configuration file itself is validated when loaded.
    fn validate(&self) -> Result<()> {
        if self.config_path.is_empty() {
            anyhow::bail!(
                "DNSWATCH_CONFIG cannot be empty. \
                Set it via: export DNSWATCH_CONFIG=/etc/dnswatch/config.json"
            );
        }

        // Validate webhook URL scheme. The URL itself is a credential and
        // never appears in messages or logs.
        if let Some(ref url) = self.webhook_url {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                anyhow::bail!("DNSWATCH_WEBHOOK_URL must use HTTP or HTTPS scheme");
            }

            if url.starts_with("http://") {
                eprintln!(
                    "WARNING: DNSWATCH_WEBHOOK_URL uses HTTP (not HTTPS). \
                          This is less secure. Consider using HTTPS."
                );
            }
        }

        // Validate numeric ranges
        if let Some(interval) = self.interval_secs
            && !(10..=86400).contains(&interval)
        {
            anyhow::bail!(
                "DNSWATCH_INTERVAL_SECS must be between 10 and 86400 seconds. Got: {}",
                interval
            );
        }

        if !(1..=60).contains(&self.lookup_timeout_secs) {
            anyhow::bail!(
                "DNSWATCH_LOOKUP_TIMEOUT_SECS must be between 1 and 60 seconds. Got: {}",
                self.lookup_timeout_secs
            );
        }

        // Validate mode
        match self.mode.as_str() {
            "live" | "dry-run" => {}
            _ => anyhow::bail!(
                "DNSWATCH_MODE '{}' is not valid. Valid modes: live, dry-run",
                self.mode
            ),
        }

        // Validate log level
        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "DNSWATCH_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }
}

/// Read an optional integer environment variable
///
/// Unset is `None`; set but unparsable is an error rather than a silent
/// fallback, so typos surface at startup.
fn parse_env_u64(name: &str) -> Result<Option<u64>> {
    match env::var(name) {
        Ok(raw) => {
            let value = raw.parse::<u64>().map_err(|_| {
                anyhow::anyhow!("{} must be an integer number of seconds. Got: {}", name, raw)
            })?;
            Ok(Some(value))
        }
        Err(_) => Ok(None),
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return WatchExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return WatchExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return WatchExitCode::ConfigError.into();
    }

    info!("Starting dnswatchd daemon");

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return WatchExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        match run_daemon(config).await {
            Ok(()) => WatchExitCode::CleanShutdown,
            Err(e) => {
                error!("Daemon error: {}", e);
                exit_code_for(&e)
            }
        }
    });

    result.into()
}

/// Map a daemon error to its exit code
///
/// Problems with the watch configuration or startup wiring exit with 1
/// so operators can tell them apart from runtime failures (2).
fn exit_code_for(err: &anyhow::Error) -> WatchExitCode {
    match err.downcast_ref::<dnswatch_core::Error>() {
        Some(
            dnswatch_core::Error::ConfigMissing { .. }
            | dnswatch_core::Error::ConfigMalformed { .. }
            | dnswatch_core::Error::Config(_)
            | dnswatch_core::Error::Resolver(_),
        ) => WatchExitCode::ConfigError,
        _ => WatchExitCode::RuntimeError,
    }
}

/// Run the daemon
async fn run_daemon(config: Config) -> Result<()> {
    // Load the watch configuration up front; a missing or malformed file
    // is fatal before any lookup starts
    let watch_config = WatchConfig::load(&config.config_path)?;

    let dry_run = config.mode == "dry-run";
    if dry_run {
        warn!("dnswatchd running in DRY-RUN mode - no webhook requests will be made");
    } else if config.webhook_url.is_none() {
        warn!("DNSWATCH_WEBHOOK_URL is not set; alerts will be logged as failed deliveries");
    }

    let resolver = HickoryResolver::new(Duration::from_secs(config.lookup_timeout_secs))?;
    let notifier = WebhookNotifier::new(config.webhook_url.clone(), dry_run);

    let (engine, mut event_rx) =
        WatchEngine::new(Box::new(resolver), Box::new(notifier), watch_config)?;

    // Drain engine events at debug level; the task ends once the engine
    // (and with it the sender) is dropped
    let event_task = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!("Engine event: {:?}", event);
        }
    });

    match config.interval_secs {
        Some(interval_secs) => {
            run_periodic(&engine, Duration::from_secs(interval_secs)).await?;
        }
        None => {
            let report = engine.run_once().await;
            log_report(&report);
        }
    }

    // Close the event channel so the drain task can finish
    drop(engine);
    if tokio::time::timeout(Duration::from_secs(1), event_task)
        .await
        .is_err()
    {
        warn!("Event drain task did not finish promptly");
    }

    Ok(())
}

/// Run check passes on a fixed interval until a shutdown signal arrives
///
/// The first pass runs immediately. A pass that outlasts the interval
/// delays the next tick rather than overlapping it; passes never run
/// concurrently.
#[cfg(unix)]
async fn run_periodic(engine: &WatchEngine, period: Duration) -> Result<()> {
    let mut ticks = IntervalStream::new(tokio::time::interval(period));

    // Register handlers once so signals arriving mid-pass are not lost
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    info!("Scheduling a check pass every {:?}", period);

    loop {
        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received shutdown signal: SIGTERM");
                return Ok(());
            }
            _ = sigint.recv() => {
                info!("Received shutdown signal: SIGINT");
                return Ok(());
            }
            tick = ticks.next() => {
                if tick.is_none() {
                    return Ok(());
                }
                let report = engine.run_once().await;
                log_report(&report);
            }
        }
    }
}

/// Run check passes on a fixed interval until CTRL-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn run_periodic(engine: &WatchEngine, period: Duration) -> Result<()> {
    let mut ticks = IntervalStream::new(tokio::time::interval(period));

    info!("Scheduling a check pass every {:?}", period);

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
                info!("Received shutdown signal: SIGINT");
                return Ok(());
            }
            tick = ticks.next() => {
                if tick.is_none() {
                    return Ok(());
                }
                let report = engine.run_once().await;
                log_report(&report);
            }
        }
    }
}

/// Log a pass summary at the appropriate level
fn log_report(report: &PassReport) {
    if report.mismatched == 0 && report.failed == 0 {
        info!(
            "All {} domain(s) match their expected addresses ({} ms)",
            report.checked, report.duration_ms
        );
    } else {
        warn!(
            "Pass finished with {} mismatch(es) and {} failure(s) out of {} domain(s)",
            report.mismatched, report.failed, report.checked
        );
    }

    if report.notifications_failed > 0 {
        warn!(
            "{} alert(s) could not be delivered",
            report.notifications_failed
        );
    }

    // One machine-readable line per pass, for log scrapers
    match serde_json::to_string(report) {
        Ok(rendered) => info!("Pass report: {}", rendered),
        Err(e) => warn!("Pass report not serializable: {}", e),
    }
}
