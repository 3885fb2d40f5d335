use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use querydesk_core::{
    load_config, metrics, validate_config, Config, Listener, Order, QueryDesk, SanitizedConfig,
    Ticket, TicketStatus,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// How long the demo session waits for each delivery
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// One delivery from the engine's listener, re-entering the caller thread.
enum Delivery {
    Performed(Ticket),
    Cancelled(Ticket),
    Failed(Ticket),
}

/// Listener forwarding every delivery into a channel drained by the caller
/// thread, so results are handled off the worker thread.
struct ChannelListener {
    tx: Mutex<Sender<Delivery>>,
}

impl Listener for ChannelListener {
    fn on_performed(&self, ticket: &Ticket) {
        let _ = self.tx.lock().unwrap().send(Delivery::Performed(ticket.clone()));
    }

    fn on_cancelled(&self, ticket: &Ticket) {
        let _ = self.tx.lock().unwrap().send(Delivery::Cancelled(ticket.clone()));
    }

    fn on_failure(&self, ticket: &Ticket) {
        let _ = self.tx.lock().unwrap().send(Delivery::Failed(ticket.clone()));
    }
}

fn main() {
    if let Err(e) = run() {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("QUERYDESK_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration, falling back to defaults when no file is present
    let config = if config_path.exists() {
        info!("Loading configuration from {:?}", config_path);
        load_config(&config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?
    } else {
        info!("No configuration file at {:?}, using defaults", config_path);
        Config::default()
    };

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    // Compute config fingerprint for the startup log
    let config_json = serde_json::to_string(&SanitizedConfig::from(&config)).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(
        "Configuration loaded (fingerprint {})",
        &config_hash[..16]
    );
    info!("Database path: {:?}", config.database.path);

    // Register engine metrics
    let registry = prometheus::Registry::new();
    for metric in metrics::all_metrics() {
        registry
            .register(metric)
            .context("Failed to register metrics")?;
    }
    info!("Metrics registered");

    // Build the engine and wire the channel-backed listener
    let mut engine = QueryDesk::open(&config);
    let (tx, rx) = mpsc::channel();
    engine.bind(Arc::new(ChannelListener { tx: Mutex::new(tx) }));

    info!("querydesk {} started", VERSION);

    let outstanding = submit_demo_orders(&engine);
    drain_deliveries(&engine, &rx, outstanding);

    // Graceful shutdown: stop the worker, then drop whatever was left
    engine.shutdown();
    engine.reset();

    log_metric_totals(&registry);
    info!("querydesk stopped");

    Ok(())
}

/// Submit the demo session: a table, some rows, a select, and one order
/// that is cancelled right after submission. Returns the number of
/// deliveries to expect.
fn submit_demo_orders(engine: &QueryDesk) -> usize {
    let statements = [
        "CREATE TABLE IF NOT EXISTS notes (id INTEGER PRIMARY KEY, body TEXT)",
        "INSERT INTO notes (body) VALUES ('first note'), ('second note')",
        "SELECT id, body FROM notes ORDER BY id",
    ];

    let mut outstanding = 0;
    for query in statements {
        let ticket = engine.queue(Order::new(query, "demo-session"));
        match ticket.status {
            TicketStatus::Pending => {
                info!("Order {} accepted: {}", ticket.uuid, query);
                outstanding += 1;
            }
            _ => warn!("Order rejected ({}): {}", ticket.reason, query),
        }
    }

    // One order is cancelled immediately; its delivery (cancelled, or
    // performed if execution won the race) still arrives exactly once.
    let doomed = engine.queue(Order::new("SELECT body FROM notes WHERE id = 1", "demo-session"));
    if doomed.is_pending() {
        engine.cancel(&doomed);
        info!("Order {} cancelled right after submission", doomed.uuid);
        outstanding += 1;
    }

    outstanding
}

/// Drain deliveries on the caller thread, releasing each outcome.
fn drain_deliveries(engine: &QueryDesk, rx: &Receiver<Delivery>, mut outstanding: usize) {
    while outstanding > 0 {
        match rx.recv_timeout(DELIVERY_TIMEOUT) {
            Ok(Delivery::Performed(ticket)) => {
                let released = engine.release_executed(&ticket.uuid, |order| {
                    if let Some(table) = order.result() {
                        info!(
                            "Order {} performed: {} column(s), {} row(s)",
                            order.uuid(),
                            table.column_count(),
                            table.row_count()
                        );
                        for row in &table.rows {
                            info!("  {}", row.join(" | "));
                        }
                    }
                });
                if !released {
                    info!("Order {} result suppressed by cancellation", ticket.uuid);
                }
                outstanding -= 1;
            }
            Ok(Delivery::Cancelled(ticket)) => {
                engine.release_cancelled(&ticket.uuid, |order| {
                    info!("Order {} cancelled before delivery", order.uuid());
                });
                outstanding -= 1;
            }
            Ok(Delivery::Failed(ticket)) => {
                engine.release_failed(&ticket.uuid, |order| {
                    if let Some(error) = order.error() {
                        warn!("Order {} failed: {}", order.uuid(), error);
                    }
                });
                outstanding -= 1;
            }
            Err(_) => {
                warn!(
                    "Timed out waiting for deliveries, {} outstanding",
                    outstanding
                );
                break;
            }
        }
    }
}

/// Log the engine counters collected during the session.
fn log_metric_totals(registry: &prometheus::Registry) {
    for family in registry.gather() {
        for metric in family.get_metric() {
            if metric.has_counter() {
                let value = metric.get_counter().get_value();
                if value > 0.0 {
                    info!("{} = {}", family.get_name(), value);
                }
            }
        }
    }
}
