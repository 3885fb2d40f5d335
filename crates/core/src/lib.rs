pub mod config;
pub mod consumer;
pub mod database;
pub mod engine;
pub mod metrics;
pub mod order;
pub mod producer;
pub mod queue;
pub mod signal;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DatabaseConfig,
    EngineConfig, SanitizedConfig,
};
pub use consumer::WorkerConfig;
pub use database::{
    Connector, DatabaseError, QueryRunner, RawResult, ResultStatus, SqliteConnector,
};
pub use engine::{EngineStatus, QueryDesk};
pub use order::{Order, OrderCallback, PendingOrder, Table, Ticket, TicketStatus};
pub use producer::{Producer, SubmittedOrder};
pub use queue::{Listener, QueueCounts, SharedQueue};
pub use signal::{CondvarSignal, WakeSignal};
