//! Core logic for the inventory tracker.
//! Storage access, form validation and the dashboard state machine live here;
//! front ends only render state and forward user gestures.

pub mod config;
pub mod dashboard;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use config::{Args, Config, ConfigError, DatabaseConfig, LoggingConfig};
pub use dashboard::driver::{Dashboard, DashboardView};
pub use dashboard::form::{validate, Field, FormFields, ValidationError};
pub use dashboard::state::{
    reduce, Action, Confirmation, DashboardState, Effect, Failure, FormPhase, Mutation, Notice,
    NoticeLevel, PendingChange,
};
pub use logging::{
    default_log_level, init_from_config, init_logging, init_stderr_logging, logging_status,
    LogTarget, LoggingError,
};
pub use model::item::{Item, ItemId, ItemValidationError, NewItem};
pub use repo::item_repo::{ItemStore, SqliteItemStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
