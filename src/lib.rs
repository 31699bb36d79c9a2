//! # Recordbook TUI
//!
//! A terminal client for small JSON CRUD record services.
//!
//! ## Features
//! - Record table with keyboard navigation
//! - Create/edit dialog with per-field validation
//! - Delete with confirmation
//! - Two server dialects: `items` (SQLite-backed) and `todos`
//! - Headless `list`, `show` and `delete` subcommands
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod ui;
pub mod messages;
pub mod app;
pub mod network;

// Re-export commonly used types
pub use config::{Config, Overrides};
pub use error::{ApiError, ConfigError, Operation};
pub use models::{ApiDialect, Record, RecordFields, Visibility};
pub use messages::{UiEvent, ApiCommand, ApiResponse, RenderState};
pub use app::{AppState, AppActor};
pub use network::{NetworkActor, RemoteClient};
