//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default server root
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Directory under $HOME holding config and logs
pub const CONFIG_DIR_NAME: &str = ".recordbook";

pub const CONFIG_FILE_NAME: &str = "config.yaml";

pub const LOG_FILE_NAME: &str = "recordbook.log";

// API paths, relative to the base URL
pub const PATH_LIST: &str = "/api/list";
pub const PATH_CREATE: &str = "/api/create";
pub const PATH_UPDATE: &str = "/api/update";
pub const PATH_DELETE: &str = "/api/delete";
pub const PATH_ITEMS: &str = "/api/items";

/// Application name
pub const APP_NAME: &str = "Recordbook";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
