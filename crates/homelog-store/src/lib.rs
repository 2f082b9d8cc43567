//! Date-partitioned SQLite persistence for homelog telemetry.
//!
//! One append-only log table per record kind, indexed by device and
//! by calendar date so the per-device-per-day queries the request
//! path issues never scan unrelated rows. No update or delete path
//! exists; records are written once by the normalizer and only ever
//! read back.
//!
//! # Example
//!
//! ```no_run
//! use homelog_store::Store;
//!
//! let store = Store::open_default()?;
//! let logs = store.temperature_by_device_and_date("t1", "2026-01-22")?;
//! # Ok::<(), homelog_store::Error>(())
//! ```

mod error;
mod models;
mod schema;
mod store;

pub use error::{Error, Result};
pub use models::{StoredFingerprint, StoredPowerStatus, StoredTemperature};
pub use store::Store;

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/homelog/data.db`
/// - macOS: `~/Library/Application Support/homelog/data.db`
/// - Windows: `C:\Users\<user>\AppData\Local\homelog\data.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("homelog")
        .join("data.db")
}
