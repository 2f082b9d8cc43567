//! MQTT ingest and query service for homelog telemetry.
//!
//! The service subscribes to the device telemetry topics and the
//! per-client request topics, persists normalized readings to the
//! local SQLite store, and answers historical queries on per-client
//! reply topics.
//!
//! # Topics
//!
//! - `home/temperature`, `home/power`, `home/fingerprint` — device
//!   telemetry (JSON payloads).
//! - `home/get{temp,power,fingerprint}/{client_id}` — query requests
//!   (`{"device_id": ..., "date": "YYYY-MM-DD"}`).
//! - `home/data{temp,power,fingerprint}/{client_id}` — query
//!   responses (`{"device_id", "date", "count", "records"}`).
//!
//! # Configuration
//!
//! The service reads configuration from `~/.config/homelog/config.toml`:
//!
//! ```toml
//! [mqtt]
//! broker = "mqtt://localhost:1883"
//! client_id = "homelog"
//! qos = 1
//!
//! [storage]
//! path = "~/.local/share/homelog/data.db"
//! ```
//!
//! Messages that fail validation are logged and dropped; no error is
//! published back to the bus. A reply topic carries either a
//! well-formed envelope or nothing.

pub mod config;
pub mod dispatch;
pub mod mqtt;
pub mod request;

pub use config::{Config, ConfigError, MqttConfig, StorageConfig};
pub use dispatch::handle_message;
pub use request::PublishInstruction;
