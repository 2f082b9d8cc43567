//! Message routing and payload normalization for homelog telemetry.
//!
//! This crate holds the pure part of the pipeline: classifying an
//! inbound MQTT topic, validating the heterogeneous device payloads,
//! and turning them into the canonical records the store accepts.
//! Nothing in here touches the network or the database, so every rule
//! is unit-testable in isolation.
//!
//! # Example
//!
//! ```
//! use homelog_core::{RoutedAction, dispatch, normalize};
//!
//! let payload = br#"{"device_id":"t1","temperature":22.5,"humidity":45.3,
//!                    "timestamp":"2026-01-22T14:30:00"}"#;
//!
//! match dispatch("home/temperature", payload) {
//!     RoutedAction::Ingest { device_type, payload } => {
//!         let record = normalize(device_type, payload)?;
//!         assert_eq!(record.date(), "2026-01-22");
//!     }
//!     _ => unreachable!(),
//! }
//! # Ok::<(), homelog_core::ValidationError>(())
//! ```

pub mod error;
pub mod normalize;
pub mod router;
pub mod types;

pub use error::{Result, ValidationError};
pub use normalize::normalize;
pub use router::{RoutedAction, dispatch, response_topic};
pub use types::{DeviceType, FingerprintRecord, PowerStatusRecord, Record, TemperatureRecord};
