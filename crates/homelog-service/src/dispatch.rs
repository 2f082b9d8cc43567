//! Inbound message dispatch.
//!
//! The single entry point for every message delivered by the
//! transport. Telemetry flows router → normalizer → store; requests
//! flow router → request service → store → reply. Failures follow the
//! drop policy: log and discard, never publish an error back to the
//! bus.

use tracing::{debug, error, info, warn};

use homelog_core::{RoutedAction, dispatch, normalize};
use homelog_store::Store;

use crate::request::{self, PublishInstruction, QueryError};

/// Process one inbound message.
///
/// Returns a response to publish for successfully resolved queries,
/// `None` otherwise (telemetry, ignored traffic, and anything
/// dropped).
pub fn handle_message(store: &Store, topic: &str, payload: &[u8]) -> Option<PublishInstruction> {
    match dispatch(topic, payload) {
        RoutedAction::Ignore => {
            debug!("Ignoring message on unknown topic {}", topic);
            None
        }

        RoutedAction::Ingest {
            device_type,
            payload,
        } => {
            match normalize(device_type, payload) {
                Ok(record) => match store.append(&record) {
                    Ok(_) => {
                        info!(
                            "Stored {} reading from {} at {}",
                            device_type,
                            record.device_id(),
                            record.timestamp()
                        );
                    }
                    Err(e) => {
                        error!("Failed to store {} reading: {}", device_type, e);
                    }
                },
                Err(e) => {
                    warn!("Dropping {} message on {}: {}", device_type, topic, e);
                }
            }
            None
        }

        RoutedAction::Query {
            device_type,
            client_id,
            payload,
        } => match request::handle_query(store, device_type, &client_id, payload) {
            Ok(instruction) => Some(instruction),
            Err(QueryError::Validation(e)) => {
                warn!(
                    "Dropping {} request from client {}: {}",
                    device_type, client_id, e
                );
                None
            }
            Err(QueryError::Store(e)) => {
                // Fail silent: the reply topic carries a well-formed
                // envelope or nothing.
                error!(
                    "Query failed for {} request from client {}: {}",
                    device_type, client_id, e
                );
                None
            }
        },
    }
}
