//! Historical-data request handling.
//!
//! A request carries `{device_id, date}`; the service answers with an
//! envelope `{device_id, date, count, records}` on the requesting
//! client's own reply topic. Record projection differs per device
//! type: fingerprint rows re-expose the auth result under the
//! device-facing `authStatus` key, while temperature and power rows
//! keep their stored field names.

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use homelog_core::{DeviceType, ValidationError, normalize::validate_date, response_topic};
use homelog_store::Store;

/// A response ready for publication on the bus.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishInstruction {
    /// Reply topic, derived from the device type and client id.
    pub topic: String,
    /// JSON envelope bytes.
    pub payload: Vec<u8>,
}

/// Why a request produced no response.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The request payload failed validation; dropped silently.
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// The store lookup failed; no partial response is published.
    #[error("store lookup failed: {0}")]
    Store(#[from] homelog_store::Error),
}

#[derive(Deserialize)]
struct RawRequest {
    device_id: Option<String>,
    date: Option<String>,
}

/// A validated historical-data request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// Device whose records are requested.
    pub device_id: String,
    /// Exact calendar date (`YYYY-MM-DD`) to query.
    pub date: String,
}

/// Parse and validate a raw request payload.
pub fn parse_request(raw: &[u8]) -> Result<QueryRequest, ValidationError> {
    let raw: RawRequest = serde_json::from_slice(raw)?;

    let device_id = raw
        .device_id
        .ok_or(ValidationError::MissingField("device_id"))?;
    let date = raw.date.ok_or(ValidationError::MissingField("date"))?;

    validate_date(&date)?;

    Ok(QueryRequest { device_id, date })
}

/// Resolve a request against the store and shape the response.
///
/// A well-formed request always yields an envelope, including
/// `count: 0, records: []` when nothing matches. Failures are
/// returned to the caller, which logs and drops them.
pub fn handle_query(
    store: &Store,
    device_type: DeviceType,
    client_id: &str,
    raw: &[u8],
) -> Result<PublishInstruction, QueryError> {
    let request = parse_request(raw)?;

    let records = query_records(store, device_type, &request)?;
    let count = records.len();

    debug!(
        "Resolved {} query for {} on {}: {} record(s)",
        device_type, request.device_id, request.date, count
    );

    let envelope = json!({
        "device_id": request.device_id,
        "date": request.date,
        "count": count,
        "records": records,
    });

    Ok(PublishInstruction {
        topic: response_topic(device_type, client_id),
        payload: envelope.to_string().into_bytes(),
    })
}

/// Fetch and project the matching records for one device type.
fn query_records(
    store: &Store,
    device_type: DeviceType,
    request: &QueryRequest,
) -> Result<Vec<Value>, homelog_store::Error> {
    let rows = match device_type {
        DeviceType::Temperature => store
            .temperature_by_device_and_date(&request.device_id, &request.date)?
            .into_iter()
            .map(|r| {
                json!({
                    "temperature": r.temperature,
                    "humidity": r.humidity,
                    "status": r.status,
                    "timestamp": r.timestamp,
                })
            })
            .collect(),
        DeviceType::Power => store
            .power_by_device_and_date(&request.device_id, &request.date)?
            .into_iter()
            .map(|r| {
                json!({
                    "ebstatus": r.ebstatus,
                    "dgstatus": r.dgstatus,
                    "timestamp": r.timestamp,
                })
            })
            .collect(),
        DeviceType::Fingerprint => store
            .fingerprint_by_device_and_date(&request.device_id, &request.date)?
            .into_iter()
            .map(|r| {
                // Device-facing camel-cased key, unlike the stored
                // column name.
                json!({
                    "user_id": r.user_id,
                    "authStatus": r.auth_status,
                    "timestamp": r.timestamp,
                })
            })
            .collect(),
    };

    Ok(rows)
}
