//! Topic-to-handler dispatch.
//!
//! Routing is purely syntactic: the topic string alone decides whether
//! a message is telemetry to ingest, a historical-data request, or
//! unrelated bus traffic. Payloads are carried through untouched.

use crate::types::DeviceType;

/// Telemetry topic for temperature/humidity sensors.
pub const TEMPERATURE_TOPIC: &str = "home/temperature";
/// Telemetry topic for power status monitors.
pub const POWER_TOPIC: &str = "home/power";
/// Telemetry topic for fingerprint terminals.
pub const FINGERPRINT_TOPIC: &str = "home/fingerprint";

/// Request topic prefixes; the segment after the prefix is the
/// requesting client's id, taken verbatim.
const TEMP_REQUEST_PREFIX: &str = "home/gettemp/";
const POWER_REQUEST_PREFIX: &str = "home/getpower/";
const FINGERPRINT_REQUEST_PREFIX: &str = "home/getfingerprint/";

/// Classification of an inbound message.
#[derive(Debug, PartialEq, Eq)]
pub enum RoutedAction<'a> {
    /// Telemetry from a device: normalize and persist.
    Ingest {
        device_type: DeviceType,
        payload: &'a [u8],
    },
    /// Historical-data request from a client: query and reply on the
    /// client's response topic.
    Query {
        device_type: DeviceType,
        client_id: String,
        payload: &'a [u8],
    },
    /// Unrecognized topic. Not an error; the bus may carry unrelated
    /// traffic.
    Ignore,
}

/// Classify an inbound message by its topic.
pub fn dispatch<'a>(topic: &str, payload: &'a [u8]) -> RoutedAction<'a> {
    let ingest = |device_type| RoutedAction::Ingest {
        device_type,
        payload,
    };

    match topic {
        TEMPERATURE_TOPIC => return ingest(DeviceType::Temperature),
        POWER_TOPIC => return ingest(DeviceType::Power),
        FINGERPRINT_TOPIC => return ingest(DeviceType::Fingerprint),
        _ => {}
    }

    let request = [
        (TEMP_REQUEST_PREFIX, DeviceType::Temperature),
        (POWER_REQUEST_PREFIX, DeviceType::Power),
        (FINGERPRINT_REQUEST_PREFIX, DeviceType::Fingerprint),
    ]
    .into_iter()
    .find_map(|(prefix, device_type)| {
        topic
            .strip_prefix(prefix)
            .filter(|rest| !rest.is_empty())
            .map(|client_id| (device_type, client_id))
    });

    match request {
        Some((device_type, client_id)) => RoutedAction::Query {
            device_type,
            client_id: client_id.to_string(),
            payload,
        },
        None => RoutedAction::Ignore,
    }
}

/// Response topic for a given device type and client.
///
/// Per-client topic partitioning is the only request/response
/// correlation the bus offers: a response lands only on the topic the
/// requesting client subscribed to, so concurrent clients never see
/// each other's data.
pub fn response_topic(device_type: DeviceType, client_id: &str) -> String {
    format!("home/data{}/{}", device_type.tag(), client_id)
}
