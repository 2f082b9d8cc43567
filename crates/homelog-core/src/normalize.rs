//! Per-device-type payload normalization.
//!
//! Each device class publishes its own JSON shape; this module turns
//! those into the canonical [`Record`] kinds, enforcing the mandatory
//! fields, the fixed enum vocabularies, and the timestamp format.
//! Validation is strict in a fixed order: JSON parse, required
//! fields, enum decoding, timestamp parse. The calendar date is
//! derived here, once, by truncating the validated timestamp; it is
//! never re-derived at query time.
//!
//! Normalization is stateless and record-local: a power message that
//! addresses only one of the two status fields leaves the other one
//! empty rather than guessing from prior state.

use serde::Deserialize;
use time::PrimitiveDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::error::{Result, ValidationError};
use crate::types::{DeviceType, FingerprintRecord, PowerStatusRecord, Record, TemperatureRecord};

/// Device timestamps: `YYYY-MM-DDTHH:MM:SS`.
const TIMESTAMP_ISO: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Alternate device timestamp form with a space separator.
const TIMESTAMP_SPACED: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Calendar dates: `YYYY-MM-DD`.
const DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Normalize a raw device payload into a canonical record.
pub fn normalize(device_type: DeviceType, payload: &[u8]) -> Result<Record> {
    match device_type {
        DeviceType::Temperature => normalize_temperature(payload).map(Record::Temperature),
        DeviceType::Power => normalize_power(payload).map(Record::Power),
        DeviceType::Fingerprint => normalize_fingerprint(payload).map(Record::Fingerprint),
    }
}

/// Validate a timestamp and return its derived calendar date.
fn derive_date(timestamp: &str) -> Result<String> {
    let parsed = PrimitiveDateTime::parse(timestamp, TIMESTAMP_ISO)
        .or_else(|_| PrimitiveDateTime::parse(timestamp, TIMESTAMP_SPACED))
        .map_err(|_| ValidationError::MalformedTimestamp(timestamp.to_string()))?;

    parsed
        .date()
        .format(DATE)
        .map_err(|_| ValidationError::MalformedTimestamp(timestamp.to_string()))
}

/// Validate a `YYYY-MM-DD` date string (used by request payloads).
pub fn validate_date(date: &str) -> Result<()> {
    time::Date::parse(date, DATE)
        .map(|_| ())
        .map_err(|_| ValidationError::MalformedTimestamp(date.to_string()))
}

fn require<T>(value: Option<T>, name: &'static str) -> Result<T> {
    value.ok_or(ValidationError::MissingField(name))
}

#[derive(Deserialize)]
struct RawTemperature {
    device_id: Option<String>,
    temperature: Option<f64>,
    humidity: Option<f64>,
    status: Option<String>,
    timestamp: Option<String>,
}

fn normalize_temperature(payload: &[u8]) -> Result<TemperatureRecord> {
    let raw: RawTemperature = serde_json::from_slice(payload)?;

    let device_id = require(raw.device_id, "device_id")?;
    let temperature = require(raw.temperature, "temperature")?;
    let humidity = require(raw.humidity, "humidity")?;
    let timestamp = require(raw.timestamp, "timestamp")?;

    // Threshold status is optional on the wire but fixed-vocabulary
    // when present.
    let status = match raw.status {
        Some(s) if s == "HIGH" || s == "LOW" => s,
        Some(s) => {
            return Err(ValidationError::InvalidEnum {
                field: "status",
                value: s,
            });
        }
        None => String::new(),
    };

    let date = derive_date(&timestamp)?;

    Ok(TemperatureRecord {
        device_id,
        temperature,
        humidity,
        status,
        timestamp,
        date,
    })
}

#[derive(Deserialize)]
struct RawPower {
    device_id: Option<String>,
    status: Option<String>,
    timestamp: Option<String>,
}

fn normalize_power(payload: &[u8]) -> Result<PowerStatusRecord> {
    let raw: RawPower = serde_json::from_slice(payload)?;

    let device_id = require(raw.device_id, "device_id")?;
    let status = require(raw.status, "status")?;
    let timestamp = require(raw.timestamp, "timestamp")?;

    // One compound token per message; the field the token does not
    // address stays empty.
    let (ebstatus, dgstatus) = match status.as_str() {
        "EB_ON" => ("ON", ""),
        "EB_OFF" => ("OFF", ""),
        "DG_ON" => ("", "ON"),
        "DG_OFF" => ("", "OFF"),
        _ => {
            return Err(ValidationError::InvalidEnum {
                field: "status",
                value: status,
            });
        }
    };

    let date = derive_date(&timestamp)?;

    Ok(PowerStatusRecord {
        device_id,
        ebstatus: ebstatus.to_string(),
        dgstatus: dgstatus.to_string(),
        timestamp,
        date,
    })
}

#[derive(Deserialize)]
struct RawFingerprint {
    device_id: Option<String>,
    user_id: Option<String>,
    // The terminal emits a camel-cased key; canonical snake case is
    // accepted as well.
    #[serde(rename = "authStatus", alias = "auth_status")]
    auth_status: Option<String>,
    timestamp: Option<String>,
}

fn normalize_fingerprint(payload: &[u8]) -> Result<FingerprintRecord> {
    let raw: RawFingerprint = serde_json::from_slice(payload)?;

    let device_id = require(raw.device_id, "device_id")?;
    let user_id = require(raw.user_id, "user_id")?;
    let auth_status = require(raw.auth_status, "authStatus")?;
    let timestamp = require(raw.timestamp, "timestamp")?;

    if auth_status != "PASS" && auth_status != "FAIL" {
        return Err(ValidationError::InvalidEnum {
            field: "authStatus",
            value: auth_status,
        });
    }

    let date = derive_date(&timestamp)?;

    Ok(FingerprintRecord {
        device_id,
        user_id,
        auth_status,
        timestamp,
        date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_temperature_valid() {
        let payload = br#"{"device_id":"t1","temperature":22.5,"humidity":45.3,
                           "status":"HIGH","timestamp":"2026-01-22T14:30:00"}"#;

        let record = match normalize(DeviceType::Temperature, payload).unwrap() {
            Record::Temperature(r) => r,
            other => panic!("got {:?}", other),
        };

        assert_eq!(record.device_id, "t1");
        assert_eq!(record.temperature, 22.5);
        assert_eq!(record.humidity, 45.3);
        assert_eq!(record.status, "HIGH");
        assert_eq!(record.timestamp, "2026-01-22T14:30:00");
        assert_eq!(record.date, "2026-01-22");
    }

    #[test]
    fn test_normalize_temperature_status_optional() {
        let payload = br#"{"device_id":"t1","temperature":20.0,"humidity":50.0,
                           "timestamp":"2026-01-22T14:30:00"}"#;

        let record = match normalize(DeviceType::Temperature, payload).unwrap() {
            Record::Temperature(r) => r,
            other => panic!("got {:?}", other),
        };
        assert_eq!(record.status, "");
    }

    #[test]
    fn test_normalize_temperature_invalid_status() {
        let payload = br#"{"device_id":"t1","temperature":20.0,"humidity":50.0,
                           "status":"MEDIUM","timestamp":"2026-01-22T14:30:00"}"#;

        match normalize(DeviceType::Temperature, payload) {
            Err(ValidationError::InvalidEnum { field, value }) => {
                assert_eq!(field, "status");
                assert_eq!(value, "MEDIUM");
            }
            other => panic!("got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_date_is_timestamp_prefix() {
        // Both accepted timestamp forms derive the same calendar date.
        for ts in ["2026-03-05T23:59:59", "2026-03-05 00:00:01"] {
            let payload = format!(
                r#"{{"device_id":"t1","temperature":1.0,"humidity":2.0,"timestamp":"{}"}}"#,
                ts
            );
            let record = normalize(DeviceType::Temperature, payload.as_bytes()).unwrap();
            assert_eq!(record.date(), "2026-03-05", "{}", ts);
        }
    }

    #[test]
    fn test_normalize_malformed_json() {
        assert!(matches!(
            normalize(DeviceType::Temperature, b"not json"),
            Err(ValidationError::Malformed(_))
        ));
    }

    #[test]
    fn test_normalize_missing_fields() {
        for (payload, field) in [
            (r#"{"temperature":1.0,"humidity":2.0,"timestamp":"2026-01-22T14:30:00"}"#, "device_id"),
            (r#"{"device_id":"t1","humidity":2.0,"timestamp":"2026-01-22T14:30:00"}"#, "temperature"),
            (r#"{"device_id":"t1","temperature":1.0,"timestamp":"2026-01-22T14:30:00"}"#, "humidity"),
            (r#"{"device_id":"t1","temperature":1.0,"humidity":2.0}"#, "timestamp"),
        ] {
            match normalize(DeviceType::Temperature, payload.as_bytes()) {
                Err(ValidationError::MissingField(name)) => assert_eq!(name, field),
                other => panic!("{}: got {:?}", payload, other),
            }
        }
    }

    #[test]
    fn test_normalize_malformed_timestamp() {
        let payload = br#"{"device_id":"t1","temperature":1.0,"humidity":2.0,
                           "timestamp":"22/01/2026 14:30"}"#;

        assert!(matches!(
            normalize(DeviceType::Temperature, payload),
            Err(ValidationError::MalformedTimestamp(_))
        ));
    }

    #[test]
    fn test_normalize_power_token_table() {
        for (token, eb, dg) in [
            ("EB_ON", "ON", ""),
            ("EB_OFF", "OFF", ""),
            ("DG_ON", "", "ON"),
            ("DG_OFF", "", "OFF"),
        ] {
            let payload = format!(
                r#"{{"device_id":"p1","status":"{}","timestamp":"2026-01-22T14:30:00"}}"#,
                token
            );
            let record = match normalize(DeviceType::Power, payload.as_bytes()).unwrap() {
                Record::Power(r) => r,
                other => panic!("got {:?}", other),
            };
            assert_eq!(record.ebstatus, eb, "{}", token);
            assert_eq!(record.dgstatus, dg, "{}", token);
        }
    }

    #[test]
    fn test_normalize_power_missing_fields() {
        for (payload, field) in [
            (r#"{"status":"EB_ON","timestamp":"2026-01-22T14:30:00"}"#, "device_id"),
            (r#"{"device_id":"p1","timestamp":"2026-01-22T14:30:00"}"#, "status"),
            (r#"{"device_id":"p1","status":"EB_ON"}"#, "timestamp"),
        ] {
            match normalize(DeviceType::Power, payload.as_bytes()) {
                Err(ValidationError::MissingField(name)) => assert_eq!(name, field),
                other => panic!("{}: got {:?}", payload, other),
            }
        }
    }

    #[test]
    fn test_normalize_power_unknown_token() {
        let payload = br#"{"device_id":"p1","status":"EB_TOGGLE","timestamp":"2026-01-22T14:30:00"}"#;

        match normalize(DeviceType::Power, payload) {
            Err(ValidationError::InvalidEnum { field, value }) => {
                assert_eq!(field, "status");
                assert_eq!(value, "EB_TOGGLE");
            }
            other => panic!("got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_fingerprint_camel_and_snake_keys() {
        for key in ["authStatus", "auth_status"] {
            let payload = format!(
                r#"{{"device_id":"f1","user_id":"u7","{}":"PASS","timestamp":"2026-01-22T08:00:00"}}"#,
                key
            );
            let record = match normalize(DeviceType::Fingerprint, payload.as_bytes()).unwrap() {
                Record::Fingerprint(r) => r,
                other => panic!("got {:?}", other),
            };
            assert_eq!(record.auth_status, "PASS", "{}", key);
            assert_eq!(record.user_id, "u7");
        }
    }

    #[test]
    fn test_normalize_fingerprint_missing_auth_status() {
        let payload = br#"{"device_id":"f1","user_id":"u7","timestamp":"2026-01-22T08:00:00"}"#;

        match normalize(DeviceType::Fingerprint, payload) {
            Err(ValidationError::MissingField(name)) => assert_eq!(name, "authStatus"),
            other => panic!("got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_fingerprint_invalid_auth_status() {
        let payload =
            br#"{"device_id":"f1","user_id":"u7","authStatus":"MAYBE","timestamp":"2026-01-22T08:00:00"}"#;

        assert!(matches!(
            normalize(DeviceType::Fingerprint, payload),
            Err(ValidationError::InvalidEnum { field: "authStatus", .. })
        ));
    }

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2026-01-22").is_ok());
        assert!(validate_date("2026-1-22").is_err());
        assert!(validate_date("22-01-2026").is_err());
        assert!(validate_date("2026-01-22T00:00:00").is_err());
        assert!(validate_date("").is_err());
    }
}
