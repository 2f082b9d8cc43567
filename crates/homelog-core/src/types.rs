//! Canonical record types shared across the pipeline.

use serde::{Deserialize, Serialize};

/// The three classes of field device the service knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    /// Temperature/humidity sensor.
    Temperature,
    /// Mains/generator power status monitor.
    Power,
    /// Fingerprint authentication terminal.
    Fingerprint,
}

impl DeviceType {
    /// Short tag used in request/response topic paths
    /// (`home/gettemp/...`, `home/datatemp/...`).
    pub fn tag(&self) -> &'static str {
        match self {
            DeviceType::Temperature => "temp",
            DeviceType::Power => "power",
            DeviceType::Fingerprint => "fingerprint",
        }
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DeviceType::Temperature => "temperature",
            DeviceType::Power => "power",
            DeviceType::Fingerprint => "fingerprint",
        };
        f.write_str(name)
    }
}

/// A normalized temperature/humidity observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRecord {
    /// Reporting device.
    pub device_id: String,
    /// Temperature in degrees Celsius.
    pub temperature: f64,
    /// Relative humidity percentage.
    pub humidity: f64,
    /// Threshold indicator (`HIGH`/`LOW`), empty when not reported.
    pub status: String,
    /// Original ISO-8601 timestamp string from the device.
    pub timestamp: String,
    /// Calendar date (`YYYY-MM-DD`) derived from the timestamp at
    /// normalization time.
    pub date: String,
}

/// A normalized power status observation.
///
/// The device emits one compound token per message (`EB_ON`,
/// `DG_OFF`, ...), so exactly one of `ebstatus`/`dgstatus` is set and
/// the other is the empty string. Records are stored as received; no
/// last-known state is carried forward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerStatusRecord {
    /// Reporting device.
    pub device_id: String,
    /// Mains (electricity board) status: `ON`, `OFF`, or empty.
    pub ebstatus: String,
    /// Diesel generator status: `ON`, `OFF`, or empty.
    pub dgstatus: String,
    /// Original ISO-8601 timestamp string from the device.
    pub timestamp: String,
    /// Calendar date derived from the timestamp.
    pub date: String,
}

/// A normalized fingerprint authentication event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FingerprintRecord {
    /// Reporting device.
    pub device_id: String,
    /// User who presented the fingerprint.
    pub user_id: String,
    /// Authentication outcome: `PASS` or `FAIL`.
    pub auth_status: String,
    /// Original ISO-8601 timestamp string from the device.
    pub timestamp: String,
    /// Calendar date derived from the timestamp.
    pub date: String,
}

/// Tagged union over the three record kinds.
///
/// Produced by [`normalize`](crate::normalize) and consumed by the
/// store's `append`; keeps the router free of payload inspection.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Temperature(TemperatureRecord),
    Power(PowerStatusRecord),
    Fingerprint(FingerprintRecord),
}

impl Record {
    /// The device type this record belongs to.
    pub fn device_type(&self) -> DeviceType {
        match self {
            Record::Temperature(_) => DeviceType::Temperature,
            Record::Power(_) => DeviceType::Power,
            Record::Fingerprint(_) => DeviceType::Fingerprint,
        }
    }

    /// The reporting device.
    pub fn device_id(&self) -> &str {
        match self {
            Record::Temperature(r) => &r.device_id,
            Record::Power(r) => &r.device_id,
            Record::Fingerprint(r) => &r.device_id,
        }
    }

    /// The derived calendar date.
    pub fn date(&self) -> &str {
        match self {
            Record::Temperature(r) => &r.date,
            Record::Power(r) => &r.date,
            Record::Fingerprint(r) => &r.date,
        }
    }

    /// The original device timestamp.
    pub fn timestamp(&self) -> &str {
        match self {
            Record::Temperature(r) => &r.timestamp,
            Record::Power(r) => &r.timestamp,
            Record::Fingerprint(r) => &r.timestamp,
        }
    }
}
