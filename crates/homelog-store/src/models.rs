//! Data models for stored rows.

use serde::{Deserialize, Serialize};

use homelog_core::{FingerprintRecord, PowerStatusRecord, TemperatureRecord};

/// A temperature observation as stored, with its row id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredTemperature {
    /// Database row ID.
    pub id: i64,
    /// Reporting device.
    pub device_id: String,
    /// Temperature in degrees Celsius.
    pub temperature: f64,
    /// Relative humidity percentage.
    pub humidity: f64,
    /// Threshold indicator, empty when not reported.
    pub status: String,
    /// Original device timestamp.
    pub timestamp: String,
    /// Calendar date partition.
    pub date: String,
}

impl StoredTemperature {
    /// Convert back to the canonical record (dropping the row id).
    pub fn into_record(self) -> TemperatureRecord {
        TemperatureRecord {
            device_id: self.device_id,
            temperature: self.temperature,
            humidity: self.humidity,
            status: self.status,
            timestamp: self.timestamp,
            date: self.date,
        }
    }
}

/// A power status observation as stored, with its row id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPowerStatus {
    /// Database row ID.
    pub id: i64,
    /// Reporting device.
    pub device_id: String,
    /// Mains status: `ON`, `OFF`, or empty.
    pub ebstatus: String,
    /// Generator status: `ON`, `OFF`, or empty.
    pub dgstatus: String,
    /// Original device timestamp.
    pub timestamp: String,
    /// Calendar date partition.
    pub date: String,
}

impl StoredPowerStatus {
    /// Convert back to the canonical record (dropping the row id).
    pub fn into_record(self) -> PowerStatusRecord {
        PowerStatusRecord {
            device_id: self.device_id,
            ebstatus: self.ebstatus,
            dgstatus: self.dgstatus,
            timestamp: self.timestamp,
            date: self.date,
        }
    }
}

/// A fingerprint authentication event as stored, with its row id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFingerprint {
    /// Database row ID.
    pub id: i64,
    /// Reporting device.
    pub device_id: String,
    /// User who presented the fingerprint.
    pub user_id: String,
    /// Authentication outcome: `PASS` or `FAIL`.
    pub auth_status: String,
    /// Original device timestamp.
    pub timestamp: String,
    /// Calendar date partition.
    pub date: String,
}

impl StoredFingerprint {
    /// Convert back to the canonical record (dropping the row id).
    pub fn into_record(self) -> FingerprintRecord {
        FingerprintRecord {
            device_id: self.device_id,
            user_id: self.user_id,
            auth_status: self.auth_status,
            timestamp: self.timestamp,
            date: self.date,
        }
    }
}
