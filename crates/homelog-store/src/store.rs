//! Main store implementation.

use std::path::Path;

use rusqlite::{Connection, params};
use tracing::{debug, info};

use homelog_core::{DeviceType, Record};

use crate::error::{Error, Result};
use crate::models::{StoredFingerprint, StoredPowerStatus, StoredTemperature};
use crate::schema;

/// SQLite-based store for device telemetry.
///
/// Writes are append-only; reads are scoped to a single device and
/// calendar date. The handle is not shared between threads; the
/// service funnels all calls through one dispatch task.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        schema::initialize(&conn)?;

        Ok(Self { conn })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    /// Append a normalized record to its kind's log.
    pub fn append(&self, record: &Record) -> Result<i64> {
        match record {
            Record::Temperature(r) => self.insert_temperature(r),
            Record::Power(r) => self.insert_power_status(r),
            Record::Fingerprint(r) => self.insert_fingerprint(r),
        }
    }

    /// Count rows for a record kind.
    pub fn count(&self, device_type: DeviceType) -> Result<u64> {
        let table = match device_type {
            DeviceType::Temperature => "temperature_logs",
            DeviceType::Power => "power_status_logs",
            DeviceType::Fingerprint => "fingerprint_logs",
        };

        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })
            .map_err(Error::ReadFailed)?;

        Ok(count as u64)
    }
}

// Temperature operations
impl Store {
    /// Insert a temperature observation.
    pub fn insert_temperature(&self, record: &homelog_core::TemperatureRecord) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO temperature_logs (device_id, temperature, humidity, status, timestamp, date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.device_id,
                    record.temperature,
                    record.humidity,
                    record.status,
                    record.timestamp,
                    record.date,
                ],
            )
            .map_err(Error::WriteFailed)?;

        debug!("Stored temperature log for {}", record.device_id);
        Ok(self.conn.last_insert_rowid())
    }

    /// All temperature observations for a device on an exact date,
    /// ordered by timestamp ascending.
    pub fn temperature_by_device_and_date(
        &self,
        device_id: &str,
        date: &str,
    ) -> Result<Vec<StoredTemperature>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, device_id, temperature, humidity, status, timestamp, date
                 FROM temperature_logs
                 WHERE device_id = ?1 AND date = ?2
                 ORDER BY timestamp ASC",
            )
            .map_err(Error::ReadFailed)?;

        let rows = stmt
            .query_map(params![device_id, date], |row| {
                Ok(StoredTemperature {
                    id: row.get(0)?,
                    device_id: row.get(1)?,
                    temperature: row.get(2)?,
                    humidity: row.get(3)?,
                    status: row.get(4)?,
                    timestamp: row.get(5)?,
                    date: row.get(6)?,
                })
            })
            .map_err(Error::ReadFailed)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::ReadFailed)?;

        Ok(rows)
    }
}

// Power status operations
impl Store {
    /// Insert a power status observation.
    pub fn insert_power_status(&self, record: &homelog_core::PowerStatusRecord) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO power_status_logs (device_id, ebstatus, dgstatus, timestamp, date)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record.device_id,
                    record.ebstatus,
                    record.dgstatus,
                    record.timestamp,
                    record.date,
                ],
            )
            .map_err(Error::WriteFailed)?;

        debug!("Stored power status log for {}", record.device_id);
        Ok(self.conn.last_insert_rowid())
    }

    /// All power status observations for a device on an exact date,
    /// ordered by timestamp ascending.
    pub fn power_by_device_and_date(
        &self,
        device_id: &str,
        date: &str,
    ) -> Result<Vec<StoredPowerStatus>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, device_id, ebstatus, dgstatus, timestamp, date
                 FROM power_status_logs
                 WHERE device_id = ?1 AND date = ?2
                 ORDER BY timestamp ASC",
            )
            .map_err(Error::ReadFailed)?;

        let rows = stmt
            .query_map(params![device_id, date], |row| {
                Ok(StoredPowerStatus {
                    id: row.get(0)?,
                    device_id: row.get(1)?,
                    ebstatus: row.get(2)?,
                    dgstatus: row.get(3)?,
                    timestamp: row.get(4)?,
                    date: row.get(5)?,
                })
            })
            .map_err(Error::ReadFailed)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::ReadFailed)?;

        Ok(rows)
    }
}

// Fingerprint operations
impl Store {
    /// Insert a fingerprint authentication event.
    pub fn insert_fingerprint(&self, record: &homelog_core::FingerprintRecord) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO fingerprint_logs (device_id, user_id, auth_status, timestamp, date)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record.device_id,
                    record.user_id,
                    record.auth_status,
                    record.timestamp,
                    record.date,
                ],
            )
            .map_err(Error::WriteFailed)?;

        debug!("Stored fingerprint log for {}", record.device_id);
        Ok(self.conn.last_insert_rowid())
    }

    /// All fingerprint events for a device on an exact date, ordered
    /// by timestamp ascending.
    pub fn fingerprint_by_device_and_date(
        &self,
        device_id: &str,
        date: &str,
    ) -> Result<Vec<StoredFingerprint>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, device_id, user_id, auth_status, timestamp, date
                 FROM fingerprint_logs
                 WHERE device_id = ?1 AND date = ?2
                 ORDER BY timestamp ASC",
            )
            .map_err(Error::ReadFailed)?;

        let rows = stmt
            .query_map(params![device_id, date], |row| {
                Ok(StoredFingerprint {
                    id: row.get(0)?,
                    device_id: row.get(1)?,
                    user_id: row.get(2)?,
                    auth_status: row.get(3)?,
                    timestamp: row.get(4)?,
                    date: row.get(5)?,
                })
            })
            .map_err(Error::ReadFailed)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::ReadFailed)?;

        Ok(rows)
    }
}
