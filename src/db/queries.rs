use crate::db::Database;
use crate::error::Result;
use crate::models::{DecisionRecord, FieldConfig, SensorReading, TankLevel};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tracing::warn;

// Sensor Queries

impl Database {
    pub fn insert_sensor_reading(&self, reading: &SensorReading) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO sensors (soil_moisture, temperature, humidity, timestamp)
                VALUES (?1, ?2, ?3, ?4)
                "#,
                params![
                    reading.soil_moisture_pct,
                    reading.temperature_c,
                    reading.humidity_pct,
                    reading.timestamp.map(|t| t.to_rfc3339()),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Most recently stored reading, if any
    pub fn latest_sensor_reading(&self) -> Result<Option<SensorReading>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM sensors ORDER BY id DESC LIMIT 1",
                [],
                row_to_sensor_reading,
            )
            .optional()
            .map_err(Into::into)
        })
    }
}

fn row_to_sensor_reading(row: &Row) -> rusqlite::Result<SensorReading> {
    let timestamp_str: Option<String> = row.get("timestamp")?;

    // An unreadable timestamp is treated the same as a missing one
    let timestamp = timestamp_str.as_deref().and_then(|s| {
        parse_timestamp(s).or_else(|| {
            warn!(timestamp = %s, "Unparseable sensor timestamp in database, ignoring");
            None
        })
    });

    Ok(SensorReading {
        id: Some(row.get("id")?),
        soil_moisture_pct: row.get("soil_moisture")?,
        temperature_c: row.get("temperature")?,
        humidity_pct: row.get("humidity")?,
        timestamp,
    })
}

// Tank Level Queries

impl Database {
    pub fn insert_tank_level(&self, level: &TankLevel) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tank_levels (level_percent, timestamp) VALUES (?1, ?2)",
                params![level.level_percent, level.timestamp.to_rfc3339()],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn latest_tank_level(&self) -> Result<Option<TankLevel>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM tank_levels ORDER BY id DESC LIMIT 1",
                [],
                |row| {
                    let timestamp_str: String = row.get("timestamp")?;
                    Ok(TankLevel {
                        id: Some(row.get("id")?),
                        level_percent: row.get("level_percent")?,
                        timestamp: parse_timestamp(&timestamp_str).unwrap_or_else(Utc::now),
                    })
                },
            )
            .optional()
            .map_err(Into::into)
        })
    }
}

// Field Queries

impl Database {
    /// The active field configuration, if one was saved
    pub fn get_field_config(&self) -> Result<Option<FieldConfig>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM fields ORDER BY id LIMIT 1",
                [],
                row_to_field_config,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    /// Insert or replace the single active field. Returns its row id.
    pub fn save_field_config(&self, field: &FieldConfig) -> Result<i64> {
        field.validate()?;

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let existing: Option<i64> = tx
                .query_row("SELECT id FROM fields ORDER BY id LIMIT 1", [], |row| {
                    row.get(0)
                })
                .optional()?;

            let now = Utc::now().to_rfc3339();
            let sow_date = field.sow_date.format("%Y-%m-%d").to_string();
            let id = match existing {
                Some(id) => {
                    tx.execute(
                        r#"
                        UPDATE fields SET
                            crop = ?1, sow_date = ?2, area = ?3, soil_depth = ?4, updated_at = ?5
                        WHERE id = ?6
                        "#,
                        params![field.crop, sow_date, field.area_m2, field.soil_depth_m, now, id],
                    )?;
                    id
                }
                None => {
                    tx.execute(
                        r#"
                        INSERT INTO fields (crop, sow_date, area, soil_depth, updated_at)
                        VALUES (?1, ?2, ?3, ?4, ?5)
                        "#,
                        params![field.crop, sow_date, field.area_m2, field.soil_depth_m, now],
                    )?;
                    tx.last_insert_rowid()
                }
            };
            tx.commit()?;
            Ok(id)
        })
    }
}

fn row_to_field_config(row: &Row) -> rusqlite::Result<FieldConfig> {
    let sow_date_str: String = row.get("sow_date")?;
    let updated_at_str: String = row.get("updated_at")?;

    let sow_date = NaiveDate::parse_from_str(&sow_date_str, "%Y-%m-%d").unwrap_or_else(|_| {
        warn!(
            sow_date = %sow_date_str,
            "Unparseable sow_date in database, defaulting to today"
        );
        chrono::Local::now().date_naive()
    });

    Ok(FieldConfig {
        id: Some(row.get("id")?),
        crop: row.get("crop")?,
        sow_date,
        area_m2: row.get("area")?,
        soil_depth_m: row.get("soil_depth")?,
        updated_at: parse_timestamp(&updated_at_str),
    })
}

// Decision Log Queries

impl Database {
    /// Append one decision to the log. Records are never updated or deleted.
    pub fn append_decision(&self, record: &DecisionRecord) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO decisions (decision, water_amount, timestamp) VALUES (?1, ?2, ?3)",
                params![
                    record.decision_text,
                    i64::from(record.water_amount_liters),
                    record.timestamp.to_rfc3339(),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Newest decisions first
    pub fn recent_decisions(&self, limit: u32) -> Result<Vec<DecisionRecord>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT * FROM decisions ORDER BY id DESC LIMIT ?1")?;
            let records = stmt
                .query_map([limit], row_to_decision)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(records)
        })
    }

    pub fn count_decisions(&self) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM decisions", [], |row| row.get(0))?;
            Ok(u64::try_from(count).unwrap_or(0))
        })
    }
}

fn row_to_decision(row: &Row) -> rusqlite::Result<DecisionRecord> {
    let timestamp_str: String = row.get("timestamp")?;
    let liters: i64 = row.get("water_amount")?;

    Ok(DecisionRecord {
        id: Some(row.get("id")?),
        decision_text: row.get("decision")?,
        water_amount_liters: u32::try_from(liters.max(0)).unwrap_or(u32::MAX),
        timestamp: parse_timestamp(&timestamp_str).unwrap_or_else(Utc::now),
    })
}

/// RFC 3339, or SQLite's `YYYY-MM-DD HH:MM:SS` (UTC) for rows written by hand
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}
