use crate::{DbError, Result as DbErrorResult};

use sr_core::SensorReading;

use chrono::DateTime;
use sqlx::{Row, SqlitePool};

#[derive(Clone)]
pub struct ReadingRepository {
    pool: SqlitePool,
}

impl ReadingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a reading and return it with its assigned row id.
    pub async fn insert(&self, reading: &SensorReading) -> DbErrorResult<SensorReading> {
        let recorded_at = reading.recorded_at.timestamp();

        let result = sqlx::query(
            r#"
              INSERT INTO readings (
                  sensor_id, temperature, humidity, pressure,
                  recorded_at, client_ip
              ) VALUES (?, ?, ?, ?, ?, ?)
              "#,
        )
        .bind(&reading.sensor_id)
        .bind(reading.temperature)
        .bind(reading.humidity)
        .bind(reading.pressure)
        .bind(recorded_at)
        .bind(&reading.client_ip)
        .execute(&self.pool)
        .await?;

        Ok(reading.clone().with_id(result.last_insert_rowid()))
    }

    /// Fetch the most recently inserted reading, if any.
    pub async fn find_latest(&self) -> DbErrorResult<Option<SensorReading>> {
        let row = sqlx::query(
            r#"
              SELECT id, sensor_id, temperature, humidity, pressure,
                     recorded_at, client_ip
              FROM readings
              ORDER BY id DESC
              LIMIT 1
              "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_reading).transpose()
    }

    pub async fn count(&self) -> DbErrorResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM readings")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("n"))
    }

    fn row_to_reading(row: sqlx::sqlite::SqliteRow) -> DbErrorResult<SensorReading> {
        let recorded_at_ts: i64 = row.get("recorded_at");
        let recorded_at = DateTime::from_timestamp(recorded_at_ts, 0).ok_or_else(|| {
            DbError::corrupt_row(format!("recorded_at out of range: {recorded_at_ts}"))
        })?;

        Ok(SensorReading {
            id: Some(row.get("id")),
            sensor_id: row.get("sensor_id"),
            temperature: row.get("temperature"),
            humidity: row.get("humidity"),
            pressure: row.get("pressure"),
            recorded_at,
            client_ip: row.get("client_ip"),
        })
    }
}
