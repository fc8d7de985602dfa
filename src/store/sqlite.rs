use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use super::StoreResult;
use crate::models::booking::{Booking, NewBooking};

/// Persistence context for bookings. Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (and creates if missing) the database at `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Single-connection in-memory database. The connection is never
    /// recycled, otherwise the data would vanish with it.
    pub async fn in_memory() -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the `book` table if it does not exist yet.
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // -- Booking Operations --

    /// Insert one booking inside its own transaction and return the stored row.
    /// Any failure rolls the transaction back before the error is returned.
    pub async fn insert_booking(&self, booking: &NewBooking) -> StoreResult<Booking> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<_, Booking>(
            r#"INSERT INTO book (id, provider_name, service_type, date, time_slot, available_spots, booking_reference, status, booked_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
               RETURNING id, provider_name, service_type, date, time_slot, available_spots, booking_reference, status, booked_at"#,
        )
        .bind(&booking.id)
        .bind(&booking.provider_name)
        .bind(&booking.service_type)
        .bind(&booking.date)
        .bind(&booking.time_slot)
        .bind(booking.available_spots)
        .bind(&booking.booking_reference)
        .bind(&booking.status)
        .bind(booking.booked_at)
        .fetch_one(&mut *tx)
        .await;

        match inserted {
            Ok(row) => {
                tx.commit().await?;
                Ok(row)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(
                        booking_id = %booking.id,
                        "rollback after failed insert also failed: {}",
                        rollback_err
                    );
                }
                Err(e.into())
            }
        }
    }

    pub async fn list_bookings(&self, limit: i64) -> StoreResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, Booking>(
            r#"SELECT id, provider_name, service_type, date, time_slot, available_spots, booking_reference, status, booked_at
               FROM book
               ORDER BY booked_at DESC, rowid DESC
               LIMIT ?1"#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// References are not unique, so this can return several bookings.
    pub async fn find_by_reference(&self, booking_reference: &str) -> StoreResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, Booking>(
            r#"SELECT id, provider_name, service_type, date, time_slot, available_spots, booking_reference, status, booked_at
               FROM book
               WHERE booking_reference = ?1
               ORDER BY booked_at ASC, rowid ASC"#,
        )
        .bind(booking_reference)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count_bookings(&self) -> StoreResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM book")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
