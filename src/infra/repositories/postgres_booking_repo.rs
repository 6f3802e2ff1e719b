use std::collections::BTreeMap;

use crate::domain::{
    models::booking::{occupies_capacity, BlockBookingCounts, Booking, CapacityLimit, STATUS_CANCELLED},
    ports::BookingRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Takes the per-date advisory lock, then reports whether the slot (or the whole date) is full.
async fn lock_and_check_full(conn: &mut PgConnection, date: NaiveDate, time_block_id: &str, limit: CapacityLimit) -> Result<bool, AppError> {
    // Serializes concurrent checkouts for the same date until commit.
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))").bind(date.to_string()).execute(&mut *conn).await.map_err(AppError::Database)?;

    let (taken, capacity): (i64, u32) = if limit.one_event_per_day {
        let taken: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE event_date = $1 AND status != $2").bind(date).bind(STATUS_CANCELLED).fetch_one(&mut *conn).await.map_err(AppError::Database)?;
        (taken, 1)
    } else {
        let taken: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE event_date = $1 AND time_block_id = $2 AND status != $3").bind(date).bind(time_block_id).bind(STATUS_CANCELLED).fetch_one(&mut *conn).await.map_err(AppError::Database)?;
        (taken, limit.max_in_block)
    };
    Ok(taken >= i64::from(capacity))
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn create_within_capacity(&self, booking: &Booking, limit: CapacityLimit) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        if lock_and_check_full(&mut *tx, booking.event_date, &booking.time_block_id, limit).await? {
            return Err(AppError::Conflict("The selected time slot is no longer available".to_string()));
        }

        let created = sqlx::query_as::<_, Booking>("INSERT INTO bookings (id, reference, event_date, time_block_id, start_time, end_time, customer_name, customer_email, customer_phone, child_name, adults, kids, payment_method, draft, pricing, status, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) RETURNING *").bind(&booking.id).bind(&booking.reference).bind(booking.event_date).bind(&booking.time_block_id).bind(booking.start_time).bind(booking.end_time).bind(&booking.customer_name).bind(&booking.customer_email).bind(&booking.customer_phone).bind(&booking.child_name).bind(booking.adults).bind(booking.kids).bind(&booking.payment_method).bind(&booking.draft).bind(&booking.pricing).bind(&booking.status).bind(booking.created_at).fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE event_date >= $1 AND event_date <= $2 ORDER BY event_date ASC, start_time ASC").bind(start).bind(end).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn update_status(&self, id: &str, status: &str, limit: CapacityLimit) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let current = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1 FOR UPDATE").bind(id).fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        let reactivating = !occupies_capacity(&current.status) && occupies_capacity(status);
        if reactivating && lock_and_check_full(&mut *tx, current.event_date, &current.time_block_id, limit).await? {
            return Err(AppError::Conflict("The booking's time slot has been taken".to_string()));
        }

        let updated = sqlx::query_as::<_, Booking>("UPDATE bookings SET status = $1 WHERE id = $2 RETURNING *").bind(status).bind(id).fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }
    async fn count_by_date(&self, date: NaiveDate) -> Result<BlockBookingCounts, AppError> {
        let rows = sqlx::query_as::<_, (String, i64)>("SELECT time_block_id, COUNT(*) FROM bookings WHERE event_date = $1 AND status != $2 GROUP BY time_block_id").bind(date).bind(STATUS_CANCELLED).fetch_all(&self.pool).await.map_err(AppError::Database)?;
        Ok(rows.into_iter().map(|(block, count)| (block, count as u32)).collect())
    }
    async fn count_by_range(&self, start: NaiveDate, end: NaiveDate) -> Result<BTreeMap<NaiveDate, BlockBookingCounts>, AppError> {
        let rows = sqlx::query_as::<_, (NaiveDate, String, i64)>("SELECT event_date, time_block_id, COUNT(*) FROM bookings WHERE event_date >= $1 AND event_date <= $2 AND status != $3 GROUP BY event_date, time_block_id").bind(start).bind(end).bind(STATUS_CANCELLED).fetch_all(&self.pool).await.map_err(AppError::Database)?;
        let mut counts: BTreeMap<NaiveDate, BlockBookingCounts> = BTreeMap::new();
        for (date, block, count) in rows {
            counts.entry(date).or_default().insert(block, count as u32);
        }
        Ok(counts)
    }
}
