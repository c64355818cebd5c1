use crate::domain::{models::appointment::{Appointment, AppointmentStatus}, ports::AppointmentRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool, Sqlite, Transaction};

pub struct SqliteAppointmentRepo {
    pool: SqlitePool,
}

impl SqliteAppointmentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn write(tx: &mut Transaction<'_, Sqlite>, appointment: &Appointment) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET customer_name=?, customer_phone=?, customer_note=?, service_id=?, add_ons=?,
                technician_id=?, date=?, time=?, status=?, total_price=?, updated_at=?
             WHERE id=?
             RETURNING *"
        )
            .bind(&appointment.customer_name).bind(&appointment.customer_phone).bind(&appointment.customer_note)
            .bind(&appointment.service_id).bind(&appointment.add_ons).bind(&appointment.technician_id)
            .bind(&appointment.date).bind(&appointment.time).bind(appointment.status.as_str())
            .bind(appointment.total_price).bind(appointment.updated_at)
            .bind(&appointment.id)
            .fetch_optional(&mut **tx).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Appointment not found".into()))
    }
}

#[async_trait]
impl AppointmentRepository for SqliteAppointmentRepo {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>(
            "INSERT INTO appointments (id, customer_id, customer_name, customer_phone, customer_note, service_id, add_ons,
                technician_id, date, time, status, total_price, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&appointment.id).bind(&appointment.customer_id).bind(&appointment.customer_name)
            .bind(&appointment.customer_phone).bind(&appointment.customer_note).bind(&appointment.service_id)
            .bind(&appointment.add_ons).bind(&appointment.technician_id).bind(&appointment.date)
            .bind(&appointment.time).bind(appointment.status.as_str()).bind(appointment.total_price)
            .bind(appointment.created_at).bind(appointment.updated_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, date: Option<&str>) -> Result<Vec<Appointment>, AppError> {
        match date {
            Some(date) => sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE date = ? ORDER BY date ASC, time ASC")
                .bind(date)
                .fetch_all(&self.pool).await.map_err(AppError::Database),
            None => sqlx::query_as::<_, Appointment>("SELECT * FROM appointments ORDER BY date ASC, time ASC")
                .fetch_all(&self.pool).await.map_err(AppError::Database),
        }
    }

    async fn list_occupying_slot(&self, date: &str, time: &str) -> Result<Vec<Appointment>, AppError> {
        let sql = format!(
            "SELECT * FROM appointments WHERE date = ? AND time = ? AND status IN ({})",
            AppointmentStatus::occupying_sql_list()
        );
        sqlx::query_as::<_, Appointment>(&sql)
            .bind(date).bind(time)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let updated = Self::write(&mut tx, appointment).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn update_if_slot_free(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Write first so this transaction holds SQLite's write lock before checking.
        let updated = Self::write(&mut tx, appointment).await?;

        let sql = format!(
            "SELECT COUNT(*) as count FROM appointments
             WHERE technician_id = ? AND date = ? AND time = ? AND id != ? AND status IN ({})",
            AppointmentStatus::occupying_sql_list()
        );
        let taken: i64 = sqlx::query(&sql)
            .bind(&appointment.technician_id).bind(&appointment.date).bind(&appointment.time).bind(&appointment.id)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?
            .get("count");

        if taken > 0 {
            tx.rollback().await.map_err(AppError::Database)?;
            return Err(AppError::Conflict("Technician is already booked for this slot".into()));
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }
}
