use crate::domain::{models::appointment::{Appointment, AppointmentStatus}, ports::AppointmentRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Row, PgPool, Postgres, Transaction};

pub struct PostgresAppointmentRepo {
    pool: PgPool,
}

impl PostgresAppointmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn write(tx: &mut Transaction<'_, Postgres>, appointment: &Appointment) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET customer_name=$1, customer_phone=$2, customer_note=$3, service_id=$4, add_ons=$5,
                technician_id=$6, date=$7, time=$8, status=$9, total_price=$10, updated_at=$11
             WHERE id=$12
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
impl AppointmentRepository for PostgresAppointmentRepo {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>(
            "INSERT INTO appointments (id, customer_id, customer_name, customer_phone, customer_note, service_id, add_ons,
                technician_id, date, time, status, total_price, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
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
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, date: Option<&str>) -> Result<Vec<Appointment>, AppError> {
        match date {
            Some(date) => sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE date = $1 ORDER BY date ASC, time ASC")
                .bind(date)
                .fetch_all(&self.pool).await.map_err(AppError::Database),
            None => sqlx::query_as::<_, Appointment>("SELECT * FROM appointments ORDER BY date ASC, time ASC")
                .fetch_all(&self.pool).await.map_err(AppError::Database),
        }
    }

    async fn list_occupying_slot(&self, date: &str, time: &str) -> Result<Vec<Appointment>, AppError> {
        let sql = format!(
            "SELECT * FROM appointments WHERE date = $1 AND time = $2 AND status IN ({})",
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

        // Serializes writers targeting the same slot until commit.
        let slot_key = format!("{}|{}|{}", appointment.technician_id, appointment.date, appointment.time);
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&slot_key)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        let sql = format!(
            "SELECT COUNT(*) as count FROM appointments
             WHERE technician_id = $1 AND date = $2 AND time = $3 AND id != $4 AND status IN ({})",
            AppointmentStatus::occupying_sql_list()
        );
        let taken: i64 = sqlx::query(&sql)
            .bind(&appointment.technician_id).bind(&appointment.date).bind(&appointment.time).bind(&appointment.id)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?
            .get("count");

        if taken > 0 {
            return Err(AppError::Conflict("Technician is already booked for this slot".into()));
        }

        let updated = Self::write(&mut tx, appointment).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }
}
