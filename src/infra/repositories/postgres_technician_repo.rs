use crate::domain::{models::technician::{Technician, TechnicianStatus}, ports::TechnicianRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresTechnicianRepo {
    pool: PgPool,
}

impl PostgresTechnicianRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TechnicianRepository for PostgresTechnicianRepo {
    async fn create(&self, technician: &Technician) -> Result<Technician, AppError> {
        sqlx::query_as::<_, Technician>(
            "INSERT INTO technicians (id, first_name, last_name, status, phone, created_at) VALUES ($1, $2, $3, $4, $5, $6) RETURNING *"
        )
            .bind(&technician.id)
            .bind(&technician.first_name)
            .bind(&technician.last_name)
            .bind(technician.status.as_str())
            .bind(&technician.phone)
            .bind(technician.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Technician>, AppError> {
        sqlx::query_as::<_, Technician>("SELECT * FROM technicians WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, status: Option<TechnicianStatus>) -> Result<Vec<Technician>, AppError> {
        match status {
            Some(status) => sqlx::query_as::<_, Technician>("SELECT * FROM technicians WHERE status = $1 ORDER BY first_name ASC")
                .bind(status.as_str())
                .fetch_all(&self.pool).await.map_err(AppError::Database),
            None => sqlx::query_as::<_, Technician>("SELECT * FROM technicians ORDER BY first_name ASC")
                .fetch_all(&self.pool).await.map_err(AppError::Database),
        }
    }

    async fn update(&self, technician: &Technician) -> Result<Technician, AppError> {
        sqlx::query_as::<_, Technician>(
            "UPDATE technicians SET first_name=$1, last_name=$2, status=$3, phone=$4 WHERE id=$5 RETURNING *"
        )
            .bind(&technician.first_name)
            .bind(&technician.last_name)
            .bind(technician.status.as_str())
            .bind(&technician.phone)
            .bind(&technician.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Technician not found".into()))
    }
}
