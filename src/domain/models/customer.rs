use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Customer {
    pub id: String,
    pub full_name: String,
    pub phone: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(full_name: String, phone: String, note: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            full_name,
            phone,
            note,
            created_at: Utc::now(),
        }
    }
}
