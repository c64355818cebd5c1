use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TechnicianStatus {
    #[default]
    Available,
    Unavailable,
    OnLeave,
}

impl TechnicianStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TechnicianStatus::Available => "available",
            TechnicianStatus::Unavailable => "unavailable",
            TechnicianStatus::OnLeave => "on_leave",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown technician status: {0}")]
pub struct UnknownTechnicianStatus(pub String);

impl FromStr for TechnicianStatus {
    type Err = UnknownTechnicianStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(TechnicianStatus::Available),
            "unavailable" => Ok(TechnicianStatus::Unavailable),
            "on_leave" => Ok(TechnicianStatus::OnLeave),
            other => Err(UnknownTechnicianStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for TechnicianStatus {
    type Error = UnknownTechnicianStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Technician {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[sqlx(try_from = "String")]
    pub status: TechnicianStatus,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Technician {
    pub fn new(first_name: String, last_name: String, phone: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            first_name,
            last_name,
            status: TechnicianStatus::Available,
            phone,
            created_at: Utc::now(),
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
