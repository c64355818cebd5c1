use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::types::Json;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    AwaitingConfirmation,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

/// Statuses that hold a technician's slot.
pub const OCCUPYING_STATUSES: [AppointmentStatus; 3] = [
    AppointmentStatus::Confirmed,
    AppointmentStatus::AwaitingConfirmation,
    AppointmentStatus::InProgress,
];

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::AwaitingConfirmation => "awaiting_confirmation",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::InProgress => "in_progress",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::NoShow => "no_show",
        }
    }

    pub fn is_occupying(&self) -> bool {
        OCCUPYING_STATUSES.contains(self)
    }

    /// Quoted, comma separated list for `status IN (...)` clauses.
    pub fn occupying_sql_list() -> String {
        OCCUPYING_STATUSES
            .iter()
            .map(|s| format!("'{}'", s.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown appointment status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for AppointmentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "awaiting_confirmation" => Ok(AppointmentStatus::AwaitingConfirmation),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "in_progress" => Ok(AppointmentStatus::InProgress),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            "no_show" => Ok(AppointmentStatus::NoShow),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for AppointmentStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Appointment {
    pub id: String,
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_note: Option<String>,
    pub service_id: String,
    pub add_ons: Json<BTreeSet<String>>,
    pub technician_id: String,
    pub date: String,
    pub time: String,
    #[sqlx(try_from = "String")]
    pub status: AppointmentStatus,
    pub total_price: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewAppointmentParams {
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_note: Option<String>,
    pub service_id: String,
    pub add_ons: BTreeSet<String>,
    pub technician_id: String,
    pub date: String,
    pub time: String,
    pub status: AppointmentStatus,
    pub total_price: i64,
}

impl Appointment {
    pub fn new(params: NewAppointmentParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            customer_id: params.customer_id,
            customer_name: params.customer_name,
            customer_phone: params.customer_phone,
            customer_note: params.customer_note,
            service_id: params.service_id,
            add_ons: Json(params.add_ons),
            technician_id: params.technician_id,
            date: params.date,
            time: params.time,
            status: params.status,
            total_price: params.total_price,
            created_at: now,
            updated_at: now,
        }
    }
}
