use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::types::Json;

/// Upper bound for a single base or add-on price, in minor currency units.
pub const MAX_PRICE: i64 = 1_000_000_000;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AddOn {
    pub name: String,
    pub price: i64,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub base_price: i64,
    pub add_ons: Json<Vec<AddOn>>,
    pub created_at: DateTime<Utc>,
}

impl Service {
    pub fn new(name: String, base_price: i64, add_ons: Vec<AddOn>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            base_price,
            add_ons: Json(add_ons),
            created_at: Utc::now(),
        }
    }

    /// First add-on name that appears more than once, if any.
    pub fn duplicate_add_on(&self) -> Option<&str> {
        self.add_ons.iter().enumerate().find_map(|(i, a)| {
            self.add_ons.0[..i].iter().any(|prev| prev.name == a.name).then_some(a.name.as_str())
        })
    }
}
