use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ConflictsResponse {
    pub date: String,
    pub time: String,
    pub technician_ids: BTreeSet<String>,
}
