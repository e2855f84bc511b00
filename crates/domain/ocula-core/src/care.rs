use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CustomerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CareFrequency {
    Daily,
    Weekly,
    Monthly,
    AsNeeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CareCategory {
    Cleaning,
    Insertion,
    Removal,
    Lubrication,
    Inspection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareInstruction {
    pub id: String,
    pub customer_id: CustomerId,
    pub title: String,
    pub description: String,
    pub frequency: CareFrequency,
    pub category: CareCategory,
    pub completed: bool,
    pub last_completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCareInstruction {
    pub customer_id: CustomerId,
    pub title: String,
    pub description: String,
    pub frequency: CareFrequency,
    pub category: CareCategory,
}
