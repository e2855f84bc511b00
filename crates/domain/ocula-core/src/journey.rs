use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::CustomerId;

/// Stages of making and fitting a prosthesis, in the order a patient goes through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum JourneyStage {
    Consultation,
    Impression,
    Sculpting,
    Painting,
    Fitting,
    FollowUp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyMilestone {
    pub id: String,
    pub customer_id: CustomerId,
    pub stage: JourneyStage,
    pub title: String,
    pub description: String,
    pub target_date: Option<NaiveDate>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl JourneyMilestone {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JourneyProgress {
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
    /// Stage of the earliest milestone still open; `None` once everything is done.
    pub current_stage: Option<JourneyStage>,
}

impl JourneyProgress {
    pub fn of(milestones: &[JourneyMilestone]) -> Self {
        let total = milestones.len();
        let completed = milestones.iter().filter(|m| m.is_completed()).count();
        let percent = if total == 0 {
            0
        } else {
            (completed * 100 / total) as u8
        };
        let current_stage = milestones
            .iter()
            .filter(|m| !m.is_completed())
            .map(|m| m.stage)
            .min();
        Self {
            completed,
            total,
            percent,
            current_stage,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}
