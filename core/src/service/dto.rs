use serde::{Deserialize, Serialize};

use crate::model::challenge::{Challenge, ChallengeStatus};
use crate::model::footprint::CategoryBreakdown;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DailyHistory {
    pub date: String,        // YYYY-MM-DD
    pub day_of_week: String, // Mon, Tue...
    pub records: usize,
    pub breakdown: CategoryBreakdown,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WeeklyHistory {
    pub year: i32,
    pub week: u32,
    pub days: Vec<DailyHistory>,
    pub breakdown: CategoryBreakdown,
}

/// Flattened challenge view for listings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChallengeDto {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub points: u32,
    pub duration_days: u32,
    pub status: String, // "Not started", "In progress", "Completed"
    pub progress: f64,
    pub remaining_days: i64,
}

impl ChallengeDto {
    pub fn from_entity(challenge: &Challenge, now: DateTime<Utc>) -> Self {
        let status = match challenge.status() {
            ChallengeStatus::NotStarted => "Not started",
            ChallengeStatus::InProgress => "In progress",
            ChallengeStatus::Completed => "Completed",
        };
        Self {
            id: challenge.id,
            title: challenge.title.clone(),
            category: challenge.category.label().to_string(),
            points: challenge.points,
            duration_days: challenge.duration_days,
            status: status.to_string(),
            progress: challenge.progress(now),
            remaining_days: challenge.remaining_days(now),
        }
    }
}
