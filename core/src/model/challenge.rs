use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EcoError, EcoResult};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChallengeCategory {
    Transportation,
    Energy,
    Food,
    Waste,
    Lifestyle,
}

impl ChallengeCategory {
    pub const ALL: [ChallengeCategory; 5] = [
        ChallengeCategory::Transportation,
        ChallengeCategory::Energy,
        ChallengeCategory::Food,
        ChallengeCategory::Waste,
        ChallengeCategory::Lifestyle,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChallengeCategory::Transportation => "transportation",
            ChallengeCategory::Energy => "energy",
            ChallengeCategory::Food => "food",
            ChallengeCategory::Waste => "waste",
            ChallengeCategory::Lifestyle => "lifestyle",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.label() == s || (!s.is_empty() && c.label().starts_with(&s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeStatus {
    NotStarted,
    InProgress,
    Completed,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Challenge {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: ChallengeCategory,
    pub points: u32,
    pub duration_days: u32,
    pub is_completed: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl Challenge {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: ChallengeCategory,
        points: u32,
        duration_days: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            category,
            points,
            duration_days,
            is_completed: false,
            start_date: None,
            end_date: None,
        }
    }

    pub fn status(&self) -> ChallengeStatus {
        if self.is_completed {
            ChallengeStatus::Completed
        } else if self.start_date.is_some() {
            ChallengeStatus::InProgress
        } else {
            ChallengeStatus::NotStarted
        }
    }

    /// Starts (or restarts) the timebox at `now`. Completed challenges are
    /// left untouched and return `Ok(false)`. A duration that runs past the
    /// representable date range is rejected without changing anything.
    pub fn start(&mut self, now: DateTime<Utc>) -> EcoResult<bool> {
        if self.is_completed {
            return Ok(false);
        }
        let end = Duration::try_days(i64::from(self.duration_days))
            .and_then(|length| now.checked_add_signed(length))
            .ok_or_else(|| EcoError::invalid_input("duration_days", f64::from(self.duration_days)))?;
        self.start_date = Some(now);
        self.end_date = Some(end);
        Ok(true)
    }

    /// Marks the challenge completed, keeping any start/end dates.
    /// A challenge that was never started may be completed directly.
    pub fn complete(&mut self) {
        self.is_completed = true;
    }

    pub fn progress(&self, now: DateTime<Utc>) -> f64 {
        if self.is_completed {
            return 1.0;
        }
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => {
                let total = (end - start).num_seconds() as f64;
                if total <= 0.0 {
                    return 1.0;
                }
                let elapsed = (now - start).num_seconds() as f64;
                (elapsed / total).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    pub fn remaining_days(&self, now: DateTime<Utc>) -> i64 {
        match self.end_date {
            Some(end) if !self.is_completed => (end - now).num_days().max(0),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 1, 8, 30, 0).unwrap()
    }

    fn car_free_week() -> Challenge {
        Challenge::new(
            "Car-Free Week",
            "Use public transport or walk for 7 consecutive days",
            ChallengeCategory::Transportation,
            100,
            7,
        )
    }

    #[test]
    fn test_new_challenge_is_not_started() {
        let c = car_free_week();
        assert_eq!(c.status(), ChallengeStatus::NotStarted);
        assert!(c.start_date.is_none());
        assert!(c.end_date.is_none());
        assert_eq!(c.progress(now()), 0.0);
        assert_eq!(c.remaining_days(now()), 0);
    }

    #[test]
    fn test_start_then_complete_preserves_dates() {
        let mut c = car_free_week();
        assert!(c.start(now()).unwrap());
        assert_eq!(c.status(), ChallengeStatus::InProgress);
        let start = c.start_date.unwrap();
        let end = c.end_date.unwrap();
        assert_eq!(start, now());
        assert_eq!(end - start, Duration::days(7));

        c.complete();
        assert_eq!(c.status(), ChallengeStatus::Completed);
        assert_eq!(c.start_date, Some(start));
        assert_eq!(c.end_date, Some(end));
        assert_eq!(c.points, 100);
        assert_eq!(c.duration_days, 7);
    }

    #[test]
    fn test_complete_without_start() {
        let mut c = car_free_week();
        c.complete();
        assert_eq!(c.status(), ChallengeStatus::Completed);
        assert!(c.start_date.is_none());
    }

    #[test]
    fn test_no_start_after_completion() {
        let mut c = car_free_week();
        c.complete();
        assert!(!c.start(now()).unwrap());
        assert!(c.start_date.is_none());
        assert_eq!(c.status(), ChallengeStatus::Completed);
    }

    #[test]
    fn test_start_rejects_unrepresentable_duration() {
        let mut c = Challenge::new("Forever", "Never ends", ChallengeCategory::Lifestyle, 10, u32::MAX);
        let err = c.start(now()).unwrap_err();
        assert!(matches!(err, EcoError::InvalidInput { ref input, .. } if input == "duration_days"));
        assert_eq!(c.status(), ChallengeStatus::NotStarted);
        assert!(c.end_date.is_none());
    }

    #[test]
    fn test_progress_and_remaining_days() {
        let mut c = car_free_week();
        c.start(now()).unwrap();

        let mid = now() + Duration::hours(84);
        assert!((c.progress(mid) - 0.5).abs() < 1e-9);
        assert_eq!(c.remaining_days(mid), 3);

        assert_eq!(c.progress(now() - Duration::days(1)), 0.0);
        assert_eq!(c.progress(now() + Duration::days(30)), 1.0);
        assert_eq!(c.remaining_days(now() + Duration::days(30)), 0);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(ChallengeCategory::parse("Food"), Some(ChallengeCategory::Food));
        assert_eq!(ChallengeCategory::parse("life"), Some(ChallengeCategory::Lifestyle));
        assert_eq!(ChallengeCategory::parse("tr"), Some(ChallengeCategory::Transportation));
        assert_eq!(ChallengeCategory::parse("money"), None);
        assert_eq!(ChallengeCategory::parse(""), None);
    }
}
