use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::challenge::{Challenge, ChallengeCategory};
use crate::model::footprint::FootprintRecord;

pub const POINTS_PER_LEVEL: u32 = 100;
pub const MAX_LEVEL: u32 = 20;

// Rollup windows, counted in records
pub const WEEKLY_RECORDS: usize = 7;
pub const MONTHLY_RECORDS: usize = 30;

pub fn level_for_points(points: u32) -> u32 {
    (points / POINTS_PER_LEVEL + 1).min(MAX_LEVEL)
}

pub fn level_title(level: u32) -> &'static str {
    match level {
        1..=5 => "Eco Novice",
        6..=10 => "Eco Enthusiast",
        11..=15 => "Eco Expert",
        16..=20 => "Eco Master",
        _ => "Eco Legend",
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Badge {
    pub category: ChallengeCategory,
    pub name: String,
    pub description: String,
    pub icon_name: String,
    pub earned_date: DateTime<Utc>,
}

impl Badge {
    pub fn for_category(category: ChallengeCategory, earned_date: DateTime<Utc>) -> Self {
        let (name, icon_name) = match category {
            ChallengeCategory::Transportation => ("Transport Master", "car.fill"),
            ChallengeCategory::Energy => ("Energy Expert", "bolt.fill"),
            ChallengeCategory::Food => ("Vegetarian Pioneer", "fork.knife"),
            ChallengeCategory::Waste => ("Waste Warrior", "trash.fill"),
            ChallengeCategory::Lifestyle => ("Lifestyle Leader", "heart.fill"),
        };
        Self {
            category,
            name: name.to_string(),
            description: format!("Completed {} challenges", category.label()),
            icon_name: icon_name.to_string(),
            earned_date,
        }
    }
}

/// Which challenge categories can earn a badge, in output order.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgePolicy {
    pub categories: Vec<ChallengeCategory>,
}

impl Default for BadgePolicy {
    fn default() -> Self {
        Self {
            categories: vec![
                ChallengeCategory::Transportation,
                ChallengeCategory::Energy,
                ChallengeCategory::Food,
            ],
        }
    }
}

impl BadgePolicy {
    /// One badge per eligible category with at least one completed challenge.
    pub fn badges(&self, challenges: &[Challenge], now: DateTime<Utc>) -> Vec<Badge> {
        self.categories
            .iter()
            .filter(|&&category| {
                challenges
                    .iter()
                    .any(|c| c.category == category && c.is_completed)
            })
            .map(|&category| Badge::for_category(category, now))
            .collect()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProfileIdentity {
    pub user_id: String,
    pub username: String,
    pub join_date: DateTime<Utc>,
}

impl ProfileIdentity {
    pub fn new(username: impl Into<String>, join_date: DateTime<Utc>) -> Self {
        Self {
            user_id: "user_123".to_string(),
            username: username.into(),
            join_date,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Profile {
    pub user_id: String,
    pub username: String,
    pub total_points: u32,
    pub level: u32,
    pub badges: Vec<Badge>,
    pub weekly_emission: f64,
    pub monthly_emission: f64,
    pub yearly_emission: f64,
    pub join_date: DateTime<Utc>,
}

impl Profile {
    /// Derives the whole profile from history and challenge state.
    ///
    /// Weekly and monthly figures are the sums over the last 7 and 30
    /// records in insertion order, not calendar windows. The yearly figure
    /// covers the entire history.
    pub fn derive(
        history: &[FootprintRecord],
        challenges: &[Challenge],
        identity: &ProfileIdentity,
        policy: &BadgePolicy,
        now: DateTime<Utc>,
    ) -> Self {
        let total_points = challenges
            .iter()
            .filter(|c| c.is_completed)
            .fold(0u32, |acc, c| acc.saturating_add(c.points));

        Self {
            user_id: identity.user_id.clone(),
            username: identity.username.clone(),
            total_points,
            level: level_for_points(total_points),
            badges: policy.badges(challenges, now),
            weekly_emission: trailing_sum(history, WEEKLY_RECORDS),
            monthly_emission: trailing_sum(history, MONTHLY_RECORDS),
            yearly_emission: trailing_sum(history, history.len()),
            join_date: identity.join_date,
        }
    }

    pub fn identity(&self) -> ProfileIdentity {
        ProfileIdentity {
            user_id: self.user_id.clone(),
            username: self.username.clone(),
            join_date: self.join_date,
        }
    }

    /// Keeps the earned date of every badge already held in `previous`, so
    /// a recompute without state changes reproduces the same profile.
    pub fn carry_badge_dates(&mut self, previous: &[Badge]) {
        for badge in &mut self.badges {
            if let Some(held) = previous.iter().find(|b| b.category == badge.category) {
                badge.earned_date = held.earned_date;
            }
        }
    }

        pub fn level_title(&self) -> &'static str {
        level_title(self.level)
    }

    pub fn points_to_next_level(&self) -> Option<u32> {
        if self.level >= MAX_LEVEL {
            None
        } else {
            Some(self.level * POINTS_PER_LEVEL - self.total_points)
        }
    }
}

fn trailing_sum(history: &[FootprintRecord], count: usize) -> f64 {
    let start = history.len().saturating_sub(count);
    history[start..].iter().map(|r| r.total_emission()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::emission::{EnergyEmission, FoodEmission, TransportationEmission, WasteEmission};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 20, 18, 0, 0).unwrap()
    }

    fn record_of(kg: f64, date: DateTime<Utc>) -> FootprintRecord {
        // 10 kg of public transport per 1 kg CO2e
        FootprintRecord::new(
            date,
            TransportationEmission::new(0.0, 0.0, kg * 10.0, 0.0).unwrap(),
            EnergyEmission::default(),
            FoodEmission::default(),
            WasteEmission::default(),
        )
    }

    fn completed(category: ChallengeCategory, points: u32) -> Challenge {
        let mut c = Challenge::new("c", "d", category, points, 7);
        c.complete();
        c
    }

    #[test]
    fn test_level_formula() {
        assert_eq!(level_for_points(0), 1);
        assert_eq!(level_for_points(99), 1);
        assert_eq!(level_for_points(100), 2);
        assert_eq!(level_for_points(1899), 19);
        assert_eq!(level_for_points(1999), 20);
        assert_eq!(level_for_points(5000), 20);
    }

    #[test]
    fn test_level_titles() {
        assert_eq!(level_title(1), "Eco Novice");
        assert_eq!(level_title(6), "Eco Enthusiast");
        assert_eq!(level_title(15), "Eco Expert");
        assert_eq!(level_title(20), "Eco Master");
        assert_eq!(level_title(0), "Eco Legend");
    }

    #[test]
    fn test_rollups_over_trailing_records() {
        let history: Vec<_> = (0..10)
            .rev()
            .map(|d| record_of(5.0, now() - Duration::days(d)))
            .collect();
        let identity = ProfileIdentity::new("tester", now());
        let profile = Profile::derive(&history, &[], &identity, &BadgePolicy::default(), now());

        assert!((profile.weekly_emission - 35.0).abs() < 1e-9);
        assert!((profile.monthly_emission - 50.0).abs() < 1e-9);
        assert!((profile.yearly_emission - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_points_and_badges() {
        let challenges = vec![
            completed(ChallengeCategory::Transportation, 100),
            completed(ChallengeCategory::Transportation, 90),
            completed(ChallengeCategory::Lifestyle, 70),
            Challenge::new("Energy Saver", "d", ChallengeCategory::Energy, 80, 7),
        ];
        let identity = ProfileIdentity::new("tester", now());
        let profile = Profile::derive(&[], &challenges, &identity, &BadgePolicy::default(), now());

        assert_eq!(profile.total_points, 260);
        assert_eq!(profile.level, 3);
        assert_eq!(profile.points_to_next_level(), Some(40));
        assert_eq!(profile.badges.len(), 1);
        assert_eq!(profile.badges[0].category, ChallengeCategory::Transportation);
        assert_eq!(profile.badges[0].name, "Transport Master");
        assert_eq!(profile.badges[0].earned_date, now());
    }

    #[test]
    fn test_badge_policy_coverage() {
        let challenges = vec![
            completed(ChallengeCategory::Waste, 120),
            completed(ChallengeCategory::Lifestyle, 70),
        ];
        assert!(BadgePolicy::default().badges(&challenges, now()).is_empty());

        let all = BadgePolicy {
            categories: ChallengeCategory::ALL.to_vec(),
        };
        let badges = all.badges(&challenges, now());
        let categories: Vec<_> = badges.iter().map(|b| b.category).collect();
        assert_eq!(categories, vec![ChallengeCategory::Waste, ChallengeCategory::Lifestyle]);
    }

    #[test]
    fn test_derive_is_idempotent() {
        let history = vec![record_of(3.0, now()), record_of(4.0, now())];
        let challenges = vec![completed(ChallengeCategory::Food, 60)];
        let identity = ProfileIdentity::new("tester", now() - Duration::days(40));
        let policy = BadgePolicy::default();

        let a = Profile::derive(&history, &challenges, &identity, &policy, now());
        let b = Profile::derive(&history, &challenges, &identity, &policy, now());
        assert_eq!(a, b);
        assert_eq!(a.join_date, identity.join_date);
        assert_eq!(a.identity(), identity);
    }

    #[test]
    fn test_max_level_has_no_next() {
        let challenges = vec![completed(ChallengeCategory::Energy, 2500)];
        let identity = ProfileIdentity::new("tester", now());
        let profile = Profile::derive(&[], &challenges, &identity, &BadgePolicy::default(), now());
        assert_eq!(profile.level, MAX_LEVEL);
        assert_eq!(profile.points_to_next_level(), None);
    }

    #[test]
    fn test_points_saturate() {
        let challenges = vec![
            completed(ChallengeCategory::Energy, u32::MAX),
            completed(ChallengeCategory::Food, 500),
        ];
        let identity = ProfileIdentity::new("tester", now());
        let profile = Profile::derive(&[], &challenges, &identity, &BadgePolicy::default(), now());
        assert_eq!(profile.total_points, u32::MAX);
        assert_eq!(profile.level, MAX_LEVEL);
    }

    #[test]
    fn test_carry_badge_dates() {
        let identity = ProfileIdentity::new("tester", now());
        let policy = BadgePolicy::default();
        let earlier = vec![completed(ChallengeCategory::Food, 60)];
        let first = Profile::derive(&[], &earlier, &identity, &policy, now());

        let later = vec![
            completed(ChallengeCategory::Food, 60),
            completed(ChallengeCategory::Energy, 80),
        ];
        let mut second = Profile::derive(&[], &later, &identity, &policy, now() + Duration::days(3));
        second.carry_badge_dates(&first.badges);

        let food = second.badges.iter().find(|b| b.category == ChallengeCategory::Food).unwrap();
        let energy = second.badges.iter().find(|b| b.category == ChallengeCategory::Energy).unwrap();
        assert_eq!(food.earned_date, now());
        assert_eq!(energy.earned_date, now() + Duration::days(3));
    }
}
