use chrono::{DateTime, Duration, Utc};

use crate::error::EcoResult;
use crate::model::challenge::{Challenge, ChallengeCategory};
use crate::model::emission::{EnergyEmission, FoodEmission, TransportationEmission, WasteEmission};
use crate::model::footprint::FootprintRecord;

/// Starter data for a first run: a challenge catalog and a week of history.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleData {
    pub footprints: Vec<FootprintRecord>,
    pub challenges: Vec<Challenge>,
}

// (days ago, walking km, public transport km, electricity kWh, gas m3, meat kg, vegetables kg, plastic kg, organic kg)
const SAMPLE_WEEK: [(i64, f64, f64, f64, f64, f64, f64, f64, f64); 7] = [
    (6, 2.0, 8.0, 12.0, 1.5, 0.2, 0.6, 0.1, 0.7),
    (5, 1.5, 10.0, 14.0, 2.0, 0.3, 0.5, 0.2, 0.8),
    (4, 3.0, 6.0, 11.0, 1.8, 0.1, 0.8, 0.15, 0.6),
    (3, 2.5, 9.0, 13.0, 1.7, 0.25, 0.7, 0.18, 0.75),
    (2, 1.8, 12.0, 15.0, 2.2, 0.4, 0.4, 0.25, 0.9),
    (1, 2.2, 7.0, 10.0, 1.6, 0.15, 0.9, 0.12, 0.65),
    (0, 2.0, 10.0, 15.0, 2.0, 0.3, 0.5, 0.2, 0.8),
];

impl SampleData {
    pub fn demo(now: DateTime<Utc>) -> EcoResult<Self> {
        Ok(Self {
            footprints: sample_footprints(now)?,
            challenges: sample_challenges(now),
        })
    }
}

pub fn sample_footprints(now: DateTime<Utc>) -> EcoResult<Vec<FootprintRecord>> {
    SAMPLE_WEEK
        .iter()
        .map(|&(days_ago, walking, public, electricity, gas, meat, vegetables, plastic, organic)| {
            Ok(FootprintRecord::new(
                now - Duration::days(days_ago),
                TransportationEmission::new(walking, 0.0, public, 0.0)?,
                EnergyEmission::new(electricity, gas, 0.0)?,
                FoodEmission::new(meat, 0.0, vegetables, 0.0)?,
                WasteEmission::new(plastic, 0.0, organic, 0.0)?,
            ))
        })
        .collect()
}

pub fn sample_challenges(now: DateTime<Utc>) -> Vec<Challenge> {
    let mut vegetarian = Challenge::new(
        "Vegetarian Challenge",
        "Choose vegetarian meals for 3 consecutive days",
        ChallengeCategory::Food,
        60,
        3,
    );
    vegetarian.start_date = Some(now - Duration::days(5));
    vegetarian.end_date = Some(now - Duration::days(2));
    vegetarian.complete();

    vec![
        Challenge::new(
            "Car-Free Week",
            "Use public transport or walk for 7 consecutive days",
            ChallengeCategory::Transportation,
            100,
            7,
        ),
        Challenge::new(
            "Energy Saver",
            "Reduce electricity usage by 20% for one week",
            ChallengeCategory::Energy,
            80,
            7,
        ),
        vegetarian,
        Challenge::new(
            "Zero Waste Life",
            "Reduce waste production by 50% for one week",
            ChallengeCategory::Waste,
            120,
            7,
        ),
        Challenge::new(
            "Green Commute",
            "Cycle or walk to work for 5 consecutive days",
            ChallengeCategory::Transportation,
            90,
            5,
        ),
        Challenge::new(
            "Eco Shopping",
            "Only buy eco-friendly packaged products for one week",
            ChallengeCategory::Lifestyle,
            70,
            7,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::challenge::ChallengeStatus;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 7, 20, 0, 0).unwrap()
    }

    #[test]
    fn test_sample_week_is_chronological_and_ends_now() {
        let records = sample_footprints(now()).unwrap();
        assert_eq!(records.len(), 7);
        assert!(records.windows(2).all(|w| w[0].date() < w[1].date()));
        assert_eq!(records.last().unwrap().date(), now());
        assert_eq!(records[0].date(), now() - Duration::days(6));
    }

    #[test]
    fn test_first_sample_day_emission() {
        let records = sample_footprints(now()).unwrap();
        // 0.8 + (8.4 + 2.85) + (5.4 + 1.2) + (0.6 + 0.35)
        assert!((records[0].total_emission() - 19.6).abs() < 1e-9);
    }

    #[test]
    fn test_sample_catalog() {
        let challenges = sample_challenges(now());
        assert_eq!(challenges.len(), 6);

        let completed: Vec<_> = challenges
            .iter()
            .filter(|c| c.status() == ChallengeStatus::Completed)
            .collect();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].category, ChallengeCategory::Food);
        assert_eq!(completed[0].points, 60);

        assert!(challenges
            .iter()
            .filter(|c| !c.is_completed)
            .all(|c| c.status() == ChallengeStatus::NotStarted));
    }
}
