//! JSON encoding of the three persisted collections.

use anyhow::{Context, Result};

use crate::model::challenge::Challenge;
use crate::model::footprint::FootprintRecord;
use crate::model::profile::Profile;

pub fn encode_footprints(records: &[FootprintRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

pub fn decode_footprints(raw: &str) -> Result<Vec<FootprintRecord>> {
    serde_json::from_str(raw).context("Malformed footprint history")
}

pub fn encode_challenges(challenges: &[Challenge]) -> Result<String> {
    Ok(serde_json::to_string_pretty(challenges)?)
}

pub fn decode_challenges(raw: &str) -> Result<Vec<Challenge>> {
    serde_json::from_str(raw).context("Malformed challenge list")
}

pub fn encode_profile(profile: &Profile) -> Result<String> {
    Ok(serde_json::to_string_pretty(profile)?)
}

pub fn decode_profile(raw: &str) -> Result<Profile> {
    serde_json::from_str(raw).context("Malformed profile")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::challenge::ChallengeCategory;
    use crate::model::emission::{EnergyEmission, FoodEmission, TransportationEmission, WasteEmission};
    use crate::model::profile::{BadgePolicy, ProfileIdentity};
    use chrono::{TimeZone, Utc};

    fn sample_history() -> Vec<FootprintRecord> {
        let date = Utc.with_ymd_and_hms(2025, 2, 3, 7, 15, 30).unwrap();
        vec![
            FootprintRecord::new(
                date,
                TransportationEmission::new(2.0, 0.0, 8.0, 0.0).unwrap(),
                EnergyEmission::new(12.0, 1.5, 0.0).unwrap(),
                FoodEmission::new(0.2, 0.0, 0.6, 0.0).unwrap(),
                WasteEmission::new(0.1, 0.0, 0.7, 0.0).unwrap(),
            ),
            FootprintRecord::new(
                date,
                TransportationEmission::new(0.0, 3.3, 0.0, 17.25).unwrap(),
                EnergyEmission::new(0.123456789, 0.0, 2.0).unwrap(),
                FoodEmission::default(),
                WasteEmission::new(0.0, 1.0, 0.0, 0.01).unwrap(),
            ),
        ]
    }

    #[test]
    fn test_history_round_trip_preserves_order_and_values() {
        let history = sample_history();
        let decoded = decode_footprints(&encode_footprints(&history).unwrap()).unwrap();
        assert_eq!(decoded, history);
    }

    #[test]
    fn test_empty_history_round_trip() {
        let decoded = decode_footprints(&encode_footprints(&[]).unwrap()).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_challenges_and_profile_round_trip() {
        let now = Utc.with_ymd_and_hms(2025, 2, 3, 7, 15, 30).unwrap();
        let mut started = Challenge::new("Energy Saver", "Cut 20%", ChallengeCategory::Energy, 80, 7);
        started.start(now).unwrap();
        let mut done = Challenge::new("Green Commute", "Cycle", ChallengeCategory::Transportation, 90, 5);
        done.complete();
        let challenges = vec![started, done];

        let decoded = decode_challenges(&encode_challenges(&challenges).unwrap()).unwrap();
        assert_eq!(decoded, challenges);

        let profile = Profile::derive(
            &sample_history(),
            &challenges,
            &ProfileIdentity::new("tester", now),
            &BadgePolicy::default(),
            now,
        );
        let decoded = decode_profile(&encode_profile(&profile).unwrap()).unwrap();
        assert_eq!(decoded, profile);
    }

    #[test]
    fn test_field_names_are_kept() {
        let raw = encode_footprints(&sample_history()).unwrap();
        assert!(raw.contains("\"public_transport\""));
        assert!(raw.contains("\"total_emission\""));
        assert!(raw.contains("\"electricity_usage\""));
    }

    #[test]
    fn test_malformed_input_is_an_error() {
        assert!(decode_footprints("{not json").is_err());
        assert!(decode_challenges("[{\"title\": 3}]").is_err());
        assert!(decode_profile("").is_err());
    }
}
