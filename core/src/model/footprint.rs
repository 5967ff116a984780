use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EcoError, EcoResult};
use crate::input::expand_key;
use crate::model::emission::{
    compute_total, EmissionCategory, EnergyEmission, FoodEmission, TransportationEmission,
    WasteEmission,
};

/// One day's logged activity. Immutable once built; `total_emission` always
/// equals the sum of the four category emissions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FootprintRecord {
    id: Uuid,
    date: DateTime<Utc>,
    transportation: TransportationEmission,
    energy: EnergyEmission,
    food: FoodEmission,
    waste: WasteEmission,
    total_emission: f64,
}

impl FootprintRecord {
    pub fn new(
        date: DateTime<Utc>,
        transportation: TransportationEmission,
        energy: EnergyEmission,
        food: FoodEmission,
        waste: WasteEmission,
    ) -> Self {
        let total_emission = compute_total(
            transportation.emission(),
            energy.emission(),
            food.emission(),
            waste.emission(),
        );
        Self {
            id: Uuid::new_v4(),
            date,
            transportation,
            energy,
            food,
            waste,
            total_emission,
        }
    }

    pub fn empty(date: DateTime<Utc>) -> Self {
        Self::new(
            date,
            TransportationEmission::default(),
            EnergyEmission::default(),
            FoodEmission::default(),
            WasteEmission::default(),
        )
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn transportation(&self) -> &TransportationEmission {
        &self.transportation
    }

    pub fn energy(&self) -> &EnergyEmission {
        &self.energy
    }

    pub fn food(&self) -> &FoodEmission {
        &self.food
    }

    pub fn waste(&self) -> &WasteEmission {
        &self.waste
    }

    pub fn total_emission(&self) -> f64 {
        self.total_emission
    }

    pub fn category_emission(&self, category: EmissionCategory) -> f64 {
        match category {
            EmissionCategory::Transportation => self.transportation.emission(),
            EmissionCategory::Energy => self.energy.emission(),
            EmissionCategory::Food => self.food.emission(),
            EmissionCategory::Waste => self.waste.emission(),
        }
    }
}

/// Raw quantities for all four categories, positional per `EmissionCategory::factors()`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActivityInput {
    pub transportation: [f64; 4],
    pub energy: [f64; 3],
    pub food: [f64; 4],
    pub waste: [f64; 4],
}

impl ActivityInput {
    pub fn input_names() -> Vec<&'static str> {
        EmissionCategory::ALL
            .iter()
            .flat_map(|c| c.factors().iter().map(|f| f.input))
            .collect()
    }

    /// Sets one quantity by input name or a unique prefix of it.
    pub fn set(&mut self, key: &str, value: f64) -> EcoResult<&'static str> {
        let names = Self::input_names();
        let name = expand_key(key, &names).map_err(|_| {
            let matches: Vec<String> = names
                .iter()
                .filter(|n| n.starts_with(key))
                .map(|n| n.to_string())
                .collect();
            if matches.len() > 1 {
                EcoError::AmbiguousInput {
                    key: key.to_string(),
                    matches,
                }
            } else {
                EcoError::UnknownInput(key.to_string())
            }
        })?;

        for category in EmissionCategory::ALL {
            if let Some(idx) = category.factors().iter().position(|f| f.input == name) {
                self.slots_mut(category)[idx] = value;
                return Ok(name);
            }
        }
        Err(EcoError::UnknownInput(key.to_string()))
    }

    fn slots_mut(&mut self, category: EmissionCategory) -> &mut [f64] {
        match category {
            EmissionCategory::Transportation => &mut self.transportation[..],
            EmissionCategory::Energy => &mut self.energy[..],
            EmissionCategory::Food => &mut self.food[..],
            EmissionCategory::Waste => &mut self.waste[..],
        }
    }

    /// Validates every category before anything is built; the first bad
    /// quantity rejects the whole record.
    pub fn into_record(self, date: DateTime<Utc>) -> EcoResult<FootprintRecord> {
        let [walking, cycling, public_transport, private_vehicle] = self.transportation;
        let [electricity, gas, water] = self.energy;
        let [meat, dairy, vegetables, processed] = self.food;
        let [plastic, paper, organic, electronic] = self.waste;

        let transportation = TransportationEmission::new(walking, cycling, public_transport, private_vehicle)?;
        let energy = EnergyEmission::new(electricity, gas, water)?;
        let food = FoodEmission::new(meat, dairy, vegetables, processed)?;
        let waste = WasteEmission::new(plastic, paper, organic, electronic)?;

        Ok(FootprintRecord::new(date, transportation, energy, food, waste))
    }
}

/// Per-category totals summed over a set of records.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct CategoryBreakdown {
    pub transportation: f64,
    pub energy: f64,
    pub food: f64,
    pub waste: f64,
    pub total: f64,
}

impl CategoryBreakdown {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a FootprintRecord>) -> Self {
        let mut breakdown = Self::default();
        for r in records {
            breakdown.add(r);
        }
        breakdown
    }

    pub fn add(&mut self, record: &FootprintRecord) {
        self.transportation += record.transportation.emission();
        self.energy += record.energy.emission();
        self.food += record.food.emission();
        self.waste += record.waste.emission();
        self.total += record.total_emission;
    }

    pub fn merge(&mut self, other: &CategoryBreakdown) {
        self.transportation += other.transportation;
        self.energy += other.energy;
        self.food += other.food;
        self.waste += other.waste;
        self.total += other.total;
    }

    pub fn get(&self, category: EmissionCategory) -> f64 {
        match category {
            EmissionCategory::Transportation => self.transportation,
            EmissionCategory::Energy => self.energy,
            EmissionCategory::Food => self.food,
            EmissionCategory::Waste => self.waste,
        }
    }

    /// The category with the largest share, if anything was emitted.
    pub fn dominant(&self) -> Option<EmissionCategory> {
        EmissionCategory::ALL
            .into_iter()
            .filter(|c| self.get(*c) > 0.0)
            .max_by(|a, b| {
                self.get(*a)
                    .partial_cmp(&self.get(*b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}
