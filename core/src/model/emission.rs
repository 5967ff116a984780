use serde::{Deserialize, Serialize};

use crate::error::{EcoError, EcoResult};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmissionCategory {
    Transportation,
    Energy,
    Food,
    Waste,
}

impl EmissionCategory {
    pub const ALL: [EmissionCategory; 4] = [
        EmissionCategory::Transportation,
        EmissionCategory::Energy,
        EmissionCategory::Food,
        EmissionCategory::Waste,
    ];

    pub fn factors(self) -> &'static [EmissionFactor] {
        match self {
            EmissionCategory::Transportation => &TRANSPORTATION_FACTORS,
            EmissionCategory::Energy => &ENERGY_FACTORS,
            EmissionCategory::Food => &FOOD_FACTORS,
            EmissionCategory::Waste => &WASTE_FACTORS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EmissionCategory::Transportation => "Transportation",
            EmissionCategory::Energy => "Energy",
            EmissionCategory::Food => "Food",
            EmissionCategory::Waste => "Waste",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissionFactor {
    pub input: &'static str,
    pub unit: &'static str,
    /// kg CO2e per unit of input.
    pub factor: f64,
}

const fn factor(input: &'static str, unit: &'static str, factor: f64) -> EmissionFactor {
    EmissionFactor { input, unit, factor }
}

// Factors (kg CO2e per unit)
pub const TRANSPORTATION_FACTORS: [EmissionFactor; 4] = [
    factor("walking", "km", 0.0),
    factor("cycling", "km", 0.0),
    factor("public_transport", "km", 0.10),
    factor("private_vehicle", "km", 0.20),
];

// Hong Kong grid electricity: 0.7 kg CO2e/kWh
pub const ENERGY_FACTORS: [EmissionFactor; 3] = [
    factor("electricity", "kWh", 0.70),
    factor("gas", "m3", 1.90),
    factor("water", "m3", 0.30),
];

pub const FOOD_FACTORS: [EmissionFactor; 4] = [
    factor("meat", "kg", 27.0),
    factor("dairy", "kg", 3.2),
    factor("vegetables", "kg", 2.0),
    factor("processed_food", "kg", 3.5),
];

pub const WASTE_FACTORS: [EmissionFactor; 4] = [
    factor("plastic", "kg", 6.0),
    factor("paper", "kg", 1.3),
    factor("organic", "kg", 0.5),
    factor("electronic", "kg", 12.0),
];

/// Converts positional quantities (ordered as `category.factors()`) into kg CO2e.
///
/// The whole set is rejected if any quantity is negative or non-finite, or if
/// the number of quantities does not match the factor table.
pub fn compute_category_emission(category: EmissionCategory, quantities: &[f64]) -> EcoResult<f64> {
    let factors = category.factors();
    if quantities.len() != factors.len() {
        return Err(EcoError::invalid_input(
            format!("{} (expected {} quantities, got {})", category.label(), factors.len(), quantities.len()),
            quantities.len() as f64,
        ));
    }

    for (f, &q) in factors.iter().zip(quantities) {
        if !q.is_finite() || q < 0.0 {
            return Err(EcoError::invalid_input(f.input, q));
        }
    }

    Ok(factors.iter().zip(quantities).map(|(f, q)| q * f.factor).sum())
}

pub fn compute_total(transportation: f64, energy: f64, food: f64, waste: f64) -> f64 {
    transportation + energy + food + waste
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct TransportationEmission {
    walking: f64,
    cycling: f64,
    public_transport: f64,
    private_vehicle: f64,
    emission: f64,
}

impl TransportationEmission {
    pub fn new(walking: f64, cycling: f64, public_transport: f64, private_vehicle: f64) -> EcoResult<Self> {
        let emission = compute_category_emission(
            EmissionCategory::Transportation,
            &[walking, cycling, public_transport, private_vehicle],
        )?;
        Ok(Self {
            walking,
            cycling,
            public_transport,
            private_vehicle,
            emission,
        })
    }

    pub fn walking(&self) -> f64 {
        self.walking
    }

    pub fn cycling(&self) -> f64 {
        self.cycling
    }

    pub fn public_transport(&self) -> f64 {
        self.public_transport
    }

    pub fn private_vehicle(&self) -> f64 {
        self.private_vehicle
    }

    pub fn emission(&self) -> f64 {
        self.emission
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct EnergyEmission {
    electricity_usage: f64,
    gas_usage: f64,
    water_usage: f64,
    emission: f64,
}

impl EnergyEmission {
    pub fn new(electricity_usage: f64, gas_usage: f64, water_usage: f64) -> EcoResult<Self> {
        let emission = compute_category_emission(
            EmissionCategory::Energy,
            &[electricity_usage, gas_usage, water_usage],
        )?;
        Ok(Self {
            electricity_usage,
            gas_usage,
            water_usage,
            emission,
        })
    }

    pub fn electricity_usage(&self) -> f64 {
        self.electricity_usage
    }

    pub fn gas_usage(&self) -> f64 {
        self.gas_usage
    }

    pub fn water_usage(&self) -> f64 {
        self.water_usage
    }

    pub fn emission(&self) -> f64 {
        self.emission
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct FoodEmission {
    meat_consumption: f64,
    dairy_consumption: f64,
    vegetables_consumption: f64,
    processed_food: f64,
    emission: f64,
}

impl FoodEmission {
    pub fn new(meat: f64, dairy: f64, vegetables: f64, processed_food: f64) -> EcoResult<Self> {
        let emission =
            compute_category_emission(EmissionCategory::Food, &[meat, dairy, vegetables, processed_food])?;
        Ok(Self {
            meat_consumption: meat,
            dairy_consumption: dairy,
            vegetables_consumption: vegetables,
            processed_food,
            emission,
        })
    }

    pub fn meat_consumption(&self) -> f64 {
        self.meat_consumption
    }

    pub fn dairy_consumption(&self) -> f64 {
        self.dairy_consumption
    }

    pub fn vegetables_consumption(&self) -> f64 {
        self.vegetables_consumption
    }

    pub fn processed_food(&self) -> f64 {
        self.processed_food
    }

    pub fn emission(&self) -> f64 {
        self.emission
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct WasteEmission {
    plastic_waste: f64,
    paper_waste: f64,
    organic_waste: f64,
    electronic_waste: f64,
    emission: f64,
}

impl WasteEmission {
    pub fn new(plastic: f64, paper: f64, organic: f64, electronic: f64) -> EcoResult<Self> {
        let emission =
            compute_category_emission(EmissionCategory::Waste, &[plastic, paper, organic, electronic])?;
        Ok(Self {
            plastic_waste: plastic,
            paper_waste: paper,
            organic_waste: organic,
            electronic_waste: electronic,
            emission,
        })
    }

    pub fn plastic_waste(&self) -> f64 {
        self.plastic_waste
    }

    pub fn paper_waste(&self) -> f64 {
        self.paper_waste
    }

    pub fn organic_waste(&self) -> f64 {
        self.organic_waste
    }

    pub fn electronic_waste(&self) -> f64 {
        self.electronic_waste
    }

    pub fn emission(&self) -> f64 {
        self.emission
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_factor_tables_match_categories() {
        assert_eq!(EmissionCategory::Transportation.factors().len(), 4);
        assert_eq!(EmissionCategory::Energy.factors().len(), 3);
        assert_eq!(EmissionCategory::Food.factors()[0].factor, 27.0);
        assert_eq!(EmissionCategory::Waste.factors()[3].input, "electronic");
    }

    #[test]
    fn test_walking_and_cycling_are_free() {
        let t = TransportationEmission::new(12.0, 30.0, 0.0, 0.0).unwrap();
        assert_eq!(t.emission(), 0.0);
    }

    #[test]
    fn test_category_emissions() {
        let t = TransportationEmission::new(0.0, 0.0, 10.0, 5.0).unwrap();
        assert!((t.emission() - 2.0).abs() < EPS);

        let e = EnergyEmission::new(10.0, 1.0, 2.0).unwrap();
        assert!((e.emission() - (7.0 + 1.9 + 0.6)).abs() < EPS);

        let f = FoodEmission::new(0.5, 1.0, 1.0, 2.0).unwrap();
        assert!((f.emission() - (13.5 + 3.2 + 2.0 + 7.0)).abs() < EPS);

        let w = WasteEmission::new(1.0, 1.0, 2.0, 0.5).unwrap();
        assert!((w.emission() - (6.0 + 1.3 + 1.0 + 6.0)).abs() < EPS);
    }

    #[test]
    fn test_emission_is_linear_per_input() {
        let base = [1.0, 2.0, 3.0, 4.0];
        let base_emission = compute_category_emission(EmissionCategory::Food, &base).unwrap();

        for (i, f) in EmissionCategory::Food.factors().iter().enumerate() {
            let mut scaled = base;
            scaled[i] *= 3.0;
            let scaled_emission = compute_category_emission(EmissionCategory::Food, &scaled).unwrap();
            let expected = base_emission + 2.0 * base[i] * f.factor;
            assert!((scaled_emission - expected).abs() < 1e-6, "input {}", f.input);
        }
    }

    #[test]
    fn test_rejects_negative_and_non_finite() {
        let err = EnergyEmission::new(-1.0, 0.0, 0.0).unwrap_err();
        match err {
            EcoError::InvalidInput { input, value } => {
                assert_eq!(input, "electricity");
                assert_eq!(value, -1.0);
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(FoodEmission::new(f64::NAN, 0.0, 0.0, 0.0).is_err());
        assert!(WasteEmission::new(0.0, f64::INFINITY, 0.0, 0.0).is_err());
        assert!(TransportationEmission::new(0.0, 0.0, 0.0, f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_rejects_wrong_arity() {
        assert!(compute_category_emission(EmissionCategory::Energy, &[1.0, 2.0]).is_err());
        assert!(compute_category_emission(EmissionCategory::Waste, &[]).is_err());
    }

    #[test]
    fn test_compute_total() {
        assert_eq!(compute_total(1.0, 7.0, 0.0, 0.0), 8.0);
        assert_eq!(compute_total(0.0, 0.0, 0.0, 0.0), 0.0);
    }
}
