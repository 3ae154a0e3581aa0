//! Nutrition engine tables
//!
//! Every coefficient the engine uses lives here so the defaults are explicit
//! and a caller can swap in different tables without touching the engine.

use serde::{Deserialize, Serialize};

use crate::models::{ActivityLevel, DiabetesType, DietaryPreference, MacroRatios};

/// Kilocalories per gram of protein
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
/// Kilocalories per gram of carbohydrate (also used for sugar)
pub const KCAL_PER_G_CARBS: f64 = 4.0;
/// Kilocalories per gram of fat
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Mifflin-St Jeor coefficients
///
/// BMR = weight × kg + height × cm + age × years + sex constant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmrCoefficients {
    pub weight: f64,
    pub height: f64,
    pub age: f64,
    pub male_constant: f64,
    pub female_constant: f64,
}

impl Default for BmrCoefficients {
    fn default() -> Self {
        Self {
            weight: 10.0,
            height: 6.25,
            age: -5.0,
            male_constant: 5.0,
            female_constant: -161.0,
        }
    }
}

/// TDEE multipliers per activity level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityFactors {
    pub sedentary: f64,
    pub moderately_active: f64,
    pub very_active: f64,
}

impl ActivityFactors {
    /// Multiplier for a level; an unknown level counts as sedentary
    pub fn factor(&self, level: Option<ActivityLevel>) -> f64 {
        match level {
            Some(ActivityLevel::ModeratelyActive) => self.moderately_active,
            Some(ActivityLevel::VeryActive) => self.very_active,
            Some(ActivityLevel::Sedentary) | None => self.sedentary,
        }
    }
}

impl Default for ActivityFactors {
    fn default() -> Self {
        Self {
            sedentary: 1.2,
            moderately_active: 1.55,
            very_active: 1.725,
        }
    }
}

/// Calorie, macro and limit adjustments for one diabetes type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiabetesAdjustment {
    pub ratios: MacroRatios,
    /// Applied to TDEE to get target calories
    pub calorie_factor: f64,
    /// Share of target calories allowed as added sugar
    pub sugar_fraction: f64,
    pub sodium_limit_mg: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiabetesAdjustments {
    pub type1: DiabetesAdjustment,
    pub type2: DiabetesAdjustment,
    pub prediabetes: DiabetesAdjustment,
    pub no_diabetes: DiabetesAdjustment,
}

impl DiabetesAdjustments {
    pub fn for_type(&self, diabetes: DiabetesType) -> &DiabetesAdjustment {
        match diabetes {
            DiabetesType::Type1 => &self.type1,
            DiabetesType::Type2 => &self.type2,
            DiabetesType::Prediabetes => &self.prediabetes,
            DiabetesType::NoDiabetes => &self.no_diabetes,
        }
    }
}

impl Default for DiabetesAdjustments {
    fn default() -> Self {
        Self {
            type1: DiabetesAdjustment {
                ratios: MacroRatios::new(0.20, 0.40, 0.40),
                calorie_factor: 0.95,
                sugar_fraction: 0.05,
                sodium_limit_mg: 2300,
            },
            type2: DiabetesAdjustment {
                ratios: MacroRatios::new(0.30, 0.30, 0.40),
                calorie_factor: 0.90,
                sugar_fraction: 0.05,
                sodium_limit_mg: 2000,
            },
            prediabetes: DiabetesAdjustment {
                ratios: MacroRatios::new(0.28, 0.35, 0.37),
                calorie_factor: 0.92,
                sugar_fraction: 0.08,
                sodium_limit_mg: 2300,
            },
            no_diabetes: DiabetesAdjustment {
                ratios: MacroRatios::new(0.25, 0.45, 0.30),
                calorie_factor: 1.0,
                sugar_fraction: 0.10,
                sodium_limit_mg: 2300,
            },
        }
    }
}

/// Macro ratios that replace the diabetes ratios when a preference is set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceRatios {
    pub pescatarian: MacroRatios,
    pub vegetarian: MacroRatios,
    pub vegan: MacroRatios,
}

impl PreferenceRatios {
    /// Checked in order pescatarian, vegetarian, vegan; first hit wins
    pub fn override_for(&self, preferences: &[DietaryPreference]) -> Option<MacroRatios> {
        if preferences.contains(&DietaryPreference::Pescatarian) {
            Some(self.pescatarian)
        } else if preferences.contains(&DietaryPreference::Vegetarian) {
            Some(self.vegetarian)
        } else if preferences.contains(&DietaryPreference::Vegan) {
            Some(self.vegan)
        } else {
            None
        }
    }
}

impl Default for PreferenceRatios {
    fn default() -> Self {
        Self {
            pescatarian: MacroRatios::new(0.25, 0.40, 0.35),
            vegetarian: MacroRatios::new(0.20, 0.45, 0.35),
            vegan: MacroRatios::new(0.20, 0.50, 0.30),
        }
    }
}

/// Complete table set for the nutrition engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionConfig {
    pub bmr: BmrCoefficients,
    pub activity: ActivityFactors,
    pub diabetes: DiabetesAdjustments,
    pub preferences: PreferenceRatios,
    pub fiber_g_per_1000_kcal: f64,
    /// Lower bound of the fiber target as a fraction of it
    pub fiber_min_fraction: f64,
    /// Half-width of the macro min/max band as a fraction of the target
    pub macro_band: f64,
}

impl Default for NutritionConfig {
    fn default() -> Self {
        Self {
            bmr: BmrCoefficients::default(),
            activity: ActivityFactors::default(),
            diabetes: DiabetesAdjustments::default(),
            preferences: PreferenceRatios::default(),
            fiber_g_per_1000_kcal: 14.0,
            fiber_min_fraction: 0.8,
            macro_band: 0.10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio_sum(r: &MacroRatios) -> f64 {
        r.protein + r.carbohydrates + r.fat
    }

    #[test]
    fn test_default_ratios_sum_to_one() {
        let config = NutritionConfig::default();
        for diabetes in [
            DiabetesType::Type1,
            DiabetesType::Type2,
            DiabetesType::Prediabetes,
            DiabetesType::NoDiabetes,
        ] {
            let r = config.diabetes.for_type(diabetes).ratios;
            assert!((ratio_sum(&r) - 1.0).abs() < 1e-9, "{:?}", diabetes);
        }
        let p = &config.preferences;
        for r in [p.pescatarian, p.vegetarian, p.vegan] {
            assert!((ratio_sum(&r) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_activity_factor_defaults_to_sedentary() {
        let factors = ActivityFactors::default();
        assert_eq!(factors.factor(None), 1.2);
        assert_eq!(factors.factor(Some(ActivityLevel::ModeratelyActive)), 1.55);
        assert_eq!(factors.factor(Some(ActivityLevel::VeryActive)), 1.725);
    }

    #[test]
    fn test_preference_precedence() {
        let p = PreferenceRatios::default();
        assert_eq!(p.override_for(&[]), None);
        assert_eq!(p.override_for(&[DietaryPreference::NoPreference]), None);
        assert_eq!(
            p.override_for(&[DietaryPreference::Vegan, DietaryPreference::Pescatarian]),
            Some(p.pescatarian)
        );
        assert_eq!(
            p.override_for(&[DietaryPreference::Vegan, DietaryPreference::Vegetarian]),
            Some(p.vegetarian)
        );
        assert_eq!(p.override_for(&[DietaryPreference::Vegan]), Some(p.vegan));
    }
}
