//! Nutrition profile output
//!
//! Write-once snapshot produced by the nutrition engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::profile::{ActivityLevel, DiabetesType, DietaryPreference};

/// Importance of a guidance entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// A macronutrient target with a tolerance band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroTarget {
    pub target: u32,
    pub min: u32,
    pub max: u32,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiberTarget {
    pub target: u32,
    pub min: u32,
    pub unit: String,
}

/// An upper bound (sugar, sodium)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLimit {
    pub limit: u32,
    pub unit: String,
}

/// One slot in the daily meal schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealSlot {
    pub meal: String,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealTimingPlan {
    pub frequency: u8,
    pub snacks: u8,
    pub timing: Vec<MealSlot>,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodGroupTarget {
    pub servings: u8,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Daily servings per food group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodGroupPlan {
    pub vegetables: FoodGroupTarget,
    pub fruits: FoodGroupTarget,
    pub grains: FoodGroupTarget,
    pub protein: FoodGroupTarget,
    pub dairy: FoodGroupTarget,
    pub fats: FoodGroupTarget,
}

/// Free-text guidance with a machine-readable type tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guidance {
    #[serde(rename = "type")]
    pub kind: String,
    pub priority: Priority,
    pub message: String,
}

impl Guidance {
    pub fn new(kind: &str, priority: Priority, message: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            priority,
            message: message.into(),
        }
    }
}

/// Inputs echoed back for traceability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasedOn {
    pub diabetes_type: DiabetesType,
    pub dietary_preferences: Vec<DietaryPreference>,
    pub activity_level: Option<ActivityLevel>,
}

/// Macro split as fractions of target calories
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroRatios {
    pub protein: f64,
    pub carbohydrates: f64,
    pub fat: f64,
}

impl MacroRatios {
    pub const fn new(protein: f64, carbohydrates: f64, fat: f64) -> Self {
        Self {
            protein,
            carbohydrates,
            fat,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionProfile {
    pub bmr: u32,
    pub tdee: u32,
    pub target_calories: u32,
    pub macro_ratios: MacroRatios,

    pub protein: MacroTarget,
    pub carbohydrates: MacroTarget,
    pub fat: MacroTarget,

    pub fiber: FiberTarget,
    pub sugar: DailyLimit,
    pub sodium: DailyLimit,

    pub meal_timing: MealTimingPlan,
    pub food_groups: FoodGroupPlan,
    pub special_considerations: Vec<Guidance>,

    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub based_on: BasedOn,
}
