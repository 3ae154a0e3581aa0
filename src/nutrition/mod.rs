//! Nutrition requirement engine
//!
//! Turns a user profile into daily calorie, macro and micronutrient targets.

pub mod config;
pub mod engine;
pub mod plan;

pub use config::{
    ActivityFactors, BmrCoefficients, DiabetesAdjustment, DiabetesAdjustments, NutritionConfig,
    PreferenceRatios,
};
pub use engine::{
    calculate_bmr, compute_nutrition_profile, compute_nutrition_profile_at, macro_ratios,
};
pub use plan::{food_groups, meal_timing, special_considerations};
