//! Nutrition requirement engine
//!
//! BMR via Mifflin-St Jeor, TDEE via activity factor, then diabetes and
//! dietary-preference adjustments to calories and macros.

use chrono::{DateTime, Utc};

use super::config::{
    BmrCoefficients, NutritionConfig, KCAL_PER_G_CARBS, KCAL_PER_G_FAT, KCAL_PER_G_PROTEIN,
};
use super::plan::{food_groups, meal_timing, special_considerations};
use crate::build_info::PROFILE_FORMAT_VERSION;
use crate::models::{
    BasedOn, DailyLimit, DietaryPreference, FiberTarget, Gender, MacroRatios, MacroTarget,
    NutritionProfile, ProfileError, UserProfileInput,
};

/// Round a positive quantity to a whole number
fn whole(value: f64) -> u32 {
    value.round().max(0.0) as u32
}

/// Basal metabolic rate in kcal/day, unrounded
///
/// Only `Gender::Male` uses the male constant; every other value uses the
/// female constant.
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age: u32, gender: Gender, coef: &BmrCoefficients) -> f64 {
    let sex_constant = match gender {
        Gender::Male => coef.male_constant,
        Gender::Female | Gender::Other | Gender::PreferNotToSay => coef.female_constant,
    };
    coef.weight * weight_kg + coef.height * height_cm + coef.age * f64::from(age) + sex_constant
}

/// Macro ratios after the preference override
pub fn macro_ratios(input: &UserProfileInput, config: &NutritionConfig) -> MacroRatios {
    let diabetes_ratios = config.diabetes.for_type(input.diabetes()).ratios;
    config
        .preferences
        .override_for(&input.dietary_preferences)
        .unwrap_or(diabetes_ratios)
}

fn macro_target(grams: u32, band: f64) -> MacroTarget {
    let g = f64::from(grams);
    MacroTarget {
        target: grams,
        min: whole(g * (1.0 - band)),
        max: whole(g * (1.0 + band)),
        unit: "g".to_string(),
    }
}

/// Compute a nutrition profile stamped with the current time
pub fn compute_nutrition_profile(
    input: &UserProfileInput,
    config: &NutritionConfig,
) -> Result<NutritionProfile, ProfileError> {
    compute_nutrition_profile_at(input, config, Utc::now())
}

/// Compute a nutrition profile stamped with `generated_at`
///
/// Identical inputs and timestamp always give identical profiles.
pub fn compute_nutrition_profile_at(
    input: &UserProfileInput,
    config: &NutritionConfig,
    generated_at: DateTime<Utc>,
) -> Result<NutritionProfile, ProfileError> {
    input.validate()?;

    let diabetes = input.diabetes();
    let adjustment = config.diabetes.for_type(diabetes);

    let bmr = calculate_bmr(input.weight, input.height, input.age, input.gender, &config.bmr);
    let tdee = whole(bmr * config.activity.factor(input.activity_level));
    let target_calories = whole(f64::from(tdee) * adjustment.calorie_factor);
    let calories = f64::from(target_calories);

    let ratios = macro_ratios(input, config);
    let protein_g = whole(calories * ratios.protein / KCAL_PER_G_PROTEIN);
    let carbs_g = whole(calories * ratios.carbohydrates / KCAL_PER_G_CARBS);
    let fat_g = whole(calories * ratios.fat / KCAL_PER_G_FAT);

    let fiber_g = whole(calories / 1000.0 * config.fiber_g_per_1000_kcal);
    let sugar_limit_g = whole(calories * adjustment.sugar_fraction / KCAL_PER_G_CARBS);

    tracing::debug!(
        bmr,
        tdee,
        target_calories,
        diabetes = diabetes.as_str(),
        "Computed energy targets"
    );

    let dietary_preferences = if input.dietary_preferences.is_empty() {
        vec![DietaryPreference::NoPreference]
    } else {
        input.dietary_preferences.clone()
    };

    Ok(NutritionProfile {
        bmr: whole(bmr),
        tdee,
        target_calories,
        macro_ratios: ratios,
        protein: macro_target(protein_g, config.macro_band),
        carbohydrates: macro_target(carbs_g, config.macro_band),
        fat: macro_target(fat_g, config.macro_band),
        fiber: FiberTarget {
            target: fiber_g,
            min: whole(f64::from(fiber_g) * config.fiber_min_fraction),
            unit: "g".to_string(),
        },
        sugar: DailyLimit {
            limit: sugar_limit_g,
            unit: "g".to_string(),
        },
        sodium: DailyLimit {
            limit: adjustment.sodium_limit_mg,
            unit: "mg".to_string(),
        },
        meal_timing: meal_timing(diabetes),
        food_groups: food_groups(input),
        special_considerations: special_considerations(input),
        generated_at,
        version: PROFILE_FORMAT_VERSION.to_string(),
        based_on: BasedOn {
            diabetes_type: diabetes,
            dietary_preferences,
            activity_level: input.activity_level,
        },
    })
}
