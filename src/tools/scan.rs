//! Allergen Scan MCP Tool
//!
//! Checks food items against a user's stored allergy profile, or against an
//! ad-hoc allergy list when one is supplied.

use crate::allergy::{compute_allergy_profile, detect_allergens};
use crate::db::Database;
use crate::models::{AllergenScanResult, AllergyDeclaration, AllergyInput, FoodItem};

use super::profiles::get_allergy_profile;

/// Scan food items for allergens
///
/// When `allergies` is given the scan uses a profile computed from it and
/// nothing is read from the database.
pub fn scan_food_for_allergens(
    db: &Database,
    user_id: Option<&str>,
    allergies: Option<Vec<AllergyDeclaration>>,
    food_items: &[FoodItem],
) -> Result<AllergenScanResult, String> {
    let profile = match (allergies, user_id) {
        (Some(allergies), _) => compute_allergy_profile(&AllergyInput {
            allergies,
            ..AllergyInput::default()
        }),
        (None, Some(user_id)) => get_allergy_profile(db, user_id)?.ok_or_else(|| {
            format!(
                "No allergy profile stored for '{}'. Call generate_allergy_profile first.",
                user_id.trim()
            )
        })?,
        (None, None) => return Err("Provide either user_id or allergies".to_string()),
    };

    Ok(detect_allergens(food_items, &profile))
}
