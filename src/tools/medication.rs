//! Medication Interaction MCP Tool
//!
//! Checks a medication against dietary context and a stored or ad-hoc
//! allergy profile.

use crate::allergy::{analyze_medication_interactions, compute_allergy_profile};
use crate::db::Database;
use crate::models::{
    AllergyDeclaration, AllergyInput, MedicationContext, MedicationInput,
    MedicationInteractionReport,
};

use super::profiles::get_allergy_profile;

/// Check a medication for food-drug and allergy-drug interactions
///
/// `allergies` takes precedence over the stored profile. Without either,
/// only food-drug rules are checked.
pub fn check_medication_interactions(
    db: &Database,
    user_id: Option<&str>,
    allergies: Option<Vec<AllergyDeclaration>>,
    medication: &MedicationInput,
    context: &MedicationContext,
) -> Result<MedicationInteractionReport, String> {
    let profile = match (allergies, user_id) {
        (Some(allergies), _) => Some(compute_allergy_profile(&AllergyInput {
            allergies,
            ..AllergyInput::default()
        })),
        (None, Some(user_id)) => get_allergy_profile(db, user_id)?,
        (None, None) => None,
    };

    Ok(analyze_medication_interactions(
        medication,
        context,
        profile.as_ref(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RiskLevel, Severity};
    use crate::tools::profiles::generate_allergy_profile;

    fn temp_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_and_migrate(dir.path().join("medication.db")).unwrap();
        (dir, db)
    }

    #[test]
    fn test_stored_profile_drives_allergy_checks() {
        let (_dir, db) = temp_db();
        let input = AllergyInput {
            allergies: vec![AllergyDeclaration::new("Sulfa drugs", Severity::High)],
            ..AllergyInput::default()
        };
        generate_allergy_profile(&db, "u1", &input).unwrap();

        let drug = MedicationInput::named("Sulfamethoxazole (sulfa)");
        let report = check_medication_interactions(
            &db,
            Some("u1"),
            None,
            &drug,
            &MedicationContext::default(),
        )
        .unwrap();
        assert_eq!(report.allergy_drug_interactions.len(), 1);
        assert_eq!(report.overall_risk, RiskLevel::High);
    }

    #[test]
    fn test_unknown_user_checks_food_rules_only() {
        let (_dir, db) = temp_db();
        let report = check_medication_interactions(
            &db,
            Some("ghost"),
            None,
            &MedicationInput::named("Warfarin"),
            &MedicationContext::default(),
        )
        .unwrap();
        assert!(report.allergy_drug_interactions.is_empty());
        assert_eq!(report.food_drug_interactions.len(), 1);
    }

    #[test]
    fn test_inline_allergies_override_stored_profile() {
        let (_dir, db) = temp_db();
        let report = check_medication_interactions(
            &db,
            None,
            Some(vec![AllergyDeclaration::new("Iodine contrast", Severity::Medium)]),
            &MedicationInput::named("Povidone-iodine"),
            &MedicationContext::default(),
        )
        .unwrap();
        assert_eq!(report.overall_risk, RiskLevel::Medium);
        assert!(check_medication_interactions(
            &db,
            Some("  "),
            None,
            &MedicationInput::named("Warfarin"),
            &MedicationContext::default(),
        )
        .is_err());
    }
}
