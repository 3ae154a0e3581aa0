//! Allergy risk profiling engine
//!
//! Classifies each declared allergy, aggregates an overall risk level and
//! derives the guidance that goes with it. Never fails: missing fields fall
//! back to documented defaults.

use chrono::{DateTime, Utc};

use super::classify::{categorize, common_names, risk_score};
use super::guidance::{
    alert_settings, cross_reactivity, default_alert_settings, dietary_recommendations,
    emergency_info, hidden_sources, safe_alternatives,
};
use crate::build_info::PROFILE_FORMAT_VERSION;
use crate::models::{
    AllergyDeclaration, AllergyInput, AllergyProfile, AnalyzedAllergy, EmergencyInfo, RiskLevel,
    Severity, UNKNOWN_LABEL,
};

/// Average risk score at or above which the overall level is high
const HIGH_AVERAGE_SCORE: f64 = 75.0;
/// Average risk score at or above which the overall level is medium
const MEDIUM_AVERAGE_SCORE: f64 = 60.0;

/// Enrich a single declaration with category, synonyms and score
pub fn analyze_allergy(declaration: &AllergyDeclaration) -> AnalyzedAllergy {
    let label = declaration.effective_label();
    if label == UNKNOWN_LABEL {
        tracing::warn!(id = ?declaration.id, "Allergy declared without a label");
    }

    let category = categorize(label);
    AnalyzedAllergy {
        id: declaration.id.clone(),
        label: label.to_string(),
        severity: declaration.severity,
        allergy_type: declaration.allergy_type,
        category,
        common_names: common_names(label),
        risk_score: risk_score(declaration.severity, category),
    }
}

/// Aggregate level from severities and the mean risk score
pub fn overall_risk_level(allergies: &[AnalyzedAllergy]) -> RiskLevel {
    if allergies.is_empty() {
        return RiskLevel::Low;
    }

    let high_count = allergies
        .iter()
        .filter(|a| a.severity == Severity::High)
        .count();
    let total: u32 = allergies.iter().map(|a| u32::from(a.risk_score)).sum();
    let average = f64::from(total) / allergies.len() as f64;

    if high_count >= 2 || average >= HIGH_AVERAGE_SCORE {
        RiskLevel::High
    } else if high_count >= 1 || average >= MEDIUM_AVERAGE_SCORE {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn empty_profile(generated_at: DateTime<Utc>) -> AllergyProfile {
    AllergyProfile {
        has_allergies: false,
        allergies: Vec::new(),
        risk_level: RiskLevel::Low,
        alert_settings: default_alert_settings(),
        cross_reactivity: Vec::new(),
        hidden_sources: Vec::new(),
        safe_alternatives: Vec::new(),
        emergency_info: EmergencyInfo {
            has_action_plan: false,
            action_plan: None,
            risk_level: RiskLevel::Low,
        },
        dietary_recommendations: Vec::new(),
        generated_at,
        version: PROFILE_FORMAT_VERSION.to_string(),
    }
}

/// Compute an allergy profile stamped with the current time
pub fn compute_allergy_profile(input: &AllergyInput) -> AllergyProfile {
    compute_allergy_profile_at(input, Utc::now())
}

/// Compute an allergy profile stamped with `generated_at`
pub fn compute_allergy_profile_at(
    input: &AllergyInput,
    generated_at: DateTime<Utc>,
) -> AllergyProfile {
    if input.allergies.is_empty() {
        return empty_profile(generated_at);
    }

    let allergies: Vec<AnalyzedAllergy> = input.allergies.iter().map(analyze_allergy).collect();
    let risk_level = overall_risk_level(&allergies);

    tracing::debug!(
        count = allergies.len(),
        risk_level = risk_level.as_str(),
        "Analyzed allergies"
    );

    AllergyProfile {
        has_allergies: true,
        risk_level,
        alert_settings: alert_settings(risk_level),
        cross_reactivity: cross_reactivity(&allergies),
        hidden_sources: hidden_sources(&allergies),
        safe_alternatives: safe_alternatives(&allergies),
        emergency_info: emergency_info(&allergies, risk_level),
        dietary_recommendations: dietary_recommendations(&allergies, input.diabetes_type),
        allergies,
        generated_at,
        version: PROFILE_FORMAT_VERSION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlertSeverity, AllergyCategory, DiabetesType};

    fn input(allergies: Vec<AllergyDeclaration>) -> AllergyInput {
        AllergyInput {
            allergies,
            diabetes_type: None,
            dietary_restrictions: Vec::new(),
        }
    }

    #[test]
    fn test_empty_allergies_fast_path() {
        let profile = compute_allergy_profile(&AllergyInput::default());
        assert!(!profile.has_allergies);
        assert_eq!(profile.risk_level, RiskLevel::Low);
        assert_eq!(profile.alert_settings.severity, AlertSeverity::All);
        assert!(profile.cross_reactivity.is_empty());
        assert!(profile.dietary_recommendations.is_empty());
        assert!(!profile.emergency_info.has_action_plan);
        assert_eq!(profile.version, "1.0");
    }

    #[test]
    fn test_peanut_and_shellfish_scenario() {
        let profile = compute_allergy_profile(&input(vec![
            AllergyDeclaration::new("Peanuts", Severity::High),
            AllergyDeclaration::new("Shellfish", Severity::High),
        ]));

        assert!(profile.has_allergies);
        assert_eq!(profile.risk_level, RiskLevel::High);
        assert_eq!(profile.allergies[0].category, AllergyCategory::TreeNutsPeanuts);
        assert_eq!(profile.allergies[0].risk_score, 95);
        assert_eq!(profile.allergies[1].risk_score, 95);

        let kinds: Vec<_> = profile.cross_reactivity.iter().map(|c| c.kind.as_str()).collect();
        assert_eq!(kinds, vec!["tree_nuts", "peanut_tree_nut", "shellfish"]);

        assert!(profile.emergency_info.has_action_plan);
        assert!(profile.alert_settings.scan_before_eating);
        assert_eq!(profile.hidden_sources.len(), 2);
        assert_eq!(profile.safe_alternatives.len(), 1);
    }

    #[test]
    fn test_overall_level_thresholds() {
        let analyze = |decls: Vec<AllergyDeclaration>| -> Vec<AnalyzedAllergy> {
            decls.iter().map(analyze_allergy).collect()
        };

        // One low-severity "other" allergy scores 55
        let low = analyze(vec![AllergyDeclaration::new("Kiwi", Severity::Low)]);
        assert_eq!(overall_risk_level(&low), RiskLevel::Low);

        // Medium default scores 65
        let medium = analyze(vec![AllergyDeclaration::new("Kiwi", Severity::Medium)]);
        assert_eq!(overall_risk_level(&medium), RiskLevel::Medium);

        // Medium shellfish scores 80, above the high average
        let high_avg = analyze(vec![AllergyDeclaration::new("Shrimp", Severity::Medium)]);
        assert_eq!(overall_risk_level(&high_avg), RiskLevel::High);

        // One high allergy alone does not make the profile high
        let one_high = analyze(vec![
            AllergyDeclaration::new("Soy", Severity::High),
            AllergyDeclaration::new("Kiwi", Severity::Low),
            AllergyDeclaration::new("Mango", Severity::Low),
        ]);
        assert_eq!(overall_risk_level(&one_high), RiskLevel::Medium);
    }

    #[test]
    fn test_missing_label_and_severity_defaults() {
        let decl: AllergyDeclaration = serde_json::from_str("{}").unwrap();
        let profile = compute_allergy_profile(&input(vec![decl]));
        let allergy = &profile.allergies[0];
        assert_eq!(allergy.label, "Unknown");
        assert_eq!(allergy.severity, Severity::Medium);
        assert_eq!(allergy.category, AllergyCategory::Other);
        assert_eq!(allergy.common_names, vec!["Unknown"]);
        assert_eq!(allergy.risk_score, 65);
    }

    #[test]
    fn test_diabetes_recommendation() {
        let mut i = input(vec![AllergyDeclaration::new("Milk", Severity::Low)]);
        i.diabetes_type = Some(DiabetesType::Type2);
        let profile = compute_allergy_profile(&i);
        assert!(profile
            .dietary_recommendations
            .iter()
            .any(|g| g.kind == "diabetes_allergy_management"));
        assert_eq!(profile.dietary_recommendations.last().unwrap().kind, "dairy_allergy");
    }

    #[test]
    fn test_fixed_clock_is_idempotent() {
        let at = Utc::now();
        let i = input(vec![AllergyDeclaration::new("Eggs", Severity::Medium)]);
        assert_eq!(compute_allergy_profile_at(&i, at), compute_allergy_profile_at(&i, at));
    }

    #[test]
    fn test_profile_json_shape() {
        let profile = compute_allergy_profile(&input(vec![AllergyDeclaration::new(
            "Peanuts",
            Severity::High,
        )]));
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["allergies"][0]["type"], "common");
        assert_eq!(json["allergies"][0]["category"], "tree_nuts_peanuts");
        assert_eq!(json["risk_level"], "high");
        assert_eq!(json["alert_settings"]["severity"], "all");
        assert_eq!(json["emergency_info"]["action_plan"]["steps"].as_array().unwrap().len(), 5);
    }
}
