//! Allergen detection
//!
//! Scans recognized food items against an allergy profile using
//! per-category keyword lists.

use crate::models::{
    AllergenScanResult, AllergyCategory, AllergyProfile, AnalyzedAllergy, DetectedAllergen,
    FoodItem, RiskLevel, ScanWarning, Severity,
};

/// Confidence assumed when the recognizer did not report one
pub const DEFAULT_CONFIDENCE: f64 = 0.8;

fn category_keywords(category: AllergyCategory) -> &'static [&'static str] {
    match category {
        AllergyCategory::TreeNutsPeanuts => &[
            "nut", "almond", "walnut", "cashew", "pistachio", "hazelnut", "pecan", "brazil nut",
            "macadamia", "peanut", "groundnut", "peanut butter", "nut butter", "marzipan",
            "nougat", "praline", "nutella", "pesto", "satay", "pad thai",
        ],
        AllergyCategory::Dairy => &[
            "milk", "cheese", "yogurt", "yoghurt", "butter", "cream", "whey", "casein",
            "lactose", "dairy", "ghee", "buttermilk", "sour cream", "ice cream", "custard",
            "pudding", "chocolate", "mayonnaise", "ranch", "caesar",
        ],
        AllergyCategory::Gluten => &[
            "wheat", "barley", "rye", "gluten", "flour", "bread", "pasta", "noodle", "cereal",
            "cracker", "biscuit", "cookie", "cake", "pastry", "beer", "soy sauce", "malt",
            "semolina", "durum", "spelt", "kamut", "triticale",
        ],
        AllergyCategory::Shellfish => &[
            "shrimp", "prawn", "crab", "lobster", "crayfish", "mussel", "clam", "oyster",
            "scallop", "shellfish", "seafood", "surimi", "imitation crab",
        ],
        AllergyCategory::Fish => &[
            "fish", "salmon", "tuna", "cod", "halibut", "mackerel", "sardine", "anchovy",
            "herring", "trout", "bass", "tilapia",
        ],
        AllergyCategory::Eggs => &[
            "egg", "albumin", "albumen", "lecithin", "mayonnaise", "mousse", "meringue",
            "custard", "hollandaise", "béarnaise",
        ],
        AllergyCategory::Soy => &[
            "soy", "soya", "tofu", "tempeh", "miso", "edamame", "soy sauce", "soybean",
            "textured vegetable protein", "tvp", "lecithin",
        ],
        AllergyCategory::Sesame => &[
            "sesame", "tahini", "sesame seed", "sesame oil", "benne", "simsim",
        ],
        AllergyCategory::Other => &[],
    }
}

/// Lowercased name, ingredients and description joined for matching
fn searchable_text(item: &FoodItem) -> String {
    let mut parts = Vec::with_capacity(item.ingredients.len() + 2);
    parts.push(item.name.as_str());
    parts.extend(item.ingredients.iter().map(String::as_str));
    if let Some(description) = &item.description {
        parts.push(description.as_str());
    }
    parts.join(" ").to_lowercase()
}

fn is_present(text: &str, allergy: &AnalyzedAllergy) -> bool {
    let keywords = category_keywords(allergy.category);
    if keywords.is_empty() {
        let label = allergy.label.trim().to_lowercase();
        return !label.is_empty() && text.contains(&label);
    }
    keywords.iter().any(|k| text.contains(k))
}

/// Reported confidence clamped to at most 1
///
/// Missing, zero, negative and non-finite values count as unreported.
pub fn effective_confidence(reported: Option<f64>) -> f64 {
    match reported {
        Some(c) if c.is_finite() && c > 0.0 => c.min(1.0),
        _ => DEFAULT_CONFIDENCE,
    }
}

/// Risk of one detection from allergy severity and recognition confidence
pub fn detection_risk(severity: Severity, confidence: f64) -> RiskLevel {
    if severity == Severity::High && confidence > 0.7 {
        RiskLevel::High
    } else if severity == Severity::Medium || confidence < 0.8 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn warning_text(allergen: &str, food: &str, risk: RiskLevel) -> String {
    match risk {
        RiskLevel::High => format!(
            "WARNING: {} detected in {}. DO NOT CONSUME. This could cause a severe allergic reaction.",
            allergen, food
        ),
        RiskLevel::Medium => format!(
            "CAUTION: {} may be present in {}. Check ingredients carefully before consuming.",
            allergen, food
        ),
        RiskLevel::Low => format!(
            "Note: {} might be present in {}. Please verify ingredients.",
            allergen, food
        ),
    }
}

fn recommendation(detected: &[DetectedAllergen], risk: RiskLevel) -> &'static str {
    if detected.is_empty() {
        return "No allergens detected. Safe to consume based on your allergy profile.";
    }
    match risk {
        RiskLevel::High => {
            "DO NOT CONSUME. This food contains allergens that pose a high risk to your health."
        }
        RiskLevel::Medium => {
            "Exercise caution. Verify ingredients and consult with healthcare provider if uncertain."
        }
        RiskLevel::Low => "Low risk detected. Please verify ingredients before consuming.",
    }
}

fn clear_result(message: Option<&str>) -> AllergenScanResult {
    AllergenScanResult {
        has_allergens: false,
        detected_allergens: Vec::new(),
        risk_level: RiskLevel::Low,
        warnings: Vec::new(),
        safe_to_eat: true,
        recommendation: None,
        message: message.map(str::to_string),
    }
}

/// Scan food items for the allergens in `profile`
pub fn detect_allergens(food_items: &[FoodItem], profile: &AllergyProfile) -> AllergenScanResult {
    if food_items.is_empty() {
        return clear_result(None);
    }
    if profile.allergies.is_empty() {
        return clear_result(Some("No allergies registered in your profile"));
    }

    let mut detected = Vec::new();
    let mut warnings = Vec::new();

    for item in food_items {
        let text = searchable_text(item);
        let confidence = effective_confidence(item.confidence);

        for allergy in profile.allergies.iter().filter(|a| is_present(&text, a)) {
            let risk = detection_risk(allergy.severity, confidence);
            let warning = warning_text(&allergy.label, &item.name, risk);

            warnings.push(ScanWarning {
                kind: "allergen".to_string(),
                severity: risk,
                title: format!("{} Detected", allergy.label),
                message: warning.clone(),
                allergen: allergy.label.clone(),
                food_item: item.name.clone(),
            });
            detected.push(DetectedAllergen {
                allergen: allergy.label.clone(),
                category: allergy.category,
                severity: allergy.severity,
                risk_level: risk,
                detected_in: item.name.clone(),
                confidence,
                warning,
            });
        }
    }

    let risk_level = detected
        .iter()
        .map(|d| d.risk_level)
        .max()
        .unwrap_or(RiskLevel::Low);

    if !detected.is_empty() {
        tracing::info!(
            count = detected.len(),
            risk_level = risk_level.as_str(),
            "Allergens detected in scanned food"
        );
    }

    AllergenScanResult {
        has_allergens: !detected.is_empty(),
        safe_to_eat: detected.is_empty(),
        recommendation: Some(recommendation(&detected, risk_level).to_string()),
        detected_allergens: detected,
        risk_level,
        warnings,
        message: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allergy::compute_allergy_profile;
    use crate::models::{AllergyDeclaration, AllergyInput};

    fn profile(allergies: Vec<AllergyDeclaration>) -> AllergyProfile {
        compute_allergy_profile(&AllergyInput {
            allergies,
            ..AllergyInput::default()
        })
    }

    #[test]
    fn test_no_food_items() {
        let p = profile(vec![AllergyDeclaration::new("Peanuts", Severity::High)]);
        let result = detect_allergens(&[], &p);
        assert!(!result.has_allergens);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert!(result.message.is_none());
    }

    #[test]
    fn test_profile_without_allergies() {
        let result = detect_allergens(&[FoodItem::named("Pad Thai")], &profile(vec![]));
        assert!(!result.has_allergens);
        assert!(result.safe_to_eat);
        assert_eq!(result.message.as_deref(), Some("No allergies registered in your profile"));
    }

    #[test]
    fn test_high_severity_detection() {
        let p = profile(vec![AllergyDeclaration::new("Peanuts", Severity::High)]);
        let result = detect_allergens(&[FoodItem::named("Chicken Satay")], &p);
        assert!(result.has_allergens);
        assert!(!result.safe_to_eat);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(result.detected_allergens[0].confidence, DEFAULT_CONFIDENCE);
        assert_eq!(result.warnings[0].title, "Peanuts Detected");
        assert!(result.warnings[0].message.starts_with("WARNING: Peanuts detected in Chicken Satay."));
        assert!(result.recommendation.unwrap().starts_with("DO NOT CONSUME"));
    }

    #[test]
    fn test_matches_ingredients_and_description() {
        let p = profile(vec![AllergyDeclaration::new("Milk", Severity::Low)]);
        let item = FoodItem {
            name: "Latte".into(),
            ingredients: vec!["espresso".into(), "Steamed WHOLE MILK".into()],
            description: None,
            confidence: Some(0.95),
        };
        let result = detect_allergens(&[item], &p);
        assert_eq!(result.detected_allergens.len(), 1);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert!(result.warnings[0].message.starts_with("Note:"));

        let item = FoodItem {
            name: "Mystery plate".into(),
            description: Some("served with ghee".into()),
            ..FoodItem::default()
        };
        assert!(detect_allergens(&[item], &p).has_allergens);
    }

    #[test]
    fn test_other_category_matches_label() {
        let p = profile(vec![AllergyDeclaration::new("Kiwi", Severity::Medium)]);
        let result = detect_allergens(
            &[FoodItem::named("Kiwi smoothie"), FoodItem::named("Apple pie")],
            &p,
        );
        assert_eq!(result.detected_allergens.len(), 1);
        assert_eq!(result.detected_allergens[0].detected_in, "Kiwi smoothie");
        assert_eq!(result.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_no_match_is_safe() {
        let p = profile(vec![AllergyDeclaration::new("Shellfish", Severity::High)]);
        let result = detect_allergens(&[FoodItem::named("Green salad")], &p);
        assert!(!result.has_allergens);
        assert!(result.safe_to_eat);
        assert_eq!(
            result.recommendation.as_deref(),
            Some("No allergens detected. Safe to consume based on your allergy profile.")
        );
    }

    #[test]
    fn test_detection_risk_rules() {
        assert_eq!(detection_risk(Severity::High, 0.9), RiskLevel::High);
        assert_eq!(detection_risk(Severity::High, 0.75), RiskLevel::High);
        assert_eq!(detection_risk(Severity::High, 0.7), RiskLevel::Medium);
        assert_eq!(detection_risk(Severity::High, 0.5), RiskLevel::Medium);
        assert_eq!(detection_risk(Severity::Medium, 0.99), RiskLevel::Medium);
        assert_eq!(detection_risk(Severity::Low, 0.8), RiskLevel::Low);
        assert_eq!(detection_risk(Severity::Low, 0.6), RiskLevel::Medium);
    }

    #[test]
    fn test_unusable_confidence_falls_back_to_default() {
        let p = profile(vec![AllergyDeclaration::new("Peanuts", Severity::High)]);
        for reported in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let item = FoodItem {
                confidence: Some(reported),
                ..FoodItem::named("Peanut butter toast")
            };
            let result = detect_allergens(&[item], &p);
            assert_eq!(result.risk_level, RiskLevel::High, "confidence {}", reported);
            assert_eq!(result.detected_allergens[0].confidence, DEFAULT_CONFIDENCE);
        }

        assert_eq!(effective_confidence(Some(1.7)), 1.0);
        assert_eq!(effective_confidence(Some(0.3)), 0.3);
        assert_eq!(effective_confidence(None), DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_overall_risk_is_worst_detection() {
        let p = profile(vec![
            AllergyDeclaration::new("Eggs", Severity::Low),
            AllergyDeclaration::new("Wheat", Severity::High),
        ]);
        let result = detect_allergens(&[FoodItem::named("Egg noodle soup")], &p);
        assert_eq!(result.detected_allergens.len(), 2);
        assert_eq!(result.risk_level, RiskLevel::High);
    }
}
