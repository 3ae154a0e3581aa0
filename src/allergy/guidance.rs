//! Derived allergy guidance
//!
//! Cross-reactivity notes, hidden sources, safe alternatives, the emergency
//! plan, alert settings and dietary recommendations.

use crate::models::{
    ActionPlan, AlertSettings, AlertSeverity, AllergyCategory, AnalyzedAllergy, CrossReactivity,
    DiabetesType, EmergencyInfo, Guidance, HiddenSources, Priority, RiskLevel, SafeAlternatives,
    Severity,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn has_category(allergies: &[AnalyzedAllergy], category: AllergyCategory) -> bool {
    allergies.iter().any(|a| a.category == category)
}

/// Cross-reactivity notes in fixed order: tree nuts, peanut/tree nut,
/// shellfish, fish
pub fn cross_reactivity(allergies: &[AnalyzedAllergy]) -> Vec<CrossReactivity> {
    let mut notes = Vec::new();

    let has_tree_nuts = has_category(allergies, AllergyCategory::TreeNutsPeanuts);
    if has_tree_nuts {
        notes.push(CrossReactivity {
            kind: "tree_nuts".to_string(),
            message: "If allergic to one tree nut, you may be allergic to others. Consult an allergist before trying new tree nuts.".to_string(),
            related_allergens: strings(&["almonds", "walnuts", "cashews", "pistachios", "hazelnuts"]),
        });
    }

    let has_peanuts = allergies
        .iter()
        .any(|a| a.label.to_lowercase().contains("peanut"));
    if has_peanuts && has_tree_nuts {
        notes.push(CrossReactivity {
            kind: "peanut_tree_nut".to_string(),
            message: "Peanuts and tree nuts are different, but many people are allergic to both. Exercise caution.".to_string(),
            related_allergens: Vec::new(),
        });
    }

    if has_category(allergies, AllergyCategory::Shellfish) {
        notes.push(CrossReactivity {
            kind: "shellfish".to_string(),
            message: "If allergic to one type of shellfish, you may be allergic to others. Avoid all shellfish unless cleared by an allergist.".to_string(),
            related_allergens: strings(&["shrimp", "crab", "lobster", "mussels", "clams"]),
        });
    }

    if has_category(allergies, AllergyCategory::Fish) {
        notes.push(CrossReactivity {
            kind: "fish".to_string(),
            message: "Fish allergies can cross-react between species. Consult an allergist before trying new fish.".to_string(),
            related_allergens: Vec::new(),
        });
    }

    notes
}

fn hidden_source_list(category: AllergyCategory) -> &'static [&'static str] {
    match category {
        AllergyCategory::TreeNutsPeanuts => &[
            "Baked goods (cookies, cakes, pastries)",
            "Candy and chocolate",
            "Cereals and granola",
            "Nut butters and spreads",
            "Salad dressings",
            "Asian cuisine (often uses peanut oil)",
            "Marzipan and nougat",
            "Some vegetarian meat substitutes",
        ],
        AllergyCategory::Dairy => &[
            "Baked goods",
            "Processed meats (may contain casein)",
            "Non-dairy creamers (may contain casein)",
            "Some medications and supplements",
            "Caramel coloring",
            "Lactose in some medications",
        ],
        AllergyCategory::Gluten => &[
            "Soy sauce",
            "Beer and malt beverages",
            "Processed foods (check labels)",
            "Some medications",
            "Soups and sauces (may use flour as thickener)",
            "Imitation seafood",
        ],
        AllergyCategory::Shellfish => &[
            "Fish stock and bouillon",
            "Surimi (imitation crab)",
            "Some Asian sauces",
            "Caesar salad dressing (may contain anchovies)",
            "Worcestershire sauce",
        ],
        AllergyCategory::Eggs => &[
            "Mayonnaise",
            "Marshmallows",
            "Pasta (some types)",
            "Foam on cocktails",
            "Some vaccines (consult doctor)",
            "Baked goods",
        ],
        AllergyCategory::Soy => &[
            "Vegetable oil (may contain soy)",
            "Lecithin (often from soy)",
            "Tofu and tempeh",
            "Soy sauce",
            "Many processed foods",
            "Some Asian cuisines",
        ],
        AllergyCategory::Fish | AllergyCategory::Sesame | AllergyCategory::Other => &[],
    }
}

/// One entry per allergy whose category has known hidden sources
pub fn hidden_sources(allergies: &[AnalyzedAllergy]) -> Vec<HiddenSources> {
    allergies
        .iter()
        .filter_map(|a| {
            let sources = hidden_source_list(a.category);
            (!sources.is_empty()).then(|| HiddenSources {
                allergen: a.label.clone(),
                category: a.category,
                sources: strings(sources),
            })
        })
        .collect()
}

fn alternative_list(category: AllergyCategory) -> &'static [&'static str] {
    match category {
        AllergyCategory::Dairy => &[
            "Almond milk, coconut milk, oat milk, rice milk",
            "Dairy-free cheese alternatives",
            "Coconut yogurt or soy yogurt",
            "Plant-based butter (margarine, coconut oil)",
        ],
        AllergyCategory::Gluten => &[
            "Gluten-free grains: rice, quinoa, buckwheat, millet, amaranth",
            "Gluten-free flours: almond flour, coconut flour, rice flour",
            "Gluten-free pasta and bread",
        ],
        AllergyCategory::TreeNutsPeanuts => &[
            "Sunflower seed butter, pumpkin seed butter",
            "Sesame seeds and tahini (if not allergic)",
            "Coconut (if not allergic)",
            "Seeds: pumpkin, sunflower, chia, flax",
        ],
        AllergyCategory::Eggs => &[
            "Flax eggs (1 tbsp ground flax + 3 tbsp water)",
            "Applesauce or mashed banana in baking",
            "Commercial egg replacers",
            "Aquafaba (chickpea water) for meringues",
        ],
        AllergyCategory::Soy => &[
            "Other legumes: chickpeas, lentils, black beans",
            "Coconut aminos instead of soy sauce",
            "Other plant-based proteins",
        ],
        AllergyCategory::Shellfish
        | AllergyCategory::Fish
        | AllergyCategory::Sesame
        | AllergyCategory::Other => &[],
    }
}

/// One entry per allergy whose category has known substitutes
pub fn safe_alternatives(allergies: &[AnalyzedAllergy]) -> Vec<SafeAlternatives> {
    allergies
        .iter()
        .filter_map(|a| {
            let alternatives = alternative_list(a.category);
            (!alternatives.is_empty()).then(|| SafeAlternatives {
                allergen: a.label.clone(),
                category: a.category,
                alternatives: strings(alternatives),
            })
        })
        .collect()
}

fn action_plan() -> ActionPlan {
    ActionPlan {
        steps: strings(&[
            "If you experience symptoms (hives, swelling, difficulty breathing, dizziness), use epinephrine auto-injector immediately if prescribed",
            "Call emergency services (911) immediately",
            "Lie down with legs elevated if feeling faint",
            "Do not drive yourself to the hospital",
            "Inform medical personnel about your allergies",
        ]),
        medications: "Carry epinephrine auto-injector at all times if prescribed".to_string(),
        emergency_contacts: "Keep emergency contact information easily accessible".to_string(),
    }
}

/// Action plan present iff the overall level is high or any allergy is high
pub fn emergency_info(allergies: &[AnalyzedAllergy], risk_level: RiskLevel) -> EmergencyInfo {
    let needs_plan =
        risk_level == RiskLevel::High || allergies.iter().any(|a| a.severity == Severity::High);

    EmergencyInfo {
        has_action_plan: needs_plan,
        action_plan: needs_plan.then(action_plan),
        risk_level,
    }
}

/// Higher risk widens which alerts are shown
pub fn alert_settings(risk_level: RiskLevel) -> AlertSettings {
    let severity = match risk_level {
        RiskLevel::High => AlertSeverity::All,
        RiskLevel::Medium => AlertSeverity::HighMedium,
        RiskLevel::Low => AlertSeverity::High,
    };
    let high = risk_level == RiskLevel::High;

    AlertSettings {
        enabled: true,
        severity,
        sound_enabled: high,
        vibration_enabled: true,
        show_notifications: true,
        scan_before_eating: high,
    }
}

/// Settings used when no allergies are declared
pub fn default_alert_settings() -> AlertSettings {
    AlertSettings {
        enabled: true,
        severity: AlertSeverity::All,
        sound_enabled: false,
        vibration_enabled: true,
        show_notifications: true,
        scan_before_eating: false,
    }
}

pub fn dietary_recommendations(
    allergies: &[AnalyzedAllergy],
    diabetes: Option<DiabetesType>,
) -> Vec<Guidance> {
    let mut recommendations = vec![
        Guidance::new(
            "label_reading",
            Priority::High,
            "Always read food labels carefully. Look for allergen warnings and ingredient lists.",
        ),
        Guidance::new(
            "restaurant_communication",
            Priority::High,
            "Always inform restaurant staff about your allergies. Ask about ingredients and preparation methods.",
        ),
    ];

    let diagnosed = diabetes.is_some_and(|d| d.is_diagnosed());
    if diagnosed && !allergies.is_empty() {
        recommendations.push(Guidance::new(
            "diabetes_allergy_management",
            Priority::High,
            "Managing both diabetes and allergies requires careful meal planning. Focus on whole, unprocessed foods when possible.",
        ));
    }

    if has_category(allergies, AllergyCategory::TreeNutsPeanuts) {
        recommendations.push(Guidance::new(
            "nut_allergy",
            Priority::High,
            "Be cautious with baked goods, chocolates, and Asian cuisines. Many processed foods may contain traces of nuts.",
        ));
    }

    if has_category(allergies, AllergyCategory::Dairy) {
        recommendations.push(Guidance::new(
            "dairy_allergy",
            Priority::Medium,
            "Check non-dairy products as they may still contain casein or whey. Look for \"dairy-free\" labels, not just \"lactose-free\".",
        ));
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AllergyType;

    fn analyzed(label: &str, category: AllergyCategory, severity: Severity) -> AnalyzedAllergy {
        AnalyzedAllergy {
            id: None,
            label: label.to_string(),
            severity,
            allergy_type: AllergyType::Common,
            category,
            common_names: vec![label.to_string()],
            risk_score: 65,
        }
    }

    #[test]
    fn test_cross_reactivity_order() {
        let allergies = vec![
            analyzed("Salmon fish", AllergyCategory::Fish, Severity::Low),
            analyzed("Shrimp", AllergyCategory::Shellfish, Severity::Medium),
            analyzed("Peanuts", AllergyCategory::TreeNutsPeanuts, Severity::High),
        ];
        let kinds: Vec<_> = cross_reactivity(&allergies).into_iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec!["tree_nuts", "peanut_tree_nut", "shellfish", "fish"]);
    }

    #[test]
    fn test_peanut_note_needs_nut_category() {
        // Label mentions peanut but the allergy was categorized elsewhere
        let allergies = vec![analyzed("peanut oil", AllergyCategory::Other, Severity::Low)];
        assert!(cross_reactivity(&allergies).is_empty());
    }

    #[test]
    fn test_related_allergens_only_on_families() {
        let allergies = vec![analyzed("Cod", AllergyCategory::Fish, Severity::Low)];
        let notes = cross_reactivity(&allergies);
        assert_eq!(notes.len(), 1);
        assert!(notes[0].related_allergens.is_empty());
    }

    #[test]
    fn test_hidden_sources_and_alternatives_per_allergy() {
        let allergies = vec![
            analyzed("Milk", AllergyCategory::Dairy, Severity::Medium),
            analyzed("Sesame", AllergyCategory::Sesame, Severity::Medium),
            analyzed("Shrimp", AllergyCategory::Shellfish, Severity::Medium),
        ];

        let hidden = hidden_sources(&allergies);
        assert_eq!(hidden.len(), 2);
        assert_eq!(hidden[0].allergen, "Milk");
        assert_eq!(hidden[0].sources.len(), 6);
        assert_eq!(hidden[1].category, AllergyCategory::Shellfish);
        assert_eq!(hidden[1].sources[1], "Surimi (imitation crab)");

        let alternatives = safe_alternatives(&allergies);
        assert_eq!(alternatives.len(), 1);
        assert_eq!(alternatives[0].category, AllergyCategory::Dairy);
        assert_eq!(alternatives[0].alternatives.len(), 4);
    }

    #[test]
    fn test_emergency_plan_triggers() {
        let medium = vec![analyzed("Soy", AllergyCategory::Soy, Severity::Medium)];
        let info = emergency_info(&medium, RiskLevel::Medium);
        assert!(!info.has_action_plan);
        assert!(info.action_plan.is_none());

        let info = emergency_info(&medium, RiskLevel::High);
        assert!(info.has_action_plan);
        assert_eq!(info.action_plan.unwrap().steps.len(), 5);

        let high = vec![analyzed("Soy", AllergyCategory::Soy, Severity::High)];
        assert!(emergency_info(&high, RiskLevel::Medium).has_action_plan);
    }

    #[test]
    fn test_alert_settings_by_level() {
        let high = alert_settings(RiskLevel::High);
        assert_eq!(high.severity, AlertSeverity::All);
        assert!(high.sound_enabled && high.scan_before_eating);

        let medium = alert_settings(RiskLevel::Medium);
        assert_eq!(medium.severity, AlertSeverity::HighMedium);
        assert!(!medium.sound_enabled);

        let low = alert_settings(RiskLevel::Low);
        assert_eq!(low.severity, AlertSeverity::High);
        assert!(low.vibration_enabled && low.show_notifications);
    }

    #[test]
    fn test_recommendations() {
        let allergies = vec![
            analyzed("Peanuts", AllergyCategory::TreeNutsPeanuts, Severity::High),
            analyzed("Milk", AllergyCategory::Dairy, Severity::Low),
        ];
        let kinds: Vec<_> = dietary_recommendations(&allergies, Some(DiabetesType::Type1))
            .into_iter()
            .map(|g| g.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                "label_reading",
                "restaurant_communication",
                "diabetes_allergy_management",
                "nut_allergy",
                "dairy_allergy"
            ]
        );
    }

    #[test]
    fn test_no_diabetes_skips_combined_advice() {
        let allergies = vec![analyzed("Kiwi", AllergyCategory::Other, Severity::Low)];
        for diabetes in [None, Some(DiabetesType::NoDiabetes)] {
            let recs = dietary_recommendations(&allergies, diabetes);
            assert_eq!(recs.len(), 2);
        }
    }
}
