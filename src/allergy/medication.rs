//! Medication interaction checks
//!
//! Rule tables for food-drug and allergy-drug interactions, checked against
//! a user's dietary context and allergy profile.

use crate::models::{
    AllergyProfile, InteractionAdvice, InteractionKind, InteractionWarning, MedicationContext,
    MedicationInput, MedicationInteraction, MedicationInteractionReport, Priority, RiskLevel,
    Severity,
};

/// Restriction tag that marks a carbohydrate rule as diabetes management
const CARB_MANAGEMENT: &str = "carb_management";
/// Food-drug rules for this tag apply whether or not it is a listed restriction
const ALCOHOL: &str = "alcohol";

struct FoodRule {
    food: &'static str,
    restriction: &'static str,
    severity: Severity,
    message: &'static str,
    recommendation: &'static str,
}

/// Drug keyword and its food rules, checked in order
const FOOD_DRUG_RULES: &[(&str, &[FoodRule])] = &[
    (
        "warfarin",
        &[
            FoodRule {
                food: "vitamin k",
                restriction: "high_vitamin_k",
                severity: Severity::High,
                message: "Warfarin interacts with Vitamin K. Maintain consistent intake of Vitamin K-rich foods (leafy greens, broccoli).",
                recommendation: "Keep your intake of Vitamin K-rich foods consistent. Sudden changes can affect medication effectiveness.",
            },
            FoodRule {
                food: "alcohol",
                restriction: ALCOHOL,
                severity: Severity::Medium,
                message: "Alcohol can increase the risk of bleeding when taking Warfarin.",
                recommendation: "Limit or avoid alcohol consumption while on Warfarin.",
            },
        ],
    ),
    (
        "maoi",
        &[FoodRule {
            food: "tyramine",
            restriction: "high_tyramine",
            severity: Severity::High,
            message: "MAOIs interact with tyramine-rich foods. Can cause dangerous blood pressure spikes.",
            recommendation: "Avoid aged cheeses, cured meats, fermented foods, and certain alcoholic beverages.",
        }],
    ),
    (
        "grapefruit",
        &[FoodRule {
            food: "grapefruit",
            restriction: "grapefruit",
            severity: Severity::High,
            message: "Grapefruit can interact with many medications, increasing their effects.",
            recommendation: "Avoid grapefruit and grapefruit juice while taking this medication.",
        }],
    ),
    (
        "metformin",
        &[FoodRule {
            food: "alcohol",
            restriction: ALCOHOL,
            severity: Severity::High,
            message: "Alcohol can increase the risk of lactic acidosis when taking Metformin.",
            recommendation: "Avoid excessive alcohol consumption. Consult your doctor about safe alcohol limits.",
        }],
    ),
    (
        "insulin",
        &[FoodRule {
            food: "carbohydrates",
            restriction: CARB_MANAGEMENT,
            severity: Severity::Medium,
            message: "Insulin requires careful carbohydrate management.",
            recommendation: "Monitor blood glucose levels and adjust insulin based on carbohydrate intake.",
        }],
    ),
];

/// Drugs whose blood levels rise with grapefruit
const GRAPEFRUIT_SENSITIVE: &[&str] = &[
    "atorvastatin", "simvastatin", "lovastatin", "felodipine", "nifedipine", "cyclosporine",
    "tacrolimus", "buspirone", "sertraline", "carbamazepine",
];

struct AllergyRule {
    drug: &'static str,
    allergens: &'static [&'static str],
    severity: Severity,
    message: &'static str,
    recommendation: &'static str,
}

const ALLERGY_DRUG_RULES: &[AllergyRule] = &[
    AllergyRule {
        drug: "penicillin",
        allergens: &["penicillin", "antibiotic"],
        severity: Severity::High,
        message: "Penicillin allergy detected. This medication contains penicillin or related compounds.",
        recommendation: "DO NOT TAKE. Inform your doctor immediately about your penicillin allergy.",
    },
    AllergyRule {
        drug: "sulfa",
        allergens: &["sulfa", "sulfonamide"],
        severity: Severity::High,
        message: "Sulfa allergy detected. This medication contains sulfonamides.",
        recommendation: "DO NOT TAKE. Inform your doctor about your sulfa allergy.",
    },
    AllergyRule {
        drug: "aspirin",
        allergens: &["aspirin", "nsaid", "ibuprofen"],
        severity: Severity::High,
        message: "Aspirin/NSAID allergy detected. This medication contains aspirin or NSAIDs.",
        recommendation: "DO NOT TAKE. Use alternative pain relief medications.",
    },
    AllergyRule {
        drug: "iodine",
        allergens: &["iodine", "contrast"],
        severity: Severity::Medium,
        message: "Iodine allergy detected. This medication may contain iodine.",
        recommendation: "Consult your doctor before taking. Alternative medications may be available.",
    },
];

/// Cephalosporin markers that cross-react with a penicillin allergy
const CEPHALOSPORINS: &[&str] = &["cef", "cephalexin", "ceftriaxone", "cefuroxime"];

/// Lowercased product name and active substance of the medication
struct Drug {
    name: String,
    substance: String,
}

impl Drug {
    fn mentions(&self, keyword: &str) -> bool {
        self.substance.contains(keyword) || self.name.contains(keyword)
    }
}

fn food_interaction(drug: &Drug, rule: &FoodRule, category: Option<&str>) -> MedicationInteraction {
    MedicationInteraction {
        kind: InteractionKind::FoodDrug,
        medication: drug.name.clone(),
        food: Some(rule.food.to_string()),
        allergen: None,
        severity: rule.severity,
        message: rule.message.to_string(),
        recommendation: rule.recommendation.to_string(),
        category: category.map(str::to_string),
    }
}

fn food_drug_interactions(drug: &Drug, context: &MedicationContext) -> Vec<MedicationInteraction> {
    let diagnosed = context.diabetes_type.is_some_and(|d| d.is_diagnosed());
    let restrictions: Vec<String> = context
        .dietary_restrictions
        .iter()
        .map(|r| r.to_lowercase())
        .collect();

    let mut found = Vec::new();
    for (keyword, rules) in FOOD_DRUG_RULES {
        if !drug.mentions(keyword) {
            continue;
        }
        for rule in rules.iter() {
            let restricted = restrictions
                .iter()
                .any(|r| r.contains(rule.restriction) || r.contains(rule.food));

            if diagnosed && rule.restriction == CARB_MANAGEMENT {
                found.push(food_interaction(drug, rule, Some("diabetes_management")));
            } else if restricted || rule.restriction == ALCOHOL {
                found.push(food_interaction(drug, rule, None));
            }
        }
    }

    if GRAPEFRUIT_SENSITIVE.iter().any(|d| drug.mentions(d)) {
        found.push(MedicationInteraction {
            kind: InteractionKind::FoodDrug,
            medication: drug.name.clone(),
            food: Some("grapefruit".to_string()),
            allergen: None,
            severity: Severity::High,
            message: "This medication interacts with grapefruit. Can increase medication levels in blood.".to_string(),
            recommendation: "Avoid grapefruit and grapefruit juice while taking this medication.".to_string(),
            category: None,
        });
    }

    found
}

fn allergy_interaction(
    drug: &Drug,
    allergen: &str,
    severity: Severity,
    message: &str,
    recommendation: &str,
) -> MedicationInteraction {
    MedicationInteraction {
        kind: InteractionKind::AllergyDrug,
        medication: drug.name.clone(),
        food: None,
        allergen: Some(allergen.to_string()),
        severity,
        message: message.to_string(),
        recommendation: recommendation.to_string(),
        category: None,
    }
}

fn allergy_drug_interactions(drug: &Drug, profile: &AllergyProfile) -> Vec<MedicationInteraction> {
    let mut found = Vec::new();

    for allergy in &profile.allergies {
        let label = allergy.label.to_lowercase();

        for rule in ALLERGY_DRUG_RULES {
            if rule.allergens.iter().any(|a| label.contains(a)) && drug.mentions(rule.drug) {
                found.push(allergy_interaction(
                    drug,
                    &allergy.label,
                    rule.severity,
                    rule.message,
                    rule.recommendation,
                ));
            }
        }

        if label.contains("penicillin") && CEPHALOSPORINS.iter().any(|c| drug.mentions(c)) {
            found.push(allergy_interaction(
                drug,
                &allergy.label,
                Severity::Medium,
                "Penicillin allergy detected. Cephalosporins may cross-react with penicillin.",
                "Consult your doctor. Cephalosporins may cause allergic reactions in penicillin-allergic patients.",
            ));
        }
    }

    found
}

/// High if any interaction is high, else medium if any is medium
pub fn interaction_risk(interactions: &[&MedicationInteraction]) -> RiskLevel {
    if interactions.iter().any(|i| i.severity == Severity::High) {
        RiskLevel::High
    } else if interactions.iter().any(|i| i.severity == Severity::Medium) {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn warning(interaction: &MedicationInteraction, title: &str) -> InteractionWarning {
    InteractionWarning {
        kind: interaction.kind,
        severity: interaction.severity,
        title: title.to_string(),
        message: interaction.message.clone(),
        recommendation: interaction.recommendation.clone(),
    }
}

fn with_severity(list: &[MedicationInteraction], severity: Severity) -> Vec<&MedicationInteraction> {
    list.iter().filter(|i| i.severity == severity).collect()
}

/// High allergy warnings, then high food warnings, then every medium one
fn warnings(report: &MedicationInteractionReport) -> Vec<InteractionWarning> {
    let allergy = &report.allergy_drug_interactions;
    let food = &report.food_drug_interactions;

    let mut out = Vec::new();
    out.extend(
        with_severity(allergy, Severity::High)
            .into_iter()
            .map(|i| warning(i, "CRITICAL: Allergy-Drug Interaction")),
    );
    out.extend(
        with_severity(food, Severity::High)
            .into_iter()
            .map(|i| warning(i, "WARNING: Food-Drug Interaction")),
    );
    out.extend(
        with_severity(allergy, Severity::Medium)
            .into_iter()
            .chain(with_severity(food, Severity::Medium))
            .map(|i| warning(i, "CAUTION: Potential Interaction")),
    );
    out
}

fn advice(priority: Priority, message: &str) -> InteractionAdvice {
    InteractionAdvice {
        priority,
        message: message.to_string(),
    }
}

fn recommendations(risk: RiskLevel) -> Vec<InteractionAdvice> {
    match risk {
        RiskLevel::High => vec![advice(
            Priority::High,
            "DO NOT TAKE this medication without consulting your healthcare provider immediately.",
        )],
        RiskLevel::Medium => vec![
            advice(
                Priority::Medium,
                "Consult your healthcare provider before taking this medication.",
            ),
            advice(
                Priority::Medium,
                "Review the interactions and follow dietary recommendations carefully.",
            ),
        ],
        RiskLevel::Low => vec![advice(
            Priority::Low,
            "No significant interactions detected. Continue to monitor for any adverse effects.",
        )],
    }
}

/// Check a medication against dietary context and, when given, an allergy profile
///
/// A medication without a product name yields an empty low-risk report.
pub fn analyze_medication_interactions(
    medication: &MedicationInput,
    context: &MedicationContext,
    allergy_profile: Option<&AllergyProfile>,
) -> MedicationInteractionReport {
    let Some(name) = medication.name() else {
        return MedicationInteractionReport::empty();
    };
    let drug = Drug {
        substance: medication.substance().unwrap_or_else(|| name.clone()),
        name,
    };

    let mut report = MedicationInteractionReport::empty();
    report.food_drug_interactions = food_drug_interactions(&drug, context);
    if let Some(profile) = allergy_profile.filter(|p| p.has_allergies) {
        report.allergy_drug_interactions = allergy_drug_interactions(&drug, profile);
    }

    let all: Vec<&MedicationInteraction> = report.interactions().collect();
    let (overall_risk, count) = (interaction_risk(&all), all.len());
    report.overall_risk = overall_risk;
    report.warnings = warnings(&report);
    report.recommendations = recommendations(report.overall_risk);

    if report.overall_risk != RiskLevel::Low {
        tracing::info!(
            medication = drug.name.as_str(),
            interactions = count,
            risk_level = report.overall_risk.as_str(),
            "Medication interactions found"
        );
    }

    report
}
