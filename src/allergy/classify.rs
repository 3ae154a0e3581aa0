//! Allergen classification
//!
//! Keyword tables for categorizing a free-text allergy label, expanding it
//! into common synonyms and scoring it.

use crate::models::{AllergyCategory, Severity};

/// Ordered category table. First matching row wins, so "peanut" and
/// "shellfish" must stay above any row that would also match them.
const CATEGORY_KEYWORDS: &[(&[&str], AllergyCategory)] = &[
    (&["nut", "peanut"], AllergyCategory::TreeNutsPeanuts),
    (&["dairy", "lactose", "milk"], AllergyCategory::Dairy),
    (&["gluten", "wheat"], AllergyCategory::Gluten),
    (&["shellfish", "shrimp", "crab"], AllergyCategory::Shellfish),
    (&["fish"], AllergyCategory::Fish),
    (&["egg"], AllergyCategory::Eggs),
    (&["soy"], AllergyCategory::Soy),
    (&["sesame"], AllergyCategory::Sesame),
];

/// A synonym row fires when any trigger is present and no exclusion is
struct SynonymRule {
    triggers: &'static [&'static str],
    excludes: &'static [&'static str],
    names: &'static [&'static str],
}

const SYNONYM_RULES: &[SynonymRule] = &[
    SynonymRule {
        triggers: &["nut"],
        excludes: &["peanut"],
        names: &[
            "almonds",
            "walnuts",
            "cashews",
            "pistachios",
            "hazelnuts",
            "pecans",
            "brazil nuts",
            "macadamia nuts",
        ],
    },
    SynonymRule {
        triggers: &["peanut"],
        excludes: &[],
        names: &["groundnuts", "goobers", "monkey nuts"],
    },
    SynonymRule {
        triggers: &["dairy", "lactose", "milk"],
        excludes: &[],
        names: &["milk", "cheese", "yogurt", "butter", "cream", "whey", "casein", "lactose"],
    },
    SynonymRule {
        triggers: &["gluten", "wheat"],
        excludes: &[],
        names: &["wheat", "barley", "rye", "triticale", "semolina", "durum", "spelt", "kamut"],
    },
    SynonymRule {
        triggers: &["shellfish"],
        excludes: &[],
        names: &[
            "shrimp", "prawns", "crab", "lobster", "crayfish", "mussels", "clams", "oysters",
            "scallops",
        ],
    },
    SynonymRule {
        triggers: &["fish"],
        excludes: &["shellfish"],
        names: &["salmon", "tuna", "cod", "halibut", "mackerel", "sardines", "anchovies"],
    },
    SynonymRule {
        triggers: &["egg"],
        excludes: &[],
        names: &["chicken eggs", "duck eggs", "quail eggs", "albumin", "lecithin"],
    },
    SynonymRule {
        triggers: &["soy"],
        excludes: &[],
        names: &["soybeans", "soya", "tofu", "tempeh", "miso", "edamame", "soy sauce"],
    },
    SynonymRule {
        triggers: &["sesame"],
        excludes: &[],
        names: &["tahini", "sesame seeds", "sesame oil", "benne seeds"],
    },
];

const BASE_RISK_SCORE: i32 = 50;
/// Bonus for allergen families known for severe reactions
const SEVERE_FAMILY_BONUS: i32 = 15;

/// Assign a category by case-insensitive substring match
pub fn categorize(label: &str) -> AllergyCategory {
    let lower = label.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(AllergyCategory::Other)
}

/// The label followed by every synonym whose rule fires, without duplicates
pub fn common_names(label: &str) -> Vec<String> {
    let lower = label.to_lowercase();
    let mut names = vec![label.to_string()];

    for rule in SYNONYM_RULES {
        let fires = rule.triggers.iter().any(|t| lower.contains(t))
            && !rule.excludes.iter().any(|e| lower.contains(e));
        if !fires {
            continue;
        }
        for name in rule.names {
            if !names.iter().any(|n| n == name) {
                names.push((*name).to_string());
            }
        }
    }

    names
}

fn severity_bonus(severity: Severity) -> i32 {
    match severity {
        Severity::High => 30,
        Severity::Medium => 15,
        Severity::Low => 5,
    }
}

/// Risk score in [0, 100]
pub fn risk_score(severity: Severity, category: AllergyCategory) -> u8 {
    let family_bonus = match category {
        AllergyCategory::TreeNutsPeanuts | AllergyCategory::Shellfish => SEVERE_FAMILY_BONUS,
        _ => 0,
    };
    let score = BASE_RISK_SCORE + severity_bonus(severity) + family_bonus;
    score.clamp(0, 100) as u8
}
