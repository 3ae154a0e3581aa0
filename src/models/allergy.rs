//! Allergy models
//!
//! User-declared allergies and the enums shared by the allergy engine,
//! the allergy profile and the allergen scanner.

use serde::{Deserialize, Serialize};

/// Label used when a declaration carries no usable label
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Reported severity of a reaction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" | "mild" => Some(Severity::Low),
            "medium" | "moderate" => Some(Severity::Medium),
            "high" | "severe" => Some(Severity::High),
            _ => None,
        }
    }
}

/// Whether the allergy came from the predefined list or was typed in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllergyType {
    #[default]
    Common,
    Custom,
}

impl AllergyType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "common" => Some(AllergyType::Common),
            "custom" => Some(AllergyType::Custom),
            _ => None,
        }
    }
}

/// Allergen family derived from the label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllergyCategory {
    TreeNutsPeanuts,
    Dairy,
    Gluten,
    Shellfish,
    Fish,
    Eggs,
    Soy,
    Sesame,
    Other,
}

impl AllergyCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllergyCategory::TreeNutsPeanuts => "tree_nuts_peanuts",
            AllergyCategory::Dairy => "dairy",
            AllergyCategory::Gluten => "gluten",
            AllergyCategory::Shellfish => "shellfish",
            AllergyCategory::Fish => "fish",
            AllergyCategory::Eggs => "eggs",
            AllergyCategory::Soy => "soy",
            AllergyCategory::Sesame => "sesame",
            AllergyCategory::Other => "other",
        }
    }
}

/// Aggregate or per-detection risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

/// A single allergy as declared by the user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllergyDeclaration {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default, rename = "type")]
    pub allergy_type: AllergyType,
}

impl AllergyDeclaration {
    pub fn new(label: &str, severity: Severity) -> Self {
        Self {
            id: None,
            label: Some(label.to_string()),
            severity,
            allergy_type: AllergyType::Common,
        }
    }

    /// Label with blank or missing values replaced by `UNKNOWN_LABEL`
    pub fn effective_label(&self) -> &str {
        match self.label.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label,
            _ => UNKNOWN_LABEL,
        }
    }
}

/// A declaration enriched by the allergy engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedAllergy {
    pub id: Option<String>,
    pub label: String,
    pub severity: Severity,
    #[serde(rename = "type")]
    pub allergy_type: AllergyType,
    pub category: AllergyCategory,
    pub common_names: Vec<String>,
    pub risk_score: u8,
}
