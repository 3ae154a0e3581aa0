//! Allergy profile output
//!
//! Write-once snapshot produced by the allergy engine, and the result of
//! scanning food against it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::allergy::{AllergyCategory, AnalyzedAllergy, RiskLevel, Severity};
use super::nutrition_profile::Guidance;

/// Which alerts reach the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    All,
    HighMedium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertSettings {
    pub enabled: bool,
    pub severity: AlertSeverity,
    pub sound_enabled: bool,
    pub vibration_enabled: bool,
    pub show_notifications: bool,
    pub scan_before_eating: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossReactivity {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_allergens: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiddenSources {
    pub allergen: String,
    pub category: AllergyCategory,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafeAlternatives {
    pub allergen: String,
    pub category: AllergyCategory,
    pub alternatives: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPlan {
    pub steps: Vec<String>,
    pub medications: String,
    pub emergency_contacts: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyInfo {
    pub has_action_plan: bool,
    pub action_plan: Option<ActionPlan>,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllergyProfile {
    pub has_allergies: bool,
    pub allergies: Vec<AnalyzedAllergy>,
    pub risk_level: RiskLevel,
    pub alert_settings: AlertSettings,
    pub cross_reactivity: Vec<CrossReactivity>,
    pub hidden_sources: Vec<HiddenSources>,
    pub safe_alternatives: Vec<SafeAlternatives>,
    pub emergency_info: EmergencyInfo,
    pub dietary_recommendations: Vec<Guidance>,
    pub generated_at: DateTime<Utc>,
    pub version: String,
}

/// A food item submitted for scanning
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Recognition confidence in [0, 1]
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl FoodItem {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedAllergen {
    pub allergen: String,
    pub category: AllergyCategory,
    pub severity: Severity,
    pub risk_level: RiskLevel,
    pub detected_in: String,
    pub confidence: f64,
    pub warning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanWarning {
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: RiskLevel,
    pub title: String,
    pub message: String,
    pub allergen: String,
    pub food_item: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllergenScanResult {
    pub has_allergens: bool,
    pub detected_allergens: Vec<DetectedAllergen>,
    pub risk_level: RiskLevel,
    pub warnings: Vec<ScanWarning>,
    pub safe_to_eat: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
