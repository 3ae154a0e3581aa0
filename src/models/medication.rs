//! Medication interaction models
//!
//! A scanned medication, the dietary context it is checked against and the
//! resulting interaction report.

use serde::{Deserialize, Serialize};

use super::allergy::{RiskLevel, Severity};
use super::nutrition_profile::Priority;
use super::profile::{AllergyInput, DiabetesType};

/// A medication as read from a label or typed in
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicationInput {
    /// Brand or product name
    #[serde(default)]
    pub medication: Option<String>,
    #[serde(default)]
    pub generic_name: Option<String>,
    #[serde(default)]
    pub active_substance: Option<String>,
}

impl MedicationInput {
    pub fn named(name: &str) -> Self {
        Self {
            medication: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// Lowercased product name, or None when blank
    pub fn name(&self) -> Option<String> {
        non_blank(self.medication.as_deref())
    }

    /// Lowercased substance, falling back to the generic then the product name
    pub fn substance(&self) -> Option<String> {
        non_blank(self.active_substance.as_deref())
            .or_else(|| non_blank(self.generic_name.as_deref()))
            .or_else(|| self.name())
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

/// Dietary facts the food-drug rules read
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicationContext {
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub diabetes_type: Option<DiabetesType>,
}

impl From<&AllergyInput> for MedicationContext {
    fn from(input: &AllergyInput) -> Self {
        Self {
            dietary_restrictions: input.dietary_restrictions.clone(),
            diabetes_type: input.diabetes_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    FoodDrug,
    AllergyDrug,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationInteraction {
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    pub medication: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergen: Option<String>,
    pub severity: Severity,
    pub message: String,
    pub recommendation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionWarning {
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionAdvice {
    pub priority: Priority,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationInteractionReport {
    pub food_drug_interactions: Vec<MedicationInteraction>,
    pub allergy_drug_interactions: Vec<MedicationInteraction>,
    pub overall_risk: RiskLevel,
    pub warnings: Vec<InteractionWarning>,
    pub recommendations: Vec<InteractionAdvice>,
}

impl MedicationInteractionReport {
    pub fn empty() -> Self {
        Self {
            food_drug_interactions: Vec::new(),
            allergy_drug_interactions: Vec::new(),
            overall_risk: RiskLevel::Low,
            warnings: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    pub fn interactions(&self) -> impl Iterator<Item = &MedicationInteraction> {
        self.food_drug_interactions
            .iter()
            .chain(self.allergy_drug_interactions.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substance_falls_back_through_names() {
        let mut input = MedicationInput::named("  Glucophage ");
        assert_eq!(input.name().as_deref(), Some("glucophage"));
        assert_eq!(input.substance().as_deref(), Some("glucophage"));

        input.generic_name = Some("Metformin".into());
        assert_eq!(input.substance().as_deref(), Some("metformin"));

        input.active_substance = Some("".into());
        assert_eq!(input.substance().as_deref(), Some("metformin"));
        assert!(MedicationInput::default().name().is_none());
    }

    #[test]
    fn test_context_from_allergy_input() {
        let input = AllergyInput {
            allergies: Vec::new(),
            diabetes_type: Some(DiabetesType::Type1),
            dietary_restrictions: vec!["grapefruit".into()],
        };
        let context = MedicationContext::from(&input);
        assert_eq!(context.dietary_restrictions, vec!["grapefruit".to_string()]);
        assert_eq!(context.diabetes_type, Some(DiabetesType::Type1));
    }
}
