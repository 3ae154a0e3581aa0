//! User profile input
//!
//! The flat record collected during onboarding and handed to both engines.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::allergy::AllergyDeclaration;

/// Accepted age range in years
pub const AGE_RANGE: (u32, u32) = (13, 120);
/// Accepted weight range in kilograms
pub const WEIGHT_RANGE_KG: (f64, f64) = (30.0, 300.0);
/// Accepted height range in centimeters
pub const HEIGHT_RANGE_CM: (f64, f64) = (100.0, 250.0);

/// Validation failures for a profile input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("age must be between {min} and {max} years, got {value}")]
    AgeOutOfRange { value: u32, min: u32, max: u32 },

    #[error("weight must be between {min} and {max} kg, got {value}")]
    WeightOutOfRange { value: f64, min: f64, max: f64 },

    #[error("height must be between {min} and {max} cm, got {value}")]
    HeightOutOfRange { value: f64, min: f64, max: f64 },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
}

/// Gender as captured during onboarding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
    #[default]
    PreferNotToSay,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
            Gender::PreferNotToSay => "prefer_not_to_say",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "male" | "m" => Some(Gender::Male),
            "female" | "f" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            "prefer_not_to_say" => Some(Gender::PreferNotToSay),
            _ => None,
        }
    }
}

/// Self-reported activity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    ModeratelyActive,
    VeryActive,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::ModeratelyActive => "moderately_active",
            ActivityLevel::VeryActive => "very_active",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "sedentary" => Some(ActivityLevel::Sedentary),
            "moderately_active" | "moderate" => Some(ActivityLevel::ModeratelyActive),
            "very_active" => Some(ActivityLevel::VeryActive),
            _ => None,
        }
    }
}

/// Diabetes classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiabetesType {
    Type1,
    Type2,
    Prediabetes,
    #[serde(rename = "none")]
    NoDiabetes,
}

impl DiabetesType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiabetesType::Type1 => "type1",
            DiabetesType::Type2 => "type2",
            DiabetesType::Prediabetes => "prediabetes",
            DiabetesType::NoDiabetes => "none",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', ' ', '_'], "").as_str() {
            "type1" => Some(DiabetesType::Type1),
            "type2" => Some(DiabetesType::Type2),
            "prediabetes" => Some(DiabetesType::Prediabetes),
            "none" | "" => Some(DiabetesType::NoDiabetes),
            _ => None,
        }
    }

    /// Whether this represents an actual diabetes diagnosis
    pub fn is_diagnosed(&self) -> bool {
        !matches!(self, DiabetesType::NoDiabetes)
    }
}

/// Dietary preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryPreference {
    #[serde(rename = "none")]
    NoPreference,
    Vegetarian,
    Vegan,
    Pescatarian,
}

impl DietaryPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            DietaryPreference::NoPreference => "none",
            DietaryPreference::Vegetarian => "vegetarian",
            DietaryPreference::Vegan => "vegan",
            DietaryPreference::Pescatarian => "pescatarian",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" => Some(DietaryPreference::NoPreference),
            "vegetarian" => Some(DietaryPreference::Vegetarian),
            "vegan" => Some(DietaryPreference::Vegan),
            "pescatarian" => Some(DietaryPreference::Pescatarian),
            _ => None,
        }
    }
}

/// Everything the onboarding flow collects about a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfileInput {
    pub age: u32,
    /// Kilograms
    pub weight: f64,
    /// Centimeters
    pub height: f64,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub activity_level: Option<ActivityLevel>,
    #[serde(default)]
    pub diabetes_type: Option<DiabetesType>,
    #[serde(default)]
    pub dietary_preferences: Vec<DietaryPreference>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<AllergyDeclaration>,
}

impl UserProfileInput {
    /// Check the numeric fields against the accepted ranges
    pub fn validate(&self) -> Result<(), ProfileError> {
        let (age_min, age_max) = AGE_RANGE;
        if !(age_min..=age_max).contains(&self.age) {
            return Err(ProfileError::AgeOutOfRange {
                value: self.age,
                min: age_min,
                max: age_max,
            });
        }

        if !self.weight.is_finite() {
            return Err(ProfileError::NotFinite { field: "weight" });
        }
        let (weight_min, weight_max) = WEIGHT_RANGE_KG;
        if self.weight < weight_min || self.weight > weight_max {
            return Err(ProfileError::WeightOutOfRange {
                value: self.weight,
                min: weight_min,
                max: weight_max,
            });
        }

        if !self.height.is_finite() {
            return Err(ProfileError::NotFinite { field: "height" });
        }
        let (height_min, height_max) = HEIGHT_RANGE_CM;
        if self.height < height_min || self.height > height_max {
            return Err(ProfileError::HeightOutOfRange {
                value: self.height,
                min: height_min,
                max: height_max,
            });
        }

        Ok(())
    }

    /// Diabetes type with an absent value folded into `NoDiabetes`
    pub fn diabetes(&self) -> DiabetesType {
        self.diabetes_type.unwrap_or(DiabetesType::NoDiabetes)
    }

    pub fn has_preference(&self, preference: DietaryPreference) -> bool {
        self.dietary_preferences.contains(&preference)
    }

    /// Exact match against the free-form restriction list
    pub fn has_restriction(&self, keyword: &str) -> bool {
        self.dietary_restrictions.iter().any(|r| r == keyword)
    }
}

/// The subset of the profile the allergy engine reads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllergyInput {
    #[serde(default)]
    pub allergies: Vec<AllergyDeclaration>,
    #[serde(default)]
    pub diabetes_type: Option<DiabetesType>,
    /// Not read by the allergy engine. Carried into medication checks.
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
}

impl From<&UserProfileInput> for AllergyInput {
    fn from(profile: &UserProfileInput) -> Self {
        Self {
            allergies: profile.allergies.clone(),
            diabetes_type: profile.diabetes_type,
            dietary_restrictions: profile.dietary_restrictions.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> UserProfileInput {
        UserProfileInput {
            age: 35,
            weight: 78.0,
            height: 175.0,
            gender: Gender::Male,
            activity_level: Some(ActivityLevel::ModeratelyActive),
            diabetes_type: Some(DiabetesType::Type2),
            dietary_preferences: vec![],
            dietary_restrictions: vec![],
            allergies: vec![],
        }
    }

    #[test]
    fn test_valid_profile_passes() {
        assert_eq!(sample().validate(), Ok(()));
    }

    #[test]
    fn test_age_bounds() {
        let mut p = sample();
        p.age = 12;
        assert!(matches!(p.validate(), Err(ProfileError::AgeOutOfRange { value: 12, .. })));
        p.age = 13;
        assert!(p.validate().is_ok());
        p.age = 121;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_weight_and_height_bounds() {
        let mut p = sample();
        p.weight = 29.9;
        assert!(matches!(p.validate(), Err(ProfileError::WeightOutOfRange { .. })));
        p.weight = 300.0;
        p.height = 251.0;
        assert!(matches!(p.validate(), Err(ProfileError::HeightOutOfRange { .. })));
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut p = sample();
        p.weight = f64::NAN;
        assert_eq!(p.validate(), Err(ProfileError::NotFinite { field: "weight" }));
        p.weight = 70.0;
        p.height = f64::INFINITY;
        assert_eq!(p.validate(), Err(ProfileError::NotFinite { field: "height" }));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{"age": 40, "weight": 65.5, "height": 160}"#;
        let p: UserProfileInput = serde_json::from_str(json).unwrap();
        assert_eq!(p.gender, Gender::PreferNotToSay);
        assert_eq!(p.activity_level, None);
        assert_eq!(p.diabetes(), DiabetesType::NoDiabetes);
        assert!(p.dietary_preferences.is_empty());
    }

    #[test]
    fn test_deserialize_enums() {
        let json = r#"{
            "age": 40, "weight": 65.5, "height": 160,
            "gender": "prefer_not_to_say",
            "activity_level": "very_active",
            "diabetes_type": "none",
            "dietary_preferences": ["none", "pescatarian"]
        }"#;
        let p: UserProfileInput = serde_json::from_str(json).unwrap();
        assert_eq!(p.activity_level, Some(ActivityLevel::VeryActive));
        assert_eq!(p.diabetes_type, Some(DiabetesType::NoDiabetes));
        assert!(p.has_preference(DietaryPreference::Pescatarian));
    }

    #[test]
    fn test_unknown_enum_rejected() {
        let json = r#"{"age": 40, "weight": 65, "height": 160, "activity_level": "couch"}"#;
        assert!(serde_json::from_str::<UserProfileInput>(json).is_err());
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!(DiabetesType::from_str("Type 2"), Some(DiabetesType::Type2));
        assert_eq!(DiabetesType::from_str("pre-diabetes"), Some(DiabetesType::Prediabetes));
        assert_eq!(ActivityLevel::from_str("Moderately-Active"), Some(ActivityLevel::ModeratelyActive));
        assert_eq!(Gender::from_str("F"), Some(Gender::Female));
        assert_eq!(DietaryPreference::from_str("keto"), None);
    }

    #[test]
    fn test_restriction_match_is_exact() {
        let mut p = sample();
        p.dietary_restrictions = vec!["gluten_free".into()];
        assert!(p.has_restriction("gluten_free"));
        assert!(!p.has_restriction("Gluten"));
        assert!(!p.has_restriction("gluten"));
    }
}
