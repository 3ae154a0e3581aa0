//! Data models
//!
//! Engine inputs, generated profiles and the persisted snapshot row.

mod allergy;
mod allergy_profile;
mod medication;
mod nutrition_profile;
mod profile;
mod stored_profile;

pub use allergy::{
    AllergyCategory, AllergyDeclaration, AllergyType, AnalyzedAllergy, RiskLevel, Severity,
    UNKNOWN_LABEL,
};
pub use allergy_profile::{
    ActionPlan, AlertSettings, AlertSeverity, AllergenScanResult, AllergyProfile,
    CrossReactivity, DetectedAllergen, EmergencyInfo, FoodItem, HiddenSources, SafeAlternatives,
    ScanWarning,
};
pub use medication::{
    InteractionAdvice, InteractionKind, InteractionWarning, MedicationContext, MedicationInput,
    MedicationInteraction, MedicationInteractionReport,
};
pub use nutrition_profile::{
    BasedOn, DailyLimit, FiberTarget, FoodGroupPlan, FoodGroupTarget, Guidance, MacroRatios,
    MacroTarget, MealSlot, MealTimingPlan, NutritionProfile, Priority,
};
pub use profile::{
    ActivityLevel, AllergyInput, DiabetesType, DietaryPreference, Gender, ProfileError,
    UserProfileInput, AGE_RANGE, HEIGHT_RANGE_CM, WEIGHT_RANGE_KG,
};
pub use stored_profile::{ProfileKind, StoredProfile};
