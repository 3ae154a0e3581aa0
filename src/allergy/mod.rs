//! Allergy risk profiling
//!
//! Builds an allergy profile from declared allergies, scans food items
//! against it and checks medications for interactions.

pub mod classify;
pub mod detection;
pub mod engine;
pub mod guidance;
pub mod medication;

pub use classify::{categorize, common_names, risk_score};
pub use detection::{detect_allergens, detection_risk, effective_confidence, DEFAULT_CONFIDENCE};
pub use engine::{
    analyze_allergy, compute_allergy_profile, compute_allergy_profile_at, overall_risk_level,
};
pub use medication::{analyze_medication_interactions, interaction_risk};
