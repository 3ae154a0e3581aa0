//! Profile MCP Tools
//!
//! Generate, store, read and delete nutrition and allergy profiles.

use serde::Serialize;
use thiserror::Error;

use crate::allergy::compute_allergy_profile;
use crate::db::Database;
use crate::models::{
    AllergyInput, AllergyProfile, NutritionProfile, ProfileKind, StoredProfile, UserProfileInput,
};
use crate::nutrition::{compute_nutrition_profile, NutritionConfig};

/// Summary of a stored snapshot for list results
#[derive(Debug, Serialize)]
pub struct ProfileSummary {
    pub kind: ProfileKind,
    pub version: String,
    pub generated_at: String,
    pub updated_at: String,
}

impl From<&StoredProfile> for ProfileSummary {
    fn from(stored: &StoredProfile) -> Self {
        Self {
            kind: stored.kind,
            version: stored.version.clone(),
            generated_at: stored.generated_at.clone(),
            updated_at: stored.updated_at.clone(),
        }
    }
}

/// Response for list_profiles
#[derive(Debug, Serialize)]
pub struct ListProfilesResponse {
    pub user_id: String,
    pub profiles: Vec<ProfileSummary>,
    pub total: usize,
}

/// Response for delete_profiles
#[derive(Debug, Serialize)]
pub struct DeleteProfilesResponse {
    pub success: bool,
    pub deleted: usize,
    pub message: String,
}

/// Failure of a generate call, split by who has to fix it
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Storage(String),
}

fn require_user_id(user_id: &str) -> Result<&str, String> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err("user_id cannot be empty".to_string());
    }
    Ok(user_id)
}

/// Compute a nutrition profile and store it as the user's latest
pub fn generate_nutrition_profile(
    db: &Database,
    user_id: &str,
    input: &UserProfileInput,
) -> Result<NutritionProfile, GenerateError> {
    let user_id = require_user_id(user_id).map_err(GenerateError::InvalidInput)?;
    let profile = compute_nutrition_profile(input, &NutritionConfig::default())
        .map_err(|e| GenerateError::InvalidInput(format!("Invalid profile: {}", e)))?;

    let conn = db
        .get_conn()
        .map_err(|e| GenerateError::Storage(format!("Database error: {}", e)))?;
    StoredProfile::save(
        &conn,
        user_id,
        ProfileKind::Nutrition,
        &profile.version,
        &profile.generated_at,
        &profile,
    )
    .map_err(|e| GenerateError::Storage(format!("Failed to store nutrition profile: {}", e)))?;

    tracing::info!(
        user_id,
        target_calories = profile.target_calories,
        "Stored nutrition profile"
    );
    Ok(profile)
}

/// Compute an allergy profile and store it as the user's latest
pub fn generate_allergy_profile(
    db: &Database,
    user_id: &str,
    input: &AllergyInput,
) -> Result<AllergyProfile, GenerateError> {
    let user_id = require_user_id(user_id).map_err(GenerateError::InvalidInput)?;
    let profile = compute_allergy_profile(input);

    let conn = db
        .get_conn()
        .map_err(|e| GenerateError::Storage(format!("Database error: {}", e)))?;
    StoredProfile::save(
        &conn,
        user_id,
        ProfileKind::Allergy,
        &profile.version,
        &profile.generated_at,
        &profile,
    )
    .map_err(|e| GenerateError::Storage(format!("Failed to store allergy profile: {}", e)))?;

    tracing::info!(
        user_id,
        risk_level = profile.risk_level.as_str(),
        allergies = profile.allergies.len(),
        "Stored allergy profile"
    );
    Ok(profile)
}

fn load<T: serde::de::DeserializeOwned>(
    db: &Database,
    user_id: &str,
    kind: ProfileKind,
) -> Result<Option<T>, String> {
    let user_id = require_user_id(user_id)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let stored = StoredProfile::get(&conn, user_id, kind)
        .map_err(|e| format!("Failed to load {} profile: {}", kind.as_str(), e))?;

    stored
        .map(|s| s.decode::<T>())
        .transpose()
        .map_err(|e| format!("Stored {} profile is unreadable: {}", kind.as_str(), e))
}

/// Latest stored nutrition profile, if any
pub fn get_nutrition_profile(db: &Database, user_id: &str) -> Result<Option<NutritionProfile>, String> {
    load(db, user_id, ProfileKind::Nutrition)
}

/// Latest stored allergy profile, if any
pub fn get_allergy_profile(db: &Database, user_id: &str) -> Result<Option<AllergyProfile>, String> {
    load(db, user_id, ProfileKind::Allergy)
}

pub fn list_profiles(db: &Database, user_id: &str) -> Result<ListProfilesResponse, String> {
    let user_id = require_user_id(user_id)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let stored = StoredProfile::list_for_user(&conn, user_id)
        .map_err(|e| format!("Failed to list profiles: {}", e))?;
    let profiles: Vec<ProfileSummary> = stored.iter().map(ProfileSummary::from).collect();
    let total = profiles.len();

    Ok(ListProfilesResponse {
        user_id: user_id.to_string(),
        profiles,
        total,
    })
}

/// Delete one kind of profile, or both when `kind` is None
pub fn delete_profiles(
    db: &Database,
    user_id: &str,
    kind: Option<ProfileKind>,
) -> Result<DeleteProfilesResponse, String> {
    let user_id = require_user_id(user_id)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = StoredProfile::delete(&conn, user_id, kind)
        .map_err(|e| format!("Failed to delete profiles: {}", e))?;

    let what = kind.map(|k| k.as_str()).unwrap_or("all");
    tracing::info!(user_id, kind = what, deleted, "Deleted profiles");

    Ok(DeleteProfilesResponse {
        success: true,
        deleted,
        message: format!("Deleted {} {} profile(s) for '{}'", deleted, what, user_id),
    })
}
