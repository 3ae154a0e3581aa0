//! Sehhamate MCP Server Implementation
//!
//! Exposes the profile engines, profile store and allergen scanner as MCP tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::models::{
    ActivityLevel, AllergyDeclaration, AllergyInput, AllergyType, DiabetesType,
    DietaryPreference, FoodItem, Gender, MedicationContext, MedicationInput, ProfileKind,
    Severity, UserProfileInput,
};
use crate::tools::medication;
use crate::tools::profiles::{self, GenerateError};
use crate::tools::scan;
use crate::tools::status::StatusTracker;

/// Sehhamate MCP Service
#[derive(Clone)]
pub struct SehhamateService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<SehhamateService>,
}

impl SehhamateService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn generate_error(e: GenerateError) -> McpError {
    match e {
        GenerateError::InvalidInput(msg) => McpError::invalid_params(msg, None),
        GenerateError::Storage(msg) => McpError::internal_error(msg, None),
    }
}

/// Parse an optional enum string, rejecting unknown values
fn parse_opt<T>(
    field: &str,
    value: Option<&str>,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>, McpError> {
    value
        .map(|s| {
            parse(s).ok_or_else(|| {
                McpError::invalid_params(format!("Unknown {} '{}'", field, s), None)
            })
        })
        .transpose()
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AllergyParam {
    /// Optional stable identifier
    pub id: Option<String>,
    /// Allergy name, e.g. "Peanuts"
    pub label: Option<String>,
    /// low, medium or high (default medium)
    pub severity: Option<String>,
    /// common or custom (default common)
    #[serde(rename = "type")]
    pub allergy_type: Option<String>,
}

impl AllergyParam {
    fn into_declaration(self) -> Result<AllergyDeclaration, McpError> {
        Ok(AllergyDeclaration {
            id: self.id,
            label: self.label,
            severity: parse_opt("severity", self.severity.as_deref(), Severity::from_str)?
                .unwrap_or_default(),
            allergy_type: parse_opt("type", self.allergy_type.as_deref(), AllergyType::from_str)?
                .unwrap_or_default(),
        })
    }
}

fn declarations(params: Vec<AllergyParam>) -> Result<Vec<AllergyDeclaration>, McpError> {
    params.into_iter().map(AllergyParam::into_declaration).collect()
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GenerateNutritionProfileParams {
    pub user_id: String,
    /// Age in years (13-120)
    pub age: u32,
    /// Weight in kg (30-300)
    pub weight: f64,
    /// Height in cm (100-250)
    pub height: f64,
    /// male, female, other or prefer_not_to_say
    pub gender: Option<String>,
    /// sedentary, moderately_active or very_active
    pub activity_level: Option<String>,
    /// type1, type2, prediabetes or none
    pub diabetes_type: Option<String>,
    /// Any of: none, vegetarian, vegan, pescatarian
    #[serde(default)]
    pub dietary_preferences: Vec<String>,
    /// Free-form restriction tags such as "gluten_free" or "Dairy"
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
}

impl GenerateNutritionProfileParams {
    fn into_input(self) -> Result<(String, UserProfileInput), McpError> {
        let dietary_preferences = self
            .dietary_preferences
            .iter()
            .map(|p| {
                DietaryPreference::from_str(p).ok_or_else(|| {
                    McpError::invalid_params(format!("Unknown dietary preference '{}'", p), None)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let input = UserProfileInput {
            age: self.age,
            weight: self.weight,
            height: self.height,
            gender: parse_opt("gender", self.gender.as_deref(), Gender::from_str)?
                .unwrap_or_default(),
            activity_level: parse_opt(
                "activity_level",
                self.activity_level.as_deref(),
                ActivityLevel::from_str,
            )?,
            diabetes_type: parse_opt(
                "diabetes_type",
                self.diabetes_type.as_deref(),
                DiabetesType::from_str,
            )?,
            dietary_preferences,
            dietary_restrictions: self.dietary_restrictions,
            allergies: Vec::new(),
        };
        Ok((self.user_id, input))
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GenerateAllergyProfileParams {
    pub user_id: String,
    #[serde(default)]
    pub allergies: Vec<AllergyParam>,
    /// type1, type2, prediabetes or none
    pub diabetes_type: Option<String>,
    /// Accepted for input compatibility; allergy analysis does not read it
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UserIdParams {
    pub user_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteProfilesParams {
    pub user_id: String,
    /// nutrition or allergy; omit to delete both
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FoodItemParam {
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub description: Option<String>,
    /// Recognition confidence in [0, 1] (default 0.8)
    pub confidence: Option<f64>,
}

impl FoodItemParam {
    fn into_food_item(self) -> Result<FoodItem, McpError> {
        if let Some(c) = self.confidence {
            if !c.is_finite() || !(0.0..=1.0).contains(&c) {
                return Err(McpError::invalid_params(
                    format!("confidence for '{}' must be between 0 and 1, got {}", self.name, c),
                    None,
                ));
            }
        }
        Ok(FoodItem {
            name: self.name,
            ingredients: self.ingredients,
            description: self.description,
            confidence: self.confidence,
        })
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ScanFoodParams {
    /// Scan against this user's stored allergy profile
    pub user_id: Option<String>,
    /// Scan against these allergies instead of a stored profile
    pub allergies: Option<Vec<AllergyParam>>,
    pub food_items: Vec<FoodItemParam>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CheckMedicationParams {
    /// Product name as printed on the package
    pub medication: String,
    pub generic_name: Option<String>,
    pub active_substance: Option<String>,
    /// Check allergy-drug rules against this user's stored allergy profile
    pub user_id: Option<String>,
    /// Check allergy-drug rules against these allergies instead
    pub allergies: Option<Vec<AllergyParam>>,
    /// Restriction tags such as "high_vitamin_k" or "grapefruit"
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    /// type1, type2, prediabetes or none
    pub diabetes_type: Option<String>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl SehhamateService {
    // --- Status ---

    #[tool(description = "Get the current status of the Sehhamate service including build info, database status, and process information")]
    async fn sehhamate_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        to_json(&tracker.get_status())
    }

    #[tool(description = "Get instructions for generating and reading nutrition and allergy profiles. Call this when unsure which values the profile tools accept.")]
    fn profile_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::PROFILE_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(PROFILE_INSTRUCTIONS)]))
    }

    // --- Profiles ---

    #[tool(description = "Compute daily calorie, macro, fiber, sugar and sodium targets plus meal timing and food-group guidance for a user, and store the result")]
    fn generate_nutrition_profile(
        &self,
        Parameters(p): Parameters<GenerateNutritionProfileParams>,
    ) -> Result<CallToolResult, McpError> {
        let (user_id, input) = p.into_input()?;
        let result = profiles::generate_nutrition_profile(&self.database, &user_id, &input)
            .map_err(generate_error)?;
        to_json(&result)
    }

    #[tool(description = "Build an allergy risk profile (categories, risk level, cross-reactivity, hidden sources, safe alternatives, emergency plan) for a user, and store the result")]
    fn generate_allergy_profile(
        &self,
        Parameters(p): Parameters<GenerateAllergyProfileParams>,
    ) -> Result<CallToolResult, McpError> {
        let input = AllergyInput {
            allergies: declarations(p.allergies)?,
            diabetes_type: parse_opt("diabetes_type", p.diabetes_type.as_deref(), DiabetesType::from_str)?,
            dietary_restrictions: p.dietary_restrictions,
        };
        let result = profiles::generate_allergy_profile(&self.database, &p.user_id, &input)
            .map_err(generate_error)?;
        to_json(&result)
    }

    #[tool(description = "Get the latest stored nutrition profile for a user")]
    fn get_nutrition_profile(
        &self,
        Parameters(p): Parameters<UserIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = profiles::get_nutrition_profile(&self.database, &p.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(profile) => to_json(&profile),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                "No nutrition profile stored for '{}'",
                p.user_id
            ))])),
        }
    }

    #[tool(description = "Get the latest stored allergy profile for a user")]
    fn get_allergy_profile(
        &self,
        Parameters(p): Parameters<UserIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = profiles::get_allergy_profile(&self.database, &p.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(profile) => to_json(&profile),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                "No allergy profile stored for '{}'",
                p.user_id
            ))])),
        }
    }

    #[tool(description = "List the profile snapshots stored for a user")]
    fn list_profiles(&self, Parameters(p): Parameters<UserIdParams>) -> Result<CallToolResult, McpError> {
        let result = profiles::list_profiles(&self.database, &p.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Delete a user's stored nutrition or allergy profile, or both when kind is omitted")]
    fn delete_profiles(
        &self,
        Parameters(p): Parameters<DeleteProfilesParams>,
    ) -> Result<CallToolResult, McpError> {
        let kind = parse_opt("kind", p.kind.as_deref(), ProfileKind::from_str)?;
        let result = profiles::delete_profiles(&self.database, &p.user_id, kind)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Scanning ---

    #[tool(description = "Check food items for allergens against a user's stored allergy profile, or against an explicit allergy list. Returns detected allergens, warnings and an overall risk level.")]
    fn scan_food_for_allergens(
        &self,
        Parameters(p): Parameters<ScanFoodParams>,
    ) -> Result<CallToolResult, McpError> {
        let allergies = p.allergies.map(declarations).transpose()?;
        let food_items = p
            .food_items
            .into_iter()
            .map(FoodItemParam::into_food_item)
            .collect::<Result<Vec<_>, _>>()?;
        let result = scan::scan_food_for_allergens(
            &self.database,
            p.user_id.as_deref(),
            allergies,
            &food_items,
        )
        .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    // --- Medications ---

    #[tool(description = "Check a medication for food-drug interactions (alcohol, vitamin K, tyramine, grapefruit, carbohydrates) and allergy-drug interactions against a stored or supplied allergy list. Returns interactions, warnings and an overall risk level.")]
    fn check_medication_interactions(
        &self,
        Parameters(p): Parameters<CheckMedicationParams>,
    ) -> Result<CallToolResult, McpError> {
        let allergies = p.allergies.map(declarations).transpose()?;
        let context = MedicationContext {
            dietary_restrictions: p.dietary_restrictions,
            diabetes_type: parse_opt("diabetes_type", p.diabetes_type.as_deref(), DiabetesType::from_str)?,
        };
        let drug = MedicationInput {
            medication: Some(p.medication),
            generic_name: p.generic_name,
            active_substance: p.active_substance,
        };
        let result = medication::check_medication_interactions(
            &self.database,
            p.user_id.as_deref(),
            allergies,
            &drug,
            &context,
        )
        .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }
}

#[tool_handler]
impl ServerHandler for SehhamateService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "sehhamate".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Sehhamate Profile Engines".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Sehhamate - nutrition requirement and allergy risk profiles. \
                 Call profile_instructions for accepted values. \
                 Profiles: generate_nutrition_profile, generate_allergy_profile, \
                 get_nutrition_profile, get_allergy_profile, list_profiles, delete_profiles. \
                 Scanning: scan_food_for_allergens. \
                 Medications: check_medication_interactions. Status: sehhamate_status."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nutrition_params(json: serde_json::Value) -> GenerateNutritionProfileParams {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_nutrition_params_parse_enums() {
        let p = nutrition_params(serde_json::json!({
            "user_id": "u1",
            "age": 35,
            "weight": 78.0,
            "height": 175.0,
            "gender": "Male",
            "activity_level": "moderately_active",
            "diabetes_type": "type2",
            "dietary_preferences": ["vegan", "none"]
        }));
        let (user_id, input) = p.into_input().unwrap();
        assert_eq!(user_id, "u1");
        assert_eq!(input.gender, Gender::Male);
        assert_eq!(input.diabetes_type, Some(DiabetesType::Type2));
        assert_eq!(
            input.dietary_preferences,
            vec![DietaryPreference::Vegan, DietaryPreference::NoPreference]
        );
    }

    #[test]
    fn test_nutrition_params_reject_unknown_values() {
        let p = nutrition_params(serde_json::json!({
            "user_id": "u1", "age": 35, "weight": 78.0, "height": 175.0,
            "activity_level": "couch"
        }));
        assert!(p.into_input().is_err());

        let p = nutrition_params(serde_json::json!({
            "user_id": "u1", "age": 35, "weight": 78.0, "height": 175.0,
            "dietary_preferences": ["keto"]
        }));
        assert!(p.into_input().is_err());
    }

    #[test]
    fn test_allergy_param_defaults() {
        let p: AllergyParam = serde_json::from_value(serde_json::json!({"label": "Soy"})).unwrap();
        let decl = p.into_declaration().unwrap();
        assert_eq!(decl.severity, Severity::Medium);
        assert_eq!(decl.allergy_type, AllergyType::Common);

        let p: AllergyParam =
            serde_json::from_value(serde_json::json!({"label": "Soy", "severity": "deadly"})).unwrap();
        assert!(p.into_declaration().is_err());
    }

    #[test]
    fn test_food_item_confidence_range() {
        let item = |confidence: f64| FoodItemParam {
            name: "Toast".to_string(),
            ingredients: Vec::new(),
            description: None,
            confidence: Some(confidence),
        };
        assert!(item(0.0).into_food_item().is_ok());
        assert_eq!(item(1.0).into_food_item().unwrap().confidence, Some(1.0));
        assert!(item(-1.0).into_food_item().is_err());
        assert!(item(1.5).into_food_item().is_err());
        assert!(item(f64::NAN).into_food_item().is_err());
    }

    #[test]
    fn test_generate_errors_split_by_cause() {
        let invalid = generate_error(GenerateError::InvalidInput("age out of range".into()));
        assert_eq!(invalid.code, rmcp::model::ErrorCode::INVALID_PARAMS);
        let storage = generate_error(GenerateError::Storage("Database error: locked".into()));
        assert_eq!(storage.code, rmcp::model::ErrorCode::INTERNAL_ERROR);
    }
}
