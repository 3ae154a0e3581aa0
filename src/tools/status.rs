//! Sehhamate Status Tool
//!
//! Runtime status information and usage instructions for the profile tools.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Profile generation instructions for AI assistants
pub const PROFILE_INSTRUCTIONS: &str = r#"
# Sehhamate Profile Instructions

## Generating profiles

1. Call `generate_nutrition_profile` with the user's id, age (13-120),
   weight in kg (30-300), height in cm (100-250) and optionally gender,
   activity_level, diabetes_type, dietary_preferences and
   dietary_restrictions.
2. Call `generate_allergy_profile` with the same user id and the declared
   allergies (label, severity low/medium/high, type common/custom).

Both tools store the result, replacing any earlier profile of that kind.

## Accepted values

- gender: male, female, other, prefer_not_to_say
- activity_level: sedentary, moderately_active, very_active
- diabetes_type: type1, type2, prediabetes, none
- dietary_preferences: none, vegetarian, vegan, pescatarian

## Reading and scanning

- `get_nutrition_profile` / `get_allergy_profile` return the stored snapshot.
- `list_profiles` shows which snapshots exist for a user.
- `scan_food_for_allergens` checks food items against the stored allergy
  profile. Never tell the user a food is safe when the result says
  `safe_to_eat: false`.
- `check_medication_interactions` checks a medication name, generic name
  or active substance against food-drug rules and the user's allergies.
  Pass dietary_restrictions such as "high_vitamin_k" or "grapefruit" and
  the diabetes_type so the matching rules apply.

These profiles are planning aids, not medical advice.
"#;

/// Runtime status of the Sehhamate service
#[derive(Debug, Clone, Serialize)]
pub struct SehhamateStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,
    pub profile_format_version: &'static str,

    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    pub fn get_status(&self) -> SehhamateStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));
        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        SehhamateStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            profile_format_version: build_info.profile_format_version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
