//! Generate both profiles for a user profile JSON file
//!
//! Usage: generate_profiles <input.json | ->

use std::io::Read;

use serde::Serialize;
use tracing_subscriber::EnvFilter;

use sehhamate::allergy::compute_allergy_profile;
use sehhamate::models::{AllergyInput, AllergyProfile, NutritionProfile, UserProfileInput};
use sehhamate::nutrition::{compute_nutrition_profile, NutritionConfig};

#[derive(Serialize)]
struct Profiles {
    nutrition: NutritionProfile,
    allergy: AllergyProfile,
}

fn read_input(arg: &str) -> std::io::Result<String> {
    if arg == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(arg)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("sehhamate=warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let Some(arg) = std::env::args().nth(1) else {
        eprintln!("Usage: generate_profiles <input.json | ->");
        std::process::exit(2);
    };

    let raw = read_input(&arg)?;
    let input: UserProfileInput = serde_json::from_str(&raw)?;

    let profiles = Profiles {
        nutrition: compute_nutrition_profile(&input, &NutritionConfig::default())?,
        allergy: compute_allergy_profile(&AllergyInput::from(&input)),
    };

    println!("{}", serde_json::to_string_pretty(&profiles)?);
    Ok(())
}
