//! Meal timing, food-group servings and special considerations
//!
//! Fixed templates selected by diabetes type, dietary preference and
//! restriction keywords.

use crate::models::{
    DiabetesType, DietaryPreference, FoodGroupPlan, FoodGroupTarget, Guidance, MealSlot,
    MealTimingPlan, Priority, UserProfileInput,
};

/// Restriction keywords that trigger gluten-free advice
const GLUTEN_RESTRICTIONS: [&str; 2] = ["gluten_free", "Gluten"];
/// Restriction keywords that remove dairy servings
const DAIRY_RESTRICTIONS: [&str; 2] = ["dairy_free", "Dairy"];

fn slot(meal: &str, time: &str, carbs: Option<&str>) -> MealSlot {
    MealSlot {
        meal: meal.to_string(),
        time: time.to_string(),
        carbs: carbs.map(str::to_string),
    }
}

/// Daily meal schedule for a diabetes type
pub fn meal_timing(diabetes: DiabetesType) -> MealTimingPlan {
    match diabetes {
        DiabetesType::Type1 | DiabetesType::Type2 => MealTimingPlan {
            frequency: 3,
            snacks: 2,
            timing: vec![
                slot("breakfast", "08:00", Some("30-45g")),
                slot("snack", "10:30", Some("15-20g")),
                slot("lunch", "13:00", Some("45-60g")),
                slot("snack", "16:00", Some("15-20g")),
                slot("dinner", "19:00", Some("45-60g")),
            ],
            notes: vec![
                "Consistent meal timing helps maintain stable blood glucose levels".to_string(),
                "Space meals 3-4 hours apart".to_string(),
            ],
        },
        DiabetesType::Prediabetes => MealTimingPlan {
            frequency: 3,
            snacks: 1,
            timing: vec![
                slot("breakfast", "08:00", Some("30-40g")),
                slot("lunch", "13:00", Some("40-50g")),
                slot("snack", "16:00", Some("15-20g")),
                slot("dinner", "19:00", Some("40-50g")),
            ],
            notes: vec![
                "Regular meal timing can help prevent progression to Type 2 diabetes".to_string(),
            ],
        },
        DiabetesType::NoDiabetes => MealTimingPlan {
            frequency: 3,
            snacks: 0,
            timing: vec![
                slot("breakfast", "08:00", None),
                slot("lunch", "13:00", None),
                slot("dinner", "19:00", None),
            ],
            notes: Vec::new(),
        },
    }
}

fn group(servings: u8, priority: Priority) -> FoodGroupTarget {
    FoodGroupTarget {
        servings,
        priority,
        note: None,
    }
}

/// Daily servings per food group
pub fn food_groups(input: &UserProfileInput) -> FoodGroupPlan {
    let mut plan = FoodGroupPlan {
        vegetables: group(5, Priority::High),
        fruits: group(2, Priority::High),
        grains: group(6, Priority::Medium),
        protein: group(5, Priority::High),
        dairy: group(3, Priority::Medium),
        fats: group(3, Priority::Medium),
    };

    // Servings check vegetarian before vegan, unlike the macro override
    let (protein, dairy) = if input.has_preference(DietaryPreference::Vegetarian) {
        (6, 4)
    } else if input.has_preference(DietaryPreference::Vegan) {
        (7, 0)
    } else if input.has_preference(DietaryPreference::Pescatarian) {
        (5, 3)
    } else {
        (plan.protein.servings, plan.dairy.servings)
    };
    plan.protein.servings = protein;
    plan.dairy.servings = dairy;

    if GLUTEN_RESTRICTIONS.iter().any(|k| input.has_restriction(k)) {
        plan.grains.note = Some("Choose gluten-free grains (quinoa, rice, oats)".to_string());
    }
    if DAIRY_RESTRICTIONS.iter().any(|k| input.has_restriction(k)) {
        plan.dairy.servings = 0;
        plan.dairy.note = Some("Use dairy alternatives (almond milk, coconut milk)".to_string());
    }

    plan
}

/// Ordered guidance: diabetes blocks, then preference, then restrictions
pub fn special_considerations(input: &UserProfileInput) -> Vec<Guidance> {
    let mut considerations = Vec::new();

    match input.diabetes() {
        DiabetesType::Type1 => {
            considerations.push(Guidance::new(
                "blood_glucose",
                Priority::High,
                "Monitor blood glucose before and after meals. Count carbohydrates for insulin dosing.",
            ));
            considerations.push(Guidance::new(
                "carb_consistency",
                Priority::High,
                "Maintain consistent carbohydrate intake at meals to help stabilize blood glucose.",
            ));
        }
        DiabetesType::Type2 => {
            considerations.push(Guidance::new(
                "weight_management",
                Priority::High,
                "Focus on portion control and weight management to improve insulin sensitivity.",
            ));
            considerations.push(Guidance::new(
                "carb_quality",
                Priority::High,
                "Choose complex carbohydrates with low glycemic index (whole grains, vegetables).",
            ));
            considerations.push(Guidance::new(
                "sugar_avoidance",
                Priority::High,
                "Limit added sugars and sugary beverages. Read food labels carefully.",
            ));
        }
        DiabetesType::Prediabetes => {
            considerations.push(Guidance::new(
                "prevention",
                Priority::High,
                "Lifestyle changes can prevent progression to Type 2 diabetes. Focus on whole foods and regular physical activity.",
            ));
        }
        DiabetesType::NoDiabetes => {}
    }

    if input.has_preference(DietaryPreference::Vegan) {
        considerations.push(Guidance::new(
            "nutrition",
            Priority::High,
            "Ensure adequate intake of Vitamin B12, Iron, and Omega-3 fatty acids. Consider fortified foods or supplements.",
        ));
    } else if input.has_preference(DietaryPreference::Vegetarian) {
        considerations.push(Guidance::new(
            "nutrition",
            Priority::Medium,
            "Focus on plant-based protein sources (legumes, tofu, tempeh) and ensure adequate Iron and Vitamin B12 intake.",
        ));
    } else if input.has_preference(DietaryPreference::Pescatarian) {
        considerations.push(Guidance::new(
            "nutrition",
            Priority::Low,
            "Include a variety of fish and seafood for optimal Omega-3 intake. Choose low-mercury options.",
        ));
    }

    if !input.dietary_restrictions.is_empty() {
        considerations.push(Guidance::new(
            "allergies",
            Priority::High,
            format!(
                "Always check food labels for: {}. When in doubt, avoid the food.",
                input.dietary_restrictions.join(", ")
            ),
        ));
    }

    considerations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;

    fn input() -> UserProfileInput {
        UserProfileInput {
            age: 30,
            weight: 70.0,
            height: 170.0,
            gender: Gender::Female,
            activity_level: None,
            diabetes_type: None,
            dietary_preferences: vec![],
            dietary_restrictions: vec![],
            allergies: vec![],
        }
    }

    #[test]
    fn test_meal_timing_templates() {
        let t1 = meal_timing(DiabetesType::Type1);
        assert_eq!(t1.timing.len(), 5);
        assert_eq!(t1.snacks, 2);
        assert_eq!(t1.timing[1].carbs.as_deref(), Some("15-20g"));
        assert_eq!(t1.notes.len(), 2);
        assert_eq!(t1, meal_timing(DiabetesType::Type2));

        let pre = meal_timing(DiabetesType::Prediabetes);
        assert_eq!(pre.snacks, 1);
        assert_eq!(pre.timing.len(), 4);
        assert_eq!(pre.timing[2].meal, "snack");

        let none = meal_timing(DiabetesType::NoDiabetes);
        assert_eq!(none.snacks, 0);
        assert_eq!(none.timing.len(), 3);
        assert!(none.timing.iter().all(|s| s.carbs.is_none()));
        assert!(none.notes.is_empty());
    }

    #[test]
    fn test_food_groups_base() {
        let plan = food_groups(&input());
        assert_eq!(plan.vegetables.servings, 5);
        assert_eq!(plan.grains.servings, 6);
        assert_eq!(plan.protein.servings, 5);
        assert_eq!(plan.dairy.servings, 3);
        assert!(plan.grains.note.is_none());
    }

    #[test]
    fn test_food_groups_vegetarian_checked_before_vegan() {
        let mut i = input();
        i.dietary_preferences = vec![DietaryPreference::Vegan, DietaryPreference::Vegetarian];
        let plan = food_groups(&i);
        assert_eq!((plan.protein.servings, plan.dairy.servings), (6, 4));

        i.dietary_preferences = vec![DietaryPreference::Vegan];
        let plan = food_groups(&i);
        assert_eq!((plan.protein.servings, plan.dairy.servings), (7, 0));
    }

    #[test]
    fn test_food_groups_restrictions() {
        let mut i = input();
        i.dietary_preferences = vec![DietaryPreference::Vegetarian];
        i.dietary_restrictions = vec!["Gluten".into(), "dairy_free".into()];
        let plan = food_groups(&i);
        assert!(plan.grains.note.is_some());
        assert_eq!(plan.dairy.servings, 0);
        assert!(plan.dairy.note.as_deref().unwrap().contains("almond milk"));

        // Substrings do not count
        i.dietary_restrictions = vec!["no dairy".into()];
        assert_eq!(food_groups(&i).dairy.servings, 4);
    }

    #[test]
    fn test_special_considerations_order() {
        let mut i = input();
        i.diabetes_type = Some(DiabetesType::Type2);
        i.dietary_preferences = vec![DietaryPreference::Pescatarian];
        i.dietary_restrictions = vec!["Peanuts".into(), "Dairy".into()];

        let kinds: Vec<_> = special_considerations(&i).into_iter().map(|g| g.kind).collect();
        assert_eq!(
            kinds,
            vec!["weight_management", "carb_quality", "sugar_avoidance", "nutrition", "allergies"]
        );

        let last = special_considerations(&i).pop().unwrap();
        assert_eq!(
            last.message,
            "Always check food labels for: Peanuts, Dairy. When in doubt, avoid the food."
        );
    }

    #[test]
    fn test_special_considerations_vegan_wins() {
        let mut i = input();
        i.dietary_preferences = vec![DietaryPreference::Pescatarian, DietaryPreference::Vegan];
        let c = special_considerations(&i);
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].priority, Priority::High);
        assert!(c[0].message.contains("B12"));
    }

    #[test]
    fn test_no_considerations_for_plain_profile() {
        assert!(special_considerations(&input()).is_empty());
    }
}
