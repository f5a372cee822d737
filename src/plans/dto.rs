use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateMealPlanRequest {
    pub plan_name: String,
    pub servings: i32,
    #[serde(default)]
    pub recipes: Vec<RecipeInput>,
}

/// Recipe as submitted by the client or lifted from extracted model output.
/// Everything beyond the title is optional; absent fields persist as NULL.
#[derive(Debug, Deserialize)]
pub struct RecipeInput {
    pub title: Option<String>,
    pub day_of_week: Option<String>,
    pub meal_slot: Option<String>,
    pub instructions: Option<String>,
    pub prep_minutes: Option<i32>,
    pub cook_minutes: Option<i32>,
    pub estimated_cost: Option<f64>,
    pub calories: Option<i32>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    #[serde(default)]
    pub ingredients: Vec<IngredientInput>,
}

#[derive(Debug, Deserialize)]
pub struct IngredientInput {
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub estimated_price: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct CreatedMealPlanResponse {
    pub meal_plan_id: Uuid,
    pub plan_name: String,
    pub total_estimated_cost: f64,
    pub servings: i32,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct MealPlanSummary {
    pub id: Uuid,
    pub name: String,
    pub total_estimated_cost: f64,
    pub servings: i32,
    pub status: String,
    pub created_at: OffsetDateTime,
}
