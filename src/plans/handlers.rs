use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::jwt::AuthUser,
    error::AppError,
    plans::{
        dto::{CreateMealPlanRequest, CreatedMealPlanResponse, MealPlanSummary},
        repo::MealPlan,
    },
    state::AppState,
};

pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/meal-plan", post(create_meal_plan))
        .route("/meal-plans", get(list_meal_plans))
}

#[instrument(skip(state, payload))]
pub async fn create_meal_plan(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateMealPlanRequest>,
) -> Result<(StatusCode, Json<CreatedMealPlanResponse>), AppError> {
    if payload.plan_name.trim().is_empty() {
        return Err(AppError::Validation("plan_name is required".into()));
    }
    if payload.servings <= 0 {
        return Err(AppError::Validation("servings must be positive".into()));
    }
    if payload.recipes.is_empty() {
        return Err(AppError::Validation("recipes must be non-empty".into()));
    }

    let plan = MealPlan::create_with_recipes(&state.db, user.user_id, &payload).await?;

    info!(
        user_id = %user.user_id,
        meal_plan_id = %plan.id,
        recipes = payload.recipes.len(),
        total = plan.total_estimated_cost,
        "meal plan saved"
    );
    Ok((
        StatusCode::CREATED,
        Json(CreatedMealPlanResponse {
            meal_plan_id: plan.id,
            plan_name: plan.name,
            total_estimated_cost: plan.total_estimated_cost,
            servings: plan.servings,
            status: plan.status,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_meal_plans(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<MealPlanSummary>>, AppError> {
    let plans = MealPlan::list_by_user(&state.db, user.user_id).await?;
    let items = plans
        .into_iter()
        .map(|p| MealPlanSummary {
            id: p.id,
            name: p.name,
            total_estimated_cost: p.total_estimated_cost,
            servings: p.servings,
            status: p.status,
            created_at: p.created_at,
        })
        .collect();
    Ok(Json(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use uuid::Uuid;

    fn caller() -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            email: "cook@example.com".into(),
        }
    }

    fn base_request(recipes: usize) -> CreateMealPlanRequest {
        let json = serde_json::json!({
            "plan_name": "Week of stews",
            "servings": 4,
            "recipes": (0..recipes)
                .map(|i| serde_json::json!({ "title": format!("Recipe {i}") }))
                .collect::<Vec<_>>(),
        });
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn request_parses_with_sparse_recipes() {
        let req = base_request(2);
        assert_eq!(req.recipes.len(), 2);
        assert!(req.recipes[0].estimated_cost.is_none());
        assert!(req.recipes[0].ingredients.is_empty());
    }

    // The validation rejections below all fire before any database work, so
    // the fake state's lazily connecting pool is never touched.

    #[tokio::test]
    async fn empty_recipes_array_returns_400() {
        let state = crate::state::AppState::fake();
        let err = create_meal_plan(State(state), caller(), Json(base_request(0)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_positive_servings_returns_400() {
        let state = crate::state::AppState::fake();
        for servings in [0, -3] {
            let mut req = base_request(1);
            req.servings = servings;
            let err = create_meal_plan(State(state.clone()), caller(), Json(req))
                .await
                .unwrap_err();
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn blank_plan_name_returns_400() {
        let state = crate::state::AppState::fake();
        let mut req = base_request(1);
        req.plan_name = "   ".into();
        let err = create_meal_plan(State(state), caller(), Json(req))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_recipes_field_defaults_to_empty() {
        let req: CreateMealPlanRequest =
            serde_json::from_value(serde_json::json!({ "plan_name": "x", "servings": 2 }))
                .unwrap();
        assert!(req.recipes.is_empty());
    }
}
