use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::AppError,
    plans::repo::MealPlan,
    shopping::{
        dto::{ShoppingListItemView, ShoppingListResponse},
        repo, services,
    },
    state::AppState,
};

pub fn shopping_routes() -> Router<AppState> {
    Router::new().route("/shopping-list/:plan_id", get(get_shopping_list))
}

/// Regenerates the plan's shopping list on every call: prior line items are
/// fully replaced by a fresh aggregation over the plan's ingredients.
#[instrument(skip(state))]
pub async fn get_shopping_list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(plan_id): Path<Uuid>,
) -> Result<Json<ShoppingListResponse>, AppError> {
    let plan = MealPlan::find_owned(&state.db, plan_id, user.user_id)
        .await?
        .ok_or(AppError::NotFound("Meal plan"))?;

    let list_id = repo::ensure_list(&state.db, plan.id).await?;
    let rows = repo::fetch_plan_ingredients(&state.db, plan.id).await?;
    let (items, total_cost) = services::aggregate(rows);
    let inserted = repo::replace_items(&state.db, list_id, &items, total_cost).await?;

    info!(
        user_id = %user.user_id,
        meal_plan_id = %plan.id,
        items = inserted.len(),
        total_cost,
        "shopping list regenerated"
    );

    Ok(Json(ShoppingListResponse {
        shopping_list_id: list_id,
        items: inserted
            .into_iter()
            .map(|i| ShoppingListItemView {
                id: i.id,
                name: i.name,
                quantity: i.quantity,
                unit: i.unit,
                category: i.category,
                price: i.price,
                checked: i.checked,
            })
            .collect(),
        total_cost,
    }))
}
