use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::shopping::services::AggregatedItem;

/// One source ingredient row under a plan, before aggregation.
#[derive(Debug, Clone, FromRow)]
pub struct IngredientRow {
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub estimated_price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShoppingListItem {
    pub id: Uuid,
    pub shopping_list_id: Uuid,
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: String,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub checked: bool,
}

pub async fn fetch_plan_ingredients(
    db: &PgPool,
    plan_id: Uuid,
) -> anyhow::Result<Vec<IngredientRow>> {
    let rows = sqlx::query_as::<_, IngredientRow>(
        r#"
        SELECT i.name, i.quantity, i.unit, i.category, i.estimated_price
        FROM ingredients i
        JOIN recipes r ON r.id = i.recipe_id
        WHERE r.meal_plan_id = $1
        "#,
    )
    .bind(plan_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// At most one list exists per plan; create it on first access, reuse after.
pub async fn ensure_list(db: &PgPool, plan_id: Uuid) -> anyhow::Result<Uuid> {
    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO shopping_lists (meal_plan_id)
        VALUES ($1)
        ON CONFLICT (meal_plan_id) DO UPDATE SET meal_plan_id = EXCLUDED.meal_plan_id
        RETURNING id
        "#,
    )
    .bind(plan_id)
    .fetch_one(db)
    .await?;
    Ok(id)
}

/// Full replace of the list's line items.
///
/// Delete-then-reinsert is not guarded by a row lock, so two overlapping
/// regenerations for the same plan race. Known non-atomic read-modify-write;
/// outputs converge as long as the underlying plan data does not change.
pub async fn replace_items(
    db: &PgPool,
    list_id: Uuid,
    items: &[AggregatedItem],
    total_cost: f64,
) -> anyhow::Result<Vec<ShoppingListItem>> {
    sqlx::query("DELETE FROM shopping_list_items WHERE shopping_list_id = $1")
        .bind(list_id)
        .execute(db)
        .await?;

    let mut inserted = Vec::with_capacity(items.len());
    for item in items {
        let row = sqlx::query_as::<_, ShoppingListItem>(
            r#"
            INSERT INTO shopping_list_items
                (shopping_list_id, name, quantity, unit, category, price, checked)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE)
            RETURNING id, shopping_list_id, name, quantity, unit, category, price, checked
            "#,
        )
        .bind(list_id)
        .bind(&item.name)
        .bind(item.quantity)
        .bind(&item.unit)
        .bind(&item.category)
        .bind(item.price)
        .fetch_one(db)
        .await?;
        inserted.push(row);
    }

    sqlx::query("UPDATE shopping_lists SET total_cost = $2 WHERE id = $1")
        .bind(list_id)
        .bind(total_cost)
        .execute(db)
        .await?;

    Ok(inserted)
}
