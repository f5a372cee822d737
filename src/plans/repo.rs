use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::plans::dto::{CreateMealPlanRequest, IngredientInput, RecipeInput};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub total_estimated_cost: f64,
    pub servings: i32,
    pub status: String,
    pub created_at: OffsetDateTime,
}

// Column width limits from the schema; longer strings are clipped, not rejected.
const NAME_MAX: usize = 255;
const SLOT_MAX: usize = 20;
const UNIT_MAX: usize = 50;
const CATEGORY_MAX: usize = 100;

fn clip(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn clip_opt(s: &Option<String>, max: usize) -> Option<String> {
    s.as_deref().map(|v| clip(v, max))
}

impl MealPlan {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<MealPlan>> {
        let rows = sqlx::query_as::<_, MealPlan>(
            r#"
            SELECT id, user_id, name, total_estimated_cost, servings, status, created_at
            FROM meal_plans
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Plan by id, only if it belongs to the caller.
    pub async fn find_owned(
        db: &PgPool,
        plan_id: Uuid,
        user_id: Uuid,
    ) -> anyhow::Result<Option<MealPlan>> {
        let plan = sqlx::query_as::<_, MealPlan>(
            r#"
            SELECT id, user_id, name, total_estimated_cost, servings, status, created_at
            FROM meal_plans
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(plan_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(plan)
    }

    /// Persist a plan with its recipes and ingredients in one transaction.
    ///
    /// The plan row starts with a zero placeholder cost; per-recipe estimated
    /// costs (absent values count as 0) accumulate into the plan total, which
    /// is written last. Any insert failure rolls the whole plan back.
    pub async fn create_with_recipes(
        db: &PgPool,
        user_id: Uuid,
        req: &CreateMealPlanRequest,
    ) -> anyhow::Result<MealPlan> {
        let mut tx = db.begin().await?;

        let plan_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO meal_plans (user_id, name, total_estimated_cost, servings)
            VALUES ($1, $2, 0, $3)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(clip(req.plan_name.trim(), NAME_MAX))
        .bind(req.servings)
        .fetch_one(&mut *tx)
        .await?;

        let mut total = 0.0_f64;
        for recipe in &req.recipes {
            total += recipe.estimated_cost.unwrap_or(0.0);
            let recipe_id = insert_recipe(&mut tx, plan_id, recipe).await?;
            for ingredient in &recipe.ingredients {
                insert_ingredient(&mut tx, recipe_id, ingredient).await?;
            }
        }

        let plan = sqlx::query_as::<_, MealPlan>(
            r#"
            UPDATE meal_plans
            SET total_estimated_cost = $2
            WHERE id = $1
            RETURNING id, user_id, name, total_estimated_cost, servings, status, created_at
            "#,
        )
        .bind(plan_id)
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(plan)
    }
}

async fn insert_recipe(
    tx: &mut Transaction<'_, Postgres>,
    plan_id: Uuid,
    recipe: &RecipeInput,
) -> anyhow::Result<Uuid> {
    let title = recipe
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("Untitled recipe");

    let recipe_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO recipes (meal_plan_id, day_of_week, meal_slot, title, instructions,
                             prep_minutes, cook_minutes, estimated_cost, calories,
                             protein_g, carbs_g, fat_g)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING id
        "#,
    )
    .bind(plan_id)
    .bind(clip_opt(&recipe.day_of_week, SLOT_MAX))
    .bind(clip_opt(&recipe.meal_slot, SLOT_MAX))
    .bind(clip(title, NAME_MAX))
    .bind(&recipe.instructions)
    .bind(recipe.prep_minutes)
    .bind(recipe.cook_minutes)
    .bind(recipe.estimated_cost)
    .bind(recipe.calories)
    .bind(recipe.protein_g)
    .bind(recipe.carbs_g)
    .bind(recipe.fat_g)
    .fetch_one(&mut **tx)
    .await?;
    Ok(recipe_id)
}

async fn insert_ingredient(
    tx: &mut Transaction<'_, Postgres>,
    recipe_id: Uuid,
    ingredient: &IngredientInput,
) -> anyhow::Result<()> {
    let name = ingredient
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("Unnamed ingredient");

    sqlx::query(
        r#"
        INSERT INTO ingredients (recipe_id, name, quantity, unit, category, estimated_price)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(recipe_id)
    .bind(clip(name, NAME_MAX))
    .bind(ingredient.quantity)
    .bind(clip_opt(&ingredient.unit, UNIT_MAX))
    .bind(clip_opt(&ingredient.category, CATEGORY_MAX))
    .bind(ingredient.estimated_price)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_respects_char_boundaries() {
        assert_eq!(clip("abcdef", 3), "abc");
        assert_eq!(clip("ab", 3), "ab");
        // Multi-byte characters count as one each
        assert_eq!(clip("crème brûlée", 5), "crème");
    }

    #[test]
    fn clip_opt_passes_none_through() {
        assert_eq!(clip_opt(&None, 5), None);
        assert_eq!(clip_opt(&Some("toolong".into()), 4), Some("tool".into()));
    }
}
