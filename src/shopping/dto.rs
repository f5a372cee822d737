use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct ShoppingListItemView {
    pub id: Uuid,
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: String,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub checked: bool,
}

#[derive(Debug, Serialize)]
pub struct ShoppingListResponse {
    pub shopping_list_id: Uuid,
    pub items: Vec<ShoppingListItemView>,
    pub total_cost: f64,
}
