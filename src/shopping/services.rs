//! Ingredient aggregation across all recipes of a plan.

use std::collections::BTreeMap;

use crate::shopping::repo::IngredientRow;

/// One consolidated line item, keyed by (name, unit, category). A NULL unit
/// collapses to the empty string so "2 eggs" and "3 eggs" merge regardless of
/// whether the unit was supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedItem {
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: String,
    pub category: Option<String>,
    pub price: Option<f64>,
}

fn add_opt(acc: Option<f64>, value: Option<f64>) -> Option<f64> {
    match (acc, value) {
        (Some(a), Some(v)) => Some(a + v),
        (Some(a), None) => Some(a),
        (None, v) => v,
    }
}

/// Merge ingredient rows into one item per aggregation key, summing quantity
/// and price. Returns items ordered by category (absent categories last) then
/// name, together with the total of all present group prices.
pub fn aggregate(rows: Vec<IngredientRow>) -> (Vec<AggregatedItem>, f64) {
    // Key ordering: (category present?, category, name, unit) gives the
    // NULLS LAST ordering directly.
    let mut groups: BTreeMap<(bool, Option<String>, String, String), AggregatedItem> =
        BTreeMap::new();

    for row in rows {
        let unit = row.unit.unwrap_or_default();
        let key = (
            row.category.is_none(),
            row.category.clone(),
            row.name.clone(),
            unit.clone(),
        );
        let entry = groups.entry(key).or_insert_with(|| AggregatedItem {
            name: row.name,
            quantity: None,
            unit,
            category: row.category,
            price: None,
        });
        entry.quantity = add_opt(entry.quantity, row.quantity);
        entry.price = add_opt(entry.price, row.estimated_price);
    }

    let items: Vec<AggregatedItem> = groups.into_values().collect();
    let total = items.iter().filter_map(|i| i.price).sum();
    (items, total)
}
