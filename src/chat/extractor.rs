//! Heuristic extraction of a meal-plan JSON object from free-form model text.
//!
//! The span is the first `{` through the last `}` in the text. This is a
//! greedy slice, not a balanced-brace parse: prose containing stray braces can
//! make the span unparseable, and a response holding several JSON objects only
//! captures the outer span. Parsed values are accepted only when they are an
//! object with an array-valued `recipes` field.

use serde_json::Value;

pub fn extract_meal_plan(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    let span = &text[start..=end];
    let value: Value = serde_json::from_str(span).ok()?;
    let recipes = value.as_object()?.get("recipes")?;
    if recipes.is_array() {
        Some(value)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_embedded_plan() {
        let text = r#"Here is your plan for the week!
            {"plan_name": "Budget week", "recipes": [{"title": "Omelette"}]}
            Enjoy!"#;
        let plan = extract_meal_plan(text).expect("plan extracted");
        assert_eq!(plan["plan_name"], json!("Budget week"));
        assert_eq!(plan["recipes"][0]["title"], json!("Omelette"));
    }

    #[test]
    fn plain_text_yields_none() {
        assert!(extract_meal_plan("Just a chat about dinner ideas.").is_none());
    }

    #[test]
    fn object_without_recipes_array_is_rejected() {
        assert!(extract_meal_plan(r#"{"plan_name": "x"}"#).is_none());
        assert!(extract_meal_plan(r#"{"recipes": "not an array"}"#).is_none());
        // Top-level array is not an object
        assert!(extract_meal_plan(r#"[{"recipes": []}]"#).is_none());
    }

    #[test]
    fn close_brace_before_open_yields_none() {
        assert!(extract_meal_plan("} weird {").is_none());
    }

    #[test]
    fn trailing_prose_brace_breaks_the_span() {
        // The greedy span runs to the LAST close brace, so a stray brace after
        // a valid object makes the whole span unparseable. Expected behavior.
        let text = r#"{"recipes": []} and then I thought: }"#;
        assert!(extract_meal_plan(text).is_none());
    }

    #[test]
    fn two_objects_only_capture_the_outer_span() {
        // Span covers both objects and fails to parse as one value.
        let text = r#"{"recipes": []} {"recipes": []}"#;
        assert!(extract_meal_plan(text).is_none());
    }

    #[test]
    fn nested_braces_inside_one_object_are_fine() {
        let text = r#"Plan: {"recipes": [{"title": "Stew", "macros": {"kcal": 600}}]}"#;
        assert!(extract_meal_plan(text).is_some());
    }
}
