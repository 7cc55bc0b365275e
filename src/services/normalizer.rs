//! Meal-selection normalization service
//!
//! Normalizes the raw meal-selection field to a set of canonical
//! [`MealKind`] tags so that dedup and aggregation see one spelling
//! regardless of how the form submitted the value.

use crate::types::{MealKind, MealSelection};
use std::collections::HashSet;

/// Normalize a raw meal-selection value to canonical kinds.
///
/// Accepts the three wire shapes: a list of tags, a single string joined
/// with ASCII or full-width commas, or anything else (treated as no
/// selection). Synonyms in either language map to the same kind;
/// unrecognized tokens are dropped without error. Never fails.
pub fn normalize_meal_selection(value: Option<&MealSelection>) -> HashSet<MealKind> {
    let tokens: Vec<&str> = match value {
        Some(MealSelection::Tags(tags)) => tags.iter().map(|t| t.trim()).collect(),
        Some(MealSelection::Joined(joined)) => joined
            .split([',', '，'])
            .map(str::trim)
            .collect(),
        Some(MealSelection::Other(_)) | None => Vec::new(),
    };

    let mut kinds = HashSet::new();
    for token in tokens {
        let kind = match token {
            "午餐" | "lunch" => MealKind::Lunch,
            "晚餐" | "dinner" => MealKind::Dinner,
            "次日早餐" | "早餐" | "breakfast" | "breakfast_next" => MealKind::BreakfastNext,
            _ => continue,
        };
        kinds.insert(kind);
    }
    kinds
}
