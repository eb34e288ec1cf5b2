//! Composite food resolution
//!
//! Calories and derived keywords are computed once, from the ingredient
//! foods as they are at construction time. Later changes to an ingredient
//! are not reflected in composites that already use it.

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use super::{Catalog, Food, Ingredient};
use crate::error::{LedgerError, LedgerResult};
use crate::validation::{require_name, validate_keyword};

/// Build a composite food from ingredients already in `catalog`.
///
/// Rejects an empty ingredient list, non-positive servings, unknown or
/// repeated ingredients. When `explicit_keywords` is empty the keywords are
/// the sorted, deduplicated union of the ingredients' keywords. The result
/// is not inserted; pass it to [`Catalog::add_composite_food`].
pub fn build_composite(
    catalog: &Catalog,
    name: &str,
    ingredients: Vec<Ingredient>,
    explicit_keywords: Vec<String>,
) -> LedgerResult<Food> {
    let name = require_name(name)?;

    if ingredients.is_empty() {
        return Err(LedgerError::validation(
            "A composite food needs at least one ingredient",
        ));
    }

    let mut seen = HashSet::new();
    for ingredient in &ingredients {
        if ingredient.servings == 0 {
            return Err(LedgerError::validation(
                "Ingredient servings must be greater than 0",
            ));
        }
        let food = catalog.get(ingredient.food).ok_or_else(|| {
            LedgerError::not_found(format!(
                "No food at catalog index {}",
                ingredient.food.index()
            ))
        })?;
        if !seen.insert(ingredient.food) {
            return Err(LedgerError::validation(format!(
                "Ingredient '{}' is already added",
                food.name()
            )));
        }
    }

    for keyword in &explicit_keywords {
        validate_keyword(keyword)?;
    }

    resolve(catalog, name, ingredients, explicit_keywords)
}

/// Compute calories and keywords for a composite. Ingredient ids must
/// already exist in `catalog`; an empty list yields a zero-calorie
/// composite (used when loading files whose ingredients could not be found).
pub(crate) fn resolve(
    catalog: &Catalog,
    name: String,
    ingredients: Vec<Ingredient>,
    explicit_keywords: Vec<String>,
) -> LedgerResult<Food> {
    let mut calories: u32 = 0;
    let mut derived = BTreeSet::new();

    for ingredient in &ingredients {
        let food = catalog.get(ingredient.food).ok_or_else(|| {
            LedgerError::not_found(format!(
                "No food at catalog index {}",
                ingredient.food.index()
            ))
        })?;

        calories = food
            .calories()
            .checked_mul(ingredient.servings)
            .and_then(|c| calories.checked_add(c))
            .ok_or_else(|| {
                LedgerError::validation(format!("Calorie total for '{}' is too large", name))
            })?;

        if explicit_keywords.is_empty() {
            derived.extend(food.keywords().iter().cloned());
        }
    }

    let keywords = if explicit_keywords.is_empty() {
        derived.into_iter().collect()
    } else {
        explicit_keywords
    };

    debug!(name = %name, calories, ingredients = ingredients.len(), "resolved composite food");
    Ok(Food::composite(name, keywords, calories, ingredients))
}
