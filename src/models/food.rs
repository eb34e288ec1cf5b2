//! Food model
//!
//! A catalog entry is either a basic food with directly specified calories,
//! or a composite food whose calories and keywords were derived from its
//! ingredients when it was built.

use serde::{Deserialize, Serialize};

use crate::error::LedgerResult;
use crate::validation::{require_name, validate_keyword};

/// Stable handle to a food inside a [`Catalog`](super::Catalog).
///
/// The catalog is append-only, so an id stays valid for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FoodId(usize);

impl FoodId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the food in catalog display order
    pub fn index(self) -> usize {
        self.0
    }
}

/// One ingredient line of a composite food
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub food: FoodId,
    pub servings: u32,
}

/// Basic or composite
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FoodKind {
    Basic,
    Composite { ingredients: Vec<Ingredient> },
}

impl FoodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FoodKind::Basic => "basic",
            FoodKind::Composite { .. } => "composite",
        }
    }
}

/// A food definition owned by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Food {
    name: String,
    keywords: Vec<String>,
    calories: u32,
    #[serde(flatten)]
    kind: FoodKind,
}

impl Food {
    /// Build a validated basic food
    pub fn basic(name: &str, keywords: Vec<String>, calories: u32) -> LedgerResult<Self> {
        let name = require_name(name)?;
        for keyword in &keywords {
            validate_keyword(keyword)?;
        }
        Ok(Self {
            name,
            keywords,
            calories,
            kind: FoodKind::Basic,
        })
    }

    /// Assemble a composite from already-resolved parts. Use
    /// [`build_composite`](super::build_composite) for validated construction.
    pub(crate) fn composite(
        name: String,
        keywords: Vec<String>,
        calories: u32,
        ingredients: Vec<Ingredient>,
    ) -> Self {
        Self {
            name,
            keywords,
            calories,
            kind: FoodKind::Composite { ingredients },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Calories per serving (a snapshot for composites)
    pub fn calories(&self) -> u32 {
        self.calories
    }

    pub fn kind(&self) -> &FoodKind {
        &self.kind
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.kind, FoodKind::Composite { .. })
    }

    /// Ingredient lines; empty for basic foods
    pub fn ingredients(&self) -> &[Ingredient] {
        match &self.kind {
            FoodKind::Basic => &[],
            FoodKind::Composite { ingredients } => ingredients,
        }
    }

    /// Exact, case-sensitive keyword match
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_food() {
        let food = Food::basic("Apple", vec!["fruit".into(), "Fruit".into()], 95).unwrap();
        assert_eq!(food.name(), "Apple");
        assert_eq!(food.calories(), 95);
        assert!(!food.is_composite());
        assert!(food.ingredients().is_empty());
        assert!(food.has_keyword("Fruit"));
        assert!(!food.has_keyword("FRUIT"));
        assert_eq!(food.kind().as_str(), "basic");
    }

    #[test]
    fn test_basic_food_rejects_bad_input() {
        assert!(Food::basic("", vec![], 10).is_err());
        assert!(Food::basic("Apple", vec!["a|b".into()], 10).is_err());
        assert!(Food::basic("Apple", vec!["".into()], 10).is_err());
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let food = Food::basic("Apple", vec!["fruit".into()], 95).unwrap();
        let json = serde_json::to_value(&food).unwrap();
        assert_eq!(json["kind"], "basic");
        assert_eq!(json["calories"], 95);
    }
}
