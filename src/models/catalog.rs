//! Food catalog
//!
//! Arena-backed, append-only store of food definitions. Insertion order is
//! display order. Duplicate names are allowed; name lookups return the
//! first match.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Food, FoodId};
use crate::error::{LedgerError, LedgerResult};

/// How multiple search keywords combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// A food qualifies if it has at least one of the keywords
    #[default]
    Any,
    /// A food qualifies only if it has every keyword
    All,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Any => "any",
            MatchMode::All => "all",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "any" | "or" => Some(MatchMode::Any),
            "all" | "and" => Some(MatchMode::All),
            _ => None,
        }
    }
}

/// Row of a catalog listing
#[derive(Debug, Clone, Serialize)]
pub struct FoodListing {
    pub index: usize,
    pub name: String,
    pub calories: u32,
    pub is_composite: bool,
    pub keywords: Vec<String>,
}

impl FoodListing {
    fn new(id: FoodId, food: &Food) -> Self {
        Self {
            index: id.index(),
            name: food.name().to_string(),
            calories: food.calories(),
            is_composite: food.is_composite(),
            keywords: food.keywords().to_vec(),
        }
    }
}

/// The food catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    foods: Vec<Food>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    /// Append a basic food. No uniqueness check is made.
    pub fn add_food(&mut self, food: Food) -> LedgerResult<FoodId> {
        if food.is_composite() {
            return Err(LedgerError::validation(format!(
                "'{}' is a composite food; use add_composite_food",
                food.name()
            )));
        }
        Ok(self.push(food))
    }

    /// Append a fully built composite food.
    ///
    /// Every ingredient must already be in the catalog. Since a new entry can
    /// only reference earlier entries, a composite can never contain itself,
    /// directly or through nested composites.
    pub fn add_composite_food(&mut self, food: Food) -> LedgerResult<FoodId> {
        if !food.is_composite() {
            return Err(LedgerError::validation(format!(
                "'{}' is a basic food; use add_food",
                food.name()
            )));
        }
        let next = self.foods.len();
        if let Some(bad) = food.ingredients().iter().find(|i| i.food.index() >= next) {
            return Err(LedgerError::validation(format!(
                "Composite '{}' references food index {} which is not in the catalog",
                food.name(),
                bad.food.index()
            )));
        }
        Ok(self.push(food))
    }

    fn push(&mut self, food: Food) -> FoodId {
        let id = FoodId::new(self.foods.len());
        info!(
            index = id.index(),
            name = %food.name(),
            calories = food.calories(),
            kind = food.kind().as_str(),
            "added food to catalog"
        );
        self.foods.push(food);
        id
    }

    pub fn get(&self, id: FoodId) -> Option<&Food> {
        self.foods.get(id.index())
    }

    /// Look up by display index
    pub fn id_at(&self, index: usize) -> Option<FoodId> {
        (index < self.foods.len()).then(|| FoodId::new(index))
    }

    /// First food whose name equals `name` exactly
    pub fn search_one_food(&self, name: &str) -> Option<&Food> {
        self.find_id(name).and_then(|id| self.get(id))
    }

    /// Id of the first food whose name equals `name` exactly
    pub fn find_id(&self, name: &str) -> Option<FoodId> {
        self.foods
            .iter()
            .position(|f| f.name() == name)
            .map(FoodId::new)
    }

    /// Keyword search with exact, case-sensitive matching.
    ///
    /// An empty keyword list matches every food regardless of mode.
    pub fn search_by_keywords<S: AsRef<str>>(
        &self,
        keywords: &[S],
        mode: MatchMode,
    ) -> Vec<(FoodId, &Food)> {
        self.iter()
            .filter(|(_, food)| {
                if keywords.is_empty() {
                    return true;
                }
                match mode {
                    MatchMode::Any => keywords.iter().any(|k| food.has_keyword(k.as_ref())),
                    MatchMode::All => keywords.iter().all(|k| food.has_keyword(k.as_ref())),
                }
            })
            .collect()
    }

    /// Every food in display order with its basic/composite flag
    pub fn list_all(&self) -> Vec<FoodListing> {
        self.iter().map(|(id, food)| FoodListing::new(id, food)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FoodId, &Food)> {
        self.foods
            .iter()
            .enumerate()
            .map(|(i, food)| (FoodId::new(i), food))
    }

    /// Name of the food an ingredient points at
    pub fn name_of(&self, id: FoodId) -> Option<&str> {
        self.get(id).map(Food::name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{build_composite, Ingredient};

    fn food(name: &str, keywords: &[&str], calories: u32) -> Food {
        Food::basic(name, keywords.iter().map(|k| k.to_string()).collect(), calories).unwrap()
    }

    fn sample() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.add_food(food("Apple", &["fruit", "sweet"], 95)).unwrap();
        catalog.add_food(food("Bread", &["bread", "carbs"], 80)).unwrap();
        catalog.add_food(food("Cake", &["sweet", "carbs", "dessert"], 350)).unwrap();
        catalog
    }

    fn names(results: Vec<(FoodId, &Food)>) -> Vec<String> {
        results.into_iter().map(|(_, f)| f.name().to_string()).collect()
    }

    #[test]
    fn test_add_then_lookup() {
        let mut catalog = Catalog::new();
        let original = food("Apple", &["fruit", "Fruit"], 95);
        catalog.add_food(original.clone()).unwrap();

        let found = catalog.search_one_food("Apple").unwrap();
        assert_eq!(found, &original);
        assert!(catalog.search_one_food("apple").is_none());
        assert!(catalog.search_one_food("Pear").is_none());
    }

    #[test]
    fn test_duplicate_names_first_match_wins() {
        let mut catalog = Catalog::new();
        catalog.add_food(food("Milk", &["dairy"], 100)).unwrap();
        catalog.add_food(food("Milk", &["dairy"], 150)).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.search_one_food("Milk").unwrap().calories(), 100);
    }

    #[test]
    fn test_search_any() {
        let catalog = sample();
        let results = catalog.search_by_keywords(&["sweet", "bread"], MatchMode::Any);
        assert_eq!(names(results), vec!["Apple", "Bread", "Cake"]);

        let results = catalog.search_by_keywords(&["dessert"], MatchMode::Any);
        assert_eq!(names(results), vec!["Cake"]);
    }

    #[test]
    fn test_search_all() {
        let catalog = sample();
        let results = catalog.search_by_keywords(&["sweet", "carbs"], MatchMode::All);
        assert_eq!(names(results), vec!["Cake"]);

        let results = catalog.search_by_keywords(&["sweet", "bread"], MatchMode::All);
        assert!(results.is_empty());
    }

    #[test]
    fn test_search_is_exact() {
        let catalog = sample();
        assert!(catalog.search_by_keywords(&["Sweet"], MatchMode::Any).is_empty());
        assert!(catalog.search_by_keywords(&[" sweet"], MatchMode::Any).is_empty());
    }

    #[test]
    fn test_empty_keywords_match_everything() {
        let catalog = sample();
        let empty: [&str; 0] = [];
        assert_eq!(catalog.search_by_keywords(&empty, MatchMode::Any).len(), 3);
        assert_eq!(catalog.search_by_keywords(&empty, MatchMode::All).len(), 3);
    }

    #[test]
    fn test_list_all_flags_composites() {
        let mut catalog = sample();
        let apple = catalog.find_id("Apple").unwrap();
        let pie = build_composite(
            &catalog,
            "Apple Pie",
            vec![Ingredient { food: apple, servings: 4 }],
            vec![],
        )
        .unwrap();
        catalog.add_composite_food(pie).unwrap();

        let listing = catalog.list_all();
        assert_eq!(listing.len(), 4);
        assert!(!listing[0].is_composite);
        assert!(listing[3].is_composite);
        assert_eq!(listing[3].index, 3);
        assert_eq!(listing[3].calories, 380);
    }

    #[test]
    fn test_add_food_kind_checks() {
        let mut catalog = sample();
        let apple = catalog.find_id("Apple").unwrap();
        let pie = build_composite(
            &catalog,
            "Apple Pie",
            vec![Ingredient { food: apple, servings: 1 }],
            vec![],
        )
        .unwrap();
        assert!(catalog.add_food(pie).is_err());
        assert!(catalog.add_composite_food(food("Pear", &[], 50)).is_err());
    }

    #[test]
    fn test_composite_must_reference_existing_entries() {
        let mut other = sample();
        other.add_food(food("Extra", &[], 1)).unwrap();
        let extra = other.find_id("Extra").unwrap();
        let dangling = build_composite(
            &other,
            "Dangling",
            vec![Ingredient { food: extra, servings: 1 }],
            vec![],
        )
        .unwrap();

        let mut catalog = sample();
        assert!(matches!(
            catalog.add_composite_food(dangling),
            Err(LedgerError::Validation(_))
        ));
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_match_mode_parse() {
        assert_eq!(MatchMode::parse("ALL"), Some(MatchMode::All));
        assert_eq!(MatchMode::parse("any"), Some(MatchMode::Any));
        assert_eq!(MatchMode::parse("some"), None);
    }
}
