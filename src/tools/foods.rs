//! Food Catalog Tools
//!
//! Tools for adding, browsing and searching catalog foods.

use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Food, FoodId, FoodListing, MatchMode};
use crate::session::{FileSaveResult, FoodRef, Session};

/// Response for add_basic_food / create_composite_food
#[derive(Debug, Serialize)]
pub struct AddFoodResponse {
    pub index: usize,
    pub name: String,
    pub calories: u32,
    pub is_composite: bool,
    pub keywords: Vec<String>,
}

impl AddFoodResponse {
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

/// Ingredient line in a food detail view
#[derive(Debug, Serialize)]
pub struct IngredientDetail {
    pub index: usize,
    pub name: String,
    pub servings: u32,
    pub calories_per_serving: u32,
}

/// Full food detail response
#[derive(Debug, Serialize)]
pub struct FoodDetail {
    pub index: usize,
    pub name: String,
    pub kind: &'static str,
    pub calories: u32,
    pub keywords: Vec<String>,
    pub ingredients: Vec<IngredientDetail>,
}

/// Response for list_foods and search_foods
#[derive(Debug, Serialize)]
pub struct FoodListResponse {
    pub items: Vec<FoodListing>,
    pub total: usize,
}

/// Add a basic food
pub fn add_basic_food(
    session: &mut Session,
    name: &str,
    calories: u32,
    keywords: Vec<String>,
) -> LedgerResult<AddFoodResponse> {
    let id = session.add_basic_food(name, calories, keywords)?;
    added(session, id)
}

/// Create a composite food from `(ingredient, servings)` pairs
pub fn create_composite_food(
    session: &mut Session,
    name: &str,
    ingredients: Vec<(FoodRef, u32)>,
    keywords: Vec<String>,
) -> LedgerResult<AddFoodResponse> {
    let id = session.create_composite_food(name, ingredients, keywords)?;
    added(session, id)
}

fn added(session: &Session, id: FoodId) -> LedgerResult<AddFoodResponse> {
    let food = session
        .catalog
        .get(id)
        .ok_or_else(|| LedgerError::not_found(format!("No food at catalog index {}", id.index())))?;
    Ok(AddFoodResponse::new(id, food))
}

/// Get one food by exact name or by index
pub fn get_food(session: &Session, food: &FoodRef) -> LedgerResult<FoodDetail> {
    let id = session.resolve_ref(food)?;
    let food = session
        .catalog
        .get(id)
        .ok_or_else(|| LedgerError::not_found(format!("No food at catalog index {}", id.index())))?;

    let ingredients = food
        .ingredients()
        .iter()
        .filter_map(|ingredient| {
            session.catalog.get(ingredient.food).map(|f| IngredientDetail {
                index: ingredient.food.index(),
                name: f.name().to_string(),
                servings: ingredient.servings,
                calories_per_serving: f.calories(),
            })
        })
        .collect();

    Ok(FoodDetail {
        index: id.index(),
        name: food.name().to_string(),
        kind: food.kind().as_str(),
        calories: food.calories(),
        keywords: food.keywords().to_vec(),
        ingredients,
    })
}

/// Search foods by keywords. An empty list returns every food.
pub fn search_foods(session: &Session, keywords: &[String], mode: MatchMode) -> FoodListResponse {
    let all = session.catalog.list_all();
    let items: Vec<FoodListing> = session
        .catalog
        .search_by_keywords(keywords, mode)
        .into_iter()
        .filter_map(|(id, _)| all.get(id.index()).cloned())
        .collect();
    let total = items.len();
    FoodListResponse { items, total }
}

/// List every food in display order
pub fn list_foods(session: &Session) -> FoodListResponse {
    let items = session.catalog.list_all();
    let total = items.len();
    FoodListResponse { items, total }
}

/// Write the food database file
pub fn save_food_database(session: &Session) -> FileSaveResult {
    let path = session.config().catalog_path().display().to_string();
    match session.save_catalog() {
        Ok(_) => FileSaveResult { path, saved: true, error: None },
        Err(e) => FileSaveResult { path, saved: false, error: Some(e.to_string()) },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn session() -> (tempfile::TempDir, Session) {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(Config::with_data_dir(dir.path()));
        add_basic_food(&mut session, "Bread", 80, vec!["bread".into(), "carbs".into()]).unwrap();
        add_basic_food(&mut session, "Jam", 50, vec!["sweet".into()]).unwrap();
        (dir, session)
    }

    #[test]
    fn test_create_and_get_composite() {
        let (_dir, mut session) = session();
        let created = create_composite_food(
            &mut session,
            "Jam Toast",
            vec![(FoodRef::Index(0), 2), (FoodRef::Name("Jam".into()), 1)],
            vec![],
        )
        .unwrap();
        assert_eq!(created.index, 2);
        assert_eq!(created.calories, 210);
        assert!(created.is_composite);

        let detail = get_food(&session, &FoodRef::Name("Jam Toast".into())).unwrap();
        assert_eq!(detail.kind, "composite");
        assert_eq!(detail.ingredients.len(), 2);
        assert_eq!(detail.ingredients[0].name, "Bread");
        assert_eq!(detail.ingredients[0].servings, 2);
    }

    #[test]
    fn test_search_and_list() {
        let (_dir, session) = session();
        let found = search_foods(&session, &["sweet".to_string()], MatchMode::Any);
        assert_eq!(found.total, 1);
        assert_eq!(found.items[0].name, "Jam");

        assert_eq!(search_foods(&session, &[], MatchMode::All).total, 2);
        assert_eq!(list_foods(&session).total, 2);
    }

    #[test]
    fn test_get_unknown_food() {
        let (_dir, session) = session();
        assert!(matches!(
            get_food(&session, &FoodRef::Name("Butter".into())),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn test_save_food_database() {
        let (_dir, session) = session();
        let result = save_food_database(&session);
        assert!(result.saved);
        let text = std::fs::read_to_string(session.config().catalog_path()).unwrap();
        assert!(text.starts_with("B|Bread|80|bread,carbs\n"));
    }
}
