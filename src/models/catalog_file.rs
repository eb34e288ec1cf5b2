//! Catalog text format
//!
//! One food per line, `|`-delimited:
//!
//! ```text
//! B|<name>|<calories>|<keyword>,<keyword>,...
//! C|<name>|<ingredient>,<servings>;<ingredient>,<servings>;...|<keyword>,...
//! ```
//!
//! Composite ingredients are resolved by name against foods that appear
//! earlier in the file. An ingredient that is not known yet is dropped from
//! its composite (lowering its calories) rather than failing the load.
//! Malformed lines are skipped.

use tracing::{info, warn};

use super::composite::resolve;
use super::{Catalog, Food, FoodKind, Ingredient, LoadReport};
use crate::error::{LedgerError, LedgerResult};
use crate::validation::{parse_non_negative_int, parse_positive_int, require_name};

const BASIC_TAG: &str = "B";
const COMPOSITE_TAG: &str = "C";

impl Catalog {
    /// Render the whole catalog in file format, one line per food
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (_, food) in self.iter() {
            match food.kind() {
                FoodKind::Basic => {
                    out.push_str(BASIC_TAG);
                    out.push('|');
                    out.push_str(food.name());
                    out.push('|');
                    out.push_str(&food.calories().to_string());
                }
                FoodKind::Composite { ingredients } => {
                    let lines: Vec<String> = ingredients
                        .iter()
                        .filter_map(|i| {
                            self.name_of(i.food)
                                .map(|name| format!("{},{}", name, i.servings))
                        })
                        .collect();
                    out.push_str(COMPOSITE_TAG);
                    out.push('|');
                    out.push_str(food.name());
                    out.push('|');
                    out.push_str(&lines.join(";"));
                }
            }
            out.push('|');
            out.push_str(&food.keywords().join(","));
            out.push('\n');
        }
        out
    }

    /// Parse file contents, skipping malformed lines
    pub fn deserialize(text: &str) -> (Catalog, LoadReport) {
        let mut catalog = Catalog::new();
        let mut report = LoadReport::default();

        for (i, raw) in text.lines().enumerate() {
            let line_no = i + 1;
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }

            match parse_line(&catalog, line, &mut report.dropped_ingredients) {
                Ok(food) => {
                    let added = if food.is_composite() {
                        catalog.add_composite_food(food)
                    } else {
                        catalog.add_food(food)
                    };
                    match added {
                        Ok(_) => report.loaded += 1,
                        Err(e) => {
                            warn!(line = line_no, error = %e, "skipping catalog line");
                            report.skipped_lines.push(line_no);
                        }
                    }
                }
                Err(e) => {
                    warn!(line = line_no, error = %e, "skipping malformed catalog line");
                    report.skipped_lines.push(line_no);
                }
            }
        }

        info!(
            foods = report.loaded,
            skipped = report.skipped_lines.len(),
            dropped_ingredients = report.dropped_ingredients.len(),
            "catalog parsed"
        );
        (catalog, report)
    }
}

fn parse_line(catalog: &Catalog, line: &str, dropped: &mut Vec<String>) -> LedgerResult<Food> {
    let fields: Vec<&str> = line.split('|').collect();
    if !(3..=4).contains(&fields.len()) {
        return Err(LedgerError::validation(format!(
            "expected 3 or 4 fields, found {}",
            fields.len()
        )));
    }
    let keywords = fields.get(3).map(|k| split_keywords(k)).unwrap_or_default();

    match fields[0] {
        BASIC_TAG => {
            let calories = parse_non_negative_int(fields[2])?;
            Food::basic(fields[1], keywords, calories)
        }
        COMPOSITE_TAG => {
            let name = require_name(fields[1])?;
            let ingredients = parse_ingredients(catalog, &name, fields[2], dropped)?;
            if ingredients.is_empty() {
                warn!(name = %name, "composite loaded without any resolvable ingredient");
            }
            resolve(catalog, name, ingredients, keywords)
        }
        other => Err(LedgerError::validation(format!(
            "unknown record type '{}'",
            other
        ))),
    }
}

fn parse_ingredients(
    catalog: &Catalog,
    composite: &str,
    field: &str,
    dropped: &mut Vec<String>,
) -> LedgerResult<Vec<Ingredient>> {
    let mut ingredients = Vec::new();
    for pair in field.split(';').filter(|p| !p.is_empty()) {
        let (name, servings) = pair.rsplit_once(',').ok_or_else(|| {
            LedgerError::validation(format!("ingredient '{}' has no servings", pair))
        })?;
        let servings = parse_positive_int(servings)?;

        match catalog.find_id(name) {
            Some(food) => ingredients.push(Ingredient { food, servings }),
            None => {
                warn!(
                    composite = %composite,
                    ingredient = %name,
                    "ingredient not defined earlier in file, dropping it"
                );
                dropped.push(name.to_string());
            }
        }
    }
    Ok(ingredients)
}

fn split_keywords(field: &str) -> Vec<String> {
    field
        .split(',')
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}
