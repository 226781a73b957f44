// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{Recipe, RecipeId};
use crate::error::Error;
use diesel::expression_methods::TextExpressionMethods as _;
use diesel::BoolExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;
use serde::Serialize;

/// One recipe joined to its category, in the shape the original clients
/// expect. `source` is omitted from the JSON when absent. No ordering is
/// guaranteed beyond whatever the storage returns.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub name: String,
    pub serving_size: i32,
    pub difficulty: String,
    pub diet: String,
    pub prep_time: String,
    pub category_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl RecipeSummary {
    fn from_row((recipe, category_name): (Recipe, String)) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            serving_size: recipe.serving_size,
            difficulty: recipe.difficulty,
            diet: recipe.diet,
            prep_time: recipe.prep_time,
            category_name,
            source: recipe.source,
        }
    }
}

pub fn list_recipes(conn: &mut database::Connection) -> Result<Vec<RecipeSummary>, Error> {
    use database::schema::{categories, recipes};

    let rows: Vec<(Recipe, String)> = recipes::table
        .inner_join(categories::table)
        .select((Recipe::as_select(), categories::name))
        .load(conn)?;
    Ok(rows.into_iter().map(RecipeSummary::from_row).collect())
}

/// Case-insensitive substring match against recipe name or category name.
pub fn search_recipes(
    conn: &mut database::Connection,
    term: &str,
) -> Result<Vec<RecipeSummary>, Error> {
    let term = term.trim();
    if term.is_empty() {
        return Err(Error::validation("search term is required"));
    }

    use database::schema::{categories, recipes};

    let pattern = format!("%{term}%");
    let rows: Vec<(Recipe, String)> = recipes::table
        .inner_join(categories::table)
        .filter(
            recipes::name
                .like(pattern.clone())
                .or(categories::name.like(pattern)),
        )
        .select((Recipe::as_select(), categories::name))
        .load(conn)?;
    Ok(rows.into_iter().map(RecipeSummary::from_row).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::IdentityClaim;
    use crate::database::models::UserId;
    use crate::error::Classification;
    use crate::recipes::{
        create_recipe, IngredientEntry, RecipeSubmission, TechniqueEntry,
    };
    use maplit::hashset;
    use std::collections::HashSet;

    fn submitter() -> IdentityClaim {
        IdentityClaim {
            user_id: UserId::from(1),
            username: "alice".into(),
        }
    }

    fn submission(name: &str, category: &str, source: Option<&str>) -> RecipeSubmission {
        RecipeSubmission {
            name: name.into(),
            serving_size: 2,
            difficulty: "Easy".into(),
            diet: "Veg".into(),
            prep_time: "20m".into(),
            category: category.into(),
            ingredients: vec![IngredientEntry {
                name: "Pasta".into(),
            }],
            techniques: vec![TechniqueEntry {
                name: "Boil".into(),
            }],
            source: source.map(Into::into),
        }
    }

    fn seeded_connection() -> database::Connection {
        let mut conn = database::connection_for_testing();
        create_recipe(&mut conn, &submitter(), &submission("Pasta", "Italian", None)).unwrap();
        create_recipe(
            &mut conn,
            &submitter(),
            &submission("Tacos", "Mexican", Some("family cookbook")),
        )
        .unwrap();
        conn
    }

    fn names(results: &[RecipeSummary]) -> HashSet<String> {
        results.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn list_returns_every_recipe_with_its_category() {
        let mut conn = seeded_connection();

        let all = list_recipes(&mut conn).unwrap();
        assert_eq!(names(&all), hashset! {"Pasta".into(), "Tacos".into()});

        let categories: HashSet<String> =
            all.iter().map(|r| r.category_name.clone()).collect();
        assert_eq!(categories, hashset! {"Italian".into(), "Mexican".into()});
    }

    #[test]
    fn search_matches_category_substring() {
        let mut conn = seeded_connection();

        let results = search_recipes(&mut conn, "Italian").unwrap();
        assert_eq!(names(&results), hashset! {"Pasta".into()});
    }

    #[test]
    fn search_matches_recipe_name_substring() {
        let mut conn = seeded_connection();

        let results = search_recipes(&mut conn, "aco").unwrap();
        assert_eq!(names(&results), hashset! {"Tacos".into()});
    }

    #[test]
    fn search_is_case_insensitive() {
        let mut conn = seeded_connection();

        let results = search_recipes(&mut conn, "italian").unwrap();
        assert_eq!(names(&results), hashset! {"Pasta".into()});

        let results = search_recipes(&mut conn, "PASTA").unwrap();
        assert_eq!(names(&results), hashset! {"Pasta".into()});
    }

    #[test]
    fn search_with_no_match_is_empty() {
        let mut conn = seeded_connection();

        let results = search_recipes(&mut conn, "Szechuan").unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn blank_term_is_rejected() {
        let mut conn = seeded_connection();

        let err = search_recipes(&mut conn, "   ").unwrap_err();
        assert_eq!(err.classification(), Classification::Validation);
    }

    #[test]
    fn source_is_omitted_from_json_when_absent() {
        let mut conn = seeded_connection();

        let all = list_recipes(&mut conn).unwrap();
        let pasta = all.iter().find(|r| r.name == "Pasta").unwrap();
        let tacos = all.iter().find(|r| r.name == "Tacos").unwrap();

        let pasta_json = serde_json::to_value(pasta).unwrap();
        assert!(pasta_json.get("source").is_none());
        assert!(pasta_json.get("servingSize").is_some());

        let tacos_json = serde_json::to_value(tacos).unwrap();
        assert_eq!(tacos_json["source"], "family cookbook");
    }
}
