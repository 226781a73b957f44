// Copyright 2023 Remi Bernotavicius

use crate::auth::IdentityClaim;
use crate::database;
use crate::database::models::{Category, Ingredient, RecipeId, Technique};
use crate::error::Error;
use crate::lookup;
use diesel::ExpressionMethods as _;
use diesel::RunQueryDsl as _;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One recipe as submitted by a client, before any normalization. Field
/// names match the original JSON wire format; unknown per-ingredient keys
/// (`unit`, `substitutes`) are accepted and ignored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSubmission {
    pub name: String,
    pub serving_size: i32,
    pub difficulty: String,
    pub diet: String,
    pub prep_time: String,
    pub category: String,
    pub ingredients: Vec<IngredientEntry>,
    pub techniques: Vec<TechniqueEntry>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Deserialize)]
pub struct IngredientEntry {
    pub name: String,
}

#[derive(Deserialize)]
pub struct TechniqueEntry {
    pub name: String,
}

impl RecipeSubmission {
    fn validate(&self) -> Result<(), Error> {
        for (value, field) in [
            (&self.name, "name"),
            (&self.difficulty, "difficulty"),
            (&self.diet, "diet"),
            (&self.prep_time, "prepTime"),
            (&self.category, "category"),
        ] {
            if value.trim().is_empty() {
                return Err(Error::validation(format!("{field} is required")));
            }
        }
        if self.serving_size <= 0 {
            return Err(Error::validation("servingSize must be a positive integer"));
        }
        if self.ingredients.is_empty() {
            return Err(Error::validation("at least one ingredient is required"));
        }
        if self.techniques.is_empty() {
            return Err(Error::validation("at least one technique is required"));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeResponse {
    pub recipe_id: RecipeId,
    pub message: String,
}

/// Trims every name and keeps the first occurrence of each; repeating an
/// ingredient or technique within one submission yields a single link.
fn distinct_trimmed<'a>(names: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    names.map(str::trim).filter(|n| seen.insert(*n)).collect()
}

/// Commits one validated submission: category, recipe row and all link rows
/// land in a single transaction, so readers either see the whole recipe or
/// none of it. `submitter` must come from [`crate::auth::authenticate`];
/// requiring it here keeps unauthenticated writes unrepresentable.
pub fn create_recipe(
    conn: &mut database::Connection,
    submitter: &IdentityClaim,
    submission: &RecipeSubmission,
) -> Result<CreateRecipeResponse, Error> {
    submission.validate()?;

    let new_recipe_id = conn.immediate_transaction(|conn| -> Result<RecipeId, Error> {
        let resolved_category = lookup::resolve::<Category>(conn, &submission.category)?;

        {
            use database::schema::recipes::dsl::*;
            diesel::insert_into(recipes)
                .values((
                    name.eq(submission.name.trim()),
                    serving_size.eq(submission.serving_size),
                    difficulty.eq(&submission.difficulty),
                    diet.eq(&submission.diet),
                    prep_time.eq(&submission.prep_time),
                    source.eq(submission
                        .source
                        .as_deref()
                        .map(str::trim)
                        .filter(|s| !s.is_empty())),
                    category_id.eq(resolved_category),
                ))
                .execute(conn)?;
        }
        let new_recipe_id = RecipeId::from(database::last_insert_id(conn)?);

        for entry in distinct_trimmed(submission.ingredients.iter().map(|i| i.name.as_str())) {
            let resolved = lookup::resolve::<Ingredient>(conn, entry)?;

            use database::schema::recipe_ingredients::dsl::*;
            diesel::insert_into(recipe_ingredients)
                .values((recipe_id.eq(new_recipe_id), ingredient_id.eq(resolved)))
                .execute(conn)?;
        }

        for entry in distinct_trimmed(submission.techniques.iter().map(|t| t.name.as_str())) {
            let resolved = lookup::resolve::<Technique>(conn, entry)?;

            use database::schema::recipe_techniques::dsl::*;
            diesel::insert_into(recipe_techniques)
                .values((recipe_id.eq(new_recipe_id), technique_id.eq(resolved)))
                .execute(conn)?;
        }

        Ok(new_recipe_id)
    })?;

    log::info!(
        "{} created recipe {new_recipe_id} ({:?})",
        submitter.username,
        submission.name.trim()
    );
    Ok(CreateRecipeResponse {
        recipe_id: new_recipe_id,
        message: "Recipe created successfully!".into(),
    })
}
