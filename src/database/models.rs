// Copyright 2023 Remi Bernotavicius

use derive_more::Display;
use diesel::associations::{Associations, Identifiable};
use diesel::deserialize::Queryable;
use diesel::expression::Selectable;
use diesel_derive_newtype::DieselNewType;
use serde::Serialize;

#[derive(DieselNewType, Display, Debug, Hash, PartialEq, Eq, Copy, Clone, Serialize)]
pub struct UserId(i32);

impl From<i32> for UserId {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl From<UserId> for i32 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

#[derive(Queryable, Selectable, Identifiable, Clone)]
#[diesel(table_name = crate::database::schema::users)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub diet: String,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(DieselNewType, Display, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct CategoryId(i32);

#[derive(Queryable, Selectable, Identifiable, Clone)]
#[diesel(table_name = crate::database::schema::categories)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

#[derive(DieselNewType, Display, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct IngredientId(i32);

#[derive(Queryable, Selectable, Identifiable, Clone)]
#[diesel(table_name = crate::database::schema::ingredients)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
}

#[derive(DieselNewType, Display, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct TechniqueId(i32);

#[derive(Queryable, Selectable, Identifiable, Clone)]
#[diesel(table_name = crate::database::schema::techniques)]
pub struct Technique {
    pub id: TechniqueId,
    pub name: String,
}

#[derive(DieselNewType, Display, Debug, Hash, PartialEq, Eq, Copy, Clone, Serialize)]
pub struct RecipeId(i32);

impl From<i32> for RecipeId {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

#[derive(Associations, Queryable, Selectable, Identifiable, Clone)]
#[diesel(belongs_to(Category))]
#[diesel(table_name = crate::database::schema::recipes)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub serving_size: i32,
    pub difficulty: String,
    pub diet: String,
    pub prep_time: String,
    pub source: Option<String>,
    pub category_id: CategoryId,
}

#[derive(Associations, Queryable, Selectable, Identifiable, Clone)]
#[diesel(belongs_to(Recipe))]
#[diesel(belongs_to(Ingredient))]
#[diesel(primary_key(recipe_id, ingredient_id))]
#[diesel(table_name = crate::database::schema::recipe_ingredients)]
pub struct RecipeIngredient {
    pub recipe_id: RecipeId,
    pub ingredient_id: IngredientId,
}

#[derive(Associations, Queryable, Selectable, Identifiable, Clone)]
#[diesel(belongs_to(Recipe))]
#[diesel(belongs_to(Technique))]
#[diesel(primary_key(recipe_id, technique_id))]
#[diesel(table_name = crate::database::schema::recipe_techniques)]
pub struct RecipeTechnique {
    pub recipe_id: RecipeId,
    pub technique_id: TechniqueId,
}
