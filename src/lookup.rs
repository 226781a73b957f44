// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{
    Category, CategoryId, Ingredient, IngredientId, Technique, TechniqueId,
};
use crate::error::Error;
use diesel::prelude::OptionalExtension as _;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::ExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;

/// A deduplicated reference table keyed by unique name. Rows are append-only;
/// nothing ever updates or deletes them through this interface.
pub trait Lookup {
    type Id: Copy;
    const KIND: &'static str;

    fn find_by_name(conn: &mut database::Connection, target: &str)
        -> diesel::QueryResult<Option<Self::Id>>;
    fn insert_name(conn: &mut database::Connection, new_name: &str) -> diesel::QueryResult<usize>;
}

impl Lookup for Category {
    type Id = CategoryId;
    const KIND: &'static str = "category";

    fn find_by_name(
        conn: &mut database::Connection,
        target: &str,
    ) -> diesel::QueryResult<Option<CategoryId>> {
        use database::schema::categories::dsl::*;
        categories
            .select(id)
            .filter(name.eq(target))
            .get_result(conn)
            .optional()
    }

    fn insert_name(conn: &mut database::Connection, new_name: &str) -> diesel::QueryResult<usize> {
        use database::schema::categories::dsl::*;
        diesel::insert_into(categories)
            .values(name.eq(new_name))
            .execute(conn)
    }
}

impl Lookup for Ingredient {
    type Id = IngredientId;
    const KIND: &'static str = "ingredient";

    fn find_by_name(
        conn: &mut database::Connection,
        target: &str,
    ) -> diesel::QueryResult<Option<IngredientId>> {
        use database::schema::ingredients::dsl::*;
        ingredients
            .select(id)
            .filter(name.eq(target))
            .get_result(conn)
            .optional()
    }

    fn insert_name(conn: &mut database::Connection, new_name: &str) -> diesel::QueryResult<usize> {
        use database::schema::ingredients::dsl::*;
        diesel::insert_into(ingredients)
            .values(name.eq(new_name))
            .execute(conn)
    }
}

impl Lookup for Technique {
    type Id = TechniqueId;
    const KIND: &'static str = "technique";

    fn find_by_name(
        conn: &mut database::Connection,
        target: &str,
    ) -> diesel::QueryResult<Option<TechniqueId>> {
        use database::schema::techniques::dsl::*;
        techniques
            .select(id)
            .filter(name.eq(target))
            .get_result(conn)
            .optional()
    }

    fn insert_name(conn: &mut database::Connection, new_name: &str) -> diesel::QueryResult<usize> {
        use database::schema::techniques::dsl::*;
        diesel::insert_into(techniques)
            .values(name.eq(new_name))
            .execute(conn)
    }
}

/// Returns the id of the row named `raw_name` (surrounding whitespace
/// ignored), creating the row if it does not exist yet.
///
/// The name columns carry a UNIQUE constraint, so two connections racing to
/// create the same name leave exactly one row behind; the loser's insert
/// fails with a unique violation and we re-read the winner's id instead of
/// surfacing the conflict.
pub fn resolve<E: Lookup>(
    conn: &mut database::Connection,
    raw_name: &str,
) -> Result<E::Id, Error> {
    let target = raw_name.trim();
    if target.is_empty() {
        return Err(Error::EmptyName(E::KIND));
    }

    let storage = |source| Error::ReferenceResolution {
        kind: E::KIND,
        source,
    };

    if let Some(existing) = E::find_by_name(conn, target).map_err(storage)? {
        return Ok(existing);
    }

    match E::insert_name(conn, target) {
        Ok(_) => {}
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            log::info!("lost find-or-create race for {} {target:?}", E::KIND);
        }
        Err(source) => return Err(storage(source)),
    }

    E::find_by_name(conn, target)
        .map_err(storage)?
        .ok_or_else(|| storage(DieselError::NotFound))
}
