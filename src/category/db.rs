use std::collections::HashMap;

use rusqlite::{Connection, Row};

use crate::{
    Error, UserID,
    category::{Category, CategoryId, CategoryName},
};

/// The categories every new database starts with.
pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "Food",
    "Transport",
    "Housing",
    "Utilities",
    "Entertainment",
    "Health",
    "Shopping",
    "Other",
];

/// # Errors
///
/// [Error::DuplicateCategoryName] if the name is taken.
pub fn create_category(name: CategoryName, connection: &Connection) -> Result<Category, Error> {
    let id = connection.query_row(
        "INSERT INTO category (name) VALUES (?1) RETURNING id",
        (name.as_ref(),),
        |row| row.get(0),
    )?;

    Ok(Category { id, name })
}

/// # Errors
///
/// [Error::NotFound] if no category has `category_id`.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    let category = connection.query_row(
        "SELECT id, name FROM category WHERE id = ?1",
        (category_id,),
        category_from_row,
    )?;

    Ok(category)
}

/// Every category, A to Z.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    let mut statement = connection.prepare("SELECT id, name FROM category ORDER BY name")?;
    let categories = statement
        .query_map((), category_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(categories)
}

/// How many of `user_id`'s expenses are in each category.
///
/// Categories the user has not used are left out.
pub(super) fn count_expenses_per_category(
    user_id: UserID,
    connection: &Connection,
) -> Result<HashMap<CategoryId, u32>, Error> {
    let mut statement = connection.prepare(
        "SELECT category_id, COUNT(*) FROM expense WHERE user_id = ?1 GROUP BY category_id",
    )?;
    let counts = statement
        .query_map((user_id.as_i64(),), |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<HashMap<_, _>, _>>()?;

    Ok(counts)
}

pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )",
        (),
    )?;

    Ok(())
}

/// Insert whichever of [DEFAULT_CATEGORIES] are missing.
pub fn seed_default_categories(connection: &Connection) -> Result<(), rusqlite::Error> {
    let mut statement = connection.prepare("INSERT OR IGNORE INTO category (name) VALUES (?1)")?;

    for name in DEFAULT_CATEGORIES {
        statement.execute((name,))?;
    }

    Ok(())
}

fn category_from_row(row: &Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        name: CategoryName::new_unchecked(&row.get::<_, String>(1)?),
    })
}
