//! Database operations for expenses.
//!
//! Every query filters on the owning user so that one user can never read or
//! change another user's expenses.

use rusqlite::{Connection, Row, params};

use crate::{
    Error, UserID,
    expense::{Expense, ExpenseId, NewExpense},
};

/// Create an expense owned by `user_id` and return it with its generated ID.
///
/// # Errors
///
/// Returns [Error::InvalidCategory] if `new_expense.category_id` does not refer to a category.
pub fn create_expense(
    new_expense: NewExpense,
    user_id: UserID,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection.execute(
        "INSERT INTO expense (user_id, category_id, date, amount) VALUES (?1, ?2, ?3, ?4)",
        params![
            user_id.as_i64(),
            new_expense.category_id,
            new_expense.date,
            new_expense.amount
        ],
    )?;

    let id = connection.last_insert_rowid();

    Ok(Expense {
        id,
        user_id,
        date: new_expense.date,
        amount: new_expense.amount,
        category_id: new_expense.category_id,
    })
}

/// Retrieve the expense `expense_id` if it belongs to `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the expense does not exist or is owned by someone else.
pub fn get_expense(
    expense_id: ExpenseId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(
            "SELECT id, user_id, date, amount, category_id FROM expense
            WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &expense_id), (":user_id", &user_id.as_i64())],
            map_row,
        )
        .map_err(|error| error.into())
}

/// Overwrite the fields of the expense `expense_id` owned by `user_id`.
///
/// # Errors
///
/// Returns [Error::UpdateMissingExpense] if the expense does not exist or is owned by someone
/// else, or [Error::InvalidCategory] if the new category does not exist.
pub fn update_expense(
    expense_id: ExpenseId,
    user_id: UserID,
    expense: &NewExpense,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE expense SET date = ?1, amount = ?2, category_id = ?3
        WHERE id = ?4 AND user_id = ?5",
        params![
            expense.date,
            expense.amount,
            expense.category_id,
            expense_id,
            user_id.as_i64()
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingExpense);
    }

    Ok(())
}

/// Delete the expense `expense_id` owned by `user_id`.
///
/// # Errors
///
/// Returns [Error::DeleteMissingExpense] if the expense does not exist or is owned by someone else.
pub fn delete_expense(
    expense_id: ExpenseId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM expense WHERE id = ?1 AND user_id = ?2",
        (expense_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpense);
    }

    Ok(())
}

/// Initialize the expense table and indexes.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            category_id INTEGER NOT NULL REFERENCES category(id) ON DELETE RESTRICT,
            date TEXT NOT NULL,
            amount REAL NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_expense_user_date ON expense(user_id, date);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        date: row.get(2)?,
        amount: row.get(3)?,
        category_id: row.get(4)?,
    })
}
