//! Sets up the application database.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error,
    category::{create_category_table, seed_default_categories},
    expense::create_expense_table,
    user::create_user_table,
};

/// Create the tables for users, categories and expenses, and add the default categories.
///
/// Safe to call on a database that has already been initialized.
///
/// # Errors
///
/// Returns an [Error::SqlError] if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Must be set outside of a transaction, otherwise it is a no-op.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_category_table(&transaction)?;
    create_expense_table(&transaction)?;
    seed_default_categories(&transaction)?;

    transaction.commit()?;

    Ok(())
}
