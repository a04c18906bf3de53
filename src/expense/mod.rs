//! Recording, listing, editing and deleting a user's expenses.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod form;
mod list;
mod path;

pub use create::{create_expense_endpoint, get_new_expense_page};
pub use db::{create_expense, create_expense_table, delete_expense, get_expense, update_expense};
pub use delete::{delete_expense_endpoint, get_delete_expense_page};
pub use domain::{Expense, ExpenseId, NewExpense};
pub use edit::{get_edit_expense_page, update_expense_endpoint};
pub use list::get_expenses_page;
