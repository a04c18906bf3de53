//! Core expense domain types.

use time::Date;

use crate::{UserID, category::CategoryId};

/// Database identifier for an expense.
pub type ExpenseId = i64;

/// Money spent by a user on a given day.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// The user who recorded the expense. Only this user may see or change it.
    pub user_id: UserID,
    /// When the money was spent.
    pub date: Date,
    /// How much was spent, in dollars.
    pub amount: f64,
    /// The category the expense belongs to.
    pub category_id: CategoryId,
}

/// The fields needed to create or update an expense.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// When the money was spent.
    pub date: Date,
    /// How much was spent, in dollars.
    pub amount: f64,
    /// The category the expense belongs to.
    pub category_id: CategoryId,
}
