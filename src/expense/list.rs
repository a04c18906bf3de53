//! The expense list, the home page of the app.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error, UserID,
    category::CategoryName,
    endpoints::{self, format_endpoint},
    expense::ExpenseId,
    html::{
        CATEGORY_BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
    },
    navigation::NavBar,
};

/// The state needed for the expense list.
#[derive(Debug, Clone)]
pub struct ExpensesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpensesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// An expense joined with the name of its category.
#[derive(Debug, Clone, PartialEq)]
struct ExpenseRow {
    id: ExpenseId,
    date: Date,
    amount: f64,
    category: CategoryName,
}

/// Render the logged in user's expenses, newest first.
pub async fn get_expenses_page(
    State(state): State<ExpensesPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expenses = get_expense_rows(user_id, &connection)
        .inspect_err(|error| tracing::error!("Could not get expenses for {user_id}: {error}"))?;

    Ok(expenses_view(&expenses).into_response())
}

fn get_expense_rows(user_id: UserID, connection: &Connection) -> Result<Vec<ExpenseRow>, Error> {
    connection
        .prepare(
            "SELECT expense.id, expense.date, expense.amount, category.name
            FROM expense
            INNER JOIN category ON category.id = expense.category_id
            WHERE expense.user_id = :user_id
            ORDER BY expense.date DESC, expense.id DESC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], |row| {
            let raw_category: String = row.get(3)?;

            Ok(ExpenseRow {
                id: row.get(0)?,
                date: row.get(1)?,
                amount: row.get(2)?,
                category: CategoryName::new_unchecked(&raw_category),
            })
        })?
        .map(|maybe_row| maybe_row.map_err(Error::from))
        .collect()
}

fn expenses_view(expenses: &[ExpenseRow]) -> Markup {
    let nav_bar = NavBar::new(endpoints::EXPENSES_VIEW).into_html();

    let table_row = |expense: &ExpenseRow| {
        let edit_url = format_endpoint(endpoints::EDIT_EXPENSE_VIEW, expense.id);
        let delete_url = format_endpoint(endpoints::DELETE_EXPENSE_VIEW, expense.id);

        html!(
            tr class=(TABLE_ROW_STYLE) data-expense-id=(expense.id)
            {
                td class=(TABLE_CELL_STYLE) { (expense.date) }

                td class=(TABLE_CELL_STYLE)
                {
                    span class=(CATEGORY_BADGE_STYLE) { (expense.category) }
                }

                td class={(TABLE_CELL_STYLE) " text-right"} { (format_currency(expense.amount)) }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        a href=(edit_url) class=(LINK_STYLE) { "Edit" }
                        a href=(delete_url) class=(LINK_STYLE) { "Delete" }
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Expenses" }

                    a href=(endpoints::NEW_EXPENSE_VIEW) class=(LINK_STYLE) { "Add Expense" }
                }

                table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for expense in expenses {
                            (table_row(expense))
                        }

                        @if expenses.is_empty() {
                            tr
                            {
                                td
                                    colspan="4"
                                    class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                {
                                    "No expenses recorded yet. "
                                    a href=(endpoints::NEW_EXPENSE_VIEW) class=(LINK_STYLE)
                                    {
                                        "Add your first expense"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Expenses", &[], &content)
}
