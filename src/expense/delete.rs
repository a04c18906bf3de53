//! The confirmation page and endpoint for deleting an expense.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, UserID,
    category::{CategoryName, get_category},
    endpoints::{self, format_endpoint},
    expense::{Expense, delete_expense, get_expense, path::ExpensePath},
    html::{
        BUTTON_DELETE_STYLE, CATEGORY_BADGE_STYLE, FORM_CONTAINER_STYLE, base, format_currency,
        link,
    },
    navigation::NavBar,
};

/// The state needed for deleting an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Ask the user to confirm deleting one of their expenses.
///
/// This page never modifies the expense.
pub async fn get_delete_expense_page(
    State(state): State<DeleteExpenseState>,
    Extension(user_id): Extension<UserID>,
    ExpensePath(expense_id): ExpensePath,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = get_expense(expense_id, user_id, &connection)?;
    let category = get_category(expense.category_id, &connection).inspect_err(|error| {
        tracing::error!("Could not get category for expense {expense_id}: {error}")
    })?;

    Ok(delete_expense_view(&expense, &category.name).into_response())
}

/// Delete the expense and redirect to the expense list.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteExpenseState>,
    Extension(user_id): Extension<UserID>,
    ExpensePath(expense_id): ExpensePath,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_expense(expense_id, user_id, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::DeleteMissingExpense) => Error::DeleteMissingExpense.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting expense {expense_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn delete_expense_view(expense: &Expense, category_name: &CategoryName) -> Markup {
    let nav_bar = NavBar::new(endpoints::DELETE_EXPENSE_VIEW).into_html();
    let delete_url = format_endpoint(endpoints::DELETE_EXPENSE_VIEW, expense.id);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Delete Expense" }

            p class="mb-4"
            {
                "Are you sure you want to delete this expense?"
            }

            dl class="mb-6 grid grid-cols-2 gap-2"
            {
                dt class="font-semibold" { "Date" }
                dd { (expense.date) }
                dt class="font-semibold" { "Category" }
                dd { span class=(CATEGORY_BADGE_STYLE) { (category_name) } }
                dt class="font-semibold" { "Amount" }
                dd { (format_currency(expense.amount)) }
            }

            form
                hx-post=(delete_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4"
            {
                button type="submit" class=(BUTTON_DELETE_STYLE) { "Delete" }
            }

            p class="mt-4" { (link(endpoints::EXPENSES_VIEW, "Cancel")) }
        }
    };

    base("Delete Expense", &[], &content)
}
