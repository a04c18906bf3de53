//! The page and endpoint for editing an expense.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, UserID,
    category::{Category, get_all_categories},
    endpoints::{self, format_endpoint},
    expense::{
        ExpenseId, get_expense,
        form::{ExpenseFormData, ExpenseFormErrors, expense_form_view, parse_expense_form},
        path::ExpensePath,
        update_expense,
    },
    html::{FORM_CONTAINER_STYLE, base, dollar_input_styles},
    navigation::NavBar,
};

/// The state needed to edit an expense.
#[derive(Debug, Clone)]
pub struct EditExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the form for editing an expense owned by the logged in user.
///
/// Responds with the 404 page if the expense does not exist or belongs to another user.
pub async fn get_edit_expense_page(
    State(state): State<EditExpenseState>,
    Extension(user_id): Extension<UserID>,
    ExpensePath(expense_id): ExpensePath,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = get_expense(expense_id, user_id, &connection)?;

    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    Ok(edit_expense_view(expense_id, &ExpenseFormData::from(&expense), &categories).into_response())
}

/// Validate the submitted form and update the expense.
pub async fn update_expense_endpoint(
    State(state): State<EditExpenseState>,
    Extension(user_id): Extension<UserID>,
    ExpensePath(expense_id): ExpensePath,
    Form(form): Form<ExpenseFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    // Check ownership before validating so other users cannot probe for expenses.
    if let Err(error) = get_expense(expense_id, user_id, &connection) {
        return error.into_alert_response();
    }

    let categories = match get_all_categories(&connection) {
        Ok(categories) => categories,
        Err(error) => {
            tracing::error!("Failed to retrieve categories: {error}");
            return error.into_alert_response();
        }
    };

    let expense = match parse_expense_form(&form, &categories) {
        Ok(expense) => expense,
        Err(errors) => {
            return edit_expense_form_view(expense_id, &form, &errors, &categories)
                .into_response();
        }
    };

    match update_expense(expense_id, user_id, &expense, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::InvalidCategory) => edit_expense_form_view(
            expense_id,
            &form,
            &ExpenseFormErrors::invalid_category(),
            &categories,
        )
        .into_response(),
        Err(error) => {
            tracing::error!("Could not update expense {expense_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn edit_expense_view(
    expense_id: ExpenseId,
    form: &ExpenseFormData,
    categories: &[Category],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_EXPENSE_VIEW).into_html();
    let form = edit_expense_form_view(
        expense_id,
        form,
        &ExpenseFormErrors::default(),
        categories,
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Edit Expense" }
            (form)
        }
    };

    base("Edit Expense", &[dollar_input_styles()], &content)
}

fn edit_expense_form_view(
    expense_id: ExpenseId,
    form: &ExpenseFormData,
    errors: &ExpenseFormErrors,
    categories: &[Category],
) -> Markup {
    expense_form_view(
        &format_endpoint(endpoints::EDIT_EXPENSE_VIEW, expense_id),
        "Save",
        form,
        errors,
        categories,
    )
}
