//! The page and endpoint for adding an expense.

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
    endpoints,
    expense::{
        create_expense,
        form::{ExpenseFormData, ExpenseFormErrors, expense_form_view, parse_expense_form},
    },
    html::{FORM_CONTAINER_STYLE, base, dollar_input_styles},
    navigation::NavBar,
    timezone::local_today,
};

/// The state needed for the add expense page.
#[derive(Debug, Clone)]
pub struct NewExpensePageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for NewExpensePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the add expense page with today's date filled in.
pub async fn get_new_expense_page(
    State(state): State<NewExpensePageState>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    Ok(new_expense_view(&ExpenseFormData::with_date(today), &categories).into_response())
}

/// The state needed for creating an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Validate the submitted form and create an expense for the logged in user.
///
/// Invalid input re-renders the form with a message under each invalid field.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<ExpenseFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let categories = match get_all_categories(&connection) {
        Ok(categories) => categories,
        Err(error) => {
            tracing::error!("Failed to retrieve categories: {error}");
            return error.into_alert_response();
        }
    };

    let new_expense = match parse_expense_form(&form, &categories) {
        Ok(new_expense) => new_expense,
        Err(errors) => return new_expense_form_view(&form, &errors, &categories).into_response(),
    };

    match create_expense(new_expense, user_id, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        // The category was deleted between loading the categories and inserting the expense.
        Err(Error::InvalidCategory) => {
            new_expense_form_view(&form, &ExpenseFormErrors::invalid_category(), &categories)
                .into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating an expense: {error}");
            error.into_alert_response()
        }
    }
}

fn new_expense_view(form: &ExpenseFormData, categories: &[Category]) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_EXPENSE_VIEW).into_html();
    let form = new_expense_form_view(form, &ExpenseFormErrors::default(), categories);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Add Expense" }
            (form)
        }
    };

    base("Add Expense", &[dollar_input_styles()], &content)
}

fn new_expense_form_view(
    form: &ExpenseFormData,
    errors: &ExpenseFormErrors,
    categories: &[Category],
) -> Markup {
    expense_form_view(
        endpoints::NEW_EXPENSE_VIEW,
        "Add Expense",
        form,
        errors,
        categories,
    )
}

#[cfg(test)]
mod new_expense_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        db::initialize,
        endpoints,
        test_utils::{
            assert_content_type, assert_form_input, assert_form_submit_button_with_text,
            assert_hx_endpoint, assert_valid_html, must_get_form, parse_html_document,
        },
    };

    use super::{NewExpensePageState, get_new_expense_page};

    fn get_state(local_timezone: &str) -> NewExpensePageState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        NewExpensePageState {
            local_timezone: local_timezone.to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn render_page() {
        let response = get_new_expense_page(State(get_state("Etc/UTC")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::NEW_EXPENSE_VIEW, "hx-post");
        assert_form_input(&form, "date", "date");
        assert_form_input(&form, "amount", "number");
        assert_form_submit_button_with_text(&form, "Add Expense");

        let options = form
            .select(&Selector::parse("select[name=category_id] option").unwrap())
            .count();
        // The placeholder option plus the eight default categories.
        assert_eq!(options, 9);
    }

    #[tokio::test]
    async fn invalid_timezone_is_an_error() {
        let result = get_new_expense_page(State(get_state("Not/AZone"))).await;

        assert!(result.is_err());
    }
}
