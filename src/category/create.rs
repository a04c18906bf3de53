//! The form for adding a category.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    category::{CategoryName, create_category},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_TEXT_INPUT_STYLE, base, form_field},
    navigation::NavBar,
};

const DUPLICATE_NAME_MSG: &str = "A category with this name already exists.";

#[derive(Debug, Clone)]
pub struct NewCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for NewCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewCategoryForm {
    pub name: String,
}

pub async fn get_new_category_page() -> Response {
    let content = html! {
        (NavBar::new(endpoints::NEW_CATEGORY_VIEW).into_html())

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Add Category" }
            (category_form("", None))
        }
    };

    base("Add Category", &[], &content).into_response()
}

/// Save a new category, then go to the category list.
///
/// Blank and duplicate names re-render the form with the name the user typed.
pub async fn create_category_endpoint(
    State(state): State<NewCategoryState>,
    Form(form): Form<NewCategoryForm>,
) -> Response {
    let name = match CategoryName::new(&form.name) {
        Ok(name) => name,
        Err(error) => return category_form(&form.name, Some(&error.to_string())).into_response(),
    };

    let result = match state.db_connection.lock() {
        Ok(connection) => create_category(name, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    match result {
        Ok(category) => {
            tracing::info!("Created category {} ({})", category.name, category.id);
            (
                HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(Error::DuplicateCategoryName) => {
            category_form(&form.name, Some(DUPLICATE_NAME_MSG)).into_response()
        }
        Err(error) => {
            tracing::error!("Could not create category {:?}: {error}", form.name);
            error.into_alert_response()
        }
    }
}

fn category_form(name: &str, error_message: Option<&str>) -> Markup {
    let input = html! {
        input
            id="name"
            type="text"
            name="name"
            placeholder="e.g. Groceries"
            value=(name)
            required
            autofocus
            class=(FORM_TEXT_INPUT_STYLE);
    };

    html! {
        form
            hx-post=(endpoints::NEW_CATEGORY_VIEW)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            (form_field("name", "Name", input, error_message))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save" }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{
        category::{
            CategoryName, create_category, create_category_endpoint, create_category_table,
            get_all_categories, get_new_category_page,
        },
        endpoints,
        test_utils::{
            assert_content_type, assert_form_error_message, assert_form_input,
            assert_form_input_with_value, assert_form_submit_button, assert_hx_endpoint,
            assert_hx_redirect, assert_valid_html, must_get_form, parse_html_document,
            parse_html_fragment,
        },
    };

    use super::{NewCategoryForm, NewCategoryState};

    fn new_state() -> NewCategoryState {
        let connection = Connection::open_in_memory().unwrap();
        create_category_table(&connection).unwrap();

        NewCategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn form(name: &str) -> Form<NewCategoryForm> {
        Form(NewCategoryForm {
            name: name.to_owned(),
        })
    }

    #[tokio::test]
    async fn page_has_empty_form() {
        let response = get_new_category_page().await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::NEW_CATEGORY_VIEW, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_submit_button(&form);
    }

    #[tokio::test]
    async fn saves_trimmed_name_and_redirects() {
        let state = new_state();

        let response = create_category_endpoint(State(state.clone()), form(" Hobbies ")).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::CATEGORIES_VIEW);
        let categories = get_all_categories(&state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name.as_ref(), "Hobbies");
    }

    #[tokio::test]
    async fn blank_name_shows_error() {
        let state = new_state();

        let response = create_category_endpoint(State(state.clone()), form("   ")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        assert_form_error_message(&must_get_form(&html), "Category name cannot be empty");
        assert!(get_all_categories(&state.db_connection.lock().unwrap()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_name_keeps_input() {
        let state = new_state();
        create_category(
            CategoryName::new_unchecked("Hobbies"),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = create_category_endpoint(State(state), form("Hobbies")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_input_with_value(&form, "name", "text", "Hobbies");
        assert_form_error_message(&form, "A category with this name already exists.");
    }
}
