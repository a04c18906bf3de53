//! The log-in page and the endpoint that checks credentials and starts a session.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error, UserID,
    auth::{
        cookie::{REMEMBER_ME_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie},
        redirect::normalize_redirect_url,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, LINK_STYLE, base, loading_spinner, log_in_register, password_input,
        username_input,
    },
    timezone::get_local_offset,
    user::get_user_by_username,
};

/// Shown for both an unknown username and a wrong password so the form does
/// not reveal which usernames are registered.
pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect username or password.";

const INTERNAL_ERROR_MSG: &str = "Something went wrong on our end. Please try again later.";

fn log_in_form(username: &str, error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_VIEW)
            hx-indicator="#indicator"
            hx-disabled-elt="find button"
            hx-target-error="#alert-container"
            class="space-y-4 md:space-y-6"
        {
            (username_input(username, None))
            (password_input(0, error_message))

            label class="flex items-center gap-x-3 text-sm text-gray-900 dark:text-white"
            {
                input type="checkbox" name="remember_me" class="rounded-xs";
                "Remember me for 7 days"
            }

            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator" { (loading_spinner()) }
                "Log in"
            }

            p class="text-sm text-gray-500 dark:text-gray-400"
            {
                "New here? "
                a href=(endpoints::SIGN_UP_VIEW) class=(LINK_STYLE) { "Create an account" }
            }
        }
    }
}

/// Keep `raw_url` only if it is a page in this app, logging anything else.
fn safe_redirect_url(raw_url: Option<&str>) -> Option<String> {
    let raw_url = raw_url?;
    let redirect_url = normalize_redirect_url(raw_url);

    if redirect_url.is_none() {
        tracing::warn!("Ignoring redirect to {raw_url:?}");
    }

    redirect_url
}

/// Where to go after logging in, taken from the query string of the log-in page.
#[derive(Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

pub async fn get_log_in_page(Query(query): Query<RedirectQuery>) -> Response {
    let redirect_url = safe_redirect_url(query.redirect_url.as_deref());
    let form = log_in_form("", None, redirect_url.as_deref());

    base("Log In", &[], &log_in_register("Log in to track your spending", &form)).into_response()
}

/// The parts of [AppState] needed to check credentials and start a session.
#[derive(Debug, Clone)]
pub struct LoginState {
    pub cookie_key: Key,
    pub cookie_duration: Duration,
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// The log-in form as submitted.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    pub username: String,
    pub password: String,
    /// Present (with any value) when the checkbox is ticked, missing otherwise.
    pub remember_me: Option<String>,
    pub redirect_url: Option<String>,
}

/// The ID of the user `username` if `password` is theirs.
fn verify_credentials(
    username: &str,
    password: &str,
    connection: &Connection,
) -> Result<Option<UserID>, Error> {
    let user = match get_user_by_username(username, connection) {
        Ok(user) => user,
        Err(Error::NotFound) => return Ok(None),
        Err(error) => return Err(error),
    };

    let is_match = user
        .password_hash
        .verify(password)
        .map_err(|error| Error::HashingError(error.to_string()))?;

    Ok(is_match.then_some(user.id))
}

/// Start a session for a user with the right password.
///
/// Wrong credentials re-render the form with a message. Success sets the
/// session cookie and sends the client to the page they were trying to reach,
/// or to their expenses.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(form): Form<LogInData>,
) -> Response {
    let redirect_url = safe_redirect_url(form.redirect_url.as_deref());
    let username = form.username.trim();
    let show_form_with =
        |message: &str| log_in_form(username, Some(message), redirect_url.as_deref()).into_response();

    let verified = match state.db_connection.lock() {
        Ok(connection) => verify_credentials(username, &form.password, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let user_id = match verified {
        Ok(Some(user_id)) => user_id,
        Ok(None) => return show_form_with(INVALID_CREDENTIALS_ERROR_MSG),
        Err(error) => {
            tracing::error!("Could not check the credentials of {username:?}: {error}");
            return show_form_with(INTERNAL_ERROR_MSG);
        }
    };

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_alert_response();
    };

    let session_length = match form.remember_me {
        Some(_) => REMEMBER_ME_COOKIE_DURATION,
        None => state.cookie_duration,
    };

    match set_auth_cookie(jar.clone(), user_id, session_length, local_offset) {
        Ok(jar) => {
            tracing::info!("User {user_id} logged in");
            let target = redirect_url.unwrap_or_else(|| endpoints::EXPENSES_VIEW.to_owned());

            (StatusCode::SEE_OTHER, HxRedirect(target), jar).into_response()
        }
        Err(error) => {
            tracing::error!("Could not set the session cookie for user {user_id}: {error}");

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_auth_cookie(jar),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod log_in_page_tests {
    use axum::{extract::Query, http::StatusCode};
    use scraper::Selector;

    use crate::{
        endpoints,
        test_utils::{
            assert_content_type, assert_form_input, assert_hx_endpoint, assert_valid_html,
            must_get_form, parse_html_document,
        },
    };

    use super::{RedirectQuery, get_log_in_page};

    async fn render(redirect_url: Option<&str>) -> scraper::Html {
        let query = RedirectQuery {
            redirect_url: redirect_url.map(str::to_owned),
        };
        let response = get_log_in_page(Query(query)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");

        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        document
    }

    fn hidden_redirect_values(document: &scraper::Html) -> Vec<String> {
        document
            .select(&Selector::parse("input[type=hidden][name=redirect_url]").unwrap())
            .filter_map(|input| input.value().attr("value").map(str::to_owned))
            .collect()
    }

    #[tokio::test]
    async fn form_posts_credentials_and_links_to_sign_up() {
        let document = render(None).await;

        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::LOG_IN_VIEW, "hx-post");
        assert_form_input(&form, "username", "text");
        assert_form_input(&form, "password", "password");

        let hrefs: Vec<_> = form
            .select(&Selector::parse("a[href]").unwrap())
            .filter_map(|link| link.value().attr("href"))
            .collect();
        assert_eq!(hrefs, [endpoints::SIGN_UP_VIEW]);
        assert!(hidden_redirect_values(&document).is_empty());
    }

    #[tokio::test]
    async fn carries_local_redirect_url() {
        let document = render(Some("/edit/3/")).await;

        assert_eq!(hidden_redirect_values(&document), ["/edit/3/"]);
    }

    #[tokio::test]
    async fn drops_external_redirect_url() {
        let document = render(Some("https://example.com/")).await;

        assert!(hidden_redirect_values(&document).is_empty());
    }
}
