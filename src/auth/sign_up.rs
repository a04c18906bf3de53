//! The sign-up page for creating a new user account.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
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
    AppState, Error, PasswordHash, ValidatedPassword,
    auth::cookie::set_auth_cookie,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, base, form_field,
        loading_spinner, log_in_register, password_input, username_input,
    },
    internal_server_error::get_internal_server_error_redirect,
    timezone::get_local_offset,
    user::{Username, create_user},
};

/// Browsers refuse shorter passwords before the form is sent. The server
/// still checks password strength on its own.
const PASSWORD_INPUT_MIN_LENGTH: u8 = 8;

/// Messages shown under the sign-up fields.
#[derive(Debug, Default)]
struct SignUpErrors<'a> {
    username: Option<&'a str>,
    password: Option<&'a str>,
    confirm_password: Option<&'a str>,
}

fn sign_up_form(username: &str, errors: SignUpErrors) -> Markup {
    let confirm_password = html! {
        input
            type="password"
            name="confirm_password"
            id="confirm-password"
            minlength=(PASSWORD_INPUT_MIN_LENGTH)
            required
            autofocus[errors.confirm_password.is_some()]
            class=(FORM_TEXT_INPUT_STYLE);
    };

    html! {
        form
            hx-post=(endpoints::SIGN_UP_VIEW)
            hx-indicator="#indicator"
            hx-disabled-elt="find button"
            hx-target-error="#alert-container"
            class="space-y-4 md:space-y-6"
        {
            (username_input(username, errors.username))
            (password_input(PASSWORD_INPUT_MIN_LENGTH, errors.password))
            (form_field("confirm-password", "Confirm password", confirm_password, errors.confirm_password))

            button type="submit" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator" { (loading_spinner()) }
                "Sign up"
            }

            p class="text-sm text-gray-500 dark:text-gray-400"
            {
                "Already tracking your spending? "
                a href=(endpoints::LOG_IN_VIEW) class=(LINK_STYLE) { "Log in" }
            }
        }
    }
}

pub async fn get_sign_up_page() -> Response {
    let form = sign_up_form("", SignUpErrors::default());

    base("Sign Up", &[], &log_in_register("Create an account", &form)).into_response()
}

/// The parts of [AppState] needed to register a user and start their session.
#[derive(Debug, Clone)]
pub struct SignUpState {
    pub cookie_key: Key,
    pub cookie_duration: Duration,
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SignUpState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<SignUpState> for Key {
    fn from_ref(state: &SignUpState) -> Self {
        state.cookie_key.clone()
    }
}

/// The sign-up form as submitted.
#[derive(Serialize, Deserialize)]
pub struct SignUpForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

/// Check the fields in the order a user fills them in and stop at the first problem.
///
/// On failure, returns the form to show again.
fn validate(form: &SignUpForm) -> Result<(Username, ValidatedPassword), Markup> {
    let username = Username::new(&form.username).map_err(|error| {
        let message = error.to_string();
        sign_up_form(
            &form.username,
            SignUpErrors {
                username: Some(&message),
                ..Default::default()
            },
        )
    })?;

    let password = ValidatedPassword::new(&form.password, &[username.as_ref()]).map_err(|error| {
        let message = error.to_string();
        sign_up_form(
            username.as_ref(),
            SignUpErrors {
                password: Some(&message),
                ..Default::default()
            },
        )
    })?;

    if form.password != form.confirm_password {
        return Err(sign_up_form(
            username.as_ref(),
            SignUpErrors {
                confirm_password: Some("Passwords do not match"),
                ..Default::default()
            },
        ));
    }

    Ok((username, password))
}

/// Register a user, log them in and send them to their (empty) expense list.
pub async fn sign_up(
    State(state): State<SignUpState>,
    jar: PrivateCookieJar,
    Form(form): Form<SignUpForm>,
) -> Response {
    let (username, password) = match validate(&form) {
        Ok(valid) => valid,
        Err(form_with_errors) => return form_with_errors.into_response(),
    };

    let password_hash = match PasswordHash::new(password, PasswordHash::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(error) => {
            tracing::error!("Could not hash the password for {username}: {error}");
            return get_internal_server_error_redirect();
        }
    };

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_alert_response();
    };

    let created = match state.db_connection.lock() {
        Ok(connection) => create_user(username.clone(), password_hash, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let user = match created {
        Ok(user) => user,
        Err(Error::DuplicateUsername) => {
            return sign_up_form(
                username.as_ref(),
                SignUpErrors {
                    username: Some("That username is already taken."),
                    ..Default::default()
                },
            )
            .into_response();
        }
        Err(error) => {
            tracing::error!("Could not create user {username}: {error}");
            return get_internal_server_error_redirect();
        }
    };

    tracing::info!("Created user {} ({})", user.username, user.id);

    match set_auth_cookie(jar, user.id, state.cookie_duration, local_offset) {
        Ok(jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
            jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not set the session cookie for user {}: {error}", user.id);
            get_internal_server_error_redirect()
        }
    }
}
