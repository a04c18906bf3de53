//! Guards the expense pages so only logged-in users reach them.

use axum::{
    extract::{FromRef, Request, State},
    http::{StatusCode, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use time::Duration;

use crate::{
    AppState,
    auth::{
        cookie::{extend_auth_cookie_duration_if_needed, get_token_from_cookies},
        redirect::{build_log_in_redirect_url, is_htmx_request},
    },
    endpoints,
    timezone::get_local_offset,
};

/// The part of [AppState] the auth guard reads.
#[derive(Clone)]
pub struct AuthState {
    pub cookie_key: Key,
    pub cookie_duration: Duration,
    pub local_timezone: String,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Let the request through only if it carries a live session cookie.
///
/// The logged-in user's [UserID](crate::UserID) is added to the request
/// extensions, so handlers can take `Extension<UserID>`, and the session is
/// pushed forward on the way out. Anyone else is sent to the log-in page with
/// a link back to where they were going.
pub async fn auth_guard(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let jar = PrivateCookieJar::from_headers(request.headers(), state.cookie_key.clone());

    let token = match get_token_from_cookies(&jar) {
        Ok(token) => token,
        Err(error) => {
            tracing::debug!("No usable session for {}: {error}", request.uri());
            return send_to_log_in(&request);
        }
    };

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        tracing::error!(
            "Cannot refresh sessions: unknown timezone {:?}",
            state.local_timezone
        );
        return send_to_log_in(&request);
    };

    request.extensions_mut().insert(token.user_id);
    let mut response = next.run(request).await;

    match extend_auth_cookie_duration_if_needed(jar, state.cookie_duration, local_offset) {
        Ok(jar) => copy_set_cookie_headers(jar, &mut response),
        Err(error) => tracing::error!("Could not extend session for user {}: {error}", token.user_id),
    }

    response
}

fn send_to_log_in(request: &Request) -> Response {
    let log_in_url = build_log_in_redirect_url(request).unwrap_or_else(|| {
        tracing::warn!("Dropping unusable redirect target {}", request.uri());
        endpoints::LOG_IN_VIEW.to_owned()
    });

    // HTMX follows a 303 inside the swap target, so it needs the header instead.
    if is_htmx_request(request) {
        (HxRedirect(log_in_url), StatusCode::OK).into_response()
    } else {
        Redirect::to(&log_in_url).into_response()
    }
}

fn copy_set_cookie_headers(jar: PrivateCookieJar, response: &mut Response) {
    let jar_response = jar.into_response();

    for value in jar_response.headers().get_all(SET_COOKIE) {
        response.headers_mut().append(SET_COOKIE, value.clone());
    }
}
