use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use axum_htmx::{HxRedirect, HxRequest};

use crate::{auth::cookie::invalidate_auth_cookie, endpoints};

/// End the session and show the log-in page.
///
/// HTMX gets an `HX-Redirect` so the browser loads the whole log-in page
/// rather than swapping it into the current one.
pub async fn log_out(HxRequest(is_htmx): HxRequest, jar: PrivateCookieJar) -> Response {
    let jar = invalidate_auth_cookie(jar);
    tracing::debug!("Session cookie cleared");

    let redirect = if is_htmx {
        (
            HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response()
    } else {
        Redirect::to(endpoints::LOG_IN_VIEW).into_response()
    };

    (jar, redirect).into_response()
}
