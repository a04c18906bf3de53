//! The 500 page. Details of what went wrong stay in the server logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{endpoints, html::error_view};

pub struct InternalServerError {
    description: &'static str,
    fix: String,
}

impl Default for InternalServerError {
    fn default() -> Self {
        Self {
            description: "Sorry, something went wrong on our end.",
            fix: "Please try again in a little while.".to_owned(),
        }
    }
}

impl InternalServerError {
    /// For problems the person running the server has to fix, e.g. a bad setting.
    pub fn misconfigured(fix: String) -> Self {
        Self {
            description: "The server is not set up correctly.",
            fix,
        }
    }
}

impl IntoResponse for InternalServerError {
    fn into_response(self) -> Response {
        let page = error_view("Internal Server Error", "500", self.description, &self.fix);

        (StatusCode::INTERNAL_SERVER_ERROR, page).into_response()
    }
}

pub async fn get_internal_server_error_page() -> Response {
    InternalServerError::default().into_response()
}

/// Send an HTMX client to the 500 page.
///
/// Form endpoints use this when they cannot show a message inside the form.
/// Full-page GET handlers should respond with [InternalServerError] instead.
pub fn get_internal_server_error_redirect() -> Response {
    (
        HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
        .into_response()
}
