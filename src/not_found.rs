//! The 404 page for unknown routes and for resources the user cannot see.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::html::error_view;

/// Renders the 404 page.
pub struct NotFound;

impl IntoResponse for NotFound {
    fn into_response(self) -> Response {
        let page = error_view(
            "Not Found",
            "404",
            "Nothing to see here.",
            "That page does not exist, or it belongs to someone else.",
        );

        (StatusCode::NOT_FOUND, page).into_response()
    }
}

/// The fallback handler for routes that do not exist.
pub async fn get_404_not_found() -> Response {
    NotFound.into_response()
}
