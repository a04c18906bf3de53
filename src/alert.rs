//! Alert messages that HTMX swaps into the page's alert container.
//!
//! Forms target `#alert-container` with `hx-target-error` so that failed
//! requests show a dismissable message instead of replacing the form.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::{Markup, html};

/// An error message with optional details to show the user.
#[derive(Debug, Clone)]
pub struct Alert<'a> {
    pub message: &'a str,
    pub details: &'a str,
}

impl<'a> Alert<'a> {
    /// Create a new error alert
    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self { message, details }
    }

    pub fn into_html(self) -> Markup {
        html! {
            div
                role="alert"
                class="p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 dark:bg-gray-800 dark:text-red-400"
                onclick="this.parentElement.classList.add('hidden')"
            {
                span class="font-medium" { (self.message) }

                @if !self.details.is_empty() {
                    p { (self.details) }
                }
            }
        }
    }

    /// Render the alert and reveal the alert container.
    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        let markup = html! {
            (self.into_html())
            script { "document.getElementById('alert-container').classList.remove('hidden');" }
        };

        (status, Html(markup.into_string())).into_response()
    }
}
