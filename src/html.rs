//! Page skeleton, shared Tailwind classes and small view helpers.

use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, PreEscaped, html};
use numfmt::{Formatter, Precision};

use crate::endpoints;

pub const LINK_STYLE: &str = "underline text-emerald-700 hover:text-emerald-600 \
    dark:text-emerald-400 dark:hover:text-emerald-300";

pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 rounded text-white \
    bg-emerald-600 hover:enabled:bg-emerald-700 disabled:bg-emerald-800 \
    dark:bg-emerald-700 hover:enabled:dark:bg-emerald-800";
pub const BUTTON_DELETE_STYLE: &str = "w-full px-4 py-2 rounded text-white \
    bg-rose-600 hover:enabled:bg-rose-700 dark:bg-rose-700 hover:enabled:dark:bg-rose-800";

pub const FORM_CONTAINER_STYLE: &str = "flex flex-col items-center w-full max-w-md \
    mx-auto px-6 py-8 lg:py-0 text-slate-900 dark:text-slate-100";
pub const FORM_LABEL_STYLE: &str =
    "block mb-2 text-sm font-medium text-slate-900 dark:text-slate-100";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 text-sm rounded \
    border border-slate-300 bg-slate-50 text-slate-900 disabled:text-slate-500 \
    dark:border-slate-600 dark:bg-slate-700 dark:text-white dark:placeholder-slate-400 \
    focus:border-emerald-600 focus:ring-emerald-600";
pub const FORM_ERROR_STYLE: &str = "mt-1 text-sm text-rose-600 dark:text-rose-400";

pub const TABLE_HEADER_STYLE: &str = "text-xs uppercase text-slate-700 bg-slate-100 \
    dark:bg-slate-700 dark:text-slate-300";
pub const TABLE_ROW_STYLE: &str = "border-b bg-white dark:bg-slate-800 dark:border-slate-700";
pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

pub const CATEGORY_BADGE_STYLE: &str = "inline-flex items-center px-2.5 py-0.5 rounded-full \
    text-xs font-semibold text-emerald-800 bg-emerald-100 \
    dark:text-emerald-200 dark:bg-emerald-900";

pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center mx-auto px-6 py-8 lg:py-5 text-slate-900 dark:text-slate-100";

const HTMX_URL: &str = "https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js";
const HTMX_RESPONSE_TARGETS_URL: &str =
    "https://unpkg.com/htmx-ext-response-targets@2.0.4/dist/response-targets.js";
const TAILWIND_URL: &str = "https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4";

/// Extra things a page wants in its `<head>`.
pub enum HeadElement {
    /// URL of a script to load.
    ScriptLink(String),
    /// Inline script.
    ScriptSource(PreEscaped<String>),
    Style(PreEscaped<String>),
}

impl HeadElement {
    fn render(&self) -> Markup {
        match self {
            HeadElement::ScriptLink(url) => html! { script src=(url) {} },
            HeadElement::ScriptSource(source) => html! { script { (source) } },
            HeadElement::Style(css) => html! { style { (css) } },
        }
    }
}

/// Wrap `content` in a full HTML page.
///
/// Every page gets Tailwind, HTMX with the response-targets extension, and an
/// empty `#alert-container` that failed HTMX requests render into.
pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " | Expense Tracker" }
                script src=(TAILWIND_URL) {}
                script src=(HTMX_URL) {}
                script src=(HTMX_RESPONSE_TARGETS_URL) {}
                style
                {
                    ".htmx-indicator { display: none; } "
                    ".htmx-request .htmx-indicator, .htmx-request.htmx-indicator { display: inline-block; }"
                }
                @for element in head_elements { (element.render()) }
            }

            body hx-ext="response-targets" class="min-h-screen bg-slate-50 dark:bg-slate-900"
            {
                (content)

                div
                    id="alert-container"
                    class="hidden fixed bottom-4 left-1/2 -translate-x-1/2 z-50 w-full max-w-md px-4"
                {}
            }
        }
    }
}

/// A full-page error with a big status code and a way back to the expense list.
pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    let content = html! {
        main class="flex flex-col items-center gap-4 px-4 py-16 mx-auto max-w-screen-sm text-center"
        {
            h1 class="text-7xl lg:text-9xl font-extrabold text-emerald-600 dark:text-emerald-400"
            {
                (header)
            }
            p class="text-3xl font-bold text-slate-900 dark:text-white" { (description) }
            p class="text-xl text-slate-700 dark:text-slate-300" { (fix) }
            a
                href=(endpoints::EXPENSES_VIEW)
                class="px-5 py-2.5 rounded text-sm font-medium text-white bg-emerald-600 hover:bg-emerald-700"
            {
                "Back to my expenses"
            }
        }
    };

    base(title, &[], &content)
}

/// The centered card used by the log-in and sign-up pages.
pub fn log_in_register(form_title: &str, form: &Markup) -> Markup {
    html! {
        main class="flex flex-col items-center justify-center gap-6 px-6 py-8 mx-auto"
        {
            p class="text-2xl font-semibold text-slate-900 dark:text-white" { "Expense Tracker" }

            section class="w-full sm:max-w-md p-6 sm:p-8 space-y-4 rounded-lg shadow bg-white dark:bg-slate-800"
            {
                h1 class="text-xl md:text-2xl font-bold text-slate-900 dark:text-white" { (form_title) }
                (form)
            }
        }
    }
}

/// A labelled form control, with `error_message` right after the control.
///
/// `id` must match the `id` of `input`.
pub fn form_field(id: &str, label: &str, input: Markup, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label for=(id) class=(FORM_LABEL_STYLE) { (label) }
            (input)
            @if let Some(error_message) = error_message {
                p class=(FORM_ERROR_STYLE) { (error_message) }
            }
        }
    }
}

pub fn username_input(username: &str, error_message: Option<&str>) -> Markup {
    let input = html! {
        input
            type="text"
            name="username"
            id="username"
            value=(username)
            autocomplete="username"
            maxlength="150"
            required
            autofocus
            class=(FORM_TEXT_INPUT_STYLE);
    };

    form_field("username", "Username", input, error_message)
}

/// The password field. A `min_length` of zero leaves the length to the server.
pub fn password_input(min_length: u8, error_message: Option<&str>) -> Markup {
    let input = html! {
        input
            type="password"
            name="password"
            id="password"
            minlength=[(min_length > 0).then_some(min_length)]
            required
            class=(FORM_TEXT_INPUT_STYLE);
    };

    form_field("password", "Password", input, error_message)
}

/// Spins while an HTMX request is in flight.
pub fn loading_spinner() -> Markup {
    html! {
        span
            aria-hidden="true"
            class="inline-block w-4 h-4 me-2 align-middle rounded-full \
                border-2 border-white border-t-transparent animate-spin"
        {}
    }
}

/// Puts a `$` in front of number inputs wrapped in `.input-wrapper`.
pub fn dollar_input_styles() -> HeadElement {
    HeadElement::Style(PreEscaped(
        ".input-wrapper { position: relative; } \
         .input-wrapper input[type=\"number\"] { padding-left: 1.4rem; } \
         .input-wrapper::before { content: '$'; position: absolute; left: 0.6rem; \
         top: 50%; transform: translateY(-50%); pointer-events: none; }"
            .to_owned(),
    ))
}

/// Format `number` as dollars with thousands separators and two decimal places.
pub fn format_currency(number: f64) -> String {
    static FORMATTER: OnceLock<Option<Formatter>> = OnceLock::new();

    let sign = if number < 0.0 { "-" } else { "" };
    let magnitude = number.abs();

    // numfmt renders zero as a bare "0".
    if magnitude == 0.0 {
        return "$0.00".to_owned();
    }

    let formatter = FORMATTER.get_or_init(|| {
        Formatter::currency("$")
            .inspect_err(|error| tracing::error!("could not build currency formatter: {error}"))
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    let Some(formatter) = formatter else {
        return format!("{sign}${magnitude:.2}");
    };

    let mut formatted = formatter.fmt_string(magnitude);

    // numfmt drops trailing zeros, e.g. "$12.3" for 12.30.
    match formatted.rfind('.') {
        None => formatted.push_str(".00"),
        Some(position) if formatted.len() - position == 2 => formatted.push('0'),
        Some(_) => {}
    }

    format!("{sign}{formatted}")
}

/// An inline text link.
pub fn link(url: &str, text: &str) -> Markup {
    html! { a href=(url) class=(LINK_STYLE) { (text) } }
}

#[cfg(test)]
mod tests {
    use super::format_currency;

    #[test]
    fn formats_dollars_and_cents() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(5.0), "$5.00");
        assert_eq!(format_currency(12.3), "$12.30");
        assert_eq!(format_currency(1234.56), "$1,234.56");
    }

    #[test]
    fn keeps_the_sign_of_negative_amounts() {
        assert_eq!(format_currency(-20.5), "-$20.50");
    }
}
