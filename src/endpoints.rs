//! Every route the app serves. Routes with an `{expense_id}` need [format_endpoint] before use in a link.

/// The page listing the user's expenses, newest first.
pub const EXPENSES_VIEW: &str = "/";
/// The page for adding a new expense.
pub const NEW_EXPENSE_VIEW: &str = "/add/";
/// The page for editing an existing expense.
pub const EDIT_EXPENSE_VIEW: &str = "/edit/{expense_id}/";
/// The page for confirming and performing the deletion of an expense.
pub const DELETE_EXPENSE_VIEW: &str = "/delete/{expense_id}/";
/// The page with charts and KPIs summarising the user's expenses.
pub const DASHBOARD_VIEW: &str = "/dashboard/";
/// The page listing all categories.
pub const CATEGORIES_VIEW: &str = "/categories/";
/// The page for creating a new category.
pub const NEW_CATEGORY_VIEW: &str = "/categories/new/";
/// Sign-up form.
pub const SIGN_UP_VIEW: &str = "/signup/";
/// Log-in form.
pub const LOG_IN_VIEW: &str = "/login/";
/// Ends the session.
pub const LOG_OUT: &str = "/logout/";
/// Where HTMX requests are sent when something breaks on the server.
pub const INTERNAL_ERROR_VIEW: &str = "/error/";

/// Fill in the path parameter of `endpoint_path`, e.g. `/edit/{expense_id}/` becomes `/edit/7/`.
///
/// Paths without a `{...}` segment come back unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some((prefix, rest)) = endpoint_path.split_once('{') else {
        return endpoint_path.to_owned();
    };

    let suffix = rest.split_once('}').map_or("", |(_param, suffix)| suffix);

    format!("{prefix}{id}{suffix}")
}
