//! Application router configuration with protected and unprotected route definitions.

use axum::{Router, middleware, routing::get};

use crate::{
    AppState,
    auth::{auth_guard, get_log_in_page, get_sign_up_page, log_out, post_log_in, sign_up},
    category::{create_category_endpoint, get_categories_page, get_new_category_page},
    dashboard::get_dashboard_page,
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, get_delete_expense_page,
        get_edit_expense_page, get_expenses_page, get_new_expense_page, update_expense_endpoint,
    },
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(
            endpoints::LOG_IN_VIEW,
            get(get_log_in_page).post(post_log_in),
        )
        .route(endpoints::SIGN_UP_VIEW, get(get_sign_up_page).post(sign_up))
        .route(endpoints::LOG_OUT, get(log_out).post(log_out))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::EXPENSES_VIEW, get(get_expenses_page))
        .route(
            endpoints::NEW_EXPENSE_VIEW,
            get(get_new_expense_page).post(create_expense_endpoint),
        )
        .route(
            endpoints::EDIT_EXPENSE_VIEW,
            get(get_edit_expense_page).post(update_expense_endpoint),
        )
        .route(
            endpoints::DELETE_EXPENSE_VIEW,
            get(get_delete_expense_page).post(delete_expense_endpoint),
        )
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
        .route(
            endpoints::NEW_CATEGORY_VIEW,
            get(get_new_category_page).post(create_category_endpoint),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}
