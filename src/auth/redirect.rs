//! Where to send a user once they have logged in.

use axum::{extract::Request, http::Uri};

use crate::endpoints;

/// Going back to these after logging in would be pointless or would log the user straight out.
const NEVER_RETURN_TO: [&str; 2] = [endpoints::LOG_IN_VIEW, endpoints::LOG_OUT];

fn is_app_page(path_and_query: &str) -> bool {
    if !path_and_query.starts_with('/') || path_and_query.starts_with("//") {
        return false;
    }

    let path = path_and_query
        .split_once('?')
        .map_or(path_and_query, |(path, _query)| path);

    !NEVER_RETURN_TO.contains(&path)
}

/// The path and query of `uri` if they point at a page worth returning to.
fn app_page(uri: &Uri) -> Option<String> {
    let path_and_query = uri.path_and_query()?.as_str();

    is_app_page(path_and_query).then(|| path_and_query.to_owned())
}

/// Check a user-supplied `redirect_url`.
///
/// Only paths within this app are accepted, so a crafted log-in link cannot
/// send the user to another site.
pub(crate) fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;

    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }

    app_page(&uri)
}

pub(crate) fn is_htmx_request(request: &Request) -> bool {
    request
        .headers()
        .get("hx-request")
        .is_some_and(|value| value.as_bytes().eq_ignore_ascii_case(b"true"))
}

/// The page the user was looking at when HTMX sent `request`.
///
/// The header holds an absolute URL, so unlike [normalize_redirect_url] the
/// host is allowed and then dropped.
fn hx_current_page(request: &Request) -> Option<String> {
    let Some(header) = request.headers().get("hx-current-url") else {
        tracing::warn!("HTMX request to {} has no HX-Current-URL header", request.uri());
        return None;
    };

    let page = header
        .to_str()
        .ok()
        .and_then(|value| value.parse::<Uri>().ok())
        .and_then(|uri| app_page(&uri));

    if page.is_none() {
        tracing::warn!("Ignoring HX-Current-URL {header:?}");
    }

    page
}

/// The log-in URL that brings the user back to where `request` was headed.
///
/// HTMX requests usually fetch part of a page, so the page showing in the
/// browser is used instead of the request path.
pub(crate) fn build_log_in_redirect_url(request: &Request) -> Option<String> {
    let target = if is_htmx_request(request) {
        hx_current_page(request)?
    } else {
        app_page(request.uri())?
    };

    let query = serde_urlencoded::to_string([("redirect_url", target.as_str())])
        .inspect_err(|error| tracing::error!("Could not encode redirect URL {target}: {error}"))
        .ok()?;

    Some(format!("{}?{query}", endpoints::LOG_IN_VIEW))
}
