//! User authentication: the session cookie, the auth guard middleware, and
//! the log-in, sign-up and log-out pages.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod redirect;
mod sign_up;
mod token;

pub use cookie::DEFAULT_COOKIE_DURATION;
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::log_out;
pub use middleware::auth_guard;
pub use sign_up::{get_sign_up_page, sign_up};

#[cfg(test)]
pub(crate) use cookie::{COOKIE_TOKEN, set_auth_cookie};
