//! Shared state handed to every request handler.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{Error, auth::DEFAULT_COOKIE_DURATION, db::initialize};

/// Everything the expense tracker needs to serve a request.
///
/// Handlers do not take the whole struct. Each one declares a smaller state
/// type that is extracted from this one with [FromRef].
#[derive(Debug, Clone)]
pub struct AppState {
    /// Encrypts the session cookie.
    pub cookie_key: Key,
    /// How long a session lasts without activity.
    pub cookie_duration: Duration,
    /// Canonical timezone name used to decide what "today" is, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The single SQLite connection, shared by all requests.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Prepare the database behind `connection` and wrap it up with the
    /// session settings.
    ///
    /// The timezone is only looked up when a page needs today's date, so an
    /// unknown name shows up as an error page rather than here.
    ///
    /// # Errors
    ///
    /// Returns an error if the tables or the default categories cannot be created.
    pub fn new(connection: Connection, secret: &str, local_timezone: &str) -> Result<Self, Error> {
        initialize(&connection)?;

        Ok(Self {
            cookie_key: cookie_key_from_secret(secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            local_timezone: local_timezone.to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Replace the default session length.
    pub fn with_cookie_duration(self, cookie_duration: Duration) -> Self {
        Self {
            cookie_duration,
            ..self
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Stretch `secret` to the 64 bytes a cookie [Key] needs.
pub(crate) fn cookie_key_from_secret(secret: &str) -> Key {
    Key::from(&Sha512::digest(secret.as_bytes()))
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::Duration;

    use crate::auth::DEFAULT_COOKIE_DURATION;

    use super::AppState;

    #[test]
    fn same_secret_gives_same_key() {
        let first = AppState::new(Connection::open_in_memory().unwrap(), "hunter2", "Etc/UTC")
            .unwrap();
        let second = AppState::new(Connection::open_in_memory().unwrap(), "hunter2", "Etc/UTC")
            .unwrap();
        let other = AppState::new(Connection::open_in_memory().unwrap(), "hunter3", "Etc/UTC")
            .unwrap();

        assert_eq!(first.cookie_key.master(), second.cookie_key.master());
        assert_ne!(first.cookie_key.master(), other.cookie_key.master());
    }

    #[test]
    fn cookie_duration_defaults_and_can_be_overridden() {
        let state =
            AppState::new(Connection::open_in_memory().unwrap(), "42", "Etc/UTC").unwrap();
        assert_eq!(state.cookie_duration, DEFAULT_COOKIE_DURATION);

        let state = state.with_cookie_duration(Duration::minutes(30));
        assert_eq!(state.cookie_duration, Duration::minutes(30));
    }
}
