//! The session cookie: a private (encrypted) cookie holding a JSON [Token].

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::{Error, UserID, auth::token::Token};

pub(crate) const COOKIE_TOKEN: &str = "token";
/// Session length for users who did not tick "remember me".
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(5);
pub(crate) const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

fn session_cookie(value: String, expires: OffsetDateTime) -> Cookie<'static> {
    Cookie::build((COOKIE_TOKEN, value))
        .path("/")
        .expires(expires)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .build()
}

fn store_token(jar: PrivateCookieJar, token: &Token) -> Result<PrivateCookieJar, Error> {
    let value = serde_json::to_string(token)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok(jar.add(session_cookie(value, token.expires_at)))
}

/// Start a session for `user_id` that lasts `duration` from now.
///
/// The expiry is written in `local_offset`. The instant is the same either way.
pub(crate) fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, Error> {
    let token = Token {
        user_id,
        expires_at: OffsetDateTime::now_utc().to_offset(local_offset) + duration,
    };

    store_token(jar, &token)
}

/// Overwrite the session cookie with one the browser discards straight away.
pub(crate) fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    let mut cookie = session_cookie("deleted".to_owned(), OffsetDateTime::UNIX_EPOCH);
    cookie.set_max_age(Duration::ZERO);

    jar.add(cookie)
}

/// The session token in `jar`, provided it has not expired.
///
/// # Errors
///
/// [Error::CookieMissing], [Error::InvalidToken] or [Error::TokenExpired].
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let Some(cookie) = jar.get(COOKIE_TOKEN) else {
        return Err(Error::CookieMissing);
    };

    let token = serde_json::from_str::<Token>(cookie.value_trimmed())
        .map_err(|error| Error::InvalidToken(error.to_string()))?;

    if token.expires_at > OffsetDateTime::now_utc() {
        Ok(token)
    } else {
        Err(Error::TokenExpired)
    }
}

/// Push the session expiry out to at least `duration` from now.
///
/// A session that already lasts longer, e.g. a "remember me" session, keeps its expiry.
/// On error `jar` is dropped unchanged.
pub(crate) fn extend_auth_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, Error> {
    let mut token = get_token_from_cookies(&jar)?;

    let extended = OffsetDateTime::now_utc()
        .to_offset(local_offset)
        .checked_add(duration)
        .ok_or(Error::DateTimeOverflow)?;

    if extended > token.expires_at {
        token.expires_at = extended;
    }

    store_token(jar, &token)
}

#[cfg(test)]
mod tests {
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, SameSite},
    };
    use time::{Duration, OffsetDateTime, UtcOffset};

    use crate::{Error, UserID, app_state::cookie_key_from_secret};

    use super::{
        COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, REMEMBER_ME_COOKIE_DURATION,
        extend_auth_cookie_duration_if_needed, get_token_from_cookies, invalidate_auth_cookie,
        set_auth_cookie,
    };

    fn empty_jar() -> PrivateCookieJar {
        PrivateCookieJar::new(cookie_key_from_secret("cookie tests"))
    }

    fn session(duration: Duration) -> PrivateCookieJar {
        set_auth_cookie(empty_jar(), UserID::new(5), duration, UtcOffset::UTC).unwrap()
    }

    #[track_caller]
    fn assert_about(got: OffsetDateTime, want: OffsetDateTime) {
        assert!(
            (got - want).abs() < Duration::seconds(2),
            "expected about {want}, got {got}"
        );
    }

    #[test]
    fn new_session_holds_user_and_expiry() {
        let jar = session(DEFAULT_COOKIE_DURATION);

        let token = get_token_from_cookies(&jar).unwrap();
        assert_eq!(token.user_id, UserID::new(5));
        assert_about(token.expires_at, OffsetDateTime::now_utc() + DEFAULT_COOKIE_DURATION);
    }

    #[test]
    fn session_cookie_is_locked_down() {
        let jar = session(DEFAULT_COOKIE_DURATION);
        let cookie = jar.get(COOKIE_TOKEN).unwrap();

        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
    }

    #[test]
    fn local_offset_does_not_change_expiry_instant() {
        let offset = UtcOffset::from_hms(13, 0, 0).unwrap();
        let jar = set_auth_cookie(empty_jar(), UserID::new(5), DEFAULT_COOKIE_DURATION, offset)
            .unwrap();

        let token = get_token_from_cookies(&jar).unwrap();
        assert_about(token.expires_at, OffsetDateTime::now_utc() + DEFAULT_COOKIE_DURATION);
    }

    #[test]
    fn no_cookie() {
        assert_eq!(get_token_from_cookies(&empty_jar()), Err(Error::CookieMissing));
    }

    #[test]
    fn cookie_that_is_not_a_token() {
        let jar = empty_jar().add(Cookie::new(COOKIE_TOKEN, "{\"user_id\":5}"));

        assert!(matches!(get_token_from_cookies(&jar), Err(Error::InvalidToken(_))));
    }

    #[test]
    fn expired_session() {
        let jar = session(-Duration::minutes(1));

        assert_eq!(get_token_from_cookies(&jar), Err(Error::TokenExpired));
    }

    #[test]
    fn activity_extends_short_session() {
        let jar = session(Duration::seconds(30));

        let jar = extend_auth_cookie_duration_if_needed(jar, DEFAULT_COOKIE_DURATION, UtcOffset::UTC)
            .unwrap();

        let want = OffsetDateTime::now_utc() + DEFAULT_COOKIE_DURATION;
        assert_about(get_token_from_cookies(&jar).unwrap().expires_at, want);
        assert_about(jar.get(COOKIE_TOKEN).unwrap().expires_datetime().unwrap(), want);
    }

    #[test]
    fn activity_keeps_remember_me_expiry() {
        let jar = session(REMEMBER_ME_COOKIE_DURATION);
        let before = get_token_from_cookies(&jar).unwrap().expires_at;

        let jar = extend_auth_cookie_duration_if_needed(jar, DEFAULT_COOKIE_DURATION, UtcOffset::UTC)
            .unwrap();

        assert_eq!(get_token_from_cookies(&jar).unwrap().expires_at, before);
    }

    #[test]
    fn extending_past_the_end_of_time_fails() {
        let jar = session(DEFAULT_COOKIE_DURATION);

        let result = extend_auth_cookie_duration_if_needed(jar, Duration::MAX, UtcOffset::UTC);

        assert_eq!(result.err(), Some(Error::DateTimeOverflow));
    }

    #[test]
    fn invalidated_cookie_expires_immediately() {
        let jar = invalidate_auth_cookie(session(DEFAULT_COOKIE_DURATION));
        let cookie = jar.get(COOKIE_TOKEN).unwrap();

        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
        assert!(matches!(get_token_from_cookies(&jar), Err(Error::InvalidToken(_))));
    }
}
