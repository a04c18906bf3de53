//! Registered users and the `user` table.

use std::fmt;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, PasswordHash};

/// Primary key of the `user` table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Wrap a row ID from the `user` table.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw ID, for SQL parameters.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The longest username, in characters, that a user may register with.
pub const USERNAME_MAX_LENGTH: usize = 150;

/// A validated username.
///
/// Usernames are 1 to 150 characters made of letters, digits and `@ . + - _`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Validate `raw_username` after trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidUsername] with a message explaining which rule was broken.
    pub fn new(raw_username: &str) -> Result<Self, Error> {
        let username = raw_username.trim();

        if username.is_empty() {
            return Err(Error::InvalidUsername(
                "Username cannot be empty.".to_owned(),
            ));
        }

        if username.chars().count() > USERNAME_MAX_LENGTH {
            return Err(Error::InvalidUsername(format!(
                "Username must be {USERNAME_MAX_LENGTH} characters or fewer."
            )));
        }

        let is_allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');

        if !username.chars().all(is_allowed) {
            return Err(Error::InvalidUsername(
                "Username may only contain letters, numbers, and @/./+/-/_ characters.".to_owned(),
            ));
        }

        Ok(Self(username.to_owned()))
    }

    /// Wrap a username loaded from the database.
    pub fn new_unchecked(username: &str) -> Self {
        Self(username.to_owned())
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A row of the `user` table.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Primary key.
    pub id: UserID,
    /// The name the user logs in with.
    pub username: Username,
    /// bcrypt hash of the user's password.
    pub password_hash: PasswordHash,
}

pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
            id INTEGER PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// # Errors
///
/// [Error::DuplicateUsername] if someone already has `username`.
pub fn create_user(
    username: Username,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    let id = connection.query_row(
        "INSERT INTO user (username, password) VALUES (?1, ?2) RETURNING id",
        (username.as_ref(), password_hash.as_ref()),
        |row| row.get(0).map(UserID::new),
    )?;

    Ok(User {
        id,
        username,
        password_hash,
    })
}

/// Look up a user by the exact name they registered with.
///
/// # Errors
///
/// [Error::NotFound] if nobody has that username.
pub fn get_user_by_username(username: &str, connection: &Connection) -> Result<User, Error> {
    let user = connection.query_row(
        "SELECT id, username, password FROM user WHERE username = ?1",
        (username,),
        user_from_row,
    )?;

    Ok(user)
}

/// # Errors
///
/// [Error::NotFound] if `user_id` does not exist.
pub fn update_password(
    user_id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let updated = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.as_ref(), user_id.as_i64()),
    )?;

    match updated {
        0 => Err(Error::NotFound),
        _ => Ok(()),
    }
}

fn user_from_row(row: &Row) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: UserID::new(row.get(0)?),
        username: Username::new_unchecked(&row.get::<_, String>(1)?),
        password_hash: PasswordHash::new_unchecked(&row.get::<_, String>(2)?),
    })
}


#[cfg(test)]
mod user_table_tests {
    use rusqlite::Connection;

    use crate::{
        Error, PasswordHash,
        user::{
            User, UserID, Username, create_user, create_user_table, get_user_by_username,
            update_password,
        },
    };

    fn user_db() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_user_table(&connection).unwrap();
        connection
    }

    fn register(username: &str, connection: &Connection) -> User {
        create_user(
            Username::new_unchecked(username),
            PasswordHash::new_unchecked("$2b$04$not-a-real-hash"),
            connection,
        )
        .unwrap()
    }

    #[test]
    fn registered_user_can_be_looked_up() {
        let connection = user_db();
        let dora = register("dora", &connection);

        assert!(dora.id.as_i64() > 0);
        assert_eq!(get_user_by_username("dora", &connection), Ok(dora));
    }

    #[test]
    fn users_get_distinct_ids() {
        let connection = user_db();

        assert_ne!(register("dora", &connection).id, register("emil", &connection).id);
    }

    #[test]
    fn username_can_only_be_taken_once() {
        let connection = user_db();
        register("dora", &connection);

        let result = create_user(
            Username::new_unchecked("dora"),
            PasswordHash::new_unchecked("other"),
            &connection,
        );

        assert_eq!(result, Err(Error::DuplicateUsername));
    }

    #[test]
    fn lookup_is_exact() {
        let connection = user_db();
        register("dora", &connection);

        assert_eq!(get_user_by_username("Dora", &connection), Err(Error::NotFound));
        assert_eq!(get_user_by_username("emil", &connection), Err(Error::NotFound));
    }

    #[test]
    fn password_update_is_saved() {
        let connection = user_db();
        let dora = register("dora", &connection);
        let replacement = PasswordHash::new_unchecked("$2b$04$another-hash");

        update_password(dora.id, &replacement, &connection).unwrap();

        let reloaded = get_user_by_username("dora", &connection).unwrap();
        assert_eq!(reloaded.password_hash, replacement);
    }

    #[test]
    fn password_update_needs_existing_user() {
        let connection = user_db();

        let result = update_password(
            UserID::new(99),
            &PasswordHash::new_unchecked("hash"),
            &connection,
        );

        assert_eq!(result, Err(Error::NotFound));
    }
}
