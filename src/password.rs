//! Password strength checks and bcrypt hashing.

use std::fmt;

use bcrypt::BcryptError;
use zxcvbn::{Score, zxcvbn};

use crate::Error;

/// A password strong enough to use, in plain text.
///
/// Only exists long enough to be hashed into a [PasswordHash].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Accept `password` if zxcvbn rates it three or four out of four.
    ///
    /// `user_inputs` are other things the user typed, e.g. their username.
    /// A password built from them is rated as weaker.
    ///
    /// # Errors
    ///
    /// [Error::TooWeak] carries zxcvbn's advice on how to improve the password.
    pub fn new(password: &str, user_inputs: &[&str]) -> Result<Self, Error> {
        let entropy = zxcvbn(password, user_inputs);

        if entropy.score() >= Score::Three {
            return Ok(Self(password.to_owned()));
        }

        let advice = entropy
            .feedback()
            .map(ToString::to_string)
            .unwrap_or_else(|| "Add more words or characters.".to_owned());

        Err(Error::TooWeak(advice))
    }

    /// Skip the strength check, e.g. for the test database's well-known password.
    pub fn new_unchecked(password: &str) -> Self {
        Self(password.to_owned())
    }
}

impl fmt::Display for ValidatedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("********")
    }
}

/// A salted bcrypt hash, the only form in which passwords are stored.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// bcrypt's default work factor, for everything except tests.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Tests use the minimum cost of 4 so they stay fast.
    ///
    /// # Errors
    ///
    /// [Error::HashingError] if bcrypt rejects the cost.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        match bcrypt::hash(password.0, cost) {
            Ok(hash) => Ok(Self(hash)),
            Err(error) => Err(Error::HashingError(error.to_string())),
        }
    }

    /// Wrap a hash read back from the database.
    pub fn new_unchecked(hash: &str) -> Self {
        Self(hash.to_owned())
    }

    /// Whether `password` is the one this hash was made from.
    pub fn verify(&self, password: &str) -> Result<bool, BcryptError> {
        bcrypt::verify(password, &self.0)
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
