//! The session token kept in the encrypted `token` cookie.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::UserID;

/// Who is logged in and until when.
///
/// The expiry is stored as a Unix timestamp so the cookie value stays short
/// and does not depend on the server's local offset.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Token {
    pub user_id: UserID,
    #[serde(with = "time::serde::timestamp")]
    pub expires_at: OffsetDateTime,
}
