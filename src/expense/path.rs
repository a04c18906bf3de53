use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::{Error, expense::ExpenseId};

/// The `{expense_id}` segment of an expense URL.
///
/// An ID that is not an integer cannot name an expense, so it is rejected
/// with [Error::NotFound] like any other missing expense.
pub struct ExpensePath(pub ExpenseId);

impl<S> FromRequestParts<S> for ExpensePath
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<ExpenseId>::from_request_parts(parts, state).await {
            Ok(Path(expense_id)) => Ok(Self(expense_id)),
            Err(rejection) => {
                tracing::debug!("Rejected expense path {}: {rejection}", parts.uri);
                Err(Error::NotFound)
            }
        }
    }
}
