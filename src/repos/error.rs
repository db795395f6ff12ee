/**
 * Responsibility
 * - What the store layer tells its callers
 */
use thiserror::Error;

use crate::services::password::PasswordError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("db error")]
    Db(#[source] sqlx::Error),

    #[error("email already registered")]
    DuplicateEmail,

    // Unknown email and wrong password look the same to callers.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    PasswordHash(#[from] PasswordError),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        // 23505: unique_violation (users.email)
        if let sqlx::Error::Database(dbe) = &e
            && dbe.code().as_deref() == Some("23505")
        {
            return StoreError::DuplicateEmail;
        }
        StoreError::Db(e)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
