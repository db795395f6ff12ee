/*
 * Responsibility
 * - Request/response DTOs for /signup and /login
 * - validate() checks shape only; credentials are checked by the store
 */
use serde::{Deserialize, Serialize};

use crate::repos::store::UserRow;
use crate::services::auth::UserId;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        validate_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err("password must be at least 6 characters");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err("please provide email and password");
        }
        Ok(())
    }
}

fn validate_email(email: &str) -> Result<(), &'static str> {
    let email = email.trim();
    if email.is_empty() {
        return Err("email is required");
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err("email is invalid"),
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(name: &str, email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn signup_validation() {
        assert!(signup("Ann", "ann@example.com", "secret1").validate().is_ok());
        assert_eq!(
            signup(" ", "ann@example.com", "secret1").validate(),
            Err("name is required")
        );
        assert_eq!(
            signup("Ann", "ann.example.com", "secret1").validate(),
            Err("email is invalid")
        );
        assert_eq!(
            signup("Ann", "@example.com", "secret1").validate(),
            Err("email is invalid")
        );
        assert!(signup("Ann", "ann@example.com", "short").validate().is_err());
    }

    #[test]
    fn login_requires_both_fields() {
        let ok = LoginRequest {
            email: "ann@example.com".into(),
            password: "pw".into(),
        };
        assert!(ok.validate().is_ok());

        let missing = LoginRequest {
            email: "ann@example.com".into(),
            password: String::new(),
        };
        assert!(missing.validate().is_err());
    }
}
