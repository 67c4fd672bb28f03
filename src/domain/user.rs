//! Registered users.

use crate::domain::UserId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    #[error("username must be 3-32 characters of letters, digits, '_' or '-'")]
    InvalidUsername,
    #[error("email address is invalid")]
    InvalidEmail,
}

/// Validated registration fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

impl NewUser {
    pub fn new(username: &str, email: &str) -> Result<Self, UserError> {
        let username = username.trim();
        let valid_chars = username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !(3..=32).contains(&username.len()) || !valid_chars {
            return Err(UserError::InvalidUsername);
        }

        let email = email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => return Err(UserError::InvalidEmail),
        }

        Ok(NewUser {
            username: username.to_string(),
            email: email.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_usernames() {
        let user = NewUser::new("  striker_9 ", "s9@example.com").unwrap();
        assert_eq!(user.username, "striker_9");
    }

    #[test]
    fn rejects_bad_usernames() {
        assert_eq!(NewUser::new("ab", "a@b.co"), Err(UserError::InvalidUsername));
        assert_eq!(NewUser::new("has space", "a@b.co"), Err(UserError::InvalidUsername));
        assert_eq!(
            NewUser::new(&"x".repeat(33), "a@b.co"),
            Err(UserError::InvalidUsername)
        );
    }

    #[test]
    fn rejects_bad_emails() {
        assert_eq!(NewUser::new("ann", "nope"), Err(UserError::InvalidEmail));
        assert_eq!(NewUser::new("ann", "@x.io"), Err(UserError::InvalidEmail));
        assert_eq!(NewUser::new("ann", "ann@"), Err(UserError::InvalidEmail));
    }

    #[test]
    fn accepts_undotted_email_domains() {
        let user = NewUser::new("ann", " ann@localhost ").unwrap();
        assert_eq!(user.email, "ann@localhost");
    }
}
