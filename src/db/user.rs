//! User model.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::Permissions;

/// A registered principal.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: Uuid,
    /// Login username (unique).
    pub username: String,
    /// Email address (unique).
    pub email: String,
    /// Capability mask. Zero for freshly registered users.
    pub permissions: Permissions,
    /// Whether the email address has been verified.
    pub verified: bool,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Initial capability mask.
    pub permissions: Permissions,
}

impl NewUser {
    /// Create a new user with no permissions.
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            permissions: Permissions::NONE,
        }
    }

    /// Set the permission mask.
    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = NewUser::new("applicant", "applicant@example.com");
        assert_eq!(user.username, "applicant");
        assert_eq!(user.email, "applicant@example.com");
        assert_eq!(user.permissions, Permissions::NONE);
    }

    #[test]
    fn test_new_user_with_permissions() {
        let user = NewUser::new("staff", "staff@example.com")
            .with_permissions(Permissions::VIEW_USER | Permissions::EDIT_USER);
        assert_eq!(user.permissions.bits(), 3);
    }
}
