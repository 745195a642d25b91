//! User domain model

use serde::{Deserialize, Serialize};

/// Represents an authenticated user as reported by the session capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    /// Display name shown on saved lists; falls back to the email
    /// local part when the provider has none.
    pub display_name: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Name used when denormalizing the owner onto a saved list
    pub fn name_for_lists(&self) -> String {
        match &self.display_name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => self
                .email
                .split('@')
                .next()
                .unwrap_or("user")
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("user-123", "test@example.com").with_display_name("Test");
        assert_eq!(user.id, "user-123");
        assert_eq!(user.name_for_lists(), "Test");
    }

    #[test]
    fn test_name_falls_back_to_email_local_part() {
        let user = User::new("user-123", "shopper@example.com");
        assert_eq!(user.name_for_lists(), "shopper");

        let blank = User::new("user-456", "a@b.c").with_display_name("  ");
        assert_eq!(blank.name_for_lists(), "a");
    }
}
