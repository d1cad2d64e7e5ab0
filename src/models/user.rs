use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Default for Gender {
    fn default() -> Self {
        Gender::Female
    }
}

/// A registered account.
///
/// `password_hash` is a bcrypt hash; the plaintext never touches the store.
#[derive(Debug, Clone)]
pub struct User {
    pub id: u64,
    pub email_address: String,
    pub username: String,
    pub password_hash: String,
    pub gender: Gender,
    pub country: String,
    pub profile_picture: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Staff and superusers share the elevated-permission tier.
    pub fn is_admin(&self) -> bool {
        self.is_staff || self.is_superuser
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            email_address: "a@x.com".to_string(),
            username: "a".to_string(),
            password_hash: "hash".to_string(),
            gender: Gender::default(),
            country: String::new(),
            profile_picture: None,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_gender_default() {
        assert_eq!(Gender::default(), Gender::Female);
    }

    #[test]
    fn test_is_admin() {
        let mut user = sample_user();
        assert!(!user.is_admin());
        user.is_staff = true;
        assert!(user.is_admin());
        user.is_staff = false;
        user.is_superuser = true;
        assert!(user.is_admin());
    }
}
