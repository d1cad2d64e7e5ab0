use crate::error::{AppError, AppResult};
use crate::models::User;

/// Capabilities a caller may exercise. Ownership-gated actions carry the
/// owning user's id so the check is a single function instead of flag
/// inspection scattered through the handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    PublishContent,
    EditContent { publisher: u64 },
    DeleteContent { publisher: u64 },
    EditComment { author: u64 },
    DeleteComment { author: u64 },
    ListUsers,
    EditUser { subject: u64 },
}

/// Decides whether `actor` may perform `action`.
///
/// Staff and superusers pass every ownership check; listing all users is
/// reserved for them outright.
pub fn authorize(actor: &User, action: Action) -> AppResult<()> {
    let allowed = match action {
        Action::PublishContent => true,
        Action::EditContent { publisher } | Action::DeleteContent { publisher } => {
            actor.id == publisher || actor.is_admin()
        }
        Action::EditComment { author } | Action::DeleteComment { author } => {
            actor.id == author || actor.is_admin()
        }
        Action::ListUsers => actor.is_admin(),
        Action::EditUser { subject } => actor.id == subject || actor.is_admin(),
    };

    if allowed {
        Ok(())
    } else {
        Err(AppError::Forbidden("You do not have permission to do that".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use chrono::Utc;

    fn user(id: u64, staff: bool, superuser: bool) -> User {
        User {
            id,
            email_address: format!("u{}@example.com", id),
            username: format!("u{}", id),
            password_hash: String::new(),
            gender: Gender::default(),
            country: String::new(),
            profile_picture: None,
            is_active: true,
            is_staff: staff,
            is_superuser: superuser,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_can_edit_own_content() {
        assert!(authorize(&user(1, false, false), Action::EditContent { publisher: 1 }).is_ok());
    }

    #[test]
    fn test_other_user_cannot_edit_content() {
        let err = authorize(&user(2, false, false), Action::DeleteContent { publisher: 1 });
        assert!(matches!(err, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_staff_bypasses_ownership() {
        assert!(authorize(&user(2, true, false), Action::DeleteContent { publisher: 1 }).is_ok());
        assert!(authorize(&user(2, true, false), Action::EditComment { author: 1 }).is_ok());
    }

    #[test]
    fn test_list_users_requires_admin() {
        assert!(authorize(&user(1, false, false), Action::ListUsers).is_err());
        assert!(authorize(&user(1, true, false), Action::ListUsers).is_ok());
        assert!(authorize(&user(1, false, true), Action::ListUsers).is_ok());
    }

    #[test]
    fn test_any_authenticated_user_can_publish() {
        assert!(authorize(&user(5, false, false), Action::PublishContent).is_ok());
    }

    #[test]
    fn test_edit_user_is_self_or_admin() {
        assert!(authorize(&user(3, false, false), Action::EditUser { subject: 3 }).is_ok());
        assert!(authorize(&user(3, false, false), Action::EditUser { subject: 4 }).is_err());
        assert!(authorize(&user(3, false, true), Action::EditUser { subject: 4 }).is_ok());
    }
}
