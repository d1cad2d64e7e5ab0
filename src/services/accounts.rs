use chrono::{DateTime, Utc};

use crate::auth::password;
use crate::error::{AppError, AppResult};
use crate::models::{Gender, User};
use crate::services::mailer::Mailer;
use crate::store::Store;

/// Registration input after deserialization.
#[derive(Debug)]
pub struct NewUser {
    pub email_address: String,
    pub username: String,
    pub password: String,
    pub gender: Option<Gender>,
    pub country: Option<String>,
    pub profile_picture: Option<String>,
}

/// Creates an account. Email and username must be unique; the password is
/// stored as a bcrypt hash.
pub fn register(store: &mut Store, new: NewUser, now: DateTime<Utc>) -> AppResult<User> {
    if new.email_address.is_empty() || new.username.is_empty() || new.password.is_empty() {
        return Err(AppError::Validation(
            "Email, username and password are required".to_string(),
        ));
    }
    if !new.email_address.contains('@') {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }
    if store.email_in_use(&new.email_address) {
        return Err(AppError::Validation("Email is already in use".to_string()));
    }
    if store.username_in_use(&new.username) {
        return Err(AppError::Validation("Username is already in use".to_string()));
    }

    let password_hash = password::hash_password(&new.password)?;
    let id = store.insert_user(User {
        id: 0,
        email_address: new.email_address,
        username: new.username,
        password_hash,
        gender: new.gender.unwrap_or_default(),
        country: new.country.unwrap_or_default(),
        profile_picture: new.profile_picture,
        is_active: true,
        is_staff: false,
        is_superuser: false,
        created_at: now,
    });
    Ok(store.users[&id].clone())
}

/// Checks credentials and returns the account.
///
/// Unknown email, wrong password and disabled accounts all collapse into
/// the same error so the response does not leak which one it was.
pub fn login(store: &Store, email: &str, plaintext: &str) -> AppResult<User> {
    let invalid = || AppError::Validation("Invalid credentials".to_string());
    let user = store.user_by_email(email).ok_or_else(invalid)?;
    if !user.is_active || !password::verify_password(plaintext, &user.password_hash) {
        return Err(invalid());
    }
    Ok(user.clone())
}

/// Replaces the caller's password after verifying the old one.
pub fn change_password(
    store: &mut Store,
    user_id: u64,
    old_password: &str,
    new_password: &str,
    confirm_password: &str,
) -> AppResult<()> {
    let user = store
        .users
        .get(&user_id)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if !password::verify_password(old_password, &user.password_hash) {
        return Err(AppError::Validation("Old password is incorrect".to_string()));
    }
    if new_password != confirm_password {
        return Err(AppError::Validation("New passwords do not match".to_string()));
    }
    if new_password.is_empty() {
        return Err(AppError::Validation("New password must not be empty".to_string()));
    }

    let password_hash = password::hash_password(new_password)?;
    if let Some(user) = store.users.get_mut(&user_id) {
        user.password_hash = password_hash;
    }
    Ok(())
}

/// Overwrites the account's password with a generated one and emails the
/// plaintext to the address on file.
pub async fn forgot_password(
    store: &mut Store,
    mailer: &dyn Mailer,
    email: &str,
) -> AppResult<()> {
    let user_id = store
        .user_by_email(email)
        .map(|u| u.id)
        .ok_or_else(|| AppError::Validation("Email not found".to_string()))?;

    let new_password = password::generate_password();
    let password_hash = password::hash_password(&new_password)?;
    if let Some(user) = store.users.get_mut(&user_id) {
        user.password_hash = password_hash;
    }

    mailer
        .send(
            email,
            "Your new password",
            &format!("Your new password is: {}", new_password),
        )
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mailer::MockMailer;
    use std::sync::{Arc, Mutex};

    fn new_user(email: &str, username: &str, pw: &str) -> NewUser {
        NewUser {
            email_address: email.to_string(),
            username: username.to_string(),
            password: pw.to_string(),
            gender: None,
            country: None,
            profile_picture: None,
        }
    }

    fn registered_store() -> Store {
        let mut store = Store::new();
        register(&mut store, new_user("a@x.com", "a", "pw12345"), Utc::now()).unwrap();
        store
    }

    #[test]
    fn test_register_then_login() {
        let store = registered_store();
        let user = login(&store, "a@x.com", "pw12345").unwrap();
        assert_eq!(user.username, "a");
        assert!(user.is_active);
        assert!(!user.is_staff);
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut store = registered_store();
        let err = register(&mut store, new_user("a@x.com", "b", "pw"), Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = register(&mut store, new_user("b@x.com", "a", "pw"), Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_register_rejects_missing_fields() {
        let mut store = Store::new();
        let err = register(&mut store, new_user("", "a", "pw"), Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = register(&mut store, new_user("not-an-email", "a", "pw"), Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.users.is_empty());
    }

    #[test]
    fn test_login_wrong_password() {
        let store = registered_store();
        let err = login(&store, "a@x.com", "wrong").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_login_disabled_account() {
        let mut store = registered_store();
        store.users.get_mut(&1).unwrap().is_active = false;
        assert!(login(&store, "a@x.com", "pw12345").is_err());
    }

    #[test]
    fn test_change_password_requires_correct_old_password() {
        let mut store = registered_store();
        let err = change_password(&mut store, 1, "wrong", "new12345", "new12345").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        // Old credential still works
        assert!(login(&store, "a@x.com", "pw12345").is_ok());
    }

    #[test]
    fn test_change_password_requires_matching_confirmation() {
        let mut store = registered_store();
        let err = change_password(&mut store, 1, "pw12345", "new1", "new2").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(login(&store, "a@x.com", "pw12345").is_ok());
    }

    #[test]
    fn test_change_password_rotates_credential() {
        let mut store = registered_store();
        change_password(&mut store, 1, "pw12345", "new12345", "new12345").unwrap();
        assert!(login(&store, "a@x.com", "pw12345").is_err());
        assert!(login(&store, "a@x.com", "new12345").is_ok());
    }

    #[test]
    fn test_forgot_password_unknown_email() {
        tokio_test::block_on(async {
            let mut store = registered_store();
            let mailer = MockMailer::new();
            let err = forgot_password(&mut store, &mailer, "nobody@x.com").await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        });
    }

    #[test]
    fn test_forgot_password_rotates_and_mails_credential() {
        tokio_test::block_on(async {
            let mut store = registered_store();

            let sent_body = Arc::new(Mutex::new(String::new()));
            let captured = sent_body.clone();
            let mut mailer = MockMailer::new();
            mailer
                .expect_send()
                .times(1)
                .returning(move |_to, _subject, body| {
                    *captured.lock().unwrap() = body.to_string();
                    Ok(())
                });

            forgot_password(&mut store, &mailer, "a@x.com").await.unwrap();

            let body = sent_body.lock().unwrap().clone();
            let new_password = body.rsplit(' ').next().unwrap().to_string();
            assert_eq!(new_password.len(), 12);

            assert!(login(&store, "a@x.com", "pw12345").is_err());
            assert!(login(&store, "a@x.com", &new_password).is_ok());
        });
    }
}
