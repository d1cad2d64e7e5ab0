use rand::{distributions::Alphanumeric, Rng};

use crate::error::AppResult;

/// Length of generated reset passwords.
const GENERATED_PASSWORD_LEN: usize = 12;

/// Hash a password for storage.
pub fn hash_password(password: &str) -> AppResult<String> {
    Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
}

/// Verify a plaintext password against a stored hash - constant-time via bcrypt.
///
/// A malformed stored hash verifies as false rather than erroring; the
/// caller treats both the same way.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Generate a random alphanumeric password for the forgot-password flow.
pub fn generate_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("pw12345").unwrap();
        assert!(verify_password("pw12345", &hash));
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("pw12345").unwrap();
        assert!(!verify_password("pw54321", &hash));
    }

    #[test]
    fn test_malformed_hash_fails_closed() {
        assert!(!verify_password("pw12345", "not-a-bcrypt-hash"));
    }

    #[test]
    fn test_generated_password_shape() {
        let pw = generate_password();
        assert_eq!(pw.len(), GENERATED_PASSWORD_LEN);
        assert!(pw.chars().all(|c| c.is_ascii_alphanumeric()));
        // Two draws should essentially never collide
        assert_ne!(pw, generate_password());
    }
}
