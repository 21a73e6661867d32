use anyhow::Result;
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

const MIN_PASSWORD_LENGTH: usize = 4;

/// Hash password with Argon2 (PHC string, salt included)
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Verify password against stored hash
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub fn validate_password_strength(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        anyhow::bail!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        );
    }
    if password.trim().is_empty() {
        anyhow::bail!("Password must not be blank");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("s3cret").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_invalid_hash_is_error() {
        assert!(verify_password("x", "not-a-hash").is_err());
    }

    #[test]
    fn test_strength() {
        assert!(validate_password_strength("admin").is_ok());
        assert!(validate_password_strength("abc").is_err());
        assert!(validate_password_strength("     ").is_err());
    }
}
