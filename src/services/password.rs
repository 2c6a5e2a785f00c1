// src/services/password.rs

use bcrypt::{hash, verify};
use rand::distr::Alphanumeric;
use rand::Rng;

use crate::common::error::AppError;

const GENERATED_PASSWORD_LENGTH: usize = 16;

// bcrypt é caro: roda fora das threads do runtime
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

pub async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();
    let is_valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(is_valid)
}

/// Senha aleatória para usuários criados sem senha.
pub fn generate_password() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify() {
        let hashed = hash_password("c0rrect-h0rse").await.expect("hash");
        assert_ne!(hashed, "c0rrect-h0rse");
        assert!(verify_password("c0rrect-h0rse", &hashed).await.expect("verify"));
        assert!(!verify_password("wrong", &hashed).await.expect("verify"));
    }

    #[test]
    fn generated_passwords_are_random() {
        let a = generate_password();
        let b = generate_password();
        assert_eq!(a.len(), GENERATED_PASSWORD_LENGTH);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }
}
