// src/services/token.rs

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Claims, TokenType, User},
};

/// Par de tokens emitido no login e no registro.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

// Emissão e leitura de JWTs (HS256). A blacklist fica no AuthService.
#[derive(Clone)]
pub struct TokenService {
    jwt_secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(jwt_secret: String, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self { jwt_secret, access_ttl, refresh_ttl }
    }

    pub fn issue_pair(&self, user: &User) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access: self.issue(user, TokenType::Access)?,
            refresh: self.issue(user, TokenType::Refresh)?,
        })
    }

    pub fn issue(&self, user: &User, token_type: TokenType) -> Result<String, AppError> {
        let now = Utc::now();
        let ttl = match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: user.id,
            jti: Uuid::new_v4(),
            token_type,
            email: user.email.clone(),
            name: user.full_name(),
            exp: (now + ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    /// Valida assinatura, expiração e tipo. Qualquer falha vira `InvalidToken`;
    /// quem chama decide como reportar.
    pub fn decode(&self, token: &str, expected: TokenType) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|e| {
            tracing::warn!("Token rejeitado: {}", e);
            AppError::InvalidToken
        })?;

        if token_data.claims.token_type != expected {
            tracing::warn!("Token do tipo errado (esperado {:?})", expected);
            return Err(AppError::InvalidToken);
        }
        Ok(token_data.claims)
    }
}

/// Instante de expiração das claims, para guardar na blacklist.
pub fn expires_at(claims: &Claims) -> DateTime<Utc> {
    Utc.timestamp_opt(claims.exp as i64, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn service() -> TokenService {
        TokenService::new("test-secret".into(), Duration::minutes(60), Duration::days(7))
    }

    pub(crate) fn user() -> User {
        User {
            id: 42,
            email: "ana@x.com".into(),
            password_hash: String::new(),
            first_name: "Ana".into(),
            last_name: "Souza".into(),
            phone: None,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            date_joined: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn pair_carries_user_claims() {
        let tokens = service();
        let pair = tokens.issue_pair(&user()).expect("emite");
        let claims = tokens.decode(&pair.access, TokenType::Access).expect("access válido");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "ana@x.com");
        assert_eq!(claims.name, "Ana Souza");

        let refresh = tokens.decode(&pair.refresh, TokenType::Refresh).expect("refresh válido");
        assert_ne!(claims.jti, refresh.jti);
        assert!(refresh.exp > claims.exp);
    }

    #[test]
    fn token_types_are_not_interchangeable() {
        let tokens = service();
        let pair = tokens.issue_pair(&user()).expect("emite");
        assert!(matches!(
            tokens.decode(&pair.refresh, TokenType::Access),
            Err(AppError::InvalidToken)
        ));
        assert!(matches!(
            tokens.decode(&pair.access, TokenType::Refresh),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn rejects_foreign_and_expired_tokens() {
        let other = TokenService::new("other-secret".into(), Duration::minutes(60), Duration::days(7));
        let foreign = other.issue(&user(), TokenType::Access).expect("emite");
        assert!(service().decode(&foreign, TokenType::Access).is_err());

        let expired = TokenService::new("test-secret".into(), Duration::minutes(-5), Duration::days(7));
        let token = expired.issue(&user(), TokenType::Access).expect("emite");
        assert!(service().decode(&token, TokenType::Access).is_err());

        assert!(service().decode("not-a-jwt", TokenType::Access).is_err());
    }

    #[test]
    fn blacklist_expiry_matches_claims() {
        let tokens = service();
        let refresh = tokens.issue(&user(), TokenType::Refresh).expect("emite");
        let claims = tokens.decode(&refresh, TokenType::Refresh).expect("válido");
        let at = expires_at(&claims);
        assert_eq!(at.timestamp() as usize, claims.exp);
        assert!(at > Utc::now() + Duration::days(6));
    }
}
