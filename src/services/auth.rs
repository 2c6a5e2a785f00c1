// src/services/auth.rs

use sqlx::PgPool;
use validator::ValidationErrors;

use crate::{
    common::{
        error::{field_error, AppError},
        validation::{normalize_email, password_policy_violation},
    },
    db::{TokenRepository, UserRepository},
    models::auth::{
        ChangePasswordPayload, NewUser, RegisterUserPayload, TokenType, UpdateProfilePayload, User,
    },
    services::{
        password::{hash_password, verify_password},
        token::{expires_at, TokenPair, TokenService},
    },
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    token_repo: TokenRepository,
    tokens: TokenService,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        token_repo: TokenRepository,
        tokens: TokenService,
        pool: PgPool,
    ) -> Self {
        Self { user_repo, token_repo, tokens, pool }
    }

    /// Cria a conta e já devolve os tokens (o usuário entra logado).
    pub async fn register_user(&self, payload: &RegisterUserPayload) -> Result<(User, TokenPair), AppError> {
        let password_hash = hash_password(&payload.password).await?;

        let new_user = NewUser {
            email: normalize_email(&payload.email),
            password_hash,
            first_name: payload.first_name.trim().to_string(),
            last_name: payload.last_name.trim().to_string(),
            phone: payload.phone.clone().filter(|p| !p.is_empty()),
            ..Default::default()
        };
        let user = self.user_repo.create_user(&self.pool, &new_user).await?;
        tracing::info!("Novo usuário registrado: {}", user.id);

        let tokens = self.tokens.issue_pair(&user)?;
        Ok((user, tokens))
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<(User, TokenPair), AppError> {
        let user = self
            .user_repo
            .find_by_email(&self.pool, &normalize_email(email))
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(AppError::InactiveUser);
        }

        self.user_repo.touch_last_login(user.id).await?;
        tracing::info!("Login do usuário {}", user.id);

        let tokens = self.tokens.issue_pair(&user)?;
        Ok((user, tokens))
    }

    /// Troca um refresh token válido por um novo access token.
    pub async fn refresh_access(&self, refresh: Option<&str>) -> Result<String, AppError> {
        let refresh = refresh.filter(|t| !t.is_empty()).ok_or(AppError::RefreshTokenRequired)?;
        let claims = self
            .tokens
            .decode(refresh, TokenType::Refresh)
            .map_err(|_| AppError::RefreshTokenInvalid)?;

        if self.token_repo.is_blacklisted(claims.jti).await? {
            tracing::warn!("Refresh token revogado usado pelo usuário {}", claims.sub);
            return Err(AppError::RefreshTokenInvalid);
        }

        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AppError::RefreshTokenInvalid)?;

        self.tokens.issue(&user, TokenType::Access)
    }

    /// Revoga o refresh token. Token inválido, expirado, de outro usuário ou já
    /// revogado recebem a mesma resposta.
    pub async fn logout(&self, user: &User, refresh: Option<&str>) -> Result<(), AppError> {
        let refresh = refresh.filter(|t| !t.is_empty()).ok_or(AppError::RefreshTokenRequired)?;
        let claims = self
            .tokens
            .decode(refresh, TokenType::Refresh)
            .map_err(|_| AppError::InvalidOrExpiredToken)?;

        if claims.sub != user.id {
            return Err(AppError::InvalidOrExpiredToken);
        }

        let revoked = self
            .token_repo
            .blacklist(claims.jti, claims.sub, expires_at(&claims))
            .await?;
        if !revoked {
            return Err(AppError::InvalidOrExpiredToken);
        }
        tracing::info!("Logout do usuário {}", user.id);
        Ok(())
    }

    /// Resolve o usuário de um access token.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = self.tokens.decode(token, TokenType::Access)?;

        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;
        if !user.is_active {
            return Err(AppError::InactiveUser);
        }
        Ok(user)
    }

    pub async fn update_profile(&self, user: &User, payload: UpdateProfilePayload) -> Result<User, AppError> {
        let first_name = payload
            .first_name
            .map(|n| n.trim().to_string())
            .unwrap_or_else(|| user.first_name.clone());
        let last_name = payload
            .last_name
            .map(|n| n.trim().to_string())
            .unwrap_or_else(|| user.last_name.clone());
        let phone = match payload.phone {
            Some(p) if p.is_empty() => None,
            Some(p) => Some(p),
            None => user.phone.clone(),
        };

        self.user_repo
            .update_profile(&self.pool, user.id, &first_name, &last_name, phone.as_deref())
            .await
    }

    pub async fn change_password(&self, user: &User, payload: &ChangePasswordPayload) -> Result<(), AppError> {
        if !verify_password(&payload.current_password, &user.password_hash).await? {
            return Err(AppError::field("current_password", "incorrect_password"));
        }

        let mut errors = ValidationErrors::new();
        if payload.new_password != payload.new_password_confirm {
            errors.add("new_password_confirm", field_error("password_mismatch"));
        }
        if let Some(code) = password_policy_violation(&payload.new_password, &user.email) {
            errors.add("new_password", field_error(code));
        }
        if !errors.is_empty() {
            return Err(AppError::ValidationError(errors));
        }

        let password_hash = hash_password(&payload.new_password).await?;
        self.user_repo.set_password(&self.pool, user.id, &password_hash).await?;
        tracing::info!("Senha alterada pelo usuário {}", user.id);
        Ok(())
    }

    /// Usuário administrativo (CLI).
    pub async fn create_superuser(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<User, AppError> {
        let new_user = NewUser {
            email: normalize_email(email),
            password_hash: hash_password(password).await?,
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            phone: None,
            is_staff: true,
            is_superuser: true,
        };
        self.user_repo.create_user(&self.pool, &new_user).await
    }

    pub async fn flush_expired_tokens(&self) -> Result<u64, AppError> {
        self.token_repo.flush_expired().await
    }
}
