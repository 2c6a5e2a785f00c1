// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::common::error::field_error;
use crate::common::validation::{trimmed, validate_not_blank};
use crate::models::member::UserCompanyResponse;

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// "Nome Sobrenome", ou o e-mail quando não há nome.
    pub fn full_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }
}

/// Campos para criar um usuário (cadastro, membro novo ou superusuário).
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
}

// Usuário como a API o expõe, com as empresas que gerencia
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "maria@empresa.com.br")]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[schema(example = "Maria Silva")]
    pub full_name: String,
    #[schema(example = "(11) 99999-9999")]
    pub phone: Option<String>,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
    pub companies: Vec<UserCompanyResponse>,
}

impl UserResponse {
    pub fn new(user: &User, companies: Vec<UserCompanyResponse>) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            full_name: user.full_name(),
            phone: user.phone.clone(),
            is_active: user.is_active,
            date_joined: user.date_joined,
            companies,
        }
    }
}

// Dados para registro de um novo usuário
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUserPayload {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "maria@empresa.com.br")]
    pub email: String,

    #[serde(default)]
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 150, message = "too_long")
    )]
    #[schema(example = "Maria")]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(max = 150, message = "too_long"))]
    pub last_name: String,

    #[validate(length(max = 20, message = "too_long"))]
    pub phone: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, message = "required"))]
    pub password: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "required"))]
    pub password_confirm: String,
}

impl RegisterUserPayload {
    /// Erros de campo e divergência de senha são reportados juntos.
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        if self.password != self.password_confirm {
            errors.add("password", field_error("password_mismatch"));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(email(message = "invalid_email"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "required"))]
    pub password: String,
}

// PATCH/PUT /me: apenas nome e telefone
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfilePayload {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 150, message = "too_long")
    )]
    pub first_name: Option<String>,
    #[validate(length(max = 150, message = "too_long"))]
    pub last_name: Option<String>,
    /// String vazia remove o telefone
    #[validate(length(max = 20, message = "too_long"))]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "required"))]
    pub current_password: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "required"))]
    pub new_password: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "required"))]
    pub new_password_confirm: String,
}

// Corpo de /refresh e /logout
#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshTokenPayload {
    #[serde(default)]
    pub refresh: Option<String>,
}

// Resposta de login e registro
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub access: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,           // ID do usuário
    pub jti: Uuid,          // ID único do token (usado na blacklist)
    pub token_type: TokenType,
    pub email: String,
    pub name: String,
    pub exp: usize,
    pub iat: usize,
}
