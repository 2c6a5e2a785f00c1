// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// O erro de domínio. Os handlers convertem para ApiError com o idioma do cliente.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("CNPJ já existe")]
    CnpjAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário inativo")]
    InactiveUser,

    // Falha no /refresh: malformado, expirado, revogado ou do tipo errado.
    #[error("Refresh token inválido")]
    RefreshTokenInvalid,

    #[error("Refresh token ausente")]
    RefreshTokenRequired,

    // Falha no /logout: a causa não é revelada ao cliente.
    #[error("Token inválido ou expirado")]
    InvalidOrExpiredToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Empresa não encontrada")]
    CompanyNotFound,

    #[error("Membro não encontrado")]
    MemberNotFound,

    #[error("Tema não encontrado")]
    ThemeNotFound,

    // O &'static str é a chave de mensagem (ver locales/*.json)
    #[error("Acesso negado: {0}")]
    Forbidden(&'static str),

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// Resposta de erro já traduzida, pronta para ir ao cliente.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "error": self.error,
            "code": self.code,
        });
        if let Some(details) = self.details {
            body["details"] = details;
        }
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    /// Erro de um único campo, no mesmo formato dos erros do `validator`.
    pub fn field(field: &'static str, code: &'static str) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, field_error(code));
        AppError::ValidationError(errors)
    }

    /// Status HTTP e código estável de cada variante.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::EmailAlreadyExists => (StatusCode::BAD_REQUEST, "email_taken"),
            AppError::CnpjAlreadyExists => (StatusCode::BAD_REQUEST, "cnpj_taken"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token"),
            AppError::InactiveUser => (StatusCode::UNAUTHORIZED, "inactive_user"),
            AppError::RefreshTokenInvalid => (StatusCode::UNAUTHORIZED, "token_not_valid"),
            AppError::RefreshTokenRequired => (StatusCode::BAD_REQUEST, "refresh_required"),
            AppError::InvalidOrExpiredToken => {
                (StatusCode::BAD_REQUEST, "invalid_or_expired_token")
            }
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "user_not_found"),
            AppError::CompanyNotFound => (StatusCode::NOT_FOUND, "company_not_found"),
            AppError::MemberNotFound => (StatusCode::NOT_FOUND, "member_not_found"),
            AppError::ThemeNotFound => (StatusCode::NOT_FOUND, "theme_not_found"),
            AppError::Forbidden(key) => (StatusCode::FORBIDDEN, *key),
            AppError::UniqueConstraintViolation(_) => (StatusCode::CONFLICT, "validation_error"),
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    /// Traduz o erro para o idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();
        let (status, code) = self.status_and_code();

        let details = match self {
            AppError::ValidationError(errors) => Some(translate_details(errors, lang, store)),
            // Unicidade é reportada no campo, como um erro de validação
            AppError::EmailAlreadyExists => Some(json!({ "email": [store.translate(lang, code)] })),
            AppError::CnpjAlreadyExists => Some(json!({ "cnpj": [store.translate(lang, code)] })),
            AppError::UniqueConstraintViolation(constraint) => Some(json!({ "constraint": constraint })),
            _ => None,
        };

        if status.is_server_error() {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        ApiError {
            status,
            code,
            error: store.translate(lang, code),
            details,
        }
    }
}

/// Cria um `ValidationError` cuja mensagem é a própria chave de tradução.
pub fn field_error(code: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(code.into());
    error
}

fn translate_details(errors: &ValidationErrors, lang: &str, store: &I18nStore) -> Value {
    let mut details: HashMap<String, Vec<String>> = HashMap::new();
    collect_details(errors, lang, store, &mut details);
    json!(details)
}

// Structs aninhados (ex.: cores achatadas com #[serde(flatten)]) são reportados
// com o nome do campo interno, que é o nome que o cliente enviou.
fn collect_details(
    errors: &ValidationErrors,
    lang: &str,
    store: &I18nStore,
    details: &mut HashMap<String, Vec<String>>,
) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages = details.entry(field.to_string()).or_default();
                messages.extend(field_errors.iter().map(|e| {
                    let key = e.message.as_deref().unwrap_or(e.code.as_ref());
                    store.translate(lang, key)
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect_details(nested, lang, store, details),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect_details(nested, lang, store, details);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> I18nStore {
        I18nStore::embedded().expect("catálogos embutidos válidos")
    }

    #[test]
    fn field_error_is_translated_per_locale() {
        let err = AppError::field("first_name", "missing_name");

        let pt = err.to_api_error(&Locale("pt".into()), &store());
        assert_eq!(pt.status, StatusCode::BAD_REQUEST);
        assert_eq!(pt.code, "validation_error");
        let details = pt.details.expect("detalhes por campo");
        assert_eq!(
            details["first_name"][0],
            "Informe o nome do usuário para criar um novo cadastro."
        );

        let en = err.to_api_error(&Locale("en".into()), &store());
        assert_eq!(
            en.details.expect("detalhes")["first_name"][0],
            "Provide the user's name to create a new account."
        );
    }

    #[test]
    fn forbidden_and_not_found_statuses() {
        assert_eq!(
            AppError::Forbidden("company_access_denied").status_and_code(),
            (StatusCode::FORBIDDEN, "company_access_denied")
        );
        assert_eq!(
            AppError::ThemeNotFound.status_and_code().0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InvalidOrExpiredToken.status_and_code().0,
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let err = AppError::InternalServerError(anyhow::anyhow!("pool exhausted at 10.0.0.3"));
        let api = err.to_api_error(&Locale("en".into()), &store());
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.error, "An unexpected error occurred.");
        assert!(api.details.is_none());
    }

    #[test]
    fn nested_color_errors_use_the_sent_field_name() {
        use crate::models::theme::UpdateThemePayload;
        use validator::Validate;

        let payload: UpdateThemePayload =
            serde_json::from_value(json!({ "primary_color": "#ZZZZZZ" })).expect("desserializa");
        let err = AppError::from(payload.validate().expect_err("cor inválida"));
        let api = err.to_api_error(&Locale("en".into()), &store());
        let details = api.details.expect("detalhes");
        assert!(details.get("primary_color").is_some());
        assert!(details.get("colors").is_none());
    }

    #[test]
    fn duplicate_email_is_field_scoped() {
        let api = AppError::EmailAlreadyExists.to_api_error(&Locale("en".into()), &store());
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            api.details.expect("detalhes")["email"][0],
            "A user with this email already exists."
        );
    }
}
