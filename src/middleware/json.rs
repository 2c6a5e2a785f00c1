// src/middleware/json.rs

use std::borrow::Cow;

use axum::{
    extract::{rejection::JsonRejection, FromRef, FromRequest, Request},
    response::{IntoResponse, Response},
};
use serde::{de::DeserializeOwned, Serialize};
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::{
    common::error::{field_error, ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
};

// Erros de corpo que não apontam para um campo
const NON_FIELD_ERRORS: &str = "non_field_errors";

const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// `axum::Json` com rejeição no formato da API: corpo que não desserializa
/// vira 400 `validation_error` com o campo culpado, traduzido.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let locale = Locale::from_headers(req.headers());

        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Json(value)),
            Err(rejection) => {
                tracing::debug!("Corpo rejeitado: {}", rejection.body_text());
                let app_state = AppState::from_ref(state);
                let error = AppError::ValidationError(body_errors(&rejection));
                Err(error.to_api_error(&locale, &app_state.i18n_store))
            }
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

fn body_errors(rejection: &JsonRejection) -> ValidationErrors {
    let (field, code) = match rejection {
        JsonRejection::JsonDataError(e) => match data_error_field(&e.body_text()) {
            Some((field, code)) => (field, code),
            None => (NON_FIELD_ERRORS.to_string(), "invalid_value"),
        },
        JsonRejection::MissingJsonContentType(_) => (NON_FIELD_ERRORS.to_string(), "unsupported_media_type"),
        _ => (NON_FIELD_ERRORS.to_string(), "invalid_json"),
    };

    let mut errors = ValidationErrors::new();
    errors
        .errors_mut()
        .insert(Cow::Owned(field), ValidationErrorsKind::Field(vec![field_error(code)]));
    errors
}

// "...target type: role: unknown variant `manager`, ..." -> ("role", "invalid_value")
// "...target type: missing field `email` at line 1 column 2" -> ("email", "required")
fn data_error_field(text: &str) -> Option<(String, &'static str)> {
    let detail = text.strip_prefix(DATA_ERROR_PREFIX).unwrap_or(text);

    let (path, message) = match detail.split_once(": ") {
        Some((path, message)) if is_field_path(path) => (Some(path), message),
        _ => (None, detail),
    };

    if let Some(missing) = message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
    {
        return Some((missing.to_string(), "required"));
    }

    // Campos aninhados são reportados pelo último nome, o que o cliente enviou
    let last = path?.rsplit('.').next()?;
    let name = last.split('[').next().unwrap_or(last);
    (!name.is_empty()).then(|| (name.to_string(), "invalid_value"))
}

fn is_field_path(path: &str) -> bool {
    !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_variant_points_at_the_field() {
        let text = "Failed to deserialize the JSON body into the target type: role: unknown variant `manager`, expected one of `owner`, `admin`, `attendant` at line 1 column 33";
        assert_eq!(data_error_field(text), Some(("role".into(), "invalid_value")));
    }

    #[test]
    fn wrong_type_points_at_the_field() {
        let text = "Failed to deserialize the JSON body into the target type: primary_color: invalid type: integer `5`, expected a string at line 1 column 20";
        assert_eq!(data_error_field(text), Some(("primary_color".into(), "invalid_value")));
    }

    #[test]
    fn missing_field_is_required() {
        let text = "Failed to deserialize the JSON body into the target type: missing field `role` at line 1 column 2";
        assert_eq!(data_error_field(text), Some(("role".into(), "required")));
    }

    #[test]
    fn nested_path_uses_the_last_name() {
        let text = "Failed to deserialize the JSON body into the target type: colors.primary_color: invalid type: integer `5`, expected a string at line 1 column 20";
        assert_eq!(data_error_field(text), Some(("primary_color".into(), "invalid_value")));
    }

    #[test]
    fn root_type_errors_have_no_field() {
        let text = "Failed to deserialize the JSON body into the target type: invalid type: integer `5`, expected struct AddMemberPayload at line 1 column 1";
        assert_eq!(data_error_field(text), None);
    }
}
