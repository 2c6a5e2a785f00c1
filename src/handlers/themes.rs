// src/handlers/themes.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        json::Json,
        rbac::{CompanyAccess, ThemePolicy},
    },
    models::theme::{ColorsPayload, ThemeResponse, UpdateThemePayload},
};

type ThemeAccess = CompanyAccess<ThemePolicy>;

// GET /api/companies/themes
#[utoipa::path(
    get,
    path = "/api/companies/themes",
    tag = "Themes",
    responses(
        (status = 200, description = "Temas das empresas do usuário", body = [ThemeResponse])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_themes(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let themes = app_state
        .theme_service
        .list_for_user(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let response: Vec<ThemeResponse> = themes
        .iter()
        .map(|t| ThemeResponse::new(t, app_state.media_base()))
        .collect();
    Ok(Json(response))
}

// GET /api/companies/themes/{company_uuid}
#[utoipa::path(
    get,
    path = "/api/companies/themes/{company_uuid}",
    tag = "Themes",
    params(("company_uuid" = Uuid, Path, description = "UUID da empresa")),
    responses(
        (status = 200, description = "Tema da empresa", body = ThemeResponse),
        (status = 404, description = "Tema não encontrado (ou usuário não é membro)")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_theme(
    State(app_state): State<AppState>,
    locale: Locale,
    access: ThemeAccess,
) -> Result<impl IntoResponse, ApiError> {
    let theme = app_state
        .theme_service
        .get_theme(access.company.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ThemeResponse::new(&theme, app_state.media_base())))
}

// PUT /api/companies/themes/{company_uuid}
#[utoipa::path(
    put,
    path = "/api/companies/themes/{company_uuid}",
    tag = "Themes",
    params(("company_uuid" = Uuid, Path, description = "UUID da empresa")),
    request_body = UpdateThemePayload,
    responses(
        (status = 200, description = "Tema substituído; campos omitidos voltam ao padrão", body = ThemeResponse),
        (status = 400, description = "Cor fora do formato HEX ou extra_config inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn replace_theme(
    State(app_state): State<AppState>,
    locale: Locale,
    access: ThemeAccess,
    Json(payload): Json<UpdateThemePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    payload
        .validate()
        .map_err(|e| to_api(AppError::ValidationError(e)))?;

    let theme = app_state
        .theme_service
        .replace_theme(access.company.id, payload)
        .await
        .map_err(to_api)?;

    Ok(Json(ThemeResponse::new(&theme, app_state.media_base())))
}

// PATCH /api/companies/themes/{company_uuid}
#[utoipa::path(
    patch,
    path = "/api/companies/themes/{company_uuid}",
    tag = "Themes",
    params(("company_uuid" = Uuid, Path, description = "UUID da empresa")),
    request_body = UpdateThemePayload,
    responses(
        (status = 200, description = "Tema atualizado", body = ThemeResponse),
        (status = 400, description = "Cor fora do formato HEX ou extra_config inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_theme(
    State(app_state): State<AppState>,
    locale: Locale,
    access: ThemeAccess,
    Json(payload): Json<UpdateThemePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    payload
        .validate()
        .map_err(|e| to_api(AppError::ValidationError(e)))?;

    let theme = app_state
        .theme_service
        .update_theme(access.company.id, payload)
        .await
        .map_err(to_api)?;

    Ok(Json(ThemeResponse::new(&theme, app_state.media_base())))
}

// PATCH /api/companies/themes/{company_uuid}/update_colors
#[utoipa::path(
    patch,
    path = "/api/companies/themes/{company_uuid}/update_colors",
    tag = "Themes",
    params(("company_uuid" = Uuid, Path, description = "UUID da empresa")),
    request_body = ColorsPayload,
    responses(
        (status = 200, description = "Cores atualizadas", body = ThemeResponse),
        (status = 400, description = "Cor fora do formato HEX")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_colors(
    State(app_state): State<AppState>,
    locale: Locale,
    access: ThemeAccess,
    Json(payload): Json<ColorsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    payload
        .validate()
        .map_err(|e| to_api(AppError::ValidationError(e)))?;

    let theme = app_state
        .theme_service
        .update_colors(access.company.id, payload)
        .await
        .map_err(to_api)?;

    Ok(Json(ThemeResponse::new(&theme, app_state.media_base())))
}

// POST /api/companies/themes/{company_uuid}/reset_to_default
#[utoipa::path(
    post,
    path = "/api/companies/themes/{company_uuid}/reset_to_default",
    tag = "Themes",
    params(("company_uuid" = Uuid, Path, description = "UUID da empresa")),
    responses(
        (status = 200, description = "Cores, CSS e configurações extras no padrão", body = ThemeResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn reset_to_default(
    State(app_state): State<AppState>,
    locale: Locale,
    access: ThemeAccess,
) -> Result<impl IntoResponse, ApiError> {
    let theme = app_state
        .theme_service
        .reset_to_default(access.company.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ThemeResponse::new(&theme, app_state.media_base())))
}

// DELETE /api/companies/themes/{company_uuid}
#[utoipa::path(
    delete,
    path = "/api/companies/themes/{company_uuid}",
    tag = "Themes",
    params(("company_uuid" = Uuid, Path, description = "UUID da empresa")),
    responses(
        (status = 204, description = "Tema apagado (exclusão lógica)"),
        (status = 403, description = "Apenas o proprietário pode apagar o tema")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_theme(
    State(app_state): State<AppState>,
    locale: Locale,
    access: ThemeAccess,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .theme_service
        .delete_theme(access.company.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
