// src/handlers/companies.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    handlers::auth::user_response,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        json::Json,
        rbac::{CompanyAccess, CompanyOwnerPolicy, CompanyResourcePolicy},
    },
    models::{
        company::{CompanyResponse, CreateCompanyPayload, UpdateCompanyPayload},
        member::UserCompanyResponse,
    },
};

// GET /api/companies
#[utoipa::path(
    get,
    path = "/api/companies",
    tag = "Companies",
    responses(
        (status = 200, description = "Empresas do usuário, com papel e tema", body = [UserCompanyResponse])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_companies(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let response = user_response(&app_state, &locale, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(response.companies))
}

// POST /api/companies
#[utoipa::path(
    post,
    path = "/api/companies",
    tag = "Companies",
    request_body = CreateCompanyPayload,
    responses(
        (status = 201, description = "Empresa criada; o usuário vira proprietário", body = CompanyResponse),
        (status = 400, description = "Dados inválidos ou CNPJ já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_company(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateCompanyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    payload
        .validate()
        .map_err(|e| to_api(AppError::ValidationError(e)))?;

    let company = app_state
        .company_service
        .create_company(user.id, &payload)
        .await
        .map_err(to_api)?;

    Ok((
        StatusCode::CREATED,
        Json(CompanyResponse::new(&company, app_state.media_base())),
    ))
}

// GET /api/companies/{company_uuid}
#[utoipa::path(
    get,
    path = "/api/companies/{company_uuid}",
    tag = "Companies",
    params(("company_uuid" = Uuid, Path, description = "UUID da empresa")),
    responses(
        (status = 200, description = "Dados da empresa", body = CompanyResponse),
        (status = 403, description = "Usuário não é membro"),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_company(
    State(app_state): State<AppState>,
    access: CompanyAccess<CompanyResourcePolicy>,
) -> impl IntoResponse {
    Json(CompanyResponse::new(&access.company, app_state.media_base()))
}

// PATCH /api/companies/{company_uuid}
#[utoipa::path(
    patch,
    path = "/api/companies/{company_uuid}",
    tag = "Companies",
    params(("company_uuid" = Uuid, Path, description = "UUID da empresa")),
    request_body = UpdateCompanyPayload,
    responses(
        (status = 200, description = "Empresa atualizada", body = CompanyResponse),
        (status = 403, description = "Papel sem permissão de escrita")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_company(
    State(app_state): State<AppState>,
    locale: Locale,
    access: CompanyAccess<CompanyResourcePolicy>,
    Json(payload): Json<UpdateCompanyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    payload
        .validate()
        .map_err(|e| to_api(AppError::ValidationError(e)))?;

    let company = app_state
        .company_service
        .update_company(&access.company, payload)
        .await
        .map_err(to_api)?;

    Ok(Json(CompanyResponse::new(&company, app_state.media_base())))
}

// DELETE /api/companies/{company_uuid}
#[utoipa::path(
    delete,
    path = "/api/companies/{company_uuid}",
    tag = "Companies",
    params(("company_uuid" = Uuid, Path, description = "UUID da empresa")),
    responses(
        (status = 204, description = "Empresa apagada (exclusão lógica)"),
        (status = 403, description = "Apenas o proprietário pode apagar")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_company(
    State(app_state): State<AppState>,
    locale: Locale,
    access: CompanyAccess<CompanyResourcePolicy>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .company_service
        .delete_company(&access.company)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/companies/{company_uuid}/restore
#[utoipa::path(
    post,
    path = "/api/companies/{company_uuid}/restore",
    tag = "Companies",
    params(("company_uuid" = Uuid, Path, description = "UUID da empresa")),
    responses(
        (status = 200, description = "Empresa restaurada", body = CompanyResponse),
        (status = 403, description = "Apenas o proprietário pode restaurar")
    ),
    security(("api_jwt" = []))
)]
pub async fn restore_company(
    State(app_state): State<AppState>,
    locale: Locale,
    access: CompanyAccess<CompanyOwnerPolicy>,
) -> Result<impl IntoResponse, ApiError> {
    let company = app_state
        .company_service
        .restore_company(&access.company)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(CompanyResponse::new(&company, app_state.media_base())))
}

// DELETE /api/companies/{company_uuid}/permanent
#[utoipa::path(
    delete,
    path = "/api/companies/{company_uuid}/permanent",
    tag = "Companies",
    params(("company_uuid" = Uuid, Path, description = "UUID da empresa")),
    responses(
        (status = 204, description = "Empresa, membros e tema removidos de vez"),
        (status = 403, description = "Apenas o proprietário pode remover")
    ),
    security(("api_jwt" = []))
)]
pub async fn purge_company(
    State(app_state): State<AppState>,
    locale: Locale,
    access: CompanyAccess<CompanyOwnerPolicy>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .company_service
        .purge_company(&access.company)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
