// src/handlers/members.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        pagination::{Page, PageQuery},
    },
    config::AppState,
    middleware::{
        i18n::Locale,
        json::Json,
        rbac::{CompanyAccess, MemberManagementPolicy},
    },
    models::member::{
        AddMemberPayload, CompanyMemberResponse, MemberWithUser, ResetMemberPasswordPayload,
        ResetMemberPasswordResponse, UpdateMemberPayload,
    },
};

type MemberAccess = CompanyAccess<MemberManagementPolicy>;

fn member_response(app_state: &AppState, locale: &Locale, member: &MemberWithUser) -> CompanyMemberResponse {
    let role_display = app_state.i18n_store.translate(&locale.0, member.role.i18n_key());
    CompanyMemberResponse::new(member, role_display)
}

// GET /api/companies/{company_uuid}/members
#[utoipa::path(
    get,
    path = "/api/companies/{company_uuid}/members",
    tag = "Members",
    params(
        ("company_uuid" = Uuid, Path, description = "UUID da empresa"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Membros ativos, paginados", body = Page<CompanyMemberResponse>),
        (status = 403, description = "Apenas proprietário e admin gerenciam membros")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_members(
    State(app_state): State<AppState>,
    locale: Locale,
    access: MemberAccess,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (members, count) = app_state
        .member_service
        .list_members(access.company.id, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let results = members
        .iter()
        .map(|m| member_response(&app_state, &locale, m))
        .collect();
    let path = format!("/api/companies/{}/members", access.company.uuid);
    Ok(Json(Page::new(results, count, &query, &path)))
}

// POST /api/companies/{company_uuid}/members
#[utoipa::path(
    post,
    path = "/api/companies/{company_uuid}/members",
    tag = "Members",
    params(("company_uuid" = Uuid, Path, description = "UUID da empresa")),
    request_body = AddMemberPayload,
    responses(
        (status = 201, description = "Membro criado, restaurado ou atualizado", body = CompanyMemberResponse),
        (status = 200, description = "Membro já existia com o mesmo papel; nada mudou", body = CompanyMemberResponse),
        (status = 400, description = "Dados inválidos (ex.: usuário novo sem nome)")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_member(
    State(app_state): State<AppState>,
    locale: Locale,
    access: MemberAccess,
    Json(payload): Json<AddMemberPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    payload
        .validate()
        .map_err(|e| to_api(AppError::ValidationError(e)))?;

    let (member, written) = app_state
        .member_service
        .add_member(access.company.id, access.role, &payload)
        .await
        .map_err(to_api)?;

    let status = if written { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(member_response(&app_state, &locale, &member))))
}

// GET /api/companies/{company_uuid}/members/{member_uuid}
#[utoipa::path(
    get,
    path = "/api/companies/{company_uuid}/members/{member_uuid}",
    tag = "Members",
    params(
        ("company_uuid" = Uuid, Path, description = "UUID da empresa"),
        ("member_uuid" = Uuid, Path, description = "UUID do vínculo")
    ),
    responses(
        (status = 200, description = "Membro", body = CompanyMemberResponse),
        (status = 404, description = "Membro não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_member(
    State(app_state): State<AppState>,
    locale: Locale,
    access: MemberAccess,
    Path((company_uuid, member_uuid)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let member = app_state
        .member_service
        .get_member(access.company.id, member_uuid)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(member_response(&app_state, &locale, &member)))
}

// PATCH /api/companies/{company_uuid}/members/{member_uuid}
#[utoipa::path(
    patch,
    path = "/api/companies/{company_uuid}/members/{member_uuid}",
    tag = "Members",
    params(
        ("company_uuid" = Uuid, Path, description = "UUID da empresa"),
        ("member_uuid" = Uuid, Path, description = "UUID do vínculo")
    ),
    request_body = UpdateMemberPayload,
    responses(
        (status = 200, description = "Papel alterado", body = CompanyMemberResponse),
        (status = 403, description = "Admin não altera proprietários")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_member(
    State(app_state): State<AppState>,
    locale: Locale,
    access: MemberAccess,
    Path((company_uuid, member_uuid)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateMemberPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let member = app_state
        .member_service
        .update_role(access.company.id, member_uuid, access.role, payload.role)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(member_response(&app_state, &locale, &member)))
}

// DELETE /api/companies/{company_uuid}/members/{member_uuid}
#[utoipa::path(
    delete,
    path = "/api/companies/{company_uuid}/members/{member_uuid}",
    tag = "Members",
    params(
        ("company_uuid" = Uuid, Path, description = "UUID da empresa"),
        ("member_uuid" = Uuid, Path, description = "UUID do vínculo")
    ),
    responses(
        (status = 204, description = "Membro removido (exclusão lógica)"),
        (status = 404, description = "Membro não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_member(
    State(app_state): State<AppState>,
    locale: Locale,
    access: MemberAccess,
    Path((company_uuid, member_uuid)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .member_service
        .remove_member(access.company.id, member_uuid, access.role)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/companies/{company_uuid}/members/{member_uuid}/reset-password
#[utoipa::path(
    post,
    path = "/api/companies/{company_uuid}/members/{member_uuid}/reset-password",
    tag = "Members",
    params(
        ("company_uuid" = Uuid, Path, description = "UUID da empresa"),
        ("member_uuid" = Uuid, Path, description = "UUID do vínculo")
    ),
    request_body = ResetMemberPasswordPayload,
    responses(
        (status = 200, description = "Senha redefinida", body = ResetMemberPasswordResponse),
        (status = 400, description = "Senha fora do tamanho permitido")
    ),
    security(("api_jwt" = []))
)]
pub async fn reset_member_password(
    State(app_state): State<AppState>,
    locale: Locale,
    access: MemberAccess,
    Path((company_uuid, member_uuid)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ResetMemberPasswordPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    payload
        .validate()
        .map_err(|e| to_api(AppError::ValidationError(e)))?;

    app_state
        .member_service
        .reset_password(access.company.id, member_uuid, access.role, &payload.password)
        .await
        .map_err(to_api)?;

    Ok(Json(ResetMemberPasswordResponse { password: payload.password }))
}
