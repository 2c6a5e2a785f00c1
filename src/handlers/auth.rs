// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, json::Json},
    models::{
        auth::{
            AuthResponse, ChangePasswordPayload, LoginUserPayload, MessageResponse,
            RefreshResponse, RefreshTokenPayload, RegisterUserPayload, UpdateProfilePayload, User,
            UserResponse,
        },
        member::UserCompanyResponse,
    },
};

/// Usuário com as empresas dele, no idioma do cliente.
pub(crate) async fn user_response(
    app_state: &AppState,
    locale: &Locale,
    user: &User,
) -> Result<UserResponse, AppError> {
    let companies = app_state
        .company_service
        .list_user_companies(user.id)
        .await?
        .iter()
        .map(|entry| {
            let role_display = app_state
                .i18n_store
                .translate(&locale.0, entry.membership.role.i18n_key());
            UserCompanyResponse::new(entry, role_display, app_state.media_base())
        })
        .collect();
    Ok(UserResponse::new(user, companies))
}

// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Usuário criado e autenticado", body = AuthResponse),
        (status = 400, description = "Dados inválidos ou e-mail já cadastrado")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    payload
        .validate_all()
        .map_err(|e| to_api(AppError::ValidationError(e)))?;

    let (user, tokens) = app_state
        .auth_service
        .register_user(&payload)
        .await
        .map_err(to_api)?;
    let user = user_response(&app_state, &locale, &user).await.map_err(to_api)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse { user, access: tokens.access, refresh: tokens.refresh }),
    ))
}

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Tokens e perfil do usuário", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<LoginUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    payload
        .validate()
        .map_err(|e| to_api(AppError::ValidationError(e)))?;

    let (user, tokens) = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await
        .map_err(to_api)?;
    let user = user_response(&app_state, &locale, &user).await.map_err(to_api)?;

    Ok(Json(AuthResponse { user, access: tokens.access, refresh: tokens.refresh }))
}

// POST /api/auth/refresh
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "Auth",
    request_body = RefreshTokenPayload,
    responses(
        (status = 200, description = "Novo access token", body = RefreshResponse),
        (status = 401, description = "Refresh token inválido, expirado ou revogado")
    )
)]
pub async fn refresh(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<RefreshTokenPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let access = app_state
        .auth_service
        .refresh_access(payload.refresh.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(RefreshResponse { access }))
}

// POST /api/auth/logout
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    request_body = RefreshTokenPayload,
    responses(
        (status = 200, description = "Refresh token revogado", body = MessageResponse),
        (status = 400, description = "Token ausente, inválido ou expirado")
    ),
    security(("api_jwt" = []))
)]
pub async fn logout(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<RefreshTokenPayload>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .auth_service
        .logout(&user, payload.refresh.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(MessageResponse {
        message: app_state.i18n_store.translate(&locale.0, "logout_success"),
    }))
}

// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Users",
    responses(
        (status = 200, description = "Perfil do usuário com suas empresas", body = UserResponse),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let response = user_response(&app_state, &locale, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(response))
}

// PATCH/PUT /api/auth/me
#[utoipa::path(
    patch,
    path = "/api/auth/me",
    tag = "Users",
    request_body = UpdateProfilePayload,
    responses(
        (status = 200, description = "Perfil atualizado", body = UserResponse),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_me(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    payload
        .validate()
        .map_err(|e| to_api(AppError::ValidationError(e)))?;

    let user = app_state
        .auth_service
        .update_profile(&user, payload)
        .await
        .map_err(to_api)?;
    let response = user_response(&app_state, &locale, &user).await.map_err(to_api)?;
    Ok(Json(response))
}

// POST /api/auth/me/password
#[utoipa::path(
    post,
    path = "/api/auth/me/password",
    tag = "Users",
    request_body = ChangePasswordPayload,
    responses(
        (status = 200, description = "Senha alterada", body = MessageResponse),
        (status = 400, description = "Senha atual incorreta ou nova senha fraca")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_password(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    payload
        .validate()
        .map_err(|e| to_api(AppError::ValidationError(e)))?;

    app_state
        .auth_service
        .change_password(&user, &payload)
        .await
        .map_err(to_api)?;

    Ok(Json(MessageResponse {
        message: app_state.i18n_store.translate(&locale.0, "password_updated"),
    }))
}
