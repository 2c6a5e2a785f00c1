// src/middleware/rbac.rs

use std::collections::HashMap;
use std::marker::PhantomData;

use axum::extract::{FromRef, FromRequestParts, Path};
use axum::http::request::Parts;
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{base::SoftDelete, company::Company, member::MemberRole},
    services::permissions::{can_manage_members, role_allows, Action},
};

const COMPANY_PATH_PARAM: &str = "company_uuid";

/// Regra de acesso a uma rota de empresa.
pub trait AccessPolicy: Send + Sync + 'static {
    /// Empresas apagadas só passam por políticas que as aceitam.
    const ALLOWS_DELETED: bool = false;

    /// Resposta para empresa inexistente (ou escondida do usuário).
    fn not_found() -> AppError {
        AppError::CompanyNotFound
    }

    fn authorize(role: Option<MemberRole>, action: Action) -> Result<MemberRole, AppError>;
}

/// Dados e configurações da empresa: a tabela de papéis, sem esconder a empresa.
pub struct CompanyResourcePolicy;
impl AccessPolicy for CompanyResourcePolicy {
    fn authorize(role: Option<MemberRole>, action: Action) -> Result<MemberRole, AppError> {
        let role = role.ok_or(AppError::Forbidden("company_access_denied"))?;
        if !role_allows(role, action) {
            return Err(AppError::Forbidden("insufficient_role"));
        }
        Ok(role)
    }
}

/// Restaurar e remover de vez: só o proprietário, inclusive de empresa apagada.
pub struct CompanyOwnerPolicy;
impl AccessPolicy for CompanyOwnerPolicy {
    const ALLOWS_DELETED: bool = true;

    fn authorize(role: Option<MemberRole>, _action: Action) -> Result<MemberRole, AppError> {
        match role {
            Some(MemberRole::Owner) => Ok(MemberRole::Owner),
            Some(_) => Err(AppError::Forbidden("insufficient_role")),
            None => Err(AppError::Forbidden("company_access_denied")),
        }
    }
}

/// Tema: quem não é membro recebe 404, sem saber se a empresa existe.
pub struct ThemePolicy;
impl AccessPolicy for ThemePolicy {
    fn not_found() -> AppError {
        AppError::ThemeNotFound
    }

    fn authorize(role: Option<MemberRole>, action: Action) -> Result<MemberRole, AppError> {
        let role = role.ok_or(AppError::ThemeNotFound)?;
        if !role_allows(role, action) {
            return Err(AppError::Forbidden("manage_theme_denied"));
        }
        Ok(role)
    }
}

/// Gestão de membros: proprietário e admin, para qualquer método.
pub struct MemberManagementPolicy;
impl AccessPolicy for MemberManagementPolicy {
    fn authorize(role: Option<MemberRole>, _action: Action) -> Result<MemberRole, AppError> {
        let role = role.ok_or(AppError::Forbidden("company_access_denied"))?;
        if !can_manage_members(role) {
            return Err(AppError::Forbidden("manage_members_denied"));
        }
        Ok(role)
    }
}

/// Extractor (guardião) das rotas `/{company_uuid}/...`: carrega a empresa e
/// aplica a política `P` ao papel do usuário autenticado.
pub struct CompanyAccess<P> {
    pub company: Company,
    pub role: MemberRole,
    _policy: PhantomData<P>,
}

impl<P, S> FromRequestParts<S> for CompanyAccess<P>
where
    P: AccessPolicy,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_headers(&parts.headers);
        let reject = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

        // A. Usuário (inserido pelo auth_guard)
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| reject(AppError::InvalidToken))?;

        // B. Empresa do caminho; UUID malformado é tratado como inexistente
        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|_| reject(P::not_found()))?;
        let company_uuid = params
            .get(COMPANY_PATH_PARAM)
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .ok_or_else(|| reject(P::not_found()))?;

        // C. Vínculo
        let context = app_state
            .company_service
            .access_context(user.0.id, company_uuid)
            .await
            .map_err(reject)?
            .filter(|c| P::ALLOWS_DELETED || !c.company.is_deleted())
            .ok_or_else(|| reject(P::not_found()))?;

        // D. Papel x ação
        let action = Action::from_method(&parts.method);
        let role = P::authorize(context.role, action).map_err(|e| {
            tracing::warn!(
                "Acesso negado ao usuário {} na empresa {} ({:?})",
                user.0.id,
                company_uuid,
                action
            );
            reject(e)
        })?;

        Ok(CompanyAccess {
            company: context.company,
            role,
            _policy: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use MemberRole::*;

    fn status(result: Result<MemberRole, AppError>) -> StatusCode {
        match result {
            Ok(_) => StatusCode::OK,
            Err(e) => e.status_and_code().0,
        }
    }

    #[test]
    fn company_resources_follow_role_table() {
        assert_eq!(status(CompanyResourcePolicy::authorize(Some(Attendant), Action::Read)), StatusCode::OK);
        assert_eq!(status(CompanyResourcePolicy::authorize(Some(Attendant), Action::Write)), StatusCode::FORBIDDEN);
        assert_eq!(status(CompanyResourcePolicy::authorize(Some(Admin), Action::Write)), StatusCode::OK);
        assert_eq!(status(CompanyResourcePolicy::authorize(Some(Admin), Action::Delete)), StatusCode::FORBIDDEN);
        assert_eq!(status(CompanyResourcePolicy::authorize(None, Action::Read)), StatusCode::FORBIDDEN);
    }

    #[test]
    fn themes_hide_existence_from_non_members() {
        assert_eq!(status(ThemePolicy::authorize(None, Action::Read)), StatusCode::NOT_FOUND);
        assert_eq!(ThemePolicy::not_found().status_and_code().1, "theme_not_found");
        assert_eq!(status(ThemePolicy::authorize(Some(Attendant), Action::Write)), StatusCode::FORBIDDEN);
        assert_eq!(status(ThemePolicy::authorize(Some(Admin), Action::Delete)), StatusCode::FORBIDDEN);
        assert_eq!(status(ThemePolicy::authorize(Some(Owner), Action::Delete)), StatusCode::OK);
    }

    #[test]
    fn members_are_managed_by_owner_and_admin() {
        for action in [Action::Read, Action::Write, Action::Delete] {
            assert_eq!(status(MemberManagementPolicy::authorize(Some(Owner), action)), StatusCode::OK);
            assert_eq!(status(MemberManagementPolicy::authorize(Some(Admin), action)), StatusCode::OK);
            assert_eq!(
                status(MemberManagementPolicy::authorize(Some(Attendant), action)),
                StatusCode::FORBIDDEN
            );
        }
    }

    #[test]
    fn owner_policy_accepts_deleted_companies() {
        const { assert!(CompanyOwnerPolicy::ALLOWS_DELETED) };
        const { assert!(!CompanyResourcePolicy::ALLOWS_DELETED) };
        assert_eq!(status(CompanyOwnerPolicy::authorize(Some(Owner), Action::Write)), StatusCode::OK);
        assert_eq!(status(CompanyOwnerPolicy::authorize(Some(Admin), Action::Write)), StatusCode::FORBIDDEN);
    }
}
