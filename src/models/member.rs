// src/models/member.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::{trimmed, validate_password_length};
use crate::models::base::{impl_soft_delete, SoftDelete};
use crate::models::company::{Company, CompanyResponse};
use crate::models::theme::{CompanyTheme, ThemeResponse};

/// Papel do usuário dentro de uma empresa, em ordem decrescente de privilégio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "member_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Admin,
    #[default]
    Attendant,
}

impl MemberRole {
    /// Chave de tradução do nome de exibição.
    pub fn i18n_key(self) -> &'static str {
        match self {
            MemberRole::Owner => "role_owner",
            MemberRole::Admin => "role_admin",
            MemberRole::Attendant => "role_attendant",
        }
    }
}

// ---
// CompanyMember (a "ponte" usuário-empresa)
// ---
#[derive(Debug, Clone, FromRow)]
pub struct CompanyMember {
    pub id: i64,
    pub uuid: Uuid,
    pub user_id: i64,
    pub company_id: i64,
    pub role: MemberRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_soft_delete!(CompanyMember);

impl CompanyMember {
    /// Vínculo que concede acesso: ativo e não apagado.
    pub fn grants_access(&self) -> bool {
        self.is_active && self.deleted_at.is_none()
    }
}

// Membro com os dados resumidos do usuário (JOIN com users)
#[derive(Debug, Clone, FromRow)]
pub struct MemberWithUser {
    pub id: i64,
    pub uuid: Uuid,
    pub company_id: i64,
    pub role: MemberRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub user_id: i64,
    pub user_email: String,
    pub user_first_name: String,
    pub user_last_name: String,
    pub user_phone: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyMemberUserResponse {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyMemberResponse {
    pub uuid: Uuid,
    pub role: MemberRole,
    #[schema(example = "Administrador")]
    pub role_display: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub user: CompanyMemberUserResponse,
}

impl CompanyMemberResponse {
    pub fn new(member: &MemberWithUser, role_display: String) -> Self {
        let full_name = format!("{} {}", member.user_first_name, member.user_last_name)
            .trim()
            .to_string();
        Self {
            uuid: member.uuid,
            role: member.role,
            role_display,
            is_active: member.is_active,
            created_at: member.created_at,
            user: CompanyMemberUserResponse {
                id: member.user_id,
                email: member.user_email.clone(),
                first_name: member.user_first_name.clone(),
                last_name: member.user_last_name.clone(),
                full_name: if full_name.is_empty() { member.user_email.clone() } else { full_name },
                phone: member.user_phone.clone(),
            },
        }
    }
}

/// Um vínculo ativo do usuário com a empresa e o tema dela.
#[derive(Debug, Clone)]
pub struct UserCompany {
    pub membership: CompanyMember,
    pub company: Company,
    pub theme: Option<CompanyTheme>,
}

// Empresa do usuário, com seu papel e o tema resolvido (aninhado em /me e no login)
#[derive(Debug, Serialize, ToSchema)]
pub struct UserCompanyResponse {
    pub uuid: Uuid,
    pub company: CompanyResponse,
    pub role: MemberRole,
    pub role_display: String,
    pub theme: Option<ThemeResponse>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl UserCompanyResponse {
    pub fn new(entry: &UserCompany, role_display: String, media_base: &str) -> Self {
        let theme = entry
            .theme
            .as_ref()
            .filter(|t| !t.is_deleted())
            .map(|t| ThemeResponse::resolved(t, media_base));
        Self {
            uuid: entry.membership.uuid,
            company: CompanyResponse::new(&entry.company, media_base),
            role: entry.membership.role,
            role_display,
            theme,
            is_active: entry.membership.is_active,
            created_at: entry.membership.created_at,
        }
    }
}

// POST /companies/{uuid}/members
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddMemberPayload {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "atendente@padaria.com")]
    pub email: String,

    #[validate(length(max = 150, message = "too_long"))]
    pub first_name: Option<String>,

    #[validate(length(max = 150, message = "too_long"))]
    pub last_name: Option<String>,

    #[validate(length(max = 20, message = "too_long"))]
    pub phone: Option<String>,

    #[serde(default)]
    pub role: MemberRole,

    /// Sem senha, o usuário novo recebe uma senha aleatória.
    #[validate(length(max = 128, message = "too_long"))]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMemberPayload {
    pub role: MemberRole,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetMemberPasswordPayload {
    #[serde(default)]
    #[validate(custom(function = "validate_password_length"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResetMemberPasswordResponse {
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_wire_format_is_lowercase() {
        assert_eq!(serde_json::to_value(MemberRole::Owner).expect("serializa"), "owner");
        let role: MemberRole = serde_json::from_value(serde_json::json!("attendant")).expect("desserializa");
        assert_eq!(role, MemberRole::Attendant);
        assert!(serde_json::from_value::<MemberRole>(serde_json::json!("manager")).is_err());
    }

    #[test]
    fn add_member_defaults_to_attendant() {
        let payload: AddMemberPayload =
            serde_json::from_value(serde_json::json!({ "email": "b@x.com" })).expect("desserializa");
        assert_eq!(payload.role, MemberRole::Attendant);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn reset_password_length_bounds() {
        let short = ResetMemberPasswordPayload { password: "1234567".into() };
        assert!(short.validate().is_err());
        let ok = ResetMemberPasswordPayload { password: "12345678".into() };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn deleted_theme_is_omitted_from_user_company() {
        use crate::models::theme::ThemeValues;

        let company = crate::models::company::tests::company();
        let membership = CompanyMember {
            id: 1,
            uuid: Uuid::new_v4(),
            user_id: 3,
            company_id: company.id,
            role: MemberRole::Owner,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };
        let theme = CompanyTheme {
            id: 9,
            uuid: Uuid::new_v4(),
            company_id: company.id,
            values: ThemeValues::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: Some(Utc::now()),
        };
        let mut entry = UserCompany { membership, company, theme: Some(theme) };
        assert!(UserCompanyResponse::new(&entry, "Owner".into(), "").theme.is_none());

        if let Some(theme) = entry.theme.as_mut() {
            theme.deleted_at = None;
        }
        let response = UserCompanyResponse::new(&entry, "Owner".into(), "");
        assert_eq!(response.theme.expect("tema ativo").colors.primary, "#1976D2");
    }

    #[test]
    fn member_response_full_name() {
        let row = MemberWithUser {
            id: 1,
            uuid: Uuid::new_v4(),
            company_id: 2,
            role: MemberRole::Admin,
            is_active: true,
            created_at: Utc::now(),
            user_id: 3,
            user_email: "b@x.com".into(),
            user_first_name: "Bruno".into(),
            user_last_name: "Lima".into(),
            user_phone: None,
        };
        let response = CompanyMemberResponse::new(&row, "Admin".into());
        assert_eq!(response.user.full_name, "Bruno Lima");
        assert_eq!(response.role, MemberRole::Admin);
    }
}
