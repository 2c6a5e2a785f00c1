// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::logout,

        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::update_me,
        handlers::auth::change_password,

        // --- Companies ---
        handlers::companies::list_companies,
        handlers::companies::create_company,
        handlers::companies::get_company,
        handlers::companies::update_company,
        handlers::companies::delete_company,
        handlers::companies::restore_company,
        handlers::companies::purge_company,

        // --- Themes ---
        handlers::themes::list_themes,
        handlers::themes::get_theme,
        handlers::themes::replace_theme,
        handlers::themes::update_theme,
        handlers::themes::update_colors,
        handlers::themes::reset_to_default,
        handlers::themes::delete_theme,

        // --- Members ---
        handlers::members::list_members,
        handlers::members::add_member,
        handlers::members::get_member,
        handlers::members::update_member,
        handlers::members::remove_member,
        handlers::members::reset_member_password,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserResponse,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::UpdateProfilePayload,
            models::auth::ChangePasswordPayload,
            models::auth::RefreshTokenPayload,
            models::auth::AuthResponse,
            models::auth::RefreshResponse,
            models::auth::MessageResponse,

            // --- Companies ---
            models::company::CompanyResponse,
            models::company::CreateCompanyPayload,
            models::company::UpdateCompanyPayload,

            // --- Members ---
            models::member::MemberRole,
            models::member::UserCompanyResponse,
            models::member::CompanyMemberResponse,
            models::member::CompanyMemberUserResponse,
            models::member::AddMemberPayload,
            models::member::UpdateMemberPayload,
            models::member::ResetMemberPasswordPayload,
            models::member::ResetMemberPasswordResponse,

            // --- Themes ---
            models::theme::ThemeResponse,
            models::theme::ThemeLogos,
            models::theme::ThemeColors,
            models::theme::ThemeText,
            models::theme::ThemeBackground,
            models::theme::UpdateThemePayload,
            models::theme::ColorsPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação, tokens e registro"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Companies", description = "Empresas e o vínculo do usuário com elas"),
        (name = "Themes", description = "Identidade visual de cada empresa"),
        (name = "Members", description = "Gestão de membros da empresa (proprietário e admin)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route_group() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        for path in [
            "/api/auth/login",
            "/api/auth/me/password",
            "/api/companies",
            "/api/companies/{company_uuid}/permanent",
            "/api/companies/themes/{company_uuid}/update_colors",
            "/api/companies/{company_uuid}/members/{member_uuid}/reset-password",
        ] {
            assert!(paths.contains_key(path), "rota sem documentação: {path}");
        }
        let components = doc.components.expect("componentes");
        assert!(components.security_schemes.contains_key("api_jwt"));
    }
}
