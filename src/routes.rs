// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower::Layer;
use tower_http::{
    cors::CorsLayer,
    normalize_path::{NormalizePath, NormalizePathLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

/// A aplicação servida: `/members/` e `/members` caem na mesma rota.
pub fn build_app(app_state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(app_state))
}

/// Monta o router completo da API.
pub fn build_router(app_state: AppState) -> Router {
    // Define as rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/refresh", post(handlers::auth::refresh));

    // Define as rotas de usuário (protegidas pelo middleware)
    let user_routes = Router::new()
        .route("/logout", post(handlers::auth::logout))
        .route(
            "/me",
            get(handlers::auth::get_me)
                .patch(handlers::auth::update_me)
                .put(handlers::auth::update_me),
        )
        .route("/me/password", post(handlers::auth::change_password));

    // "themes" é um segmento fixo e tem prioridade sobre {company_uuid}
    let company_routes = Router::new()
        .route(
            "/",
            get(handlers::companies::list_companies).post(handlers::companies::create_company),
        )
        .route("/themes", get(handlers::themes::list_themes))
        .route(
            "/themes/{company_uuid}",
            get(handlers::themes::get_theme)
                .put(handlers::themes::replace_theme)
                .patch(handlers::themes::update_theme)
                .delete(handlers::themes::delete_theme),
        )
        .route(
            "/themes/{company_uuid}/update_colors",
            patch(handlers::themes::update_colors),
        )
        .route(
            "/themes/{company_uuid}/reset_to_default",
            post(handlers::themes::reset_to_default),
        )
        .route(
            "/{company_uuid}",
            get(handlers::companies::get_company)
                .patch(handlers::companies::update_company)
                .delete(handlers::companies::delete_company),
        )
        .route("/{company_uuid}/restore", post(handlers::companies::restore_company))
        .route("/{company_uuid}/permanent", delete(handlers::companies::purge_company))
        .route(
            "/{company_uuid}/members",
            get(handlers::members::list_members).post(handlers::members::add_member),
        )
        .route(
            "/{company_uuid}/members/{member_uuid}",
            get(handlers::members::get_member)
                .patch(handlers::members::update_member)
                .delete(handlers::members::remove_member),
        )
        .route(
            "/{company_uuid}/members/{member_uuid}/reset-password",
            post(handlers::members::reset_member_password),
        );

    let protected = Router::new()
        .nest("/api/auth", user_routes)
        .nest("/api/companies", company_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .merge(protected)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::lazy_state;
    use crate::models::auth::TokenType;
    use crate::services::token::tests::{service, user};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("corpo");
        serde_json::from_slice(&bytes).expect("JSON")
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("requisição")
    }

    #[tokio::test]
    async fn health_check() {
        let app = build_router(lazy_state());
        let request = Request::builder().uri("/api/health").body(Body::empty()).expect("requisição");
        let response = app.oneshot(request).await.expect("resposta");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn register_with_mismatched_passwords_is_rejected() {
        let app = build_router(lazy_state());
        let request = post_json(
            "/api/auth/register",
            json!({ "email": "a@x.com", "password": "p1", "password_confirm": "p2" }),
        );

        let response = app.oneshot(request).await.expect("resposta");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["code"], "validation_error");
        assert_eq!(body["details"]["password"][0], "Passwords do not match.");
        assert!(body["details"]["first_name"].is_array());
    }

    #[tokio::test]
    async fn errors_follow_accept_language() {
        let app = build_router(lazy_state());
        let mut request = post_json(
            "/api/auth/register",
            json!({ "email": "a@x.com", "first_name": "Ana", "password": "p1", "password_confirm": "p2" }),
        );
        request
            .headers_mut()
            .insert(header::ACCEPT_LANGUAGE, "pt-BR,pt;q=0.9".parse().expect("header"));

        let body = body_json(app.oneshot(request).await.expect("resposta")).await;
        assert_eq!(body["details"]["password"][0], "As senhas não coincidem.");
    }

    #[tokio::test]
    async fn protected_routes_require_a_token() {
        let app = build_router(lazy_state());
        for uri in ["/api/auth/me", "/api/companies", "/api/companies/themes"] {
            let request = Request::builder().uri(uri).body(Body::empty()).expect("requisição");
            let response = app.clone().oneshot(request).await.expect("resposta");
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
            let body = body_json(response).await;
            assert_eq!(body["code"], "invalid_token");
        }
    }

    #[tokio::test]
    async fn refresh_token_is_not_an_access_token() {
        let app = build_router(lazy_state());
        // Mesmo segredo do estado de teste
        let refresh = service().issue(&user(), TokenType::Refresh).expect("emite");
        let request = Request::builder()
            .uri("/api/auth/me")
            .header(header::AUTHORIZATION, format!("Bearer {refresh}"))
            .body(Body::empty())
            .expect("requisição");

        let response = app.oneshot(request).await.expect("resposta");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn refresh_with_garbage_token_is_unauthorized() {
        let app = build_router(lazy_state());
        let response = app
            .oneshot(post_json("/api/auth/refresh", json!({ "refresh": "garbage" })))
            .await
            .expect("resposta");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["code"], "token_not_valid");
    }

    #[tokio::test]
    async fn refresh_without_token_is_a_bad_request() {
        let app = build_router(lazy_state());
        let response = app
            .oneshot(post_json("/api/auth/refresh", json!({})))
            .await
            .expect("resposta");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "refresh_required");
    }

    #[tokio::test]
    async fn trailing_slash_reaches_the_same_route() {
        let app = build_app(lazy_state());
        for uri in ["/api/health/", "/api/auth/me/"] {
            let request = Request::builder().uri(uri).body(Body::empty()).expect("requisição");
            let response = app.clone().oneshot(request).await.expect("resposta");
            assert_ne!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn malformed_body_uses_the_error_envelope() {
        let app = build_router(lazy_state());
        let response = app
            .clone()
            .oneshot(post_json("/api/auth/register", json!({ "email": 5 })))
            .await
            .expect("resposta");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "validation_error");
        assert_eq!(body["details"]["email"][0], "Invalid value for this field.");

        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT_LANGUAGE, "pt-BR")
            .body(Body::from("{\"email\": "))
            .expect("requisição");
        let response = app.clone().oneshot(request).await.expect("resposta");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(
            body["details"]["non_field_errors"][0],
            "O corpo da requisição não é um JSON válido."
        );

        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .body(Body::from("email=a@x.com"))
            .expect("requisição");
        let response = app.oneshot(request).await.expect("resposta");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["details"]["non_field_errors"].is_array());
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = build_router(lazy_state());
        let request = Request::builder()
            .uri("/api-docs/openapi.json")
            .body(Body::empty())
            .expect("requisição");
        let response = app.oneshot(request).await.expect("resposta");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["paths"]["/api/companies/{company_uuid}/members"].is_object());
    }
}
