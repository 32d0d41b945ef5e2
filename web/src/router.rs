use crate::{
    controller::{
        health_check_controller, home_controller, oauth_controller, private_controller,
    },
    protect, response, AppState,
};
use axum::{middleware::from_fn_with_state, routing::get, Router};

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI document. To be a part
// of the rendered document, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Keycloak Code Flow"
        ),
        paths(
            health_check_controller::health_check,
            home_controller::index,
            oauth_controller::login,
            oauth_controller::callback,
            oauth_controller::exchange_token,
            oauth_controller::introspect,
            oauth_controller::user_info,
            oauth_controller::refresh,
            oauth_controller::logout,
            private_controller::index,
        ),
        components(
            schemas(
                response::flow::FlowView,
                response::flow::PrivateView,
            )
        ),
        tags(
            (name = "keycloak_codeflow", description = "OAuth2 Authorization Code flow against Keycloak")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(home_routes(app_state.clone()))
        .merge(oauth_routes(app_state.clone()))
        .merge(private_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn home_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(home_controller::index))
        .with_state(app_state)
}

fn oauth_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/login", get(oauth_controller::login))
        .route("/callback", get(oauth_controller::callback))
        .route("/exchange-token", get(oauth_controller::exchange_token))
        .route("/get-access-token", get(oauth_controller::exchange_token))
        .route("/introspect", get(oauth_controller::introspect))
        .route("/user-info", get(oauth_controller::user_info))
        .route("/get-user-info", get(oauth_controller::user_info))
        .route("/refresh", get(oauth_controller::refresh))
        .route("/logout", get(oauth_controller::logout))
        .with_state(app_state)
}

fn private_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/private", get(private_controller::index))
        .route("/private/", get(private_controller::index))
        .route("/private/{*path}", get(private_controller::index))
        .route_layer(from_fn_with_state(
            app_state.clone(),
            protect::private::require_access_token,
        ))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header::LOCATION, Request, StatusCode};
    use axum::response::Response;
    use clap::Parser;
    use domain::token_store::{AccessToken, AuthorizationCode, RefreshToken, UserInfo};
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use serde_json::{json, Value};
    use service::config::Config;
    use std::time::{SystemTime, UNIX_EPOCH};
    use tower::ServiceExt;

    const PRIVATE_KEY: &str = include_str!("../../domain/tests/fixtures/rsa_private.pem");
    const PUBLIC_KEY: &str = include_str!("../../domain/tests/fixtures/rsa_public.pem");
    const TOKEN_PATH: &str = "/realms/demo/protocol/openid-connect/token";
    const USERINFO_PATH: &str = "/realms/demo/protocol/openid-connect/userinfo";
    const LOGOUT_PATH: &str = "/realms/demo/protocol/openid-connect/logout";
    const UNREACHABLE: &str = "http://127.0.0.1:1";

    fn app_state(keycloak_base: &str) -> AppState {
        let config = Config::try_parse_from([
            "keycloak_codeflow",
            "--keycloak-base",
            keycloak_base,
            "--keycloak-realm",
            "demo",
            "--keycloak-client-id",
            "demo-client",
            "--keycloak-client-secret",
            "s3cret",
            "--keycloak-realm-public-key",
            PUBLIC_KEY,
        ])
        .unwrap();
        AppState::new(config).unwrap()
    }

    async fn get(app_state: &AppState, uri: &str) -> Response {
        define_routes(app_state.clone())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    fn location(response: &Response) -> String {
        response.headers()[LOCATION].to_str().unwrap().to_string()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn signed_token(exp_offset_secs: i64) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        let claims = json!({
            "sub": "user-1",
            "preferred_username": "alice",
            "exp": now + exp_offset_secs,
        });
        let key = EncodingKey::from_rsa_pem(PRIVATE_KEY.as_bytes()).unwrap();
        encode(&Header::new(Algorithm::RS256), &claims, &key).unwrap()
    }

    #[tokio::test]
    async fn health_check_returns_healthy() {
        let state = app_state(UNREACHABLE);
        let response = get(&state, "/health").await;

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"healthy");
    }

    #[tokio::test]
    async fn private_without_token_redirects_to_login() {
        let state = app_state(UNREACHABLE);

        let response = get(&state, "/private/").await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/login?redirect=/private");
    }

    #[tokio::test]
    async fn private_subpath_without_token_remembers_path() {
        let state = app_state(UNREACHABLE);

        let response = get(&state, "/private/reports/").await;

        assert_eq!(location(&response), "/login?redirect=/private/reports");
    }

    #[tokio::test]
    async fn private_with_expired_token_redirects_home() {
        let state = app_state(UNREACHABLE);
        state.token_store.set(AccessToken, signed_token(-300));

        let response = get(&state, "/private/").await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/");
    }

    #[tokio::test]
    async fn private_with_garbage_token_redirects_home() {
        let state = app_state(UNREACHABLE);
        state.token_store.set(AccessToken, "not-a-jwt".to_string());

        let response = get(&state, "/private/").await;

        assert_eq!(location(&response), "/");
    }

    #[tokio::test]
    async fn private_with_valid_token_is_admitted() {
        let state = app_state(UNREACHABLE);
        state.token_store.set(AccessToken, signed_token(300));

        let response = get(&state, "/private/reports").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"]["sub"], json!("user-1"));
        assert_eq!(body["data"]["path"], json!("/private/reports"));
    }

    #[tokio::test]
    async fn login_then_callback_resumes_at_target() {
        let state = app_state(UNREACHABLE);

        let response = get(&state, "/login?redirect=/private").await;
        assert_eq!(response.status(), StatusCode::FOUND);
        let provider_url = location(&response);
        assert!(provider_url
            .starts_with("http://127.0.0.1:1/realms/demo/protocol/openid-connect/auth?"));
        assert!(provider_url.contains("client_id=demo-client"));
        let login_state = provider_url.split("state=").nth(1).unwrap().to_string();

        let response = get(&state, &format!("/callback?code=abc&state={login_state}")).await;

        assert_eq!(location(&response), "/private");
        assert_eq!(state.token_store.get(AuthorizationCode), Some("abc".to_string()));
    }

    #[tokio::test]
    async fn callback_with_forged_state_discards_code() {
        let state = app_state(UNREACHABLE);

        let response = get(&state, "/callback?code=abc&state=forged").await;

        assert_eq!(location(&response), "/");
        assert_eq!(state.token_store.get(AuthorizationCode), None);
    }

    #[tokio::test]
    async fn callback_without_state_goes_home() {
        let state = app_state(UNREACHABLE);

        let response = get(&state, "/callback?code=abc").await;

        assert_eq!(location(&response), "/");
        assert_eq!(state.token_store.get(AuthorizationCode), Some("abc".to_string()));
    }

    #[tokio::test]
    async fn callback_without_code_redirects_to_login() {
        let state = app_state(UNREACHABLE);

        let response = get(&state, "/callback?error=access_denied").await;

        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn exchange_without_code_redirects_to_login() {
        let state = app_state(UNREACHABLE);

        let response = get(&state, "/exchange-token").await;

        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn exchange_token_stores_tokens() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", TOKEN_PATH)
            .match_body(mockito::Matcher::UrlEncoded(
                "grant_type".into(),
                "authorization_code".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"T","id_token":"I","refresh_token":"R","expires_in":300}"#)
            .create_async()
            .await;
        let state = app_state(&server.url());
        state.token_store.set(AuthorizationCode, "abc".to_string());

        let response = get(&state, "/get-access-token").await;

        mock.assert_async().await;
        assert_eq!(location(&response), "/");
        let tokens = state.token_store.get_all();
        assert_eq!(tokens.access_token.as_deref(), Some("T"));
        assert_eq!(tokens.id_token.as_deref(), Some("I"));
        assert_eq!(tokens.refresh_token.as_deref(), Some("R"));

        let body = json_body(get(&state, "/").await).await;
        assert_eq!(body["data"]["flow_state"], json!("authenticated"));
    }

    #[tokio::test]
    async fn second_exchange_redirects_to_login_without_calling_provider() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", TOKEN_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"T","refresh_token":"R"}"#)
            .expect(1)
            .create_async()
            .await;
        let state = app_state(&server.url());
        state.token_store.set(AuthorizationCode, "abc".to_string());

        let first = get(&state, "/exchange-token").await;
        let second = get(&state, "/exchange-token").await;

        assert_eq!(location(&first), "/");
        assert_eq!(location(&second), "/login");
        mock.assert_async().await;
        assert_eq!(state.token_store.get(AccessToken), Some("T".to_string()));
    }

    #[tokio::test]
    async fn failed_exchange_redirects_home_and_keeps_store() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", TOKEN_PATH)
            .with_status(400)
            .with_body(r#"{"error":"invalid_grant"}"#)
            .create_async()
            .await;
        let state = app_state(&server.url());
        state.token_store.set(AuthorizationCode, "abc".to_string());
        let before = state.token_store.get_all();

        let response = get(&state, "/exchange-token").await;

        assert_eq!(location(&response), "/");
        assert_eq!(state.token_store.get_all(), before);
    }

    #[tokio::test]
    async fn user_info_is_stored() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", USERINFO_PATH)
            .match_header("authorization", "Bearer T")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"sub":"user-1","email":"alice@example.com"}"#)
            .create_async()
            .await;
        let state = app_state(&server.url());
        state.token_store.set(AccessToken, "T".to_string());

        let response = get(&state, "/user-info").await;

        assert_eq!(location(&response), "/");
        let user_info = state.token_store.get(UserInfo).unwrap();
        assert_eq!(user_info["email"], json!("alice@example.com"));
    }

    #[tokio::test]
    async fn logout_clears_store() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", LOGOUT_PATH)
            .with_status(204)
            .create_async()
            .await;
        let state = app_state(&server.url());
        state.token_store.set(AccessToken, "T".to_string());
        state.token_store.set(RefreshToken, "R".to_string());

        let response = get(&state, "/logout").await;

        assert_eq!(location(&response), "/");
        assert!(state.token_store.get_all().is_empty());
    }

    #[tokio::test]
    async fn failed_logout_keeps_store() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", LOGOUT_PATH)
            .with_status(500)
            .create_async()
            .await;
        let state = app_state(&server.url());
        state.token_store.set(RefreshToken, "R".to_string());
        let before = state.token_store.get_all();

        let response = get(&state, "/logout").await;

        assert_eq!(location(&response), "/");
        assert_eq!(state.token_store.get_all(), before);
    }

    #[tokio::test]
    async fn home_reports_anonymous_when_empty() {
        let state = app_state(UNREACHABLE);

        let response = get(&state, "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"]["flow_state"], json!("anonymous"));
        assert_eq!(body["data"]["has_access_token"], json!(false));
    }
}
