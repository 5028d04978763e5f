// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! reqwest implementation of [`AuthApi`].

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use super::{ApiError, AuthApi};
use crate::models::{Credentials, LoginResponse, RegisterResponse, Registration, User};

const LOGIN_PATH: &str = "auth/login/";
const REGISTER_PATH: &str = "auth/register/";
const CURRENT_USER_PATH: &str = "users/me/";

/// Longest error body kept in [`ApiError::Status`].
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    base_url: Url,
    http: Client,
}

impl HttpAuthApi {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// `timeout` bounds every request; a hung server surfaces as
    /// [`ApiError::Timeout`].
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = parse_base_url(base_url)?;

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: truncate(body, MAX_ERROR_BODY),
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}

impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let url = self.endpoint(LOGIN_PATH)?;
        self.send_json(self.http.post(url).json(credentials)).await
    }

    async fn register(&self, registration: &Registration) -> Result<RegisterResponse, ApiError> {
        let url = self.endpoint(REGISTER_PATH)?;
        self.send_json(self.http.post(url).json(registration)).await
    }

    async fn current_user(&self, token: &str) -> Result<User, ApiError> {
        let url = self.endpoint(CURRENT_USER_PATH)?;
        self.send_json(self.http.get(url).bearer_auth(token)).await
    }
}

/// Parse the API root, forcing a trailing slash so relative joins keep the
/// last path segment (`.../api` + `users/me/` → `.../api/users/me/`).
fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let mut url = Url::parse(raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidUrl(format!("{raw}: not a base URL")));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn map_transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Network(e.to_string())
    }
}

fn truncate(mut body: String, max: usize) -> String {
    if body.len() > max {
        let mut cut = max;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::testing::token_for;
    use axum::{
        http::{header::AUTHORIZATION, HeaderMap, StatusCode},
        response::{IntoResponse, Response},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    async fn login_handler(Json(body): Json<Value>) -> Response {
        if body["email"] == "buyer@example.com" && body["password"] == "secret" {
            Json(json!({ "access": token_for("u1", "buyer"), "refresh": "r" })).into_response()
        } else {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "detail": "No active account found with the given credentials" })),
            )
                .into_response()
        }
    }

    async fn register_handler(Json(body): Json<Value>) -> Response {
        let role = body["role"].as_str().unwrap_or("buyer").to_string();
        Json(json!({
            "token": token_for("u2", &role),
            "user": {
                "id": "u2",
                "username": body["username"],
                "email": body["email"],
                "role": role,
            }
        }))
        .into_response()
    }

    async fn me_handler(headers: HeaderMap) -> Response {
        let expected = format!("Bearer {}", token_for("u1", "buyer"));
        match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
            Some(value) if value == expected => Json(json!({
                "id": "u1",
                "email": "buyer@example.com",
                "role": "buyer",
                "avatar": null
            }))
            .into_response(),
            _ => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "detail": "Given token not valid for any token type" })),
            )
                .into_response(),
        }
    }

    async fn slow_handler() -> Response {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Json(json!({})).into_response()
    }

    async fn malformed_handler() -> &'static str {
        "<html>not json</html>"
    }

    /// Serve `app` under `/api` on an ephemeral port and return the API root.
    async fn spawn_server(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, Router::new().nest("/api", app))
                .await
                .unwrap();
        });
        format!("http://{addr}/api")
    }

    fn marketplace_api() -> Router {
        Router::new()
            .route("/auth/login/", post(login_handler))
            .route("/auth/register/", post(register_handler))
            .route("/users/me/", get(me_handler))
    }

    fn client(base: &str) -> HttpAuthApi {
        HttpAuthApi::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let api = client("http://localhost:8000/api");
        assert_eq!(api.base_url().as_str(), "http://localhost:8000/api/");
        assert_eq!(
            api.endpoint(CURRENT_USER_PATH).unwrap().as_str(),
            "http://localhost:8000/api/users/me/"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = HttpAuthApi::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "ééé".to_string();
        assert_eq!(truncate(body, 3), "é");
    }

    #[tokio::test]
    async fn login_returns_access_token() {
        let api = client(&spawn_server(marketplace_api()).await);
        let response = api
            .login(&Credentials::new("buyer@example.com", "secret"))
            .await
            .unwrap();
        assert_eq!(response.access, token_for("u1", "buyer"));
        assert_eq!(response.refresh.as_deref(), Some("r"));
    }

    #[tokio::test]
    async fn login_with_bad_password_reports_status() {
        let api = client(&spawn_server(marketplace_api()).await);
        let err = api
            .login(&Credentials::new("buyer@example.com", "wrong"))
            .await
            .unwrap_err();
        match err {
            ApiError::Status { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("No active account"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn register_returns_token_and_user() {
        let api = client(&spawn_server(marketplace_api()).await);
        let response = api
            .register(&Registration {
                username: "sam".to_string(),
                email: "sam@example.com".to_string(),
                password: "pw".to_string(),
                role: Some(Role::Seller),
            })
            .await
            .unwrap();
        assert_eq!(response.user.role, Role::Seller);
        assert_eq!(response.user.username, "sam");
        assert_eq!(response.token, token_for("u2", "seller"));
    }

    #[tokio::test]
    async fn current_user_sends_bearer_token() {
        let api = client(&spawn_server(marketplace_api()).await);
        let user = api.current_user(&token_for("u1", "buyer")).await.unwrap();
        assert_eq!(user.id.as_str(), "u1");
        assert_eq!(user.role, Role::Buyer);

        let err = api.current_user("expired").await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 401, .. }));
    }

    #[tokio::test]
    async fn non_json_body_is_invalid_response() {
        let app = Router::new().route("/users/me/", get(malformed_handler));
        let api = client(&spawn_server(app).await);
        let err = api.current_user("t").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn hung_server_times_out() {
        let app = Router::new().route("/users/me/", get(slow_handler));
        let base = spawn_server(app).await;
        let api = HttpAuthApi::new(&base, Duration::from_millis(200)).unwrap();
        let err = api.current_user("t").await.unwrap_err();
        assert_eq!(err, ApiError::Timeout);
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        // Bind then drop to obtain a port with no listener
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = client(&format!("http://{addr}/api"));
        let err = api.current_user("t").await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }
}
