use crate::models::{NoteResponse, SearchResultResponse};
use leptos::logging::warn;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Unauthorized,
    NotFound,
    Conflict,
    Http,
    Network,
    Parse,
    /// Rejected before any request was sent.
    Validation,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: format!("Could not reach the server: {e}"),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: format!("Unexpected response from the server: {e}"),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Validation,
            message: message.into(),
        }
    }

    pub(crate) fn from_status(status: u16, body: &str, ctx: &str) -> Self {
        let detail = error_detail(body);
        let (kind, message) = match status {
            401 => (ApiErrorKind::Unauthorized, "Unauthorized".to_string()),
            404 => (ApiErrorKind::NotFound, format!("{ctx}: not found")),
            409 => (ApiErrorKind::Conflict, format!("{ctx}: {detail}")),
            _ => (ApiErrorKind::Http, format!("{ctx} ({status}): {detail}")),
        };
        Self { kind, message }
    }

    pub(crate) fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }
}

/// Pull `detail` out of a JSON error body, falling back to the raw text.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct CreateNoteRequest {
    pub filename: String,
    pub content: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateNoteRequest {
    pub new_filename: String,
    pub new_content: String,
}

pub(crate) fn note_path(filename: &str) -> String {
    format!("/api/notes/{}", urlencoding::encode(filename))
}

pub(crate) fn search_path(term: &str) -> String {
    format!("/api/search?term={}", urlencoding::encode(term))
}

#[derive(Clone)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: String, token: Option<String>) -> Self {
        Self { base_url, token }
    }

    fn get_auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
        ctx: &str,
    ) -> ApiResult<reqwest::Response> {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);
        let mut req = client.request(method.clone(), url);
        if let Some(header) = self.get_auth_header() {
            req = req.header("Authorization", header);
        }
        if let Some(b) = body {
            req = req.json(b);
        }

        let res = req.send().await.map_err(|e| {
            warn!("{method} {path}: transport error: {e}");
            ApiError::network(e)
        })?;

        if res.status().is_success() {
            Ok(res)
        } else {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            warn!("{method} {path}: HTTP {status}");
            Err(ApiError::from_status(status, &body, ctx))
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
        ctx: &str,
    ) -> ApiResult<T> {
        let res = self.send(method, path, body, ctx).await?;
        res.json().await.map_err(ApiError::parse)
    }

    pub async fn login(&self, username: &str, password: &str) -> ApiResult<TokenResponse> {
        let body = TokenRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        match self
            .request(Method::POST, "/api/token", Some(&body), "Login failed")
            .await
        {
            // Bad credentials come back as 401 here; report them as a login failure.
            Err(e) if e.is_unauthorized() => Err(ApiError {
                kind: ApiErrorKind::Unauthorized,
                message: "Incorrect username or password".to_string(),
            }),
            other => other,
        }
    }

    pub async fn get_notes(&self) -> ApiResult<Vec<NoteResponse>> {
        self.request(Method::GET, "/api/notes", None::<&()>, "Failed to load notes")
            .await
    }

    pub async fn search(&self, term: &str) -> ApiResult<Vec<SearchResultResponse>> {
        self.request(Method::GET, &search_path(term), None::<&()>, "Search failed")
            .await
    }

    pub async fn get_note(&self, filename: &str) -> ApiResult<NoteResponse> {
        self.request(
            Method::GET,
            &note_path(filename),
            None::<&()>,
            "Failed to load note",
        )
        .await
    }

    pub async fn create_note(&self, filename: &str, content: &str) -> ApiResult<NoteResponse> {
        let body = CreateNoteRequest {
            filename: filename.to_string(),
            content: content.to_string(),
        };
        self.request(Method::POST, "/api/notes", Some(&body), "Failed to create note")
            .await
    }

    pub async fn update_note(
        &self,
        filename: &str,
        new_filename: &str,
        new_content: &str,
    ) -> ApiResult<NoteResponse> {
        let body = UpdateNoteRequest {
            new_filename: new_filename.to_string(),
            new_content: new_content.to_string(),
        };
        self.request(
            Method::PATCH,
            &note_path(filename),
            Some(&body),
            "Failed to save note",
        )
        .await
    }

    pub async fn delete_note(&self, filename: &str) -> ApiResult<()> {
        self.send(
            Method::DELETE,
            &note_path(filename),
            None::<&()>,
            "Failed to delete note",
        )
        .await
        .map(|_| ())
    }
}
