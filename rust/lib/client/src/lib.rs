//! HTTP client for the calculator service's account endpoints.
//!
//! Every authenticated call takes an explicit [`Session`]; the client itself
//! holds no credentials.
//!
//! # Usage
//!
//! ```ignore
//! use calcdesk_client::{HttpProfileApi, ProfileApi, Session};
//!
//! let api = HttpProfileApi::new("http://localhost:8000");
//! let profile = api.get_profile(&Session::new(token)).await?;
//! ```

pub mod session;

use calcdesk_core::{
    AccessToken, Calculation, LoginRequest, PasswordChange, Profile, ProfileError, ProfileUpdate,
};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde::de::DeserializeOwned;

pub use session::{MemoryStorage, Session, SessionStorage, StorageError, TOKEN_KEY};

// ── Error ───────────────────────────────────────────────────────────

/// Client-side API error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response. `detail` is the string `detail` of a
    /// `{"detail": ...}` body when there is one.
    #[error("HTTP {status}: {}", .detail.as_deref().unwrap_or("<no detail>"))]
    Server { status: u16, detail: Option<String> },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode (HTTP {status}): {message}")]
    Decode { status: u16, message: String },
}

impl From<ApiError> for ProfileError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Server { status, detail } => ProfileError::ServerRejected { status, detail },
            ApiError::Network(e) => ProfileError::Network(e.to_string()),
            ApiError::Decode { status, .. } => ProfileError::ServerRejected { status, detail: None },
        }
    }
}

/// Pull a human-readable `detail` out of an error body.
///
/// Only a string `detail` counts; validation errors that carry a list of
/// field errors yield `None`.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(|d| d.as_str())
        .map(str::to_string)
}

// ── ProfileApi ──────────────────────────────────────────────────────

/// The account endpoints the profile screen talks to.
#[async_trait::async_trait]
pub trait ProfileApi: Send + Sync + 'static {
    /// `POST /login`. Unauthenticated.
    async fn login(&self, req: &LoginRequest) -> Result<AccessToken, ApiError>;

    /// `GET /profile`.
    async fn get_profile(&self, session: &Session) -> Result<Profile, ApiError>;

    /// `PUT /profile`.
    async fn update_profile(&self, session: &Session, update: &ProfileUpdate) -> Result<Profile, ApiError>;

    /// `POST /change-password`.
    async fn change_password(&self, session: &Session, req: &PasswordChange) -> Result<(), ApiError>;

    /// `GET /calculations/`.
    async fn list_calculations(&self, session: &Session) -> Result<Vec<Calculation>, ApiError>;
}

/// reqwest-backed [`ProfileApi`].
pub struct HttpProfileApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpProfileApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer token and JSON content type.
    fn authed(&self, builder: reqwest::RequestBuilder, session: &Session) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(session.token())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
    }

    /// Fail on non-2xx, returning the response otherwise.
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(ApiError::Server {
            status: status.as_u16(),
            detail: extract_detail(&body),
        })
    }

    /// Parse an API response, mapping HTTP errors to `ApiError`.
    async fn parse<R: DeserializeOwned>(resp: reqwest::Response) -> Result<R, ApiError> {
        let resp = Self::check(resp).await?;
        let status = resp.status().as_u16();
        resp.json::<R>().await.map_err(|e| ApiError::Decode {
            status,
            message: format!("response body: {}", e),
        })
    }
}

#[async_trait::async_trait]
impl ProfileApi for HttpProfileApi {
    async fn login(&self, req: &LoginRequest) -> Result<AccessToken, ApiError> {
        tracing::debug!(email = %req.email, "POST /login");
        let resp = self.http.post(self.url("/login")).json(req).send().await?;
        Self::parse(resp).await
    }

    async fn get_profile(&self, session: &Session) -> Result<Profile, ApiError> {
        tracing::debug!("GET /profile");
        let req = self.authed(self.http.get(self.url("/profile")), session);
        Self::parse(req.send().await?).await
    }

    async fn update_profile(&self, session: &Session, update: &ProfileUpdate) -> Result<Profile, ApiError> {
        tracing::debug!("PUT /profile");
        let req = self.authed(self.http.put(self.url("/profile")), session).json(update);
        Self::parse(req.send().await?).await
    }

    async fn change_password(&self, session: &Session, req: &PasswordChange) -> Result<(), ApiError> {
        tracing::debug!("POST /change-password");
        let builder = self.authed(self.http.post(self.url("/change-password")), session).json(req);
        Self::check(builder.send().await?).await?;
        Ok(())
    }

    async fn list_calculations(&self, session: &Session) -> Result<Vec<Calculation>, ApiError> {
        tracing::debug!("GET /calculations/");
        let req = self.authed(self.http.get(self.url("/calculations/")), session);
        Self::parse(req.send().await?).await
    }
}
