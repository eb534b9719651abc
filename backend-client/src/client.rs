use crate::error::ApiError;
use crate::error::Result;
use crate::types::AuthResponse;
use crate::types::GroupId;
use crate::types::Member;
use crate::types::MyGroupsResponse;
use crate::types::Profile;
use crate::types::RegisterRequest;
use crate::types::SearchResponse;
use crate::types::UnreadCountMap;
use reqwest::Method;
use reqwest::RequestBuilder;
use reqwest::Response;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use studybuddy_settings::AUTH_USER_KEY;
use studybuddy_settings::SettingsStore;
use tracing::debug;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the study-buddy backend. Cheap to clone; the stored
/// session token is re-read from settings on every request, so a login or
/// logout in one handle is immediately visible to all of them.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    settings: Arc<dyn SettingsStore>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct JoinRequest {
    group_id: GroupId,
}

/// The backend answers errors as `{"error": msg}` on most routes and
/// `{"message": msg}` on a few auth paths; accept either spelling.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, settings: Arc<dyn SettingsStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http,
            base_url,
            settings,
        })
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        let resp = self
            .request(Method::POST, "/register")
            .json(request)
            .send()
            .await?;
        let auth: AuthResponse = decode(resp).await?;
        self.store_session(&auth);
        Ok(auth)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let resp = self
            .request(Method::POST, "/login")
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        let auth: AuthResponse = decode(resp).await?;
        self.store_session(&auth);
        Ok(auth)
    }

    /// Drops the persisted session credentials. Local only; the backend
    /// keeps no session state beyond token expiry.
    pub fn logout(&self) {
        self.settings.clear_session();
    }

    pub async fn profile(&self) -> Result<Profile> {
        let resp = self.request(Method::GET, "/profile").send().await?;
        decode(resp).await
    }

    pub async fn search_groups(&self, subject: &str) -> Result<SearchResponse> {
        let resp = self
            .request(Method::GET, "/groups/search")
            .query(&[("q", subject)])
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn join_group(&self, group_id: GroupId) -> Result<()> {
        let resp = self
            .request(Method::POST, "/groups/join")
            .json(&JoinRequest { group_id })
            .send()
            .await?;
        expect_success(resp).await
    }

    pub async fn group_members(&self, group_id: GroupId) -> Result<Vec<Member>> {
        let resp = self
            .request(Method::GET, &format!("/groups/{group_id}/members"))
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn my_groups(&self) -> Result<MyGroupsResponse> {
        let resp = self.request(Method::GET, "/groups/my-groups").send().await?;
        decode(resp).await
    }

    pub async fn unread_post_counts(&self) -> Result<UnreadCountMap> {
        let resp = self
            .request(Method::GET, "/groups/unread-counts")
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn mark_posts_read(&self, group_id: GroupId) -> Result<()> {
        let resp = self
            .request(Method::POST, &format!("/groups/{group_id}/read"))
            .send()
            .await?;
        expect_success(resp).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        debug!("{method} {url}");
        let mut builder = self.http.request(method, url);
        if let Some(token) = self.settings.auth_token() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    fn store_session(&self, auth: &AuthResponse) {
        self.settings.set_auth_token(&auth.token);
        if let Some(user) = &auth.user
            && let Ok(json) = serde_json::to_string(user)
        {
            self.settings.set(AUTH_USER_KEY, &json);
        }
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    if !resp.status().is_success() {
        return Err(api_error(resp).await);
    }
    Ok(resp.json().await?)
}

async fn expect_success(resp: Response) -> Result<()> {
    if !resp.status().is_success() {
        return Err(api_error(resp).await);
    }
    Ok(())
}

async fn api_error(resp: Response) -> ApiError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.error.or(parsed.message))
        .unwrap_or(body);
    ApiError::Api { status, message }
}
