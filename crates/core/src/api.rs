use std::time::Duration;

use parking_lot::Mutex;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult};
use crate::model::{
    Category, Period, StatsReport, Task, TaskDraft, TaskFilters, TaskPage, TaskPatch, User,
};
use crate::session::{Session, SessionStore};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Typed wrapper around the task store's HTTP surface.
///
/// One method per server operation, with uniform handling everywhere else:
/// the current bearer token rides on every request, a 401 from any endpoint
/// clears the persisted session and comes back as
/// [`ApiError::SessionExpired`], and no call is ever retried.
pub struct ApiClient {
    http: Client,
    base_url: String,
    store: SessionStore,
    token: Mutex<Option<String>>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> ApiResult<Self> {
        let store = SessionStore::new(config.session_path().to_path_buf());
        Self::with_store(config.api_url().to_string(), store)
    }

    /// Build a client over an explicit session store; the saved token, if
    /// any, is picked up immediately.
    pub fn with_store(base_url: String, store: SessionStore) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        let token = store.load()?.map(|session| session.token);
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
            token: Mutex::new(token),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.lock().is_some()
    }

    /// Identity from the persisted session, without a round-trip.
    pub fn saved_session(&self) -> ApiResult<Option<Session>> {
        self.store.load()
    }

    // --- auth -----------------------------------------------------------

    /// Exchange credentials for a token, fetch the identity behind it, and
    /// persist both. A 401 here means bad credentials, not an expired
    /// session, so it surfaces as a plain request failure.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<Session> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let token: TokenResponse = read_json(check_public(response).await?).await?;

        *self.token.lock() = Some(token.access_token.clone());
        let user = self.me().await?;
        let session = Session {
            token: token.access_token,
            user,
        };
        self.store.save(&session)?;
        tracing::debug!(email, "logged in");
        Ok(session)
    }

    /// Create an account, then log straight in with the same credentials.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> ApiResult<Session> {
        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(&json!({
                "name": name,
                "email": email,
                "password": password,
                "again_password": password,
            }))
            .send()
            .await?;
        let _: User = read_json(check_public(response).await?).await?;
        self.login(email, password).await
    }

    pub async fn me(&self) -> ApiResult<User> {
        let response = self.request(Method::GET, "/auth/me").send().await?;
        self.handle(response).await
    }

    /// Forget the token and the persisted session.
    pub fn logout(&self) -> ApiResult<()> {
        *self.token.lock() = None;
        self.store.clear()
    }

    // --- tasks ----------------------------------------------------------

    pub async fn list_tasks(&self, filters: &TaskFilters) -> ApiResult<TaskPage> {
        let response = self
            .request(Method::GET, "/tasks/")
            .query(&filters.query_pairs())
            .send()
            .await?;
        self.handle(response).await
    }

    pub async fn create_task(&self, draft: &TaskDraft) -> ApiResult<Task> {
        let response = self
            .request(Method::POST, "/tasks/")
            .json(draft)
            .send()
            .await?;
        self.handle(response).await
    }

    pub async fn update_task(&self, id: i64, patch: &TaskPatch) -> ApiResult<Task> {
        let response = self
            .request(Method::PUT, &format!("/tasks/{}", id))
            .json(patch)
            .send()
            .await?;
        self.handle(response).await
    }

    /// Flip `completed` server-side and take the server's word for the new
    /// state rather than guessing it locally.
    pub async fn toggle_completion(&self, id: i64) -> ApiResult<Task> {
        let response = self
            .request(Method::PATCH, &format!("/tasks/{}/toggle", id))
            .send()
            .await?;
        self.handle(response).await
    }

    pub async fn delete_task(&self, id: i64) -> ApiResult<()> {
        let response = self
            .request(Method::DELETE, &format!("/tasks/{}", id))
            .send()
            .await?;
        self.check(response).await?;
        Ok(())
    }

    pub async fn stats(&self, period: Option<Period>) -> ApiResult<StatsReport> {
        let mut request = self.request(Method::GET, "/tasks/stats");
        if let Some(period) = period {
            request = request.query(&[("period", period.as_str())]);
        }
        let response = request.send().await?;
        self.handle(response).await
    }

    pub async fn tasks_by_category(
        &self,
        category: Category,
        skip: Option<u32>,
        limit: Option<u32>,
    ) -> ApiResult<TaskPage> {
        let response = self
            .request(Method::GET, &format!("/tasks/category/{}", category))
            .query(&page_pairs(skip, limit))
            .send()
            .await?;
        self.handle(response).await
    }

    pub async fn tasks_by_period(
        &self,
        period: Period,
        skip: Option<u32>,
        limit: Option<u32>,
    ) -> ApiResult<TaskPage> {
        let response = self
            .request(Method::GET, &format!("/tasks/period/{}", period))
            .query(&page_pairs(skip, limit))
            .send()
            .await?;
        self.handle(response).await
    }

    // --- plumbing -------------------------------------------------------

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(%method, path, "task store request");
        let mut builder = self.http.request(method, self.url(path));
        if let Some(token) = self.token.lock().clone() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn handle<T: DeserializeOwned>(&self, response: Response) -> ApiResult<T> {
        read_json(self.check(response).await?).await
    }

    /// Map a non-success status onto the error taxonomy. A 401 forces
    /// logout: the token and the persisted session are gone by the time the
    /// caller sees [`ApiError::SessionExpired`].
    async fn check(&self, response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            self.drop_session();
            return Err(ApiError::SessionExpired);
        }
        Err(classify(status, read_detail(response).await))
    }

    fn drop_session(&self) {
        *self.token.lock() = None;
        if let Err(err) = self.store.clear() {
            tracing::warn!(error = %err, "failed to clear session after 401");
        }
    }
}

/// Status mapping for the unauthenticated auth endpoints, where a 401 is an
/// answer ("bad credentials"), not an expired session.
async fn check_public(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(classify(status, read_detail(response).await))
}

fn classify(status: StatusCode, message: String) -> ApiError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ApiError::Validation(message),
        _ => ApiError::Request {
            status: status.as_u16(),
            message,
        },
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|err| ApiError::Transport(format!("unreadable response body: {}", err)))
}

/// Pull the store's `detail` field out of an error body. The field is a
/// string on handled errors and a list of objects on schema rejections;
/// anything absent or malformed falls back to a status-derived message.
async fn read_detail(response: Response) -> String {
    let status = response.status();
    let detail = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.detail)
        .and_then(|detail| match detail {
            Value::String(message) => Some(message),
            Value::Array(items) => items
                .first()
                .and_then(|item| item.get("msg"))
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        });
    detail.unwrap_or_else(|| format!("HTTP error {}", status.as_u16()))
}

fn page_pairs(skip: Option<u32>, limit: Option<u32>) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if let Some(skip) = skip {
        pairs.push(("skip", skip.to_string()));
    }
    if let Some(limit) = limit {
        pairs.push(("limit", limit.to_string()));
    }
    pairs
}
