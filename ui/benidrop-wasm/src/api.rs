//! HTTP API client.
//!
//! `RewardsApi` is the seam between the controller and the backend;
//! `HttpApi` implements it with `gloo-net` against the configured base URL.

use async_trait::async_trait;
use bd_api_types::{
    CompleteTaskRequest, ErrorBody, LeaderboardEntry, ProjectWallet, RewardResponse,
    SubmitWalletRequest, Task, UseReferralRequest, UserPatch,
};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

#[async_trait(?Send)]
pub trait RewardsApi {
    /// GET /user/{id}
    async fn user(&self, telegram_id: &str) -> Result<UserPatch, ApiError>;
    /// GET /tasks
    async fn tasks(&self) -> Result<Vec<Task>, ApiError>;
    /// GET /leaderboard
    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ApiError>;
    /// GET /project-wallet
    async fn project_wallet(&self) -> Result<ProjectWallet, ApiError>;
    /// POST /submit-wallet
    async fn submit_wallet(&self, req: &SubmitWalletRequest) -> Result<(), ApiError>;
    /// POST /daily-check-in/{id}
    async fn daily_check_in(&self, telegram_id: &str) -> Result<RewardResponse, ApiError>;
    /// POST /complete-task
    async fn complete_task(&self, req: &CompleteTaskRequest) -> Result<(), ApiError>;
    /// POST /register?telegram_id=..&username=..
    async fn register(
        &self,
        telegram_id: &str,
        username: Option<&str>,
    ) -> Result<UserPatch, ApiError>;
    /// POST /use-referral
    async fn use_referral(&self, req: &UseReferralRequest) -> Result<RewardResponse, ApiError>;
}

pub struct HttpApi {
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = Request::get(&self.url(path)).send().await?;
        decode(resp).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: serde::Serialize,
        T: DeserializeOwned,
    {
        let resp = Request::post(&self.url(path)).json(body)?.send().await?;
        decode(resp).await
    }

    /// POST where only the status matters; the body is not decoded.
    async fn post_json_unit<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let resp = Request::post(&self.url(path)).json(body)?.send().await?;
        check(resp).await.map(|_| ())
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = Request::post(&self.url(path)).send().await?;
        decode(resp).await
    }
}

/// Map non-2xx to `ApiError::Status`, keeping the backend's `detail`.
async fn check(resp: Response) -> Result<Response, ApiError> {
    if resp.ok() {
        return Ok(resp);
    }
    let status = resp.status();
    let detail = resp
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|b| b.detail);
    Err(ApiError::Status { status, detail })
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let resp = check(resp).await?;
    Ok(resp.json::<T>().await?)
}

// ── Paths ──

fn user_path(telegram_id: &str) -> String {
    format!("/user/{}", urlencoding::encode(telegram_id))
}

fn daily_check_in_path(telegram_id: &str) -> String {
    format!("/daily-check-in/{}", urlencoding::encode(telegram_id))
}

fn register_path(telegram_id: &str, username: Option<&str>) -> String {
    let mut path = format!("/register?telegram_id={}", urlencoding::encode(telegram_id));
    if let Some(name) = username {
        path.push_str("&username=");
        path.push_str(&urlencoding::encode(name));
    }
    path
}

#[async_trait(?Send)]
impl RewardsApi for HttpApi {
    async fn user(&self, telegram_id: &str) -> Result<UserPatch, ApiError> {
        self.get(&user_path(telegram_id)).await
    }

    async fn tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.get("/tasks").await
    }

    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ApiError> {
        self.get("/leaderboard").await
    }

    async fn project_wallet(&self) -> Result<ProjectWallet, ApiError> {
        self.get("/project-wallet").await
    }

    async fn submit_wallet(&self, req: &SubmitWalletRequest) -> Result<(), ApiError> {
        self.post_json_unit("/submit-wallet", req).await
    }

    async fn daily_check_in(&self, telegram_id: &str) -> Result<RewardResponse, ApiError> {
        self.post_empty(&daily_check_in_path(telegram_id)).await
    }

    async fn complete_task(&self, req: &CompleteTaskRequest) -> Result<(), ApiError> {
        self.post_json_unit("/complete-task", req).await
    }

    async fn register(
        &self,
        telegram_id: &str,
        username: Option<&str>,
    ) -> Result<UserPatch, ApiError> {
        self.post_empty(&register_path(telegram_id, username)).await
    }

    async fn use_referral(&self, req: &UseReferralRequest) -> Result<RewardResponse, ApiError> {
        self.post_json("/use-referral", req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn urls_join_base_and_path() {
        let api = HttpApi::new("http://localhost:8000/api");
        assert_eq!(api.url("/tasks"), "http://localhost:8000/api/tasks");
        assert_eq!(api.url("/leaderboard"), "http://localhost:8000/api/leaderboard");
        assert_eq!(api.url("/project-wallet"), "http://localhost:8000/api/project-wallet");
    }

    #[test]
    fn configured_base_reaches_the_client() {
        let (config, _) = Config::from_pairs([("apiBase", "https://api.example.org/api/")]);
        let api = HttpApi::new(config.api_base);
        assert_eq!(
            api.url(&user_path("42")),
            "https://api.example.org/api/user/42"
        );
    }

    #[test]
    fn user_and_check_in_paths_carry_the_id() {
        assert_eq!(user_path("42"), "/user/42");
        assert_eq!(daily_check_in_path("42"), "/daily-check-in/42");
        // ids are opaque text; anything path-breaking is escaped
        assert_eq!(user_path("a/b"), "/user/a%2Fb");
    }

    #[test]
    fn register_path_encodes_query_values() {
        assert_eq!(register_path("42", None), "/register?telegram_id=42");
        assert_eq!(
            register_path("42", Some("alice")),
            "/register?telegram_id=42&username=alice"
        );
        assert_eq!(
            register_path("42", Some("tom & jerry")),
            "/register?telegram_id=42&username=tom%20%26%20jerry"
        );
    }
}
