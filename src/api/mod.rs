//! REST APIクライアント
//!
//! 各サービス（認証・チャットボット・モデレーション・解析・管理・
//! ダッシュボード・プロフィール・アップロード）の薄いラッパー。
//! 共通処理（ベースURL、Bearerトークン、エラー本文の解釈）は `ApiClient` に集約。

pub mod admin;
pub mod analysis;
pub mod auth;
pub mod chatbot;
pub mod dashboard;
pub mod moderation;
pub mod profile;
pub mod upload;

pub use admin::AdminApi;
pub use analysis::AnalysisApi;
pub use auth::AuthApi;
pub use chatbot::ChatbotApi;
pub use dashboard::DashboardApi;
pub use moderation::ModerationApi;
pub use profile::ProfileApi;
pub use upload::UploadApi;

use crate::config::Config;
use crate::error::{FeedError, Result};
use edu_feed_common::extract_error_message;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// ベースURLとトークンを保持するHTTPクライアント
///
/// `Client` は内部でArc共有されるためcloneは軽い
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    /// 同じ接続設定で別のベースURLを使う
    pub fn with_base_url(&self, base_url: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: self.token.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 相対パスをURLに変換（絶対URLはそのまま）
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!(%method, %url, "API request");
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request(Method::GET, path).send().await?;
        Self::handle(response).await
    }

    pub(crate) async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.request(method, path).json(body).send().await?;
        Self::handle(response).await
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(Method::POST, path, body).await
    }

    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(Method::PUT, path, body).await
    }

    pub(crate) async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(Method::PATCH, path, body).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request(Method::DELETE, path).send().await?;
        Self::handle(response).await
    }

    pub(crate) async fn multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T> {
        let response = self.request(Method::POST, path).multipart(form).send().await?;
        Self::handle(response).await
    }

    /// ステータスを確認して本文をデシリアライズ
    async fn handle<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = Self::check(response).await?;
        if body.trim().is_empty() {
            // 空本文は null として扱う（`()` や `Value` 向け）
            return Ok(serde_json::from_str("null")?);
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// 成功なら本文を返し、失敗ならサーバーのエラーメッセージを取り出す
    pub(crate) async fn check(response: Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(FeedError::Unauthorized);
        }
        if !status.is_success() {
            let message = extract_error_message(&body)
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(FeedError::Api(message));
        }
        Ok(body)
    }
}

/// 設定から組み立てた全サービス
#[derive(Debug, Clone)]
pub struct Services {
    pub auth: AuthApi,
    pub chatbot: ChatbotApi,
    pub moderation: ModerationApi,
    pub analysis: AnalysisApi,
    pub admin: AdminApi,
    pub dashboard: DashboardApi,
    pub profile: ProfileApi,
    pub upload: UploadApi,
}

impl Services {
    pub fn from_config(config: &Config) -> Result<Self> {
        let ai = ApiClient::new(
            &config.api_url,
            config.token.clone(),
            Duration::from_secs(config.timeout_seconds),
        )?;
        let express = ai.with_base_url(&config.dashboard_url);

        Ok(Self {
            auth: AuthApi::new(express.clone()),
            chatbot: ChatbotApi::new(ai.clone()),
            moderation: ModerationApi::new(ai.clone()),
            analysis: AnalysisApi::new(ai.clone()),
            admin: AdminApi::new(ai),
            dashboard: DashboardApi::new(express.clone()),
            profile: ProfileApi::new(express.clone()),
            upload: UploadApi::new(express, &config.upload_url),
        })
    }
}
