//! 認証API

use super::ApiClient;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// ログイン・登録の応答
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub user: Value,
}

#[derive(Debug, Clone)]
pub struct AuthApi {
    api: ApiClient,
}

impl AuthApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        let response: AuthResponse = self.api.post("auth/register", request).await?;
        info!("ユーザー登録完了");
        Ok(response)
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let response: AuthResponse = self.api.post("auth/login", credentials).await?;
        info!("ログイン成功");
        Ok(response)
    }

    pub async fn logout(&self) -> Result<()> {
        let _: Value = self.api.post("auth/logout", &Value::Null).await?;
        Ok(())
    }

    pub async fn me(&self) -> Result<Value> {
        self.api.get("auth/me").await
    }

    pub async fn update_me(&self, user: &Value) -> Result<Value> {
        self.api.put("auth/me", user).await
    }
}
