use crate::error::{FeedError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// APIベースURLの上書き用環境変数
pub const API_URL_ENV: &str = "EDU_FEED_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// AIサービス（チャットボット・モデレーション・管理）のベースURL
    pub api_url: String,
    /// ダッシュボード（Express）のベースURL
    pub dashboard_url: String,
    /// 画像アップロードエンドポイント
    pub upload_url: String,
    pub token: Option<String>,
    /// 投稿リストの保存先（未指定ならデータディレクトリ）
    pub store_path: Option<PathBuf>,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000/api".into(),
            dashboard_url: "http://localhost:3001/api".into(),
            upload_url: "http://localhost:3001/api/upload".into(),
            token: None,
            store_path: None,
            timeout_seconds: 10,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        // 環境変数を優先
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_url = url.trim().to_string();
            }
        }

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| FeedError::Config("設定ディレクトリが見つかりません".into()))?;
        Ok(dir.join("edu-feed").join("config.json"))
    }

    /// 投稿リストの保存先
    pub fn resolved_store_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.store_path {
            return Ok(path.clone());
        }
        let dir = dirs::data_dir()
            .ok_or_else(|| FeedError::Config("データディレクトリが見つかりません".into()))?;
        Ok(dir.join("edu-feed").join("posts.json"))
    }

    pub fn set_api_url(&mut self, url: String) -> Result<()> {
        self.api_url = url.trim_end_matches('/').to_string();
        self.save()
    }

    pub fn set_token(&mut self, token: String) -> Result<()> {
        self.token = Some(token);
        self.save()
    }

    /// 401応答時にトークンを破棄
    pub fn clear_token(&mut self) -> Result<()> {
        self.token = None;
        self.save()
    }
}
