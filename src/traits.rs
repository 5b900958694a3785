//! リモートサービスの境界（ポート）
//!
//! 投稿・スプリント・プロフィールのロジックはこれらのトレイト越しに
//! リモートを呼ぶ。実装は `api` モジュール、テストではインメモリの偽実装。

use crate::error::Result;
use crate::scanner::ImageCandidate;
use async_trait::async_trait;
use edu_feed_common::{AdminAnalysisPayload, ModerationVerdict, PostAnalysis, Profile, Sprint, UploadedImage};

/// 画像モデレーション（バッチ判定）
#[async_trait]
pub trait ImageModerator: Send + Sync {
    /// base64画像をまとめて判定し、入力順の判定を返す
    async fn batch_analyze(&self, images_base64: Vec<String>) -> Result<Vec<ModerationVerdict>>;
}

/// 管理ダッシュボードへの解析データ送信
#[async_trait]
pub trait AdminNotifier: Send + Sync {
    async fn send_analysis(&self, payload: &AdminAnalysisPayload) -> Result<()>;
}

/// 画像アップロード
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(&self, images: &[ImageCandidate]) -> Result<Vec<UploadedImage>>;
}

/// 投稿本文のリモート解析
#[async_trait]
pub trait PostAnalyzer: Send + Sync {
    /// 解析バックエンドの到達確認
    async fn check_health(&self) -> Result<()> {
        Ok(())
    }

    async fn full_analysis(&self, content: &str, post_id: u64) -> Result<PostAnalysis>;
}

/// ダッシュボードのスプリント操作
#[async_trait]
pub trait SprintRemote: Send + Sync {
    async fn list_sprints(&self) -> Result<Vec<Sprint>>;
    async fn get_sprint(&self, sprint_id: u64) -> Result<Sprint>;
    async fn update_task(&self, sprint_id: u64, task_id: u64, completed: bool) -> Result<()>;
    async fn add_task(&self, sprint_id: u64, title: &str) -> Result<()>;
    async fn complete_sprint(&self, sprint_id: u64) -> Result<()>;
}

/// プロフィールの保存
#[async_trait]
pub trait ProfileRemote: Send + Sync {
    async fn update_profile(&self, profile: &Profile) -> Result<()>;
}
