//! 管理ダッシュボードAPI（解析データ・通報）

use super::ApiClient;
use crate::error::Result;
use crate::traits::AdminNotifier;
use async_trait::async_trait;
use edu_feed_common::{AdminAnalysisPayload, Post, PostAnalysis, PostReport};
use serde_json::{json, Value};
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct AdminApi {
    api: ApiClient,
}

impl AdminApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// 全解析を削除
    pub async fn clear_all_analyses(&self) -> Result<Value> {
        let result = self.api.delete("admin/analysis/clear").await?;
        info!("全解析を削除しました");
        Ok(result)
    }

    #[instrument(skip(self))]
    pub async fn delete_analysis(&self, analysis_id: u64) -> Result<Value> {
        self.api.delete(&format!("admin/analysis/{}", analysis_id)).await
    }

    /// 複数の解析をまとめて削除
    #[instrument(skip(self))]
    pub async fn delete_batch_analyses(&self, analysis_ids: &[u64]) -> Result<Value> {
        self.api
            .send_json(
                reqwest::Method::DELETE,
                "admin/analysis/batch",
                &json!({ "analysis_ids": analysis_ids }),
            )
            .await
    }

    pub async fn analysis_stats(&self) -> Result<Value> {
        self.api.get("admin/analysis/stats").await
    }

    pub async fn detailed_analyses(&self) -> Result<Value> {
        self.api.get("admin/analysis/details").await
    }

    /// 投稿を管理者レビューに通報
    #[instrument(skip(self, post, analysis), fields(post_id = post.id))]
    pub async fn report_post(
        &self,
        post: &Post,
        reason: &str,
        analysis: Option<PostAnalysis>,
        timestamp: String,
    ) -> Result<Value> {
        let report = PostReport {
            post_id: post.id,
            post_content: post.content.clone(),
            post_author: post.author.clone(),
            reason: reason.to_string(),
            analysis_data: analysis,
            timestamp,
            kind: "post_report".into(),
        };
        self.api.post("admin/reports", &report).await
    }

    pub async fn reported_posts(&self) -> Result<Value> {
        self.api.get("admin/reports").await
    }
}

#[async_trait]
impl AdminNotifier for AdminApi {
    #[instrument(skip_all, fields(post_id = payload.post_id, kind = %payload.kind))]
    async fn send_analysis(&self, payload: &AdminAnalysisPayload) -> Result<()> {
        let _: Value = self.api.post("admin/analysis", payload).await?;
        info!("解析データを管理ダッシュボードへ送信しました");
        Ok(())
    }
}
