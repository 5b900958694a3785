//! 投稿解析API（チャットボット所見・感情・誤情報）

use super::ApiClient;
use crate::error::Result;
use crate::traits::PostAnalyzer;
use async_trait::async_trait;
use chrono::Utc;
use edu_feed_common::{ChatAnalysis, PostAnalysis};
use serde_json::{json, Value};
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct AnalysisApi {
    api: ApiClient,
}

impl AnalysisApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// チャットボットに投稿の所見を求める
    pub async fn analyze_post(&self, content: &str, post_id: u64) -> Result<ChatAnalysis> {
        let body = json!({
            "message": format!("Analyse ce post et donne une réponse détaillée : \"{}\"", content),
            "context": "post_analysis",
            "user_id": post_id.to_string(),
        });
        self.api.post("chatbot/chat", &body).await
    }

    pub async fn analyze_sentiment(&self, content: &str) -> Result<Value> {
        let body = json!({
            "message": content,
            "context": "sentiment_analysis",
            "priority": "normal",
        });
        self.api.post("messages/analyze", &body).await
    }

    pub async fn check_fake_news(&self, content: &str, source: Option<&str>) -> Result<Value> {
        let body = json!({
            "content": content,
            "source": source,
            "metadata": { "type": "social_post" },
        });
        self.api.post("fake-news/detect", &body).await
    }

    /// 解析サービスの死活確認
    pub async fn health(&self) -> Result<Value> {
        self.api.get("health").await
    }
}

#[async_trait]
impl PostAnalyzer for AnalysisApi {
    async fn check_health(&self) -> Result<()> {
        self.health().await?;
        Ok(())
    }

    /// 所見 → 感情 → 誤情報 の順に逐次実行
    #[instrument(skip(self, content))]
    async fn full_analysis(&self, content: &str, post_id: u64) -> Result<PostAnalysis> {
        let chat_analysis = self.analyze_post(content, post_id).await?;
        let sentiment = self.analyze_sentiment(content).await?;
        let fake_news = self.check_fake_news(content, None).await?;

        Ok(PostAnalysis {
            chat_analysis,
            sentiment,
            fake_news,
            fake_news_detected: Vec::new(),
            content_analysis: None,
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}
