//! チャットボットAPI

use super::ApiClient;
use crate::error::Result;
use edu_feed_common::ChatAnalysis;
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct ChatbotApi {
    api: ApiClient,
}

impl ChatbotApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn chat(
        &self,
        message: &str,
        user_id: Option<&str>,
        context: Option<&str>,
    ) -> Result<ChatAnalysis> {
        let body = json!({
            "message": message,
            "user_id": user_id,
            "context": context,
        });
        self.api.post("chatbot/chat", &body).await
    }

    /// 回答をチューターAIで確認
    pub async fn check_answer(
        &self,
        question: &str,
        answer: &str,
        context: Option<&str>,
    ) -> Result<Value> {
        let body = json!({
            "question": question,
            "answer": answer,
            "context": context,
        });
        self.api.post("chatbot/tutor", &body).await
    }

    pub async fn suggestions(&self, topic: &str) -> Result<Value> {
        self.api.get(&format!("chatbot/suggestions/{}", topic)).await
    }

    pub async fn health(&self) -> Result<Value> {
        self.api.get("health").await
    }

    pub async fn metrics(&self) -> Result<Value> {
        self.api.get("metrics").await
    }
}
