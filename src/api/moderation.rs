//! 画像コンテンツモデレーションAPI

use super::ApiClient;
use crate::error::Result;
use crate::scanner::ImageCandidate;
use crate::traits::ImageModerator;
use async_trait::async_trait;
use edu_feed_common::{parse_batch_moderation, ModerationVerdict};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct ModerationApi {
    api: ApiClient,
}

impl ModerationApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// 1枚の画像を判定
    #[instrument(skip(self, image), fields(file = %image.file_name))]
    pub async fn analyze_image(
        &self,
        image: &ImageCandidate,
        user_id: Option<&str>,
    ) -> Result<ModerationVerdict> {
        let body = json!({
            "image_data": image.to_base64(),
            "user_id": user_id,
            "context": "post_upload",
        });
        self.api.post("content/analyze-image", &body).await
    }

    /// モデレーション統計
    pub async fn stats(&self) -> Result<Value> {
        self.api.get("content/stats").await
    }
}

#[async_trait]
impl ImageModerator for ModerationApi {
    #[instrument(skip_all, fields(count = images_base64.len()))]
    async fn batch_analyze(&self, images_base64: Vec<String>) -> Result<Vec<ModerationVerdict>> {
        let response = self
            .api
            .request(Method::POST, "content/batch-analyze")
            .json(&images_base64)
            .send()
            .await?;
        let body = ApiClient::check(response).await?;
        let verdicts = parse_batch_moderation(&body)?;
        info!("モデレーション判定 {}件", verdicts.len());
        Ok(verdicts)
    }
}
