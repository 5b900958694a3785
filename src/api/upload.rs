//! 画像アップロードAPI（multipart）

use super::ApiClient;
use crate::error::{FeedError, Result};
use crate::scanner::ImageCandidate;
use crate::traits::ImageUploader;
use async_trait::async_trait;
use edu_feed_common::{parse_upload_response, UploadedImage};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use tracing::{info, instrument};

/// multipartのフィールド名
const FIELD_NAME: &str = "images";

#[derive(Debug, Clone)]
pub struct UploadApi {
    api: ApiClient,
    url: String,
}

impl UploadApi {
    pub fn new(api: ApiClient, url: &str) -> Self {
        Self {
            api,
            url: url.to_string(),
        }
    }

    fn build_form(images: &[ImageCandidate]) -> Result<Form> {
        let mut form = Form::new();
        for image in images {
            let part = Part::bytes(image.data.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.mime_type)?;
            form = form.part(FIELD_NAME, part);
        }
        Ok(form)
    }

    async fn try_upload(&self, images: &[ImageCandidate]) -> Result<Vec<UploadedImage>> {
        let form = Self::build_form(images)?;
        let response = self
            .api
            .request(Method::POST, &self.url)
            .multipart(form)
            .send()
            .await?;
        let body = ApiClient::check(response).await?;
        Ok(parse_upload_response(&body)?)
    }
}

#[async_trait]
impl ImageUploader for UploadApi {
    /// 失敗はすべて `FeedError::Upload`（非致命）として返す
    #[instrument(skip_all, fields(count = images.len()))]
    async fn upload(&self, images: &[ImageCandidate]) -> Result<Vec<UploadedImage>> {
        let uploaded = self
            .try_upload(images)
            .await
            .map_err(|e| FeedError::Upload(e.to_string()))?;
        info!("{}枚アップロード完了", uploaded.len());
        Ok(uploaded)
    }
}
