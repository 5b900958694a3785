//! プロフィールAPI

use super::ApiClient;
use crate::error::Result;
use crate::scanner::ImageCandidate;
use crate::traits::ProfileRemote;
use async_trait::async_trait;
use edu_feed_common::Profile;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct ProfileApi {
    api: ApiClient,
}

impl ProfileApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get(&self) -> Result<Profile> {
        self.api.get("profile").await
    }

    pub async fn update(&self, profile: &Profile) -> Result<Value> {
        self.api.put("profile", profile).await
    }

    /// 写真を multipart の `photo` フィールドで送信
    pub async fn upload_photo(&self, photo: &ImageCandidate) -> Result<Value> {
        let part = Part::bytes(photo.data.clone())
            .file_name(photo.file_name.clone())
            .mime_str(&photo.mime_type)?;
        let form = Form::new().part("photo", part);
        self.api.multipart("profile/photo", form).await
    }

    pub async fn delete_photo(&self) -> Result<Value> {
        self.api.delete("profile/photo").await
    }
}

#[async_trait]
impl ProfileRemote for ProfileApi {
    async fn update_profile(&self, profile: &Profile) -> Result<()> {
        self.update(profile).await?;
        Ok(())
    }
}
