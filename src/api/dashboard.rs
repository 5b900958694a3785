//! 学習ダッシュボードAPI（実績・イベント・進捗・コース・スプリント）

use super::ApiClient;
use crate::error::Result;
use crate::traits::SprintRemote;
use async_trait::async_trait;
use edu_feed_common::Sprint;
use serde_json::{json, Value};
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct DashboardApi {
    api: ApiClient,
}

impl DashboardApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn achievements(&self) -> Result<Value> {
        self.api.get("dashboard/achievements").await
    }

    pub async fn events(&self) -> Result<Value> {
        self.api.get("dashboard/events").await
    }

    pub async fn progress(&self) -> Result<Value> {
        self.api.get("dashboard/progress").await
    }

    pub async fn courses(&self) -> Result<Value> {
        self.api.get("dashboard/courses").await
    }

    pub async fn create_sprint(&self, sprint: &Sprint) -> Result<Sprint> {
        self.api.post("dashboard/sprints", sprint).await
    }

    pub async fn update_sprint(&self, sprint: &Sprint) -> Result<Sprint> {
        self.api
            .put(&format!("dashboard/sprints/{}", sprint.id), sprint)
            .await
    }
}

#[async_trait]
impl SprintRemote for DashboardApi {
    async fn list_sprints(&self) -> Result<Vec<Sprint>> {
        self.api.get("dashboard/sprints").await
    }

    async fn get_sprint(&self, sprint_id: u64) -> Result<Sprint> {
        self.api.get(&format!("dashboard/sprints/{}", sprint_id)).await
    }

    #[instrument(skip(self))]
    async fn update_task(&self, sprint_id: u64, task_id: u64, completed: bool) -> Result<()> {
        let _: Value = self
            .api
            .patch(
                &format!("dashboard/sprints/{}/tasks/{}", sprint_id, task_id),
                &json!({ "completed": completed }),
            )
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn add_task(&self, sprint_id: u64, title: &str) -> Result<()> {
        let _: Value = self
            .api
            .post(
                &format!("dashboard/sprints/{}/tasks", sprint_id),
                &json!({ "title": title }),
            )
            .await?;
        Ok(())
    }

    async fn complete_sprint(&self, sprint_id: u64) -> Result<()> {
        let _: Value = self
            .api
            .post(
                &format!("dashboard/sprints/{}/complete", sprint_id),
                &Value::Null,
            )
            .await?;
        info!(sprint_id, "スプリントを完了にしました");
        Ok(())
    }
}
