//! 結合テスト用のインメモリ偽実装

#![allow(dead_code)]

use async_trait::async_trait;
use edu_feed::error::{FeedError, Result};
use edu_feed::scanner::ImageCandidate;
use edu_feed::traits::{AdminNotifier, ImageModerator, ImageUploader, PostAnalyzer, SprintRemote};
use edu_feed_common::{
    AdminAnalysisPayload, ChatAnalysis, ModerationDetail, ModerationVerdict, PostAnalysis, Sprint,
    Task, UploadedImage,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

pub fn png(name: &str) -> ImageCandidate {
    ImageCandidate::from_bytes(name, PNG_HEADER.to_vec()).expect("PNG候補の作成に失敗")
}

/// 呼び出し順の記録
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<&'static str>>>);

impl CallLog {
    pub fn push(&self, name: &'static str) {
        self.0.lock().unwrap().push(name);
    }

    pub fn entries(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }
}

pub fn safe() -> ModerationVerdict {
    ModerationVerdict {
        safe: true,
        analysis: ModerationDetail::default(),
    }
}

pub fn unsafe_because(reason: &str) -> ModerationVerdict {
    ModerationVerdict {
        safe: false,
        analysis: ModerationDetail {
            reason: reason.into(),
            category: "adult".into(),
            confidence: 0.9,
        },
    }
}

#[derive(Clone)]
pub struct FakeModerator {
    /// Noneならネットワーク障害
    pub verdicts: Option<Vec<ModerationVerdict>>,
    pub calls: Arc<AtomicUsize>,
    pub log: CallLog,
}

impl FakeModerator {
    pub fn returning(verdicts: Vec<ModerationVerdict>) -> Self {
        Self {
            verdicts: Some(verdicts),
            calls: Arc::default(),
            log: CallLog::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            verdicts: None,
            calls: Arc::default(),
            log: CallLog::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageModerator for FakeModerator {
    async fn batch_analyze(&self, _images_base64: Vec<String>) -> Result<Vec<ModerationVerdict>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.push("moderate");
        self.verdicts
            .clone()
            .ok_or_else(|| FeedError::Api("connection refused".into()))
    }
}

#[derive(Clone, Default)]
pub struct FakeNotifier {
    pub fail: bool,
    pub payloads: Arc<Mutex<Vec<AdminAnalysisPayload>>>,
}

impl FakeNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<AdminAnalysisPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl AdminNotifier for FakeNotifier {
    async fn send_analysis(&self, payload: &AdminAnalysisPayload) -> Result<()> {
        self.payloads.lock().unwrap().push(payload.clone());
        if self.fail {
            return Err(FeedError::Api("HTTP 500".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct FakeUploader {
    pub fail: bool,
    pub calls: Arc<AtomicUsize>,
    pub log: CallLog,
}

impl FakeUploader {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn with_log(log: CallLog) -> Self {
        Self {
            log,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageUploader for FakeUploader {
    async fn upload(&self, images: &[ImageCandidate]) -> Result<Vec<UploadedImage>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.push("upload");
        if self.fail {
            return Err(FeedError::Upload("Échec du téléchargement des images".into()));
        }
        Ok(images
            .iter()
            .map(|c| UploadedImage {
                url: format!("http://localhost:3001/uploads/{}", c.file_name),
                filename: c.file_name.clone(),
                original_name: c.file_name.clone(),
                size: c.size() as u64,
            })
            .collect())
    }
}

#[derive(Clone, Default)]
pub struct FakeAnalyzer {
    pub unreachable: bool,
}

#[async_trait]
impl PostAnalyzer for FakeAnalyzer {
    async fn check_health(&self) -> Result<()> {
        if self.unreachable {
            return Err(FeedError::Api("Backend non accessible".into()));
        }
        Ok(())
    }

    async fn full_analysis(&self, content: &str, _post_id: u64) -> Result<PostAnalysis> {
        Ok(PostAnalysis {
            chat_analysis: ChatAnalysis {
                response: format!("Analyse: {}", content),
                ..Default::default()
            },
            sentiment: json!({"analysis": {"sentiment": {"label": "neutral"}}}),
            fake_news: json!({"risk_score": 0.2}),
            timestamp: "2024-01-15T10:00:00Z".into(),
            ..Default::default()
        })
    }
}

/// サーバー側のスプリント状態を保持する偽実装
#[derive(Clone, Default)]
pub struct FakeSprintRemote {
    pub server: Arc<Mutex<Vec<Sprint>>>,
    pub fail_mutations: bool,
    pub fail_fetch: bool,
    pub next_task_id: Arc<AtomicUsize>,
}

impl FakeSprintRemote {
    pub fn with_sprints(sprints: Vec<Sprint>) -> Self {
        Self {
            server: Arc::new(Mutex::new(sprints)),
            next_task_id: Arc::new(AtomicUsize::new(100)),
            ..Default::default()
        }
    }

    pub fn server_sprint(&self, id: u64) -> Option<Sprint> {
        self.server.lock().unwrap().iter().find(|s| s.id == id).cloned()
    }
}

#[async_trait]
impl SprintRemote for FakeSprintRemote {
    async fn list_sprints(&self) -> Result<Vec<Sprint>> {
        Ok(self.server.lock().unwrap().clone())
    }

    async fn get_sprint(&self, sprint_id: u64) -> Result<Sprint> {
        if self.fail_fetch {
            return Err(FeedError::Api("HTTP 503".into()));
        }
        self.server_sprint(sprint_id)
            .ok_or(FeedError::SprintNotFound(sprint_id))
    }

    async fn update_task(&self, sprint_id: u64, task_id: u64, completed: bool) -> Result<()> {
        if self.fail_mutations {
            return Err(FeedError::Api("HTTP 500".into()));
        }
        let mut server = self.server.lock().unwrap();
        let sprint = server
            .iter_mut()
            .find(|s| s.id == sprint_id)
            .ok_or(FeedError::SprintNotFound(sprint_id))?;
        sprint.set_task_completed(task_id, completed);
        Ok(())
    }

    async fn add_task(&self, sprint_id: u64, title: &str) -> Result<()> {
        if self.fail_mutations {
            return Err(FeedError::Api("HTTP 500".into()));
        }
        let id = self.next_task_id.fetch_add(1, Ordering::SeqCst) as u64;
        let mut server = self.server.lock().unwrap();
        let sprint = server
            .iter_mut()
            .find(|s| s.id == sprint_id)
            .ok_or(FeedError::SprintNotFound(sprint_id))?;
        sprint.tasks.push(Task {
            id,
            title: title.to_string(),
            completed: false,
        });
        Ok(())
    }

    async fn complete_sprint(&self, sprint_id: u64) -> Result<()> {
        if self.fail_mutations {
            return Err(FeedError::Api("HTTP 500".into()));
        }
        let mut server = self.server.lock().unwrap();
        if let Some(sprint) = server.iter_mut().find(|s| s.id == sprint_id) {
            sprint.status = edu_feed_common::SprintStatus::Completed;
        }
        Ok(())
    }
}
