//! 投稿作成（下書き → 検証 → 画像スクリーニング → 保存）

use crate::error::{FeedError, Result};
use crate::scanner::CandidateSet;
use crate::screening::ScreeningGate;
use crate::store::PostStore;
use chrono::Utc;
use edu_feed_common::{contains_forbidden_words, ImageRef, Post, UploadedImage};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

pub const AUTHOR_NAME: &str = "Vous";
pub const AUTHOR_AVATAR: &str = "VO";
pub const NEW_POST_TIME_LABEL: &str = "Maintenant";

/// 画像アップロードだけが失敗したときの警告
pub const SOFT_UPLOAD_WARNING: &str =
    "画像をアップロードできませんでしたが、テキストのみで投稿を作成しました";

/// 投稿処理の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    TextBlocked,
    ImageScreening,
    Blocked,
    ImageUploadFailedSoft,
    Created,
}

/// 投稿結果
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub post: Post,
    /// 画像なしで作成された場合の警告
    pub warning: Option<String>,
}

/// 投稿の下書き
#[derive(Debug, Default)]
pub struct Composer {
    text: String,
    images: CandidateSet,
    submitting: bool,
    state: SubmissionState,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn images(&self) -> &CandidateSet {
        &self.images
    }

    pub fn images_mut(&mut self) -> &mut CandidateSet {
        &mut self.images
    }

    pub fn add_image(&mut self, path: &Path) -> Result<()> {
        self.images.add_path(path)
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// 投稿を作成してストアの先頭に追加する
    ///
    /// 失敗時は下書きと画像を保持したまま。処理中フラグは常に解除される。
    pub async fn submit(&mut self, store: &mut PostStore, gate: &ScreeningGate) -> Result<SubmitOutcome> {
        if self.submitting {
            return Err(FeedError::SubmissionInProgress);
        }
        self.submitting = true;
        let result = self.run(store, gate).await;
        self.submitting = false;
        result
    }

    #[instrument(skip_all, fields(images = self.images.len()))]
    async fn run(&mut self, store: &mut PostStore, gate: &ScreeningGate) -> Result<SubmitOutcome> {
        self.transition(SubmissionState::Validating);

        if self.text.trim().is_empty() && self.images.is_empty() {
            self.transition(SubmissionState::Idle);
            return Err(FeedError::EmptySubmission);
        }
        if contains_forbidden_words(&self.text) {
            self.transition(SubmissionState::TextBlocked);
            return Err(FeedError::TextBlocked);
        }

        let mut uploaded = Vec::new();
        let mut warning = None;

        if !self.images.is_empty() {
            self.transition(SubmissionState::ImageScreening);
            match gate.screen_and_upload(self.images.as_slice()).await {
                Ok(images) => uploaded = images,
                Err(e) if e.is_blocking() => {
                    self.transition(SubmissionState::Blocked);
                    return Err(e);
                }
                Err(e) => {
                    warn!(error = %e, "画像なしで投稿を続行します");
                    self.transition(SubmissionState::ImageUploadFailedSoft);
                    warning = Some(SOFT_UPLOAD_WARNING.to_string());
                }
            }
        }

        let now_ms = Utc::now().timestamp_millis().max(0) as u64;
        let post = build_post(store.next_id(now_ms), &self.text, &uploaded);
        if let Err(e) = store.prepend(post.clone()) {
            let urls: Vec<&str> = uploaded.iter().map(|img| img.url.as_str()).collect();
            warn!(error = %e, uploaded = ?urls, "投稿を保存できませんでした（アップロード済み画像あり）");
            self.transition(SubmissionState::Idle);
            return Err(e);
        }

        self.transition(SubmissionState::Created);
        info!(post_id = post.id, images = post.images.len(), "投稿を作成しました");

        self.text.clear();
        self.images.clear();
        Ok(SubmitOutcome { post, warning })
    }

    fn transition(&mut self, next: SubmissionState) {
        debug!(from = ?self.state, to = ?next, "submission state");
        self.state = next;
    }
}

fn build_post(id: u64, content: &str, uploaded: &[UploadedImage]) -> Post {
    Post {
        id,
        author: AUTHOR_NAME.into(),
        avatar: AUTHOR_AVATAR.into(),
        time: NEW_POST_TIME_LABEL.into(),
        content: content.to_string(),
        likes: 0,
        liked: false,
        comments: 0,
        images: uploaded
            .iter()
            .map(|img| ImageRef::Remote { url: img.url.clone() })
            .collect(),
    }
}
