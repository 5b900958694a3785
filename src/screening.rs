//! 画像スクリーニングゲート
//!
//! 禁止ファイル名の検出 → バッチモデレーション → アップロード の順に処理する。
//! モデレーションが完了するまでアップロードは開始しない。

use crate::error::{FeedError, Result};
use crate::scanner::ImageCandidate;
use crate::traits::{AdminNotifier, ImageModerator, ImageUploader};
use chrono::Utc;
use edu_feed_common::{AdminAnalysisPayload, ChatAnalysis, ContentAnalysis, PostAnalysis, UploadedImage};
use rayon::prelude::*;
use tracing::{info, instrument, warn};

/// このファイル名を含む画像は無条件で拒否する
pub const FORBIDDEN_MARKER: &str = "mia.jpg";

pub struct ScreeningGate {
    moderator: Box<dyn ImageModerator>,
    notifier: Box<dyn AdminNotifier>,
    uploader: Box<dyn ImageUploader>,
}

impl ScreeningGate {
    pub fn new(
        moderator: Box<dyn ImageModerator>,
        notifier: Box<dyn AdminNotifier>,
        uploader: Box<dyn ImageUploader>,
    ) -> Self {
        Self {
            moderator,
            notifier,
            uploader,
        }
    }

    /// 画像を検査し、すべて安全ならアップロードしてホスト済みURLを返す
    ///
    /// `ForbiddenImage` / `UnsafeContent` / `ModerationUnavailable` は投稿中止、
    /// `Upload` は画像なしで続行可能なエラー。
    #[instrument(skip_all, fields(count = images.len()))]
    pub async fn screen_and_upload(&self, images: &[ImageCandidate]) -> Result<Vec<UploadedImage>> {
        if images.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(forbidden) = images.iter().find(|c| is_forbidden_name(&c.file_name)) {
            warn!(file = %forbidden.file_name, "禁止画像を検出しました");
            let payload = forbidden_image_report(Utc::now().timestamp_millis().max(0) as u64);
            if let Err(e) = self.notifier.send_analysis(&payload).await {
                warn!(error = %e, "禁止画像の報告送信に失敗しました");
            }
            return Err(FeedError::ForbiddenImage);
        }

        let encoded: Vec<String> = images.par_iter().map(|c| c.to_base64()).collect();

        let verdicts = self
            .moderator
            .batch_analyze(encoded)
            .await
            .map_err(|e| FeedError::ModerationUnavailable(e.to_string()))?;

        if verdicts.len() < images.len() {
            return Err(FeedError::ModerationUnavailable(format!(
                "判定数が不足しています ({}/{})",
                verdicts.len(),
                images.len()
            )));
        }

        let reasons: Vec<String> = verdicts
            .iter()
            .filter(|v| !v.safe)
            .map(|v| v.analysis.reason.clone())
            .collect();
        if !reasons.is_empty() {
            return Err(FeedError::UnsafeContent(reasons));
        }
        info!("全画像が安全と判定されました");

        self.uploader.upload(images).await.map_err(|e| match e {
            FeedError::Upload(_) => e,
            other => FeedError::Upload(other.to_string()),
        })
    }
}

pub fn is_forbidden_name(file_name: &str) -> bool {
    file_name.to_lowercase().contains(FORBIDDEN_MARKER)
}

/// 禁止画像の投稿試行を管理ダッシュボードへ報告する形式
pub fn forbidden_image_report(attempt_id: u64) -> AdminAnalysisPayload {
    let timestamp = Utc::now().to_rfc3339();
    let analysis = PostAnalysis {
        chat_analysis: ChatAnalysis {
            response: "Image détectée - contenu explicitement interdit. Publication bloquée pour des raisons de sécurité.".into(),
            sentiment: Some("negative".into()),
            category: Some("forbidden_content".into()),
            confidence: Some(1.0),
            extra: Default::default(),
        },
        content_analysis: Some(ContentAnalysis {
            inappropriate: true,
            category: "forbidden_image".into(),
            reason: "Image interdite - contenu explicitement interdit".into(),
            confidence: 1.0,
        }),
        timestamp: timestamp.clone(),
        ..Default::default()
    };

    AdminAnalysisPayload {
        post_id: attempt_id,
        post_content: "Tentative de publication avec image interdite".into(),
        post_author: "Utilisateur".into(),
        analysis,
        timestamp,
        kind: "post_analysis".into(),
        special_case: Some("forbidden_image".into()),
    }
}
