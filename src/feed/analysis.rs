//! 投稿解析（ローカル誤情報照合 + リモート解析 + 管理ダッシュボード送信）

use crate::error::{FeedError, Result};
use crate::traits::{AdminNotifier, PostAnalyzer};
use chrono::Utc;
use edu_feed_common::{detect_fake_claims, AdminAnalysisPayload, Post, PostAnalysis};
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// 解析1回分の結果
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub analysis: PostAnalysis,
    /// 管理ダッシュボードへの送信に成功したか
    pub admin_notified: bool,
}

/// 投稿IDごとの最新解析（メモリのみ）
#[derive(Debug, Clone, Default)]
pub struct AnalysisBook {
    entries: HashMap<u64, PostAnalysis>,
}

impl AnalysisBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, post_id: u64) -> Option<&PostAnalysis> {
        self.entries.get(&post_id)
    }

    /// 既存の解析は丸ごと置き換える
    pub fn insert(&mut self, post_id: u64, analysis: PostAnalysis) {
        self.entries.insert(post_id, analysis);
    }

    pub fn remove(&mut self, post_id: u64) -> Option<PostAnalysis> {
        self.entries.remove(&post_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 投稿を解析して記録する
    pub async fn analyze(
        &mut self,
        post: &Post,
        analyzer: &dyn PostAnalyzer,
        notifier: &dyn AdminNotifier,
    ) -> Result<AnalysisOutcome> {
        let outcome = analyze_post(post, analyzer, notifier).await?;
        self.insert(post.id, outcome.analysis.clone());
        Ok(outcome)
    }
}

/// 投稿を解析し、結果を管理ダッシュボードへ送る
///
/// 送信失敗は警告のみで、解析結果は返す。
#[instrument(skip_all, fields(post_id = post.id))]
pub async fn analyze_post(
    post: &Post,
    analyzer: &dyn PostAnalyzer,
    notifier: &dyn AdminNotifier,
) -> Result<AnalysisOutcome> {
    let detected = detect_fake_claims(&post.content);

    analyzer
        .check_health()
        .await
        .map_err(|e| FeedError::Api(format!("解析サービスに接続できません: {}", e)))?;

    let mut analysis = analyzer.full_analysis(&post.content, post.id).await?;
    analysis.fake_news_detected = detected;

    let payload = AdminAnalysisPayload::for_post(post, analysis.clone(), Utc::now().to_rfc3339());
    let admin_notified = match notifier.send_analysis(&payload).await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "解析は完了しましたが管理ダッシュボードへの送信に失敗しました");
            false
        }
    };

    info!(
        fake_claims = analysis.fake_news_detected.len(),
        admin_notified, "投稿を解析しました"
    );
    Ok(AnalysisOutcome {
        analysis,
        admin_notified,
    })
}
