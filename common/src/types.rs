//! フィード・解析・スプリントの型定義
//!
//! CLIとクライアント層で共有される型:
//! - Post / ImageRef: 投稿とその画像参照（ローカル保存対象）
//! - ModerationVerdict / UploadedImage: 画像モデレーション・アップロードの応答
//! - PostAnalysis / AdminAnalysisPayload: 投稿解析結果と管理ダッシュボード送信形式
//! - Sprint / Task: ダッシュボードのスプリント
//! - Profile: ユーザープロフィール

use crate::fake_claims::FakeClaimMatch;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 投稿に添付された画像の参照元
///
/// 読み込み時は `kind` タグなしの旧形式 `{url, preview}` も受け付ける
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ImageRef {
    /// アップロード済み（ホストされたURL）
    Remote { url: String },
    /// 未アップロード（ローカルプレビューのみ）
    #[serde(rename_all = "camelCase")]
    Local { preview_url: String },
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum TaggedImageRef {
    Remote { url: String },
    #[serde(rename_all = "camelCase")]
    Local { preview_url: String },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ImageRefRepr {
    Tagged(TaggedImageRef),
    Url(String),
    Legacy {
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        preview: Option<String>,
    },
}

impl<'de> Deserialize<'de> for ImageRef {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let non_empty = |s: Option<String>| s.filter(|s| !s.is_empty());
        match ImageRefRepr::deserialize(deserializer)? {
            ImageRefRepr::Tagged(TaggedImageRef::Remote { url }) => Ok(ImageRef::Remote { url }),
            ImageRefRepr::Tagged(TaggedImageRef::Local { preview_url }) => {
                Ok(ImageRef::Local { preview_url })
            }
            ImageRefRepr::Url(url) => Ok(ImageRef::Remote { url }),
            ImageRefRepr::Legacy { url, preview } => match (non_empty(url), non_empty(preview)) {
                (Some(url), _) => Ok(ImageRef::Remote { url }),
                (None, Some(preview_url)) => Ok(ImageRef::Local { preview_url }),
                (None, None) => Err(serde::de::Error::custom("画像参照に url も preview もありません")),
            },
        }
    }
}

impl ImageRef {
    /// 表示に使うURL
    pub fn display_url(&self) -> &str {
        match self {
            ImageRef::Remote { url } => url,
            ImageRef::Local { preview_url } => preview_url,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ImageRef::Remote { .. })
    }
}

/// 投稿
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// タイムスタンプ由来のID（単調増加）
    pub id: u64,

    pub author: String,

    /// アバターのイニシャル
    #[serde(default)]
    pub avatar: String,

    /// 作成時刻ラベル
    #[serde(default)]
    pub time: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub likes: u32,

    #[serde(default)]
    pub liked: bool,

    #[serde(default)]
    pub comments: u32,

    #[serde(default)]
    pub images: Vec<ImageRef>,
}

impl Post {
    /// いいねを切り替え（件数も連動）
    pub fn toggle_like(&mut self) {
        if self.liked {
            self.likes = self.likes.saturating_sub(1);
        } else {
            self.likes += 1;
        }
        self.liked = !self.liked;
    }
}

/// アップロードエンドポイントが返すホスト済み画像
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadedImage {
    pub url: String,
    pub filename: String,
    #[serde(alias = "originalname")]
    pub original_name: String,
    pub size: u64,
}

/// 画像1枚分のモデレーション判定
///
/// `safe` が欠落した応答は安全とみなさない
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationVerdict {
    pub safe: bool,
    pub analysis: ModerationDetail,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationDetail {
    pub reason: String,
    pub category: String,
    pub confidence: f64,
}

/// チャットボットによる投稿コメント
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatAnalysis {
    #[serde(default)]
    pub response: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// サーバーが返すその他のフィールド
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// 内容の適切性判定
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentAnalysis {
    pub inappropriate: bool,
    pub category: String,
    pub reason: String,
    pub confidence: f64,
}

/// 投稿解析結果
///
/// 再解析時は丸ごと置き換える（部分更新しない）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostAnalysis {
    #[serde(default)]
    pub chat_analysis: ChatAnalysis,

    #[serde(default)]
    pub sentiment: Value,

    #[serde(default)]
    pub fake_news: Value,

    /// ローカル誤情報テーブルとの一致
    #[serde(default)]
    pub fake_news_detected: Vec<FakeClaimMatch>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_analysis: Option<ContentAnalysis>,

    #[serde(default)]
    pub timestamp: String,
}

impl PostAnalysis {
    /// 感情ラベル（応答形状の揺れを吸収）
    pub fn sentiment_label(&self) -> Option<&str> {
        let s = &self.sentiment;
        [
            &s["analysis"]["sentiment"]["label"],
            &s["sentiment"]["label"],
            &s["sentiment"],
            &s["label"],
        ]
        .into_iter()
        .find_map(|v| v.as_str())
        .or(self.chat_analysis.sentiment.as_deref())
    }

    /// 誤情報リスクスコア（0.0〜1.0）
    pub fn fake_news_risk(&self) -> Option<f64> {
        let f = &self.fake_news;
        [
            &f["risk_score"],
            &f["analysis"]["risk_score"],
            &f["confidence"],
        ]
        .into_iter()
        .find_map(|v| v.as_f64())
    }

    /// 管理者の確認が必要か
    pub fn is_flagged(&self) -> bool {
        !self.fake_news_detected.is_empty()
            || self.content_analysis.as_ref().is_some_and(|c| c.inappropriate)
            || self.fake_news["is_fake"].as_bool().unwrap_or(false)
    }
}

/// 管理ダッシュボードへ送る解析データ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminAnalysisPayload {
    pub post_id: u64,
    pub post_content: String,
    pub post_author: String,
    pub analysis: PostAnalysis,
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_case: Option<String>,
}

impl AdminAnalysisPayload {
    pub fn for_post(post: &Post, analysis: PostAnalysis, timestamp: String) -> Self {
        Self {
            post_id: post.id,
            post_content: post.content.clone(),
            post_author: post.author.clone(),
            analysis,
            timestamp,
            kind: "post_analysis".into(),
            special_case: None,
        }
    }
}

/// 投稿の通報
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostReport {
    pub post_id: u64,
    pub post_content: String,
    pub post_author: String,
    pub reason: String,
    #[serde(default)]
    pub analysis_data: Option<PostAnalysis>,
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// スプリントの状態
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SprintStatus {
    #[default]
    Upcoming,
    InProgress,
    Completed,
}

/// スプリント内タスク
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// スプリント
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    pub id: u64,
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, alias = "start_date")]
    pub start_date: String,

    #[serde(default, alias = "end_date")]
    pub end_date: String,

    #[serde(default)]
    pub status: SprintStatus,

    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Sprint {
    pub fn task(&self, task_id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// タスクの完了フラグを設定（存在すればtrue）
    pub fn set_task_completed(&mut self, task_id: u64, completed: bool) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == task_id) {
            Some(task) => {
                task.completed = completed;
                true
            }
            None => false,
        }
    }

    pub fn remove_task(&mut self, task_id: u64) -> Option<Task> {
        let pos = self.tasks.iter().position(|t| t.id == task_id)?;
        Some(self.tasks.remove(pos))
    }
}

/// ユーザープロフィール
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub bio: String,
    pub location: String,
    pub website: String,
    pub github: String,
    pub linkedin: String,
    pub twitter: String,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}
