use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("設定エラー: {0}")]
    Config(String),

    // ---- 入力検証（ネットワーク呼び出しなし）----
    #[error("テキストまたは画像を追加してください")]
    EmptySubmission,

    #[error("テキストに不適切な内容が検出されました。安全上の理由により投稿をブロックしました")]
    TextBlocked,

    #[error("投稿処理中です。完了するまでお待ちください")]
    SubmissionInProgress,

    #[error("無効な画像ファイル: {0}")]
    InvalidImage(String),

    #[error("添付できる画像は最大{0}枚です")]
    TooManyImages(usize),

    // ---- モデレーション（投稿を破棄）----
    #[error("明示的に禁止された画像が検出されました。投稿をブロックし、管理ダッシュボードへ報告しました")]
    ForbiddenImage,

    #[error("不適切な内容が検出されました: {}。安全上の理由により投稿をブロックしました", .0.join(", "))]
    UnsafeContent(Vec<String>),

    #[error("画像のモデレーションに失敗しました: {0}")]
    ModerationUnavailable(String),

    // ---- 非致命（画像なしで続行）----
    #[error("画像のアップロードに失敗しました: {0}")]
    Upload(String),

    // ---- リモート更新失敗（ローカル変更は巻き戻し済み）----
    #[error("サーバーへの反映に失敗しました。もう一度お試しください: {0}")]
    RemoteMutation(String),

    #[error("API呼び出しエラー: {0}")]
    Api(String),

    #[error("認証が必要です。`edu-feed auth login` でログインしてください")]
    Unauthorized,

    #[error("HTTP通信エラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("投稿が見つかりません: {0}")]
    PostNotFound(u64),

    #[error("フォルダが見つかりません: {}", .0.display())]
    FolderNotFound(PathBuf),

    #[error("スプリントがありません")]
    NoSprint,

    #[error("スプリントが見つかりません: {0}")]
    SprintNotFound(u64),

    #[error("タスクが見つかりません: {0}")]
    TaskNotFound(u64),

    #[error("対話入力エラー: {0}")]
    Prompt(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] edu_feed_common::Error),
}

impl FeedError {
    /// 投稿を中止すべきモデレーションエラーか
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            FeedError::ForbiddenImage
                | FeedError::UnsafeContent(_)
                | FeedError::ModerationUnavailable(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;
