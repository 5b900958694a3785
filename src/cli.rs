use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "edu-feed")]
#[command(about = "教育プラットフォームの投稿フィード・スプリント管理クライアント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 投稿を作成（画像はモデレーション後にアップロード）
    Post {
        /// 本文
        #[arg(default_value = "")]
        text: String,

        /// 添付画像（最大5枚、複数指定可）
        #[arg(short, long = "image")]
        images: Vec<PathBuf>,

        /// フォルダ直下の画像をすべて添付
        #[arg(long)]
        image_dir: Option<PathBuf>,
    },

    /// ローカルの禁止語・誤情報チェックのみ実行
    Check {
        #[arg(required = true)]
        text: String,
    },

    /// フィード操作
    Feed {
        #[command(subcommand)]
        action: FeedAction,
    },

    /// スプリント操作
    Sprint {
        #[command(subcommand)]
        action: SprintAction,
    },

    /// 管理ダッシュボード
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },

    /// 認証
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// プロフィール
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// 学習ダッシュボードの情報を表示
    Dashboard {
        #[arg(value_enum)]
        section: DashboardSection,
    },

    /// チャットボットに質問
    Chat {
        #[arg(required = true)]
        message: String,

        /// 会話コンテキスト
        #[arg(long)]
        context: Option<String>,
    },

    /// バックエンドの状態を表示
    Status,

    /// 設定を表示/編集
    Config {
        /// AIサービスのベースURLを設定
        #[arg(long)]
        set_api_url: Option<String>,

        /// 認証トークンを設定
        #[arg(long)]
        set_token: Option<String>,

        /// 認証トークンを削除
        #[arg(long)]
        clear_token: bool,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// 投稿ファイル管理
    Store {
        /// 保存ファイルの情報を表示
        #[arg(long)]
        info: bool,

        /// 初期投稿に戻す
        #[arg(long)]
        reset: bool,

        /// 確認を省略
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum FeedAction {
    /// 投稿一覧
    List {
        /// 表示件数
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// いいねを切り替え
    Like { id: u64 },

    /// 投稿を削除
    Delete {
        id: u64,

        /// 確認を省略
        #[arg(short, long)]
        yes: bool,
    },

    /// 投稿を解析して管理ダッシュボードへ送信
    Analyze { id: u64 },

    /// 投稿を通報
    Report {
        id: u64,

        /// 理由（fake news、不適切な内容、スパム等）
        #[arg(required = true)]
        reason: String,
    },
}

#[derive(Subcommand)]
pub enum SprintAction {
    /// スプリント一覧と進捗
    List,

    /// タスクの完了を切り替え
    Toggle {
        task_id: u64,

        /// 対象スプリント（省略時はアクティブ）
        #[arg(short, long)]
        sprint: Option<u64>,
    },

    /// タスクを追加
    Add {
        #[arg(required = true)]
        title: String,

        /// 対象スプリント（省略時はアクティブ）
        #[arg(short, long)]
        sprint: Option<u64>,
    },

    /// スプリントを完了
    Complete { sprint_id: u64 },
}

#[derive(Subcommand)]
pub enum AdminAction {
    /// 解析統計
    Stats,

    /// 解析の詳細一覧
    Details,

    /// 通報一覧
    Reports,

    /// 解析を削除
    Delete {
        #[arg(required = true)]
        ids: Vec<u64>,
    },

    /// 全解析を削除
    Clear {
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum AuthAction {
    /// ログイン（パスワードは対話入力）
    Login { email: String },

    /// ユーザー登録
    Register {
        email: String,
        first_name: String,
        last_name: String,
    },

    /// ログアウト
    Logout,

    /// ログイン中のユーザー
    Me,
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// プロフィールを表示
    Show,

    /// 項目を更新（skills/languages はカンマ区切り）
    Set { key: String, value: String },

    /// 写真をアップロード
    Photo { path: PathBuf },

    /// 写真を削除
    DeletePhoto,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DashboardSection {
    Achievements,
    Events,
    Progress,
    Courses,
}
