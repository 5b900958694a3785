//! edu-feed
//!
//! 教育プラットフォームの投稿フィードクライアント。
//! 投稿前の禁止語チェックと画像モデレーション、ローカル保存、
//! 投稿解析、スプリントタスクの楽観的更新を提供する。

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod feed;
pub mod optimistic;
pub mod profile;
pub mod scanner;
pub mod screening;
pub mod sprint;
pub mod store;
pub mod traits;
