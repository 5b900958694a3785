//! APIレスポンスパーサー
//!
//! バックエンドごとに形状が揺れる応答（アップロード、バッチモデレーション、
//! エラー本文）を共通の型に正規化する

use crate::error::{Error, Result};
use crate::types::{ModerationVerdict, UploadedImage};
use serde_json::Value;

/// エラー本文からメッセージを抽出
///
/// 抽出優先順位:
/// 1. `{"error": "..."}`（Express）
/// 2. `{"detail": "..."}`（FastAPI）
/// 3. `{"message": "..."}`
///
/// # Examples
/// ```
/// use edu_feed_common::extract_error_message;
///
/// let body = r#"{"error": "Aucun fichier uploadé"}"#;
/// assert_eq!(extract_error_message(body).as_deref(), Some("Aucun fichier uploadé"));
/// ```
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error", "detail", "message"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

/// アップロード応答をパース
///
/// Express版は `{"urls": [...]}`、FastAPI版は `{"files": [...]}` を返す
pub fn parse_upload_response(body: &str) -> Result<Vec<UploadedImage>> {
    let value: Value = serde_json::from_str(body)?;
    let list = value
        .get("urls")
        .or_else(|| value.get("files"))
        .cloned()
        .ok_or_else(|| Error::Parse("アップロード応答にURLがありません".into()))?;

    let images: Vec<UploadedImage> = serde_json::from_value(list)
        .map_err(|e| Error::Parse(format!("アップロード応答のパースエラー: {}", e)))?;

    if images.iter().any(|img| img.url.is_empty()) {
        return Err(Error::Parse("URLが空の画像があります".into()));
    }
    Ok(images)
}

/// バッチモデレーション応答をパース
///
/// `{"results": [...]}` または生の配列を受け付ける
pub fn parse_batch_moderation(body: &str) -> Result<Vec<ModerationVerdict>> {
    let value: Value = serde_json::from_str(body)?;
    let list = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => map
            .remove("results")
            .ok_or_else(|| Error::Parse("モデレーション応答にresultsがありません".into()))?,
        _ => return Err(Error::Parse("モデレーション応答の形式が不正です".into())),
    };

    serde_json::from_value(list)
        .map_err(|e| Error::Parse(format!("モデレーション応答のパースエラー: {}", e)))
}
