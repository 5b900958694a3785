//! 楽観的更新ヘルパー
//!
//! ローカルを先に変更し、リモート反映に失敗したら巻き戻す。

use crate::error::{FeedError, Result};
use std::future::Future;
use tracing::warn;

/// `apply` → `commit` の順に実行し、`commit` 失敗時は `rollback` を適用する
///
/// 失敗は `FeedError::RemoteMutation` として返す（`Unauthorized` はそのまま）。
pub async fn apply<T, A, C, Fut, R>(target: &mut T, apply: A, commit: C, rollback: R) -> Result<()>
where
    A: FnOnce(&mut T),
    C: FnOnce() -> Fut,
    Fut: Future<Output = Result<()>>,
    R: FnOnce(&mut T),
{
    apply(target);
    match commit().await {
        Ok(()) => Ok(()),
        Err(e) => {
            warn!(error = %e, "リモート反映に失敗したためローカル変更を戻します");
            rollback(target);
            Err(match e {
                FeedError::Unauthorized => FeedError::Unauthorized,
                other => FeedError::RemoteMutation(other.to_string()),
            })
        }
    }
}
