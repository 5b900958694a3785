//! プロフィール編集

use crate::error::Result;
use crate::optimistic;
use crate::traits::ProfileRemote;
use edu_feed_common::Profile;
use tracing::info;

/// プロフィールをローカルで先に反映し、保存に失敗したら元に戻す
pub async fn update_profile(current: &mut Profile, next: Profile, remote: &dyn ProfileRemote) -> Result<()> {
    let previous = current.clone();
    let pending = next.clone();

    optimistic::apply(
        current,
        |p| *p = pending,
        || remote.update_profile(&next),
        |p| *p = previous,
    )
    .await?;

    info!("プロフィールを更新しました");
    Ok(())
}

/// `key=value` 形式の指定を適用した新しいプロフィールを返す
///
/// `skills` と `languages` はカンマ区切り。
pub fn apply_field(profile: &Profile, key: &str, value: &str) -> Option<Profile> {
    let mut next = profile.clone();
    let value = value.trim().to_string();
    let list = |v: &str| -> Vec<String> {
        v.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    };

    match key {
        "first_name" | "firstName" => next.first_name = value,
        "last_name" | "lastName" => next.last_name = value,
        "email" => next.email = value,
        "phone" => next.phone = value,
        "bio" => next.bio = value,
        "location" => next.location = value,
        "website" => next.website = value,
        "github" => next.github = value,
        "linkedin" => next.linkedin = value,
        "twitter" => next.twitter = value,
        "skills" => next.skills = list(&value),
        "languages" => next.languages = list(&value),
        _ => return None,
    }
    Some(next)
}
