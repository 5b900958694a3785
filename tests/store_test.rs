//! 投稿ストアのテスト
//!
//! 保存・読込の往復と、変更後にメモリと保存内容が一致することを検証

use edu_feed::error::FeedError;
use edu_feed::store::{seed_posts, PostStore};
use edu_feed_common::{ImageRef, Post};
use tempfile::tempdir;

fn sample_post(id: u64) -> Post {
    Post {
        id,
        author: "Vous".into(),
        avatar: "VO".into(),
        time: "Maintenant".into(),
        content: "Premier projet en Rust !".into(),
        likes: 2,
        liked: true,
        comments: 1,
        images: vec![
            ImageRef::Remote { url: "http://localhost:3001/uploads/a.png".into() },
            ImageRef::Local { preview_url: "file:///tmp/b.png".into() },
        ],
    }
}

/// 保存ファイルがなければ初期投稿
#[test]
fn test_load_missing_file_uses_seed() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = PostStore::load(dir.path().join("posts.json")).unwrap();

    assert_eq!(store.posts(), seed_posts().as_slice());
}

/// 壊れたファイルは退避してから初期投稿を使う
#[test]
fn test_load_corrupt_file_is_backed_up() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("posts.json");
    std::fs::write(&path, "{not json").unwrap();

    let mut store = PostStore::load(&path).unwrap();
    assert_eq!(store.len(), 8);

    let backup = dir.path().join("posts.json.bak");
    assert_eq!(std::fs::read_to_string(&backup).unwrap(), "{not json");

    // 次の保存でも退避した内容は残る
    store.prepend(sample_post(99)).unwrap();
    assert_eq!(std::fs::read_to_string(&backup).unwrap(), "{not json");
}

/// 旧フロントエンド形式（`{url, preview}` の画像）を失わずに読める
#[test]
fn test_load_original_image_shape_keeps_posts() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("posts.json");
    std::fs::write(
        &path,
        r#"[{"id": 1712000000000, "author": "Vous", "avatar": "VO", "time": "Maintenant",
            "content": "Mon post", "likes": 0, "comments": 0, "liked": false,
            "images": [{"url": "http://localhost:3001/uploads/a.png",
                        "preview": "http://localhost:3001/uploads/a.png"}]}]"#,
    )
    .unwrap();

    let mut store = PostStore::load(&path).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.posts()[0].content, "Mon post");
    assert_eq!(
        store.posts()[0].images,
        vec![ImageRef::Remote { url: "http://localhost:3001/uploads/a.png".into() }]
    );
    assert!(!dir.path().join("posts.json.bak").exists());

    store.prepend(sample_post(store.next_id(1_700_000_000_000))).unwrap();
    let reloaded = PostStore::load(&path).unwrap();
    assert_eq!(reloaded.len(), 2);
    assert!(reloaded.posts().iter().any(|p| p.content == "Mon post"));
}

/// 保存 → 読込で順序とフィールドが一致
#[test]
fn test_round_trip_preserves_order_and_fields() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("posts.json");

    let mut posts = vec![sample_post(1_700_000_000_000)];
    posts.extend(seed_posts());
    let store = PostStore::with_posts(&path, posts.clone());
    store.save().expect("保存失敗");

    let loaded = PostStore::load(&path).unwrap();
    assert_eq!(loaded.posts(), posts.as_slice());
}

/// 旧形式（`image: null`）の投稿も読める
#[test]
fn test_load_legacy_shape() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("posts.json");
    std::fs::write(
        &path,
        r#"[{"id": 1, "author": "Marie Dubois", "avatar": "MD", "time": "Il y a 2 heures",
            "content": "Bonjour", "likes": 12, "comments": 3, "liked": false, "image": null}]"#,
    )
    .unwrap();

    let store = PostStore::load(&path).unwrap();
    assert_eq!(store.len(), 1);
    assert!(store.posts()[0].images.is_empty());
}

/// 変更ごとに保存内容とメモリが一致
#[test]
fn test_mutations_are_persisted() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("posts.json");
    let mut store = PostStore::load(&path).unwrap();

    store.prepend(sample_post(store.next_id(1_700_000_000_000))).unwrap();
    assert_eq!(PostStore::load(&path).unwrap().posts(), store.posts());

    let liked = store.toggle_like(1).unwrap();
    assert!(liked.liked);
    assert_eq!(liked.likes, 13);
    assert_eq!(PostStore::load(&path).unwrap().posts(), store.posts());

    let removed = store.delete(2).unwrap();
    assert_eq!(removed.author, "Thomas Martin");
    assert_eq!(PostStore::load(&path).unwrap().posts(), store.posts());
    assert!(!dir.path().join("posts.json.tmp").exists());
}

#[test]
fn test_unknown_post_errors() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut store = PostStore::load(dir.path().join("posts.json")).unwrap();

    assert!(matches!(store.toggle_like(404), Err(FeedError::PostNotFound(404))));
    assert!(matches!(store.delete(404), Err(FeedError::PostNotFound(404))));
    assert_eq!(store.len(), 8);
}

/// 書き込みに失敗した変更はメモリにも反映しない
#[test]
fn test_failed_write_keeps_memory_unchanged() {
    let dir = tempdir().expect("Failed to create temp dir");
    // 親がファイルなので書き込めない
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "x").unwrap();
    let mut store = PostStore::with_posts(blocker.join("posts.json"), seed_posts());

    let result = store.prepend(sample_post(99));
    assert!(result.is_err());
    assert_eq!(store.posts(), seed_posts().as_slice());

    assert!(store.toggle_like(1).is_err());
    assert!(!store.get(1).unwrap().liked);
}

#[test]
fn test_reset_restores_seed() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut store = PostStore::with_posts(dir.path().join("posts.json"), vec![sample_post(1)]);

    store.reset().unwrap();
    assert_eq!(store.posts(), seed_posts().as_slice());
}
