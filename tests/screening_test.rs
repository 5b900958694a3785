//! 画像スクリーニングゲートのテスト
//!
//! 禁止画像・モデレーション・アップロードの順序と失敗時の挙動を検証

mod common;

use common::*;
use edu_feed::error::FeedError;
use edu_feed::screening::ScreeningGate;

fn gate(moderator: &FakeModerator, notifier: &FakeNotifier, uploader: &FakeUploader) -> ScreeningGate {
    ScreeningGate::new(
        Box::new(moderator.clone()),
        Box::new(notifier.clone()),
        Box::new(uploader.clone()),
    )
}

/// 禁止ファイル名は中身に関係なくブロックされ、アップロードに到達しない
#[tokio::test]
async fn test_forbidden_name_short_circuits() {
    for name in ["mia.jpg", "MIA.JPG", "vacances_Mia.Jpg"] {
        let moderator = FakeModerator::returning(vec![safe(), safe()]);
        let notifier = FakeNotifier::default();
        let uploader = FakeUploader::default();

        let images = vec![png("ok.png"), png(name)];
        let result = gate(&moderator, &notifier, &uploader)
            .screen_and_upload(&images)
            .await;

        assert!(matches!(result, Err(FeedError::ForbiddenImage)), "{}", name);
        assert_eq!(moderator.calls(), 0);
        assert_eq!(uploader.calls(), 0);

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].special_case.as_deref(), Some("forbidden_image"));
    }
}

/// 管理ダッシュボードへの報告が失敗してもブロック結果は変わらない
#[tokio::test]
async fn test_forbidden_name_notifier_failure_ignored() {
    let moderator = FakeModerator::returning(vec![safe()]);
    let notifier = FakeNotifier::failing();
    let uploader = FakeUploader::default();

    let result = gate(&moderator, &notifier, &uploader)
        .screen_and_upload(&[png("mia.jpg")])
        .await;

    assert!(matches!(result, Err(FeedError::ForbiddenImage)));
    assert_eq!(uploader.calls(), 0);
}

/// 不適切判定があれば理由を集めて失敗し、アップロードしない
#[tokio::test]
async fn test_unsafe_verdict_blocks_upload() {
    let moderator = FakeModerator::returning(vec![safe(), unsafe_because("nudité"), unsafe_because("violence")]);
    let notifier = FakeNotifier::default();
    let uploader = FakeUploader::default();

    let images = vec![png("a.png"), png("b.png"), png("c.png")];
    let err = gate(&moderator, &notifier, &uploader)
        .screen_and_upload(&images)
        .await
        .unwrap_err();

    match &err {
        FeedError::UnsafeContent(reasons) => assert_eq!(reasons, &vec!["nudité", "violence"]),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.to_string().contains("nudité, violence"));
    assert!(err.is_blocking());
    assert_eq!(uploader.calls(), 0);
    assert!(notifier.sent().is_empty());
}

/// モデレーションに到達できない場合は安全扱いにせずブロック
#[tokio::test]
async fn test_moderation_failure_is_blocking() {
    let moderator = FakeModerator::failing();
    let notifier = FakeNotifier::default();
    let uploader = FakeUploader::default();

    let err = gate(&moderator, &notifier, &uploader)
        .screen_and_upload(&[png("a.png")])
        .await
        .unwrap_err();

    assert!(matches!(err, FeedError::ModerationUnavailable(_)));
    assert!(err.is_blocking());
    assert_eq!(uploader.calls(), 0);
}

/// 判定数が画像数より少ない応答は失敗扱い
#[tokio::test]
async fn test_missing_verdicts_are_blocking() {
    let moderator = FakeModerator::returning(vec![safe()]);
    let notifier = FakeNotifier::default();
    let uploader = FakeUploader::default();

    let result = gate(&moderator, &notifier, &uploader)
        .screen_and_upload(&[png("a.png"), png("b.png")])
        .await;

    assert!(matches!(result, Err(FeedError::ModerationUnavailable(_))));
    assert_eq!(uploader.calls(), 0);
}

/// すべて安全ならモデレーション完了後にアップロード
#[tokio::test]
async fn test_safe_images_uploaded_after_moderation() {
    let log = CallLog::default();
    let mut moderator = FakeModerator::returning(vec![safe(), safe()]);
    moderator.log = log.clone();
    let notifier = FakeNotifier::default();
    let uploader = FakeUploader::with_log(log.clone());

    let uploaded = gate(&moderator, &notifier, &uploader)
        .screen_and_upload(&[png("a.png"), png("b.png")])
        .await
        .expect("アップロード失敗");

    assert_eq!(uploaded.len(), 2);
    assert_eq!(uploaded[0].url, "http://localhost:3001/uploads/a.png");
    assert_eq!(log.entries(), vec!["moderate", "upload"]);
}

/// アップロード失敗は非致命エラー
#[tokio::test]
async fn test_upload_failure_is_soft() {
    let moderator = FakeModerator::returning(vec![safe()]);
    let notifier = FakeNotifier::default();
    let uploader = FakeUploader::failing();

    let err = gate(&moderator, &notifier, &uploader)
        .screen_and_upload(&[png("a.png")])
        .await
        .unwrap_err();

    assert!(matches!(err, FeedError::Upload(_)));
    assert!(!err.is_blocking());
}

/// 画像なしはリモート呼び出しなしで空を返す
#[tokio::test]
async fn test_no_images_no_calls() {
    let moderator = FakeModerator::returning(Vec::new());
    let notifier = FakeNotifier::default();
    let uploader = FakeUploader::default();

    let uploaded = gate(&moderator, &notifier, &uploader)
        .screen_and_upload(&[])
        .await
        .unwrap();

    assert!(uploaded.is_empty());
    assert_eq!(moderator.calls(), 0);
    assert_eq!(uploader.calls(), 0);
}
