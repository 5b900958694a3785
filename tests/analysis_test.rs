//! 投稿解析フローのテスト

mod common;

use common::{FakeAnalyzer, FakeNotifier};
use edu_feed::error::FeedError;
use edu_feed::feed::AnalysisBook;
use edu_feed::store::seed_posts;

/// ローカルの誤情報一致が解析結果に付与され、管理ダッシュボードへ送られる
#[tokio::test]
async fn test_analyze_attaches_local_fake_claims() {
    let post = seed_posts().into_iter().find(|p| p.id == 8).unwrap();
    let notifier = FakeNotifier::default();
    let mut book = AnalysisBook::new();

    let outcome = book
        .analyze(&post, &FakeAnalyzer::default(), &notifier)
        .await
        .expect("解析失敗");

    assert!(outcome.admin_notified);
    assert_eq!(outcome.analysis.fake_news_detected.len(), 1);
    assert_eq!(outcome.analysis.fake_news_detected[0].category, "science");
    assert_eq!(outcome.analysis.sentiment_label(), Some("neutral"));
    assert!(outcome.analysis.is_flagged());

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].post_id, 8);
    assert_eq!(sent[0].kind, "post_analysis");
    assert_eq!(sent[0].analysis.fake_news_detected.len(), 1);

    assert!(book.get(8).is_some());
}

/// 送信失敗でも解析結果は返る
#[tokio::test]
async fn test_admin_failure_is_not_fatal() {
    let post = seed_posts().remove(0);
    let mut book = AnalysisBook::new();

    let outcome = book
        .analyze(&post, &FakeAnalyzer::default(), &FakeNotifier::failing())
        .await
        .expect("解析失敗");

    assert!(!outcome.admin_notified);
    assert!(outcome.analysis.fake_news_detected.is_empty());
    assert_eq!(book.len(), 1);
}

/// バックエンドに到達できなければ何も記録しない
#[tokio::test]
async fn test_unreachable_backend() {
    let post = seed_posts().remove(0);
    let notifier = FakeNotifier::default();
    let mut book = AnalysisBook::new();

    let result = book
        .analyze(&post, &FakeAnalyzer { unreachable: true }, &notifier)
        .await;

    assert!(matches!(result, Err(FeedError::Api(_))));
    assert!(book.is_empty());
    assert!(notifier.sent().is_empty());
}

/// 再解析は丸ごと置き換える
#[tokio::test]
async fn test_reanalysis_replaces_entry() {
    let mut post = seed_posts().remove(0);
    let notifier = FakeNotifier::default();
    let mut book = AnalysisBook::new();

    book.analyze(&post, &FakeAnalyzer::default(), &notifier).await.unwrap();
    post.content = "Les chameaux stockent de l'eau dans leurs bosses. Fascinant !".into();
    book.analyze(&post, &FakeAnalyzer::default(), &notifier).await.unwrap();

    assert_eq!(book.len(), 1);
    let analysis = book.get(post.id).unwrap();
    assert!(analysis.chat_analysis.response.contains("chameaux"));
    assert_eq!(analysis.fake_news_detected.len(), 1);
}
