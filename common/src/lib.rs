//! edu-feed Common Library
//!
//! クライアント層とCLIで共有される型と純粋ロジック（I/Oなし）

pub mod types;
pub mod error;
pub mod wordlist;
pub mod fake_claims;
pub mod parser;
pub mod sprint;

pub use types::{
    AdminAnalysisPayload, ChatAnalysis, ContentAnalysis, ImageRef, ModerationDetail,
    ModerationVerdict, Post, PostAnalysis, PostReport, Profile, Sprint, SprintStatus, Task,
    UploadedImage,
};
pub use error::{Error, Result};
pub use wordlist::{contains_forbidden_words, find_forbidden_words, FORBIDDEN_WORDS};
pub use fake_claims::{detect_fake_claims, FakeClaim, FakeClaimMatch, FAKE_CLAIMS};
pub use parser::{extract_error_message, parse_batch_moderation, parse_upload_response};
pub use sprint::{calculate_progress, status_label, task_counts};
