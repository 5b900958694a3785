//! 投稿フィード（作成・解析）

pub mod analysis;
pub mod submit;

pub use analysis::{analyze_post, AnalysisBook, AnalysisOutcome};
pub use submit::{Composer, SubmissionState, SubmitOutcome, SOFT_UPLOAD_WARNING};
