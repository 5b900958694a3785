//! スプリント集計ロジック

use crate::types::{Sprint, SprintStatus};

/// 完了タスクの割合（%、四捨五入）。タスクなしは0
pub fn calculate_progress(sprint: &Sprint) -> u8 {
    if sprint.tasks.is_empty() {
        return 0;
    }
    let done = sprint.tasks.iter().filter(|t| t.completed).count();
    ((done as f64 / sprint.tasks.len() as f64) * 100.0).round() as u8
}

/// 完了数 / 総数
pub fn task_counts(sprint: &Sprint) -> (usize, usize) {
    let done = sprint.tasks.iter().filter(|t| t.completed).count();
    (done, sprint.tasks.len())
}

/// 表示用の状態ラベル
pub fn status_label(status: SprintStatus) -> &'static str {
    match status {
        SprintStatus::Upcoming => "à venir",
        SprintStatus::InProgress => "en cours",
        SprintStatus::Completed => "terminé",
    }
}
