//! スプリントボード（タスクの楽観的更新）

use crate::error::{FeedError, Result};
use crate::optimistic;
use crate::traits::SprintRemote;
use chrono::{DateTime, Local, NaiveDate, Utc};
use edu_feed_common::{Sprint, SprintStatus, Task};
use std::collections::HashSet;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Default)]
pub struct SprintBoard {
    sprints: Vec<Sprint>,
    active: usize,
    /// サーバー未確定の仮タスクID
    pending: HashSet<u64>,
}

impl SprintBoard {
    pub fn new(sprints: Vec<Sprint>, today: NaiveDate) -> Self {
        let active = active_sprint_index(&sprints, today);
        Self {
            sprints,
            active,
            pending: HashSet::new(),
        }
    }

    /// サーバーから一覧を取得
    pub async fn load(remote: &dyn SprintRemote) -> Result<Self> {
        let sprints = remote.list_sprints().await?;
        Ok(Self::new(sprints, Local::now().date_naive()))
    }

    pub fn sprints(&self) -> &[Sprint] {
        &self.sprints
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_sprint(&self) -> Option<&Sprint> {
        self.sprints.get(self.active)
    }

    pub fn select(&mut self, sprint_id: u64) -> Result<()> {
        self.active = self.index_of(sprint_id)?;
        Ok(())
    }

    pub fn is_pending(&self, task_id: u64) -> bool {
        self.pending.contains(&task_id)
    }

    fn index_of(&self, sprint_id: u64) -> Result<usize> {
        self.sprints
            .iter()
            .position(|s| s.id == sprint_id)
            .ok_or(FeedError::SprintNotFound(sprint_id))
    }

    fn active_mut(&mut self) -> Result<&mut Sprint> {
        let active = self.active;
        self.sprints
            .get_mut(active)
            .ok_or(FeedError::NoSprint)
    }

    /// アクティブスプリントのタスク完了を切り替える
    ///
    /// リモート失敗時は元の値に戻す。
    #[instrument(skip(self, remote))]
    pub async fn toggle_task(&mut self, remote: &dyn SprintRemote, task_id: u64) -> Result<bool> {
        let sprint = self.active_mut()?;
        let sprint_id = sprint.id;
        let previous = sprint
            .task(task_id)
            .map(|t| t.completed)
            .ok_or(FeedError::TaskNotFound(task_id))?;
        let next = !previous;

        optimistic::apply(
            sprint,
            |s| {
                s.set_task_completed(task_id, next);
            },
            || remote.update_task(sprint_id, task_id, next),
            |s| {
                s.set_task_completed(task_id, previous);
            },
        )
        .await?;

        info!(sprint_id, task_id, completed = next, "タスクを更新しました");
        Ok(next)
    }

    /// アクティブスプリントにタスクを追加する
    ///
    /// 空白のみのタイトルは無視して `Ok(None)`。成功後はサーバーの内容で置き換える。
    #[instrument(skip(self, remote))]
    pub async fn add_task(&mut self, remote: &dyn SprintRemote, title: &str) -> Result<Option<Task>> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(None);
        }

        let temp_id = Utc::now().timestamp_millis().max(0) as u64;
        let task = Task {
            id: temp_id,
            title: title.to_string(),
            completed: false,
        };

        let sprint = self.active_mut()?;
        let sprint_id = sprint.id;
        let pending_task = task.clone();

        let result = optimistic::apply(
            sprint,
            |s| s.tasks.push(pending_task),
            || remote.add_task(sprint_id, title),
            |s| {
                s.remove_task(temp_id);
            },
        )
        .await;

        if let Err(e) = result {
            self.pending.remove(&temp_id);
            return Err(e);
        }
        self.pending.insert(temp_id);

        match remote.get_sprint(sprint_id).await {
            Ok(fresh) => {
                self.replace(fresh);
                self.pending.remove(&temp_id);
            }
            Err(e) => warn!(sprint_id, error = %e, "再取得に失敗したため仮タスクを保持します"),
        }

        info!(sprint_id, title, "タスクを追加しました");
        Ok(Some(task))
    }

    /// スプリントを完了にする（楽観的更新なし）
    #[instrument(skip(self, remote))]
    pub async fn complete_sprint(&mut self, remote: &dyn SprintRemote, sprint_id: u64) -> Result<()> {
        let index = self.index_of(sprint_id)?;
        remote.complete_sprint(sprint_id).await?;

        match remote.get_sprint(sprint_id).await {
            Ok(fresh) => self.replace(fresh),
            Err(e) => {
                warn!(sprint_id, error = %e, "再取得に失敗したためローカルで完了にします");
                self.sprints[index].status = SprintStatus::Completed;
            }
        }
        Ok(())
    }

    /// サーバーから取得したスプリントで丸ごと置き換える
    fn replace(&mut self, fresh: Sprint) {
        match self.sprints.iter_mut().find(|s| s.id == fresh.id) {
            Some(slot) => *slot = fresh,
            None => self.sprints.push(fresh),
        }
    }
}

/// 一覧順で最初の「今日を含む」または「これから始まる」スプリント、なければ0
pub fn active_sprint_index(sprints: &[Sprint], today: NaiveDate) -> usize {
    sprints
        .iter()
        .position(|s| match (parse_date(&s.start_date), parse_date(&s.end_date)) {
            (Some(start), Some(end)) => (start <= today && today <= end) || start > today,
            _ => false,
        })
        .unwrap_or(0)
}

/// `YYYY-MM-DD` またはRFC 3339の日付
fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|d| d.date_naive()))
}
