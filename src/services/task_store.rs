use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::task::{Task, TaskStatus, Verdict};

/// In-memory registry of verification tasks.
///
/// Each task is written once by its pipeline run and read by any number of
/// status queries. Tasks are kept for the lifetime of the process.
#[derive(Default)]
pub struct TaskStore {
    tasks: DashMap<Uuid, Task>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskCounts {
    pub pending: usize,
    pub accepted: usize,
    pub rejected: usize,
}

impl TaskCounts {
    pub fn total(&self) -> usize {
        self.pending + self.accepted + self.rejected
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new `PENDING` task and return its id.
    pub fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.tasks.insert(id, Task::pending(id));
        id
    }

    /// Move a task from `PENDING` to the verdict's terminal status.
    ///
    /// The status check and the update happen while holding the entry's
    /// write guard.
    pub fn finalize(&self, id: Uuid, verdict: Verdict) -> Result<Task, TaskStoreError> {
        let mut task = self.tasks.get_mut(&id).ok_or(TaskStoreError::NotFound(id))?;

        if task.status.is_terminal() {
            return Err(TaskStoreError::InvalidTransition {
                id,
                current: task.status,
            });
        }

        task.status = verdict.status();
        task.code = verdict.code().cloned();
        task.reason = Some(verdict.reason);
        task.fields = verdict.fields;
        task.updated_at = Utc::now();

        Ok(task.value().clone())
    }

    /// Snapshot of a task.
    pub fn get(&self, id: &Uuid) -> Result<Task, TaskStoreError> {
        self.tasks
            .get(id)
            .map(|task| task.value().clone())
            .ok_or(TaskStoreError::NotFound(*id))
    }

    pub fn counts(&self) -> TaskCounts {
        self.tasks
            .iter()
            .fold(TaskCounts::default(), |mut counts, task| {
                match task.status {
                    TaskStatus::Pending => counts.pending += 1,
                    TaskStatus::Accept => counts.accepted += 1,
                    TaskStatus::Reject => counts.rejected += 1,
                }
                counts
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskStoreError {
    #[error("Task {0} not found")]
    NotFound(Uuid),

    #[error("Task {id} is already {current}; it can only be finalized from PENDING")]
    InvalidTransition { id: Uuid, current: TaskStatus },
}
