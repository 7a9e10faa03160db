use chrono::Utc;
use parking_lot::Mutex;

use taskd_core::{Task, TaskDraft, TaskFilter, TaskPatch};

use crate::error::StoreError;
use crate::tasks::TaskStore;

/// In-memory task store. The task vec and the id counter live behind a single
/// mutex so concurrent requests cannot interleave mid-mutation. Listing
/// preserves insertion order.
pub struct MemoryTaskStore {
    inner: Mutex<Inner>,
}

struct Inner {
    tasks: Vec<Task>,
    next_id: i64,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                tasks: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore for MemoryTaskStore {
    fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner
            .tasks
            .iter()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect())
    }

    fn get(&self, id: i64) -> Result<Task, StoreError> {
        let inner = self.inner.lock();
        inner
            .tasks
            .iter()
            .find(|task| task.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("task {id}")))
    }

    fn create(&self, draft: TaskDraft) -> Result<Task, StoreError> {
        let mut inner = self.inner.lock();
        let task = Task {
            id: inner.next_id,
            title: draft.title.trim().to_string(),
            completed: draft.completed,
            created_at: Utc::now().to_rfc3339(),
            updated_at: None,
        };
        // The counter only ever advances, so deleted ids stay retired.
        inner.next_id += 1;
        inner.tasks.push(task.clone());
        Ok(task)
    }

    fn update(&self, id: i64, patch: TaskPatch) -> Result<Task, StoreError> {
        let mut inner = self.inner.lock();
        let task = inner
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("task {id}")))?;

        if let Some(title) = patch.title {
            task.title = title.trim().to_string();
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        task.updated_at = Some(Utc::now().to_rfc3339());
        Ok(task.clone())
    }

    fn delete(&self, id: i64) -> Result<Task, StoreError> {
        let mut inner = self.inner.lock();
        let index = inner
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("task {id}")))?;
        Ok(inner.tasks.remove(index))
    }

    fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
