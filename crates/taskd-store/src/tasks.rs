use chrono::Utc;
use tracing::instrument;

use taskd_core::{Task, TaskDraft, TaskFilter, TaskPatch};

use crate::database::Database;
use crate::error::StoreError;

/// The component owning the canonical task collection. Two implementations
/// share this contract: [`SqliteTaskStore`] and
/// [`crate::memory::MemoryTaskStore`]. Handlers only ever see values returned
/// from these operations.
pub trait TaskStore: Send + Sync {
    /// All tasks matching the filter; the full result set, no pagination.
    fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError>;

    /// Exact match on id.
    fn get(&self, id: i64) -> Result<Task, StoreError>;

    /// Assigns the next sequential id and stamps `createdAt`.
    fn create(&self, draft: TaskDraft) -> Result<Task, StoreError>;

    /// Applies only the supplied fields and refreshes `updatedAt`, including
    /// for an empty patch (a bare write attempt still counts as an update).
    fn update(&self, id: i64, patch: TaskPatch) -> Result<Task, StoreError>;

    /// Removes the task permanently and returns it. Ids are never reused.
    fn delete(&self, id: i64) -> Result<Task, StoreError>;

    /// Connectivity probe for the health endpoint.
    fn ping(&self) -> Result<(), StoreError>;
}

const SELECT_COLUMNS: &str = "SELECT id, title, completed, createdAt, updatedAt FROM tasks";

/// SQLite-backed task store. Rows are ordered newest-first on list.
pub struct SqliteTaskStore {
    db: Database,
}

impl SqliteTaskStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl TaskStore for SqliteTaskStore {
    fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        self.db.with_conn(|conn| {
            let mut sql = format!("{SELECT_COLUMNS} WHERE 1=1");
            let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

            if let Some(completed) = filter.completed {
                sql.push_str(&format!(" AND completed = ?{}", params.len() + 1));
                params.push(Box::new(completed));
            }
            if let Some(search) = &filter.search {
                sql.push_str(&format!(
                    " AND lower(title) LIKE ?{} ESCAPE '\\'",
                    params.len() + 1
                ));
                params.push(Box::new(format!(
                    "%{}%",
                    escape_like(&search.to_lowercase())
                )));
            }

            sql.push_str(" ORDER BY createdAt DESC, id DESC");

            let param_refs: Vec<&dyn rusqlite::types::ToSql> =
                params.iter().map(|p| p.as_ref()).collect();
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(param_refs.as_slice(), row_to_task)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    fn get(&self, id: i64) -> Result<Task, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
            let mut rows = stmt.query([id])?;
            match rows.next()? {
                Some(row) => Ok(row_to_task(row)?),
                None => Err(StoreError::NotFound(format!("task {id}"))),
            }
        })
    }

    #[instrument(skip(self, draft), fields(title = %draft.title))]
    fn create(&self, draft: TaskDraft) -> Result<Task, StoreError> {
        let title = draft.title.trim().to_string();
        let now = Utc::now().to_rfc3339();

        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tasks (title, completed, createdAt) VALUES (?1, ?2, ?3)",
                rusqlite::params![title, draft.completed, now],
            )?;

            Ok(Task {
                id: conn.last_insert_rowid(),
                title: title.clone(),
                completed: draft.completed,
                created_at: now.clone(),
                updated_at: None,
            })
        })
    }

    #[instrument(skip(self, patch), fields(task_id = id))]
    fn update(&self, id: i64, patch: TaskPatch) -> Result<Task, StoreError> {
        let title = patch.title.as_deref().map(|t| t.trim().to_string());
        let now = Utc::now().to_rfc3339();

        self.db.with_conn(|conn| {
            // Single conditional statement: unsupplied fields keep their
            // current value and there is no read-then-write window.
            let changed = conn.execute(
                "UPDATE tasks SET title = COALESCE(?1, title),
                                  completed = COALESCE(?2, completed),
                                  updatedAt = ?3
                 WHERE id = ?4",
                rusqlite::params![title, patch.completed, now, id],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound(format!("task {id}")));
            }

            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
            let mut rows = stmt.query([id])?;
            match rows.next()? {
                Some(row) => Ok(row_to_task(row)?),
                None => Err(StoreError::NotFound(format!("task {id}"))),
            }
        })
    }

    #[instrument(skip(self), fields(task_id = id))]
    fn delete(&self, id: i64) -> Result<Task, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
            let mut rows = stmt.query([id])?;
            let task = match rows.next()? {
                Some(row) => row_to_task(row)?,
                None => return Err(StoreError::NotFound(format!("task {id}"))),
            };

            conn.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
            Ok(task)
        })
    }

    fn ping(&self) -> Result<(), StoreError> {
        self.db.with_conn(|conn| {
            conn.execute_batch("SELECT 1")?;
            Ok(())
        })
    }
}

fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        completed: row.get::<_, i64>(2)? != 0,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

/// Escape LIKE special characters for safe pattern matching.
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
