pub mod task;
pub mod validate;

pub use task::{Task, TaskDraft, TaskFilter, TaskPatch};
pub use validate::Violation;
