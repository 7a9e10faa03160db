use std::path::PathBuf;
use std::sync::Arc;

use taskd_core::{TaskDraft, TaskFilter};
use taskd_server::ServerConfig;
use taskd_store::{Database, MemoryTaskStore, SqliteTaskStore, TaskStore};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting task server");

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let expose_errors = std::env::var("APP_ENV")
        .map(|env| env == "development")
        .unwrap_or(false);

    let store = build_store();
    seed_if_empty(store.as_ref());

    let config = ServerConfig {
        port,
        expose_errors,
    };
    let _handle = taskd_server::start(config, store)
        .await
        .expect("Failed to start server");

    tracing::info!(port = port, "Task server ready");

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for ctrl+c");

    tracing::info!("Shutting down");
}

/// Pick the store backend from the environment: SQLite by default, the
/// in-memory list when TASKD_STORE=memory.
fn build_store() -> Arc<dyn TaskStore> {
    match std::env::var("TASKD_STORE").as_deref() {
        Ok("memory") => {
            tracing::info!("using in-memory task store");
            Arc::new(MemoryTaskStore::new())
        }
        _ => {
            let db_path = std::env::var("DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("tasks.db"));
            let db = Database::open(&db_path).expect("Failed to open database");
            Arc::new(SqliteTaskStore::new(db))
        }
    }
}

/// First start ships with two sample tasks.
fn seed_if_empty(store: &dyn TaskStore) {
    let existing = store
        .list(&TaskFilter::default())
        .expect("Failed to read task store");
    if !existing.is_empty() {
        return;
    }

    for title in ["Learn Node.js", "Build REST API"] {
        store
            .create(TaskDraft {
                title: title.to_string(),
                completed: false,
            })
            .expect("Failed to seed task store");
    }
    tracing::info!("seeded sample tasks");
}
