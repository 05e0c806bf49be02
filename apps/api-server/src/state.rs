//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{PostRepository, UserRepository};
use quill_core::{PostService, UserService};
use quill_infra::{DatabaseConfig, InMemoryStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub posts: Arc<PostService>,
    /// Name of the entity store in use, reported by the health check.
    pub backend: &'static str,
}

impl AppState {
    /// Build the application state, falling back to the in-memory store when
    /// no database is configured or it cannot be reached.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        if let Some(config) = db_config {
            match quill_infra::database::connect(config).await {
                Ok(conn) => {
                    let users: Arc<dyn UserRepository> =
                        Arc::new(quill_infra::PostgresUserRepository::new(conn.clone()));
                    let posts: Arc<dyn PostRepository> =
                        Arc::new(quill_infra::PostgresPostRepository::new(conn));
                    tracing::info!("Application state initialized (postgres)");
                    return Self::with_repositories(users, posts, "postgres");
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }

        #[cfg(not(feature = "postgres"))]
        if db_config.is_some() {
            tracing::warn!("Built without postgres feature - DATABASE_URL ignored");
        }

        tracing::info!("Application state initialized (in-memory)");
        Self::in_memory()
    }

    /// State over a fresh in-memory store.
    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        let users: Arc<dyn UserRepository> = Arc::new(store.user_repository());
        let posts: Arc<dyn PostRepository> = Arc::new(store.post_repository());
        Self::with_repositories(users, posts, "in-memory")
    }

    fn with_repositories(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        backend: &'static str,
    ) -> Self {
        Self {
            users: Arc::new(UserService::new(Arc::clone(&users))),
            posts: Arc::new(PostService::new(posts, users)),
            backend,
        }
    }
}
