//! Application state - shared across all handlers.

use std::path::Path;
use std::sync::Arc;

use agora_core::ports::{
    FeedNotifier, ImageStore, PasswordService, PostRepository, TokenService, UserRepository,
};
use agora_core::services::{AuthService, FeedService};
use agora_infra::database::{DatabaseConfig, InMemoryPostRepository, InMemoryUserRepository};
use agora_infra::storage::LocalImageStore;
use agora_infra::{Argon2PasswordService, JwtConfig, JwtTokenService};

#[cfg(feature = "postgres")]
use agora_infra::database::{DatabaseConnections, PostgresPostRepository, PostgresUserRepository};

use crate::config::AppConfig;
use crate::graphql::{AgoraSchema, build_schema};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub feed: Arc<FeedService>,
    pub tokens: Arc<dyn TokenService>,
    pub images: Arc<dyn ImageStore>,
    pub schema: AgoraSchema,
}

type Repositories = (Arc<dyn UserRepository>, Arc<dyn PostRepository>);

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(
        config: &AppConfig,
        notifier: Arc<dyn FeedNotifier>,
    ) -> std::io::Result<Self> {
        let images = LocalImageStore::new(&config.upload_dir);
        images.ensure_root().await.map_err(std::io::Error::other)?;

        let (users, posts) = repositories(config.database.as_ref()).await;

        let state = Self::from_parts(
            users,
            posts,
            Arc::new(images),
            Arc::new(JwtTokenService::new(config.jwt.clone())),
            notifier,
            config.posts_per_page,
        );

        tracing::info!("Application state initialized");
        Ok(state)
    }

    /// In-memory state rooted at `upload_dir`.
    pub fn in_memory(
        upload_dir: &Path,
        jwt: JwtConfig,
        notifier: Arc<dyn FeedNotifier>,
        posts_per_page: u64,
    ) -> Self {
        Self::from_parts(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryPostRepository::new()),
            Arc::new(LocalImageStore::new(upload_dir)),
            Arc::new(JwtTokenService::new(jwt)),
            notifier,
            posts_per_page,
        )
    }

    fn from_parts(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        images: Arc<dyn ImageStore>,
        tokens: Arc<dyn TokenService>,
        notifier: Arc<dyn FeedNotifier>,
        posts_per_page: u64,
    ) -> Self {
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        let auth = Arc::new(AuthService::new(users.clone(), passwords, tokens.clone()));
        let feed = Arc::new(FeedService::new(
            posts,
            users,
            images.clone(),
            notifier,
            posts_per_page,
        ));
        let schema = build_schema(auth.clone(), feed.clone());

        Self {
            auth,
            feed,
            tokens,
            images,
            schema,
        }
    }
}

#[cfg(feature = "postgres")]
async fn repositories(db_config: Option<&DatabaseConfig>) -> Repositories {
    let Some(config) = db_config else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return in_memory_repositories();
    };

    match DatabaseConnections::init(config).await {
        Ok(connections) => (
            Arc::new(PostgresUserRepository::new(connections.main.clone())),
            Arc::new(PostgresPostRepository::new(connections.main)),
        ),
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            in_memory_repositories()
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn repositories(_db_config: Option<&DatabaseConfig>) -> Repositories {
    tracing::info!("Running without postgres feature - using in-memory repositories");
    in_memory_repositories()
}

fn in_memory_repositories() -> Repositories {
    (
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryPostRepository::new()),
    )
}
