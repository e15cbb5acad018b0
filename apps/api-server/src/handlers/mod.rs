//! HTTP handlers and route configuration.

mod auth;
mod feed;
pub mod graphql;
mod health;
mod images;
mod views;

use std::path::Path;

use actix_files::Files;
use actix_web::web;

use crate::middleware::AppError;

/// Configure all application routes.
///
/// `upload_dir` is served read-only under `/images`.
pub fn configure_routes(cfg: &mut web::ServiceConfig, upload_dir: &Path) {
    cfg.route("/health", web::get().to(health::health_check))
        // Auth routes
        .service(
            web::scope("/auth")
                .route("/signup", web::put().to(auth::signup))
                .route("/login", web::post().to(auth::login))
                .service(
                    web::resource("/status")
                        .route(web::get().to(auth::get_status))
                        .route(web::patch().to(auth::update_status)),
                ),
        )
        // Feed routes
        .service(
            web::scope("/feed")
                .route("/posts", web::get().to(feed::get_posts))
                .route("/post", web::post().to(feed::create_post))
                .service(
                    web::resource("/post/{post_id}")
                        .route(web::get().to(feed::get_post))
                        .route(web::put().to(feed::update_post))
                        .route(web::delete().to(feed::delete_post)),
                ),
        )
        .route("/post-image", web::put().to(images::upload_image))
        .service(
            web::resource("/graphql")
                .route(web::post().to(graphql::graphql_handler))
                .route(web::get().to(graphql::graphiql)),
        )
        .service(Files::new("/images", upload_dir));
}

/// Register extractor configs whose rejections use the API error body.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    );
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use agora_core::ports::ImageStore;
    use agora_core::services::SignupInput;
    use agora_infra::{BroadcastNotifier, JwtConfig};
    use tempfile::TempDir;

    use crate::state::AppState;

    pub struct TestContext {
        pub state: AppState,
        pub notifier: Arc<BroadcastNotifier>,
        pub dir: TempDir,
    }

    impl TestContext {
        pub fn new() -> Self {
            let dir = tempfile::tempdir().expect("tempdir");
            let notifier = Arc::new(BroadcastNotifier::default());
            let jwt = JwtConfig {
                secret: "handler-test-secret".to_string(),
                ..JwtConfig::default()
            };
            let state = AppState::in_memory(dir.path(), jwt, notifier.clone(), 2);
            Self {
                state,
                notifier,
                dir,
            }
        }

        /// Register an account and return `(bearer header value, user id)`.
        pub async fn user(&self, email: &str, name: &str) -> (String, uuid::Uuid) {
            let user = self
                .state
                .auth
                .signup(SignupInput {
                    email: email.to_string(),
                    name: name.to_string(),
                    password: "secret1".to_string(),
                })
                .await
                .expect("signup");
            let login = self
                .state
                .auth
                .login(email, "secret1")
                .await
                .expect("login");
            (format!("Bearer {}", login.token), user.id)
        }

        /// Put an image straight into the store and return its URL.
        pub async fn stored_image(&self, name: &str) -> String {
            self.state
                .images
                .store(name, b"\x89PNG\r\n\x1a\nfake")
                .await
                .expect("store image")
        }

        /// Number of files in the upload directory.
        pub fn stored_files(&self) -> usize {
            std::fs::read_dir(self.dir.path())
                .map(|entries| entries.count())
                .unwrap_or(0)
        }
    }

    /// Build the full application around a [`TestContext`].
    macro_rules! test_app {
        ($ctx:expr) => {
            actix_web::test::init_service(
                actix_web::App::new()
                    .wrap($crate::middleware::AuthMiddleware::new(
                        $ctx.state.tokens.clone(),
                    ))
                    .app_data(actix_web::web::Data::new($ctx.state.clone()))
                    .configure($crate::handlers::configure_extractors)
                    .configure(|cfg| $crate::handlers::configure_routes(cfg, $ctx.dir.path())),
            )
            .await
        };
    }

    pub(crate) use test_app;
}
