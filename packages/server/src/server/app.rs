//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{get, post, put},
    Router,
};
use groq_client::GroqClient;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::domains::moderation::jobs::register_moderation_jobs;
use crate::domains::moderation::{GroqClassifier, GroqResponder};
use crate::domains::users::JwtService;
use crate::kernel::jobs::{JobQueue, JobRegistry, JobRunner, PostgresJobQueue};
use crate::kernel::ServerDeps;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{analytics, auth, comments, health, posts};

/// Build the Axum application router and spawn the background job runner.
///
/// Returns the router plus the shared deps so callers (and tests) can reach
/// the same services the handlers use.
pub fn build_app(pool: PgPool, config: &Config) -> (Router, Arc<ServerDeps>) {
    let groq = GroqClient::new(config.groq_api_key.clone());

    let classifier = Arc::new(GroqClassifier::new(groq.clone(), config.groq_model.clone()));
    let responder = Arc::new(GroqResponder::new(groq, config.groq_model.clone()));

    let job_queue: Arc<dyn JobQueue> = Arc::new(PostgresJobQueue::new(pool.clone()));
    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()));

    let deps = Arc::new(ServerDeps::new(
        pool,
        classifier,
        responder,
        job_queue.clone(),
        jwt_service.clone(),
    ));

    // Register job handlers and spawn the runner as a background task
    let mut job_registry = JobRegistry::new();
    register_moderation_jobs(&mut job_registry);
    let runner = JobRunner::new(job_queue, Arc::new(job_registry), deps.clone());
    tokio::spawn(async move {
        if let Err(e) = runner.run().await {
            tracing::error!(error = %e, "job runner exited with error");
        }
    });

    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let jwt_service_for_middleware = jwt_service.clone();

    let app = Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/auth/register", post(auth::register_handler))
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/auth/token/refresh", post(auth::refresh_handler))
        .route(
            "/api/posts",
            get(posts::list_posts_handler).post(posts::create_post_handler),
        )
        .route(
            "/api/posts/:post_id",
            get(posts::get_post_handler)
                .put(posts::update_post_handler)
                .delete(posts::delete_post_handler),
        )
        .route(
            "/api/posts/:post_id/comments",
            get(comments::list_comments_handler).post(comments::create_comment_handler),
        )
        .route(
            "/api/comments/:comment_id",
            get(comments::get_comment_handler)
                .put(comments::update_comment_handler)
                .delete(comments::delete_comment_handler),
        )
        .route(
            "/api/analytics/comments/daily",
            get(analytics::daily_comments_handler),
        )
        // Middleware layers (applied in reverse order, last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service_for_middleware.clone(), req, next)
        }))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(deps.clone());

    (app, deps)
}
