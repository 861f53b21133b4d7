//! Noticeboard API Server
//!
//! Articles with comments, an artist catalogue, and user accounts over JSON.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{
    apply_schema, PostgresArticleRepository, PostgresArtistRepository, PostgresCommentRepository,
    PostgresSessionRepository, PostgresUserRepository,
};
use app::{AccountService, ArticleService, ArtistService, CommentService};
use config::Config;
use domain::ports::{
    ArticleRepository, ArtistRepository, CommentRepository, SessionRepository, UserRepository,
};

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub article_service: Arc<ArticleService<dyn ArticleRepository, dyn CommentRepository>>,
    pub comment_service: Arc<CommentService<dyn ArticleRepository, dyn CommentRepository>>,
    pub artist_service: Arc<ArtistService<dyn ArtistRepository>>,
    pub account_service: Arc<AccountService<dyn UserRepository, dyn SessionRepository>>,
    pub config: Config,
}

impl AppState {
    /// Wire the services over a set of repositories
    pub fn new(
        articles: Arc<dyn ArticleRepository>,
        comments: Arc<dyn CommentRepository>,
        artists: Arc<dyn ArtistRepository>,
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        config: Config,
    ) -> Self {
        Self {
            article_service: Arc::new(ArticleService::new(articles.clone(), comments.clone())),
            comment_service: Arc::new(CommentService::new(articles, comments)),
            artist_service: Arc::new(ArtistService::new(artists)),
            account_service: Arc::new(AccountService::new(
                users,
                sessions,
                config.account_settings(),
            )),
            config,
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the full router: public reads, optionally authenticated writes,
/// and routes that require a session
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/articles", get(handlers::list_articles))
        .route("/articles/:id", get(handlers::get_article))
        .route("/articles/:id/comments", get(handlers::list_article_comments))
        .route("/comments", get(handlers::list_comments))
        .route("/comments/:id", get(handlers::get_comment))
        // The artist catalogue is open to everyone
        .route(
            "/artists",
            get(handlers::list_artists).post(handlers::create_artist),
        )
        .route("/artists/search", get(handlers::search_artists))
        .route(
            "/artists/:id",
            get(handlers::get_artist)
                .put(handlers::update_artist)
                .delete(handlers::delete_artist),
        );

    // Anonymous comments are allowed; a session only sets the author
    let optional_auth_routes = Router::new()
        .route("/articles/:id/comments", post(handlers::create_comment))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::optional_auth_middleware,
        ));

    // Signup and login see the session too, to turn away logged-in callers
    let mut credential_routes = Router::new()
        .route("/accounts/signup", post(handlers::signup))
        .route("/accounts/login", post(handlers::login))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::optional_auth_middleware,
        ));

    if state.config.auth_rate_limit_enabled() {
        // PeerIpKeyExtractor reads the socket address, so the server must be
        // started with `into_make_service_with_connect_info`
        let governor_config = Arc::new(
            GovernorConfigBuilder::default()
                .key_extractor(PeerIpKeyExtractor)
                .per_second(state.config.auth_rate_limit_replenish_seconds)
                .burst_size(state.config.auth_rate_limit_burst)
                .finish()
                .context("Invalid rate limit configuration")?,
        );
        credential_routes = credential_routes.layer(GovernorLayer {
            config: governor_config,
        });
    }

    let protected_routes = Router::new()
        .route("/articles", post(handlers::create_article))
        .route(
            "/articles/:id",
            put(handlers::update_article).delete(handlers::delete_article),
        )
        .route(
            "/articles/:id/comments/:comment_id",
            delete(handlers::delete_article_comment),
        )
        .route(
            "/comments/:id",
            put(handlers::update_comment).delete(handlers::delete_comment),
        )
        .route("/accounts/logout", post(handlers::logout))
        .route(
            "/accounts/me",
            get(handlers::get_profile)
                .put(handlers::update_profile)
                .delete(handlers::delete_account),
        )
        .route("/accounts/password", post(handlers::change_password))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Ok(Router::new()
        .merge(public_routes)
        .merge(optional_auth_routes)
        .merge(credential_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state))
}

/// Periodically drop expired sessions
fn spawn_session_purge(accounts: Arc<AccountService<dyn UserRepository, dyn SessionRepository>>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            if let Err(e) = accounts.purge_expired_sessions().await {
                tracing::warn!(error = %e, "Failed to purge expired sessions");
            }
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,noticeboard_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Noticeboard API...");

    // Load configuration
    let config = Config::from_env()?;

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    if config.apply_schema {
        apply_schema(&db).await?;
    }

    // Create adapters
    let article_repo: Arc<dyn ArticleRepository> =
        Arc::new(PostgresArticleRepository::new(db.clone()));
    let comment_repo: Arc<dyn CommentRepository> =
        Arc::new(PostgresCommentRepository::new(db.clone()));
    let artist_repo: Arc<dyn ArtistRepository> =
        Arc::new(PostgresArtistRepository::new(db.clone()));
    let user_repo: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(db.clone()));
    let session_repo: Arc<dyn SessionRepository> =
        Arc::new(PostgresSessionRepository::new(db.clone()));

    let state = AppState::new(
        article_repo,
        comment_repo,
        artist_repo,
        user_repo,
        session_repo,
        config.clone(),
    );

    spawn_session_purge(state.account_service.clone());

    let app = build_router(state)?;

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
