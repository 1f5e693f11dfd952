mod config;
mod data_formats;
mod db_helpers;
mod errors;
mod extractors;
mod handlers;
mod models;
mod query_plan;

use std::future::Future;
use std::net::TcpListener;

use anyhow::Context;
pub use anyhow::Result;
use axum::http::StatusCode;
use axum::{routing::*, Extension, Json, Router};
pub use config::{AppConfig, Environment};
pub use data_formats::*;
pub use errors::{ErrorKind, RequestError};
use handlers::*;
pub use models::*;
pub use query_plan::{ArticleListPlan, Pagination, SortColumn, SortOrder};
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Sqlite, SqlitePool};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub type JsonResponse<T> = (StatusCode, Json<T>);

/// Opens the database, serves until a shutdown signal arrives, then closes
/// the pool.
pub async fn run_app(config: &AppConfig) -> Result<()> {
    let pool = init_db(config).await?;
    let listener = TcpListener::bind(config.address)
        .with_context(|| format!("Failed to bind {}", config.address))?;
    tracing::info!(address = %config.address, environment = config.environment.name(), "server started");

    let result = serve(listener, pool.clone(), shutdown_signal()).await;
    pool.close().await;
    tracing::info!("database pool closed");
    result
}

pub async fn serve(
    listener: TcpListener,
    pool: SqlitePool,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let app = make_router().layer(Extension(pool));
    axum::Server::from_tcp(listener)?
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

pub async fn init_db(config: &AppConfig) -> Result<SqlitePool> {
    let db_url = &config.database_url;
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        tracing::info!(%db_url, "creating database");
        Sqlite::create_database(db_url)
            .await
            .context("Failed to create database")?;
    }
    let pool = connect_pool(db_url, config.max_connections).await?;
    migrate_db(&pool).await?;
    Ok(pool)
}

/// An in-memory database only lives as long as its connection, so such
/// pools are pinned to one connection that is never recycled.
pub async fn connect_pool(db_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = if db_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections)
    };
    options
        .connect(db_url)
        .await
        .with_context(|| format!("Failed to connect to {db_url}"))
}

pub async fn migrate_db(pool: &SqlitePool) -> Result<()> {
    tracing::debug!("running migrations");
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")?;
    tracing::debug!("migrations completed");
    Ok(())
}

pub fn bind_random_port() -> Result<TcpListener> {
    TcpListener::bind("127.0.0.1:0").context("Could not get a free port")
}

pub fn make_router() -> Router {
    Router::new()
        .route("/api", get(get_endpoints))
        .route("/api/healthcheck", get(alive))
        .route("/api/topics", get(get_topics).post(post_topic))
        .route("/api/articles", get(list_articles).post(post_article))
        .route(
            "/api/articles/:article_id",
            get(get_article).patch(patch_article).delete(delete_article),
        )
        .route(
            "/api/articles/:article_id/comments",
            get(get_article_comments).post(post_article_comment),
        )
        .route(
            "/api/comments/:comment_id",
            patch(patch_comment).delete(delete_comment),
        )
        .route("/api/users", get(get_users))
        .route("/api/users/:username", get(get_user))
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
