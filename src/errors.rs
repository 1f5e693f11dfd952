use axum::{http::StatusCode, response::IntoResponse, Json};
use thiserror::Error;

use crate::JsonResponse;

// SQLite extended result codes reported through `DatabaseError::code`.
const SQLITE_MISMATCH: &str = "20";
const SQLITE_CONSTRAINT_CHECK: &str = "275";
const SQLITE_CONSTRAINT_NOTNULL: &str = "1299";
const SQLITE_CONSTRAINT_DATATYPE: &str = "3091";
const SQLITE_CONSTRAINT_PRIMARYKEY: &str = "1555";
const SQLITE_CONSTRAINT_UNIQUE: &str = "2067";

/// Broad failure classes; every [`RequestError`] belongs to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Internal,
}

impl ErrorKind {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::Validation | ErrorKind::Conflict => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Every failure a request can end in. The `Display` text is the exact
/// message sent to the client.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Invalid sort_by query")]
    InvalidSortColumn,
    #[error("Invalid order query")]
    InvalidOrderValue,
    #[error("Invalid limit query")]
    InvalidLimitValue,
    #[error("Invalid page query")]
    InvalidPageValue,
    #[error("Topic not found")]
    InvalidTopicValue,
    #[error("Invalid input")]
    InvalidInput,
    #[error("Missing required field")]
    MissingRequiredField,
    #[error("Missing required fields: {0}")]
    MissingRequiredFields(String),
    #[error("Invalid input for votes")]
    InvalidVotesValue,
    #[error("Article not found for id: {0}")]
    ArticleNotFound(i64),
    #[error("Comment not found")]
    CommentNotFound,
    #[error("Username not found")]
    AuthorNotFound,
    #[error("Topic not found")]
    TopicNotFound,
    #[error("User not found")]
    UserNotFound,
    #[error("Topic already exists")]
    TopicAlreadyExists,
    #[error("Route not found")]
    RouteNotFound,
    #[error("Internal Server Error")]
    ServerError,
    #[error("Internal Server Error")]
    DatabaseError(sqlx::Error),
}

#[derive(Debug, serde::Serialize)]
pub struct RequestErrorJson {
    msg: String,
}

impl RequestErrorJson {
    pub fn new(msg: impl Into<String>) -> RequestErrorJson {
        RequestErrorJson { msg: msg.into() }
    }
}

/// Storage failures are translated here. Type mismatches, NOT NULL and
/// vote CHECK violations become client errors, anything else stays opaque.
impl From<sqlx::Error> for RequestError {
    fn from(value: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &value {
            match db_error.code().as_deref() {
                Some(SQLITE_CONSTRAINT_NOTNULL) => return Self::MissingRequiredField,
                Some(SQLITE_MISMATCH) | Some(SQLITE_CONSTRAINT_DATATYPE) => {
                    return Self::InvalidInput
                }
                // The only CHECK in the schema keeps vote tallies integral.
                Some(SQLITE_CONSTRAINT_CHECK) => return Self::InvalidVotesValue,
                _ => {}
            }
        }
        Self::DatabaseError(value)
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> axum::response::Response {
        self.to_json_response().into_response()
    }
}

impl RequestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RequestError::InvalidSortColumn
            | RequestError::InvalidOrderValue
            | RequestError::InvalidLimitValue
            | RequestError::InvalidPageValue
            | RequestError::InvalidInput
            | RequestError::MissingRequiredField
            | RequestError::MissingRequiredFields(_)
            | RequestError::InvalidVotesValue => ErrorKind::Validation,
            RequestError::InvalidTopicValue
            | RequestError::ArticleNotFound(_)
            | RequestError::CommentNotFound
            | RequestError::AuthorNotFound
            | RequestError::TopicNotFound
            | RequestError::UserNotFound
            | RequestError::RouteNotFound => ErrorKind::NotFound,
            RequestError::TopicAlreadyExists => ErrorKind::Conflict,
            RequestError::ServerError | RequestError::DatabaseError(_) => ErrorKind::Internal,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn to_json_response(&self) -> JsonResponse<RequestErrorJson> {
        match self {
            RequestError::DatabaseError(e) => tracing::error!(error = %e, "database error"),
            RequestError::ServerError => tracing::error!("internal server error"),
            rejected => tracing::debug!(
                status = rejected.status_code().as_u16(),
                msg = %rejected.message(),
                "request rejected"
            ),
        }
        (self.status_code(), Json(RequestErrorJson::new(self.message())))
    }
}

/// True when the failure is a primary key or UNIQUE violation.
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => matches!(
            db_error.code().as_deref(),
            Some(SQLITE_CONSTRAINT_UNIQUE) | Some(SQLITE_CONSTRAINT_PRIMARYKEY)
        ),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

    // A single connection, so every query sees the same in-memory database.
    async fn scratch_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE)")
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    #[test]
    fn statuses_follow_kind() {
        assert_eq!(
            RequestError::InvalidSortColumn.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RequestError::TopicAlreadyExists.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RequestError::InvalidTopicValue.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RequestError::ServerError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn messages_are_client_facing() {
        assert_eq!(
            RequestError::ArticleNotFound(999).to_string(),
            "Article not found for id: 999"
        );
        assert_eq!(RequestError::AuthorNotFound.to_string(), "Username not found");
        assert_eq!(
            RequestError::MissingRequiredFields("slug, description".into()).to_string(),
            "Missing required fields: slug, description"
        );
        assert_eq!(
            RequestError::DatabaseError(sqlx::Error::RowNotFound).to_string(),
            "Internal Server Error"
        );
    }

    #[tokio::test]
    async fn not_null_violation_is_missing_field() {
        let pool = scratch_pool().await;
        let err = sqlx::query("INSERT INTO t (id, name) VALUES (1, NULL)")
            .execute(&pool)
            .await
            .unwrap_err();
        let err = RequestError::from(err);
        assert!(matches!(err, RequestError::MissingRequiredField));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn mismatched_key_type_is_invalid_input() {
        let pool = scratch_pool().await;
        let err = sqlx::query("INSERT INTO t (id, name) VALUES ('abc', 'x')")
            .execute(&pool)
            .await
            .unwrap_err();
        assert!(matches!(RequestError::from(err), RequestError::InvalidInput));
    }

    #[tokio::test]
    async fn overflowing_vote_tally_is_invalid_votes() {
        let pool = scratch_pool().await;
        sqlx::query(
            "CREATE TABLE v (id INTEGER PRIMARY KEY, votes INTEGER NOT NULL DEFAULT 0 \
             CHECK (typeof(votes) = 'integer'))",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO v (id, votes) VALUES (1, 16)")
            .execute(&pool)
            .await
            .unwrap();

        let err = sqlx::query("UPDATE v SET votes = votes + ? WHERE id = 1")
            .bind(i64::MAX)
            .execute(&pool)
            .await
            .unwrap_err();
        let err = RequestError::from(err);
        assert!(matches!(err, RequestError::InvalidVotesValue));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let votes: i64 = sqlx::query_scalar("SELECT votes FROM v WHERE id = 1")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(votes, 16);
    }

    #[tokio::test]
    async fn unique_violation_is_detected_but_stays_internal() {
        let pool = scratch_pool().await;
        sqlx::query("INSERT INTO t (id, name) VALUES (1, 'x')")
            .execute(&pool)
            .await
            .unwrap();
        let err = sqlx::query("INSERT INTO t (id, name) VALUES (2, 'x')")
            .execute(&pool)
            .await
            .unwrap_err();
        assert!(is_unique_violation(&err));
        assert_eq!(RequestError::from(err).kind(), ErrorKind::Internal);
    }
}
