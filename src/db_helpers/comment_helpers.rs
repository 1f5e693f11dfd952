use sqlx::{Sqlite, SqlitePool};

use crate::{
    data_formats::NewComment, errors::RequestError, models::Comment, query_plan::Pagination,
};

use super::{article_exists, user_exists};

/// Newest first, always; the order is not configurable.
pub async fn get_comments_for_article_in_db(
    pool: &SqlitePool,
    article_id: i64,
    pagination: Pagination,
) -> Result<(Vec<Comment>, i64), RequestError> {
    if !article_exists(pool, article_id).await? {
        return Err(RequestError::ArticleNotFound(article_id));
    }

    let page = sqlx::query_as::<Sqlite, Comment>(
        r#"
        SELECT comment_id, article_id, author, body, votes, created_at
        FROM   comments
        WHERE  article_id = ?
        ORDER  BY created_at DESC
        LIMIT  ? OFFSET ?
        "#,
    )
    .bind(article_id)
    .bind(pagination.limit)
    .bind(pagination.offset())
    .fetch_all(pool);

    let count = sqlx::query_scalar::<Sqlite, i64>("SELECT COUNT(*) FROM comments WHERE article_id = ?")
        .bind(article_id)
        .fetch_one(pool);

    let (comments, total_count) = tokio::try_join!(page, count)?;
    Ok((comments, total_count))
}

/// The article is confirmed before the author, and both before the insert.
pub async fn add_comment_to_article_in_db(
    pool: &SqlitePool,
    article_id: i64,
    NewComment { username, body }: NewComment,
) -> Result<Comment, RequestError> {
    if !article_exists(pool, article_id).await? {
        return Err(RequestError::ArticleNotFound(article_id));
    }
    if !user_exists(pool, &username).await? {
        return Err(RequestError::AuthorNotFound);
    }

    let comment = sqlx::query_as::<Sqlite, Comment>(
        r#"
        INSERT INTO comments (body, article_id, author)
        VALUES (?, ?, ?)
        RETURNING comment_id, article_id, author, body, votes, created_at
        "#,
    )
    .bind(body)
    .bind(article_id)
    .bind(username)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

pub async fn update_comment_votes_in_db(
    pool: &SqlitePool,
    comment_id: i64,
    delta: i64,
) -> Result<Comment, RequestError> {
    sqlx::query_as::<Sqlite, Comment>(
        r#"
        UPDATE comments
        SET    votes = votes + ?
        WHERE  comment_id = ?
        RETURNING comment_id, article_id, author, body, votes, created_at
        "#,
    )
    .bind(delta)
    .bind(comment_id)
    .fetch_optional(pool)
    .await?
    .ok_or(RequestError::CommentNotFound)
}

pub async fn delete_comment_in_db(pool: &SqlitePool, comment_id: i64) -> Result<(), RequestError> {
    let result = sqlx::query("DELETE FROM comments WHERE comment_id = ?")
        .bind(comment_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RequestError::CommentNotFound);
    }
    Ok(())
}
