use sqlx::{Executor, Sqlite, SqlitePool};

use crate::data_formats::{ArticleQueryParams, NewArticle};
use crate::errors::RequestError;
use crate::models::{Article, ArticleSummary};
use crate::query_plan::ArticleListPlan;

use super::{get_topic_slugs_in_db, topic_exists, user_exists, QueryBuilder};

const ARTICLE_SUMMARY_QUERY: &str = r#"
            SELECT articles.article_id,
                   articles.author,
                   articles.title,
                   articles.topic,
                   articles.created_at,
                   articles.votes,
                   articles.article_img_url,
                   COUNT(comments.comment_id) AS comments_count
            FROM   articles
                   LEFT JOIN comments
                          ON comments.article_id = articles.article_id"#;

const SINGLE_ARTICLE_QUERY: &str = r#"
            SELECT articles.article_id,
                   articles.author,
                   articles.title,
                   articles.body,
                   articles.topic,
                   articles.created_at,
                   articles.votes,
                   articles.article_img_url,
                   COUNT(comments.comment_id) AS comments_count
            FROM   articles
                   LEFT JOIN comments
                          ON comments.article_id = articles.article_id
            WHERE  articles.article_id = ?
            GROUP  BY articles.article_id
"#;

async fn fetch_article<'e, E>(executor: E, article_id: i64) -> Result<Option<Article>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<Sqlite, Article>(SINGLE_ARTICLE_QUERY)
        .bind(article_id)
        .fetch_optional(executor)
        .await
}

/// Syntactic checks first, then the one storage lookup the plan needs: the
/// topic filter must name a known topic.
pub async fn validate_article_query(
    pool: &SqlitePool,
    params: ArticleQueryParams,
) -> Result<ArticleListPlan, RequestError> {
    let plan = ArticleListPlan::from_params(params)?;
    if plan.topic.is_some() {
        let slugs = get_topic_slugs_in_db(pool).await?;
        plan.check_topic(&slugs)?;
    }
    Ok(plan)
}

/// Returns one page of articles plus the number of articles matching the
/// topic filter, regardless of the page window.
pub async fn list_articles_in_db(
    pool: &SqlitePool,
    plan: &ArticleListPlan,
) -> Result<(Vec<ArticleSummary>, i64), RequestError> {
    let (page_query, page_params) = QueryBuilder::new(ARTICLE_SUMMARY_QUERY)
        .add_filter("articles.topic", plan.topic.clone())
        .push(" GROUP BY articles.article_id")
        .push(&plan.order_by_clause())
        .push(" LIMIT ? OFFSET ?")
        .build();
    let (count_query, count_params) = QueryBuilder::new("SELECT COUNT(*) FROM articles")
        .add_filter("articles.topic", plan.topic.clone())
        .build();

    let mut page = sqlx::query_as::<Sqlite, ArticleSummary>(&page_query);
    for param in page_params {
        page = page.bind(param);
    }
    let page = page.bind(plan.limit()).bind(plan.offset()).fetch_all(pool);

    let mut count = sqlx::query_scalar::<Sqlite, i64>(&count_query);
    for param in count_params {
        count = count.bind(param);
    }
    let count = count.fetch_one(pool);

    let (articles, total_count) = tokio::try_join!(page, count)?;
    Ok((articles, total_count))
}

pub async fn get_article_by_id_in_db(
    pool: &SqlitePool,
    article_id: i64,
) -> Result<Article, RequestError> {
    fetch_article(pool, article_id)
        .await?
        .ok_or(RequestError::ArticleNotFound(article_id))
}

pub async fn create_article_in_db(
    pool: &SqlitePool,
    NewArticle {
        author,
        title,
        body,
        topic,
        article_img_url,
    }: NewArticle,
) -> Result<Article, RequestError> {
    if !user_exists(pool, &author).await? {
        return Err(RequestError::AuthorNotFound);
    }
    if !topic_exists(pool, &topic).await? {
        return Err(RequestError::TopicNotFound);
    }

    let insert = match article_img_url {
        Some(url) => sqlx::query_scalar::<Sqlite, i64>(
            r#"
            INSERT INTO articles (author, title, body, topic, article_img_url)
            VALUES (?, ?, ?, ?, ?)
            RETURNING article_id
            "#,
        )
        .bind(author)
        .bind(title)
        .bind(body)
        .bind(topic)
        .bind(url),
        // Leaves the image to the column default.
        None => sqlx::query_scalar::<Sqlite, i64>(
            r#"
            INSERT INTO articles (author, title, body, topic)
            VALUES (?, ?, ?, ?)
            RETURNING article_id
            "#,
        )
        .bind(author)
        .bind(title)
        .bind(body)
        .bind(topic),
    };
    let article_id = insert.fetch_one(pool).await?;

    fetch_article(pool, article_id)
        .await?
        .ok_or(RequestError::ServerError)
}

/// `votes = votes + delta` happens in a single statement; the row is then
/// read back inside the same transaction.
pub async fn update_article_votes_in_db(
    pool: &SqlitePool,
    article_id: i64,
    delta: i64,
) -> Result<Article, RequestError> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("UPDATE articles SET votes = votes + ? WHERE article_id = ?")
        .bind(delta)
        .bind(article_id)
        .execute(&mut tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::ArticleNotFound(article_id));
    }

    let article = fetch_article(&mut tx, article_id)
        .await?
        .ok_or(RequestError::ArticleNotFound(article_id))?;
    tx.commit().await?;

    Ok(article)
}

/// Removes the article's comments and then the article. Deleting an id
/// that does not exist succeeds without touching anything.
pub async fn delete_article_in_db(pool: &SqlitePool, article_id: i64) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;

    let comments = sqlx::query("DELETE FROM comments WHERE article_id = ?")
        .bind(article_id)
        .execute(&mut tx)
        .await?;
    let articles = sqlx::query("DELETE FROM articles WHERE article_id = ?")
        .bind(article_id)
        .execute(&mut tx)
        .await?;

    tx.commit().await?;
    tracing::debug!(
        article_id,
        comments = comments.rows_affected(),
        articles = articles.rows_affected(),
        "deleted article"
    );
    Ok(())
}
