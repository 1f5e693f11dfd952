use sqlx::{Sqlite, SqlitePool};

use crate::{
    data_formats::NewTopic,
    errors::{is_unique_violation, RequestError},
    models::Topic,
};

pub async fn get_topics_in_db(pool: &SqlitePool) -> Result<Vec<Topic>, RequestError> {
    let topics = sqlx::query_as::<Sqlite, Topic>("SELECT slug, description FROM topics")
        .fetch_all(pool)
        .await?;
    Ok(topics)
}

pub async fn get_topic_slugs_in_db(pool: &SqlitePool) -> Result<Vec<String>, RequestError> {
    let slugs = sqlx::query_scalar::<Sqlite, String>("SELECT slug FROM topics")
        .fetch_all(pool)
        .await?;
    Ok(slugs)
}

pub async fn insert_topic_in_db(
    pool: &SqlitePool,
    NewTopic { slug, description }: NewTopic,
) -> Result<Topic, RequestError> {
    sqlx::query_as::<Sqlite, Topic>(
        r#"
        INSERT INTO topics (slug, description)
        VALUES (?, ?)
        RETURNING slug, description
        "#,
    )
    .bind(slug)
    .bind(description)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            RequestError::TopicAlreadyExists
        } else {
            RequestError::from(e)
        }
    })
}
