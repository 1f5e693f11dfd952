use sqlx::{Executor, Sqlite};

mod article_helpers;
mod comment_helpers;
mod topic_helpers;
mod user_helpers;

pub use article_helpers::*;
pub use comment_helpers::*;
pub use topic_helpers::*;
pub use user_helpers::*;

/// Appends equality filters to a base query. Column names are `'static` so
/// only identifiers written in this crate can reach the SQL text; every
/// value is collected for binding.
struct QueryBuilder {
    query: String,
    params: Vec<String>,
}

impl QueryBuilder {
    fn new(initial: &str) -> Self {
        Self {
            query: initial.to_owned(),
            params: vec![],
        }
    }

    fn add_filter(mut self, column: &'static str, param: Option<String>) -> Self {
        if let Some(value) = param {
            let joiner = if self.params.is_empty() { " WHERE " } else { " AND " };
            self.query.push_str(joiner);
            self.query.push_str(column);
            self.query.push_str(" = ?");
            self.params.push(value);
        }
        self
    }

    fn push(mut self, fragment: &str) -> Self {
        self.query.push_str(fragment);
        self
    }

    fn build(self) -> (String, Vec<String>) {
        (self.query, self.params)
    }
}

// ----------------- Helper Functions -----------------

async fn article_exists<'e, E>(executor: E, article_id: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let found = sqlx::query_scalar::<Sqlite, i64>("SELECT 1 FROM articles WHERE article_id = ?")
        .bind(article_id)
        .fetch_optional(executor)
        .await?;
    Ok(found.is_some())
}

async fn user_exists<'e, E>(executor: E, username: &str) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let found = sqlx::query_scalar::<Sqlite, i64>("SELECT 1 FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(executor)
        .await?;
    Ok(found.is_some())
}

async fn topic_exists<'e, E>(executor: E, slug: &str) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let found = sqlx::query_scalar::<Sqlite, i64>("SELECT 1 FROM topics WHERE slug = ?")
        .bind(slug)
        .fetch_optional(executor)
        .await?;
    Ok(found.is_some())
}
