#![allow(dead_code)]

use std::future;

use anyhow::Result;
use nc_news::{bind_random_port, connect_pool, migrate_db, serve};
use reqwest::Client;
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;

pub const TOPICS: &[(&str, &str)] = &[
    ("mitch", "The man, the Mitch, the legend"),
    ("cats", "Not dogs"),
    ("paper", "what books are made of"),
];

pub const USERS: &[(&str, &str, &str)] = &[
    (
        "butter_bridge",
        "jonny",
        "https://www.healthytherapies.com/wp-content/uploads/2016/06/Lime3.jpg",
    ),
    (
        "icellusedkars",
        "sam",
        "https://avatars2.githubusercontent.com/u/24604688?s=460&v=4",
    ),
    (
        "rogersop",
        "paul",
        "https://avatars2.githubusercontent.com/u/24394918?s=400&v=4",
    ),
    (
        "lurker",
        "do_nothing",
        "https://www.golenbock.com/wp-content/uploads/2015/01/placeholder-user.png",
    ),
];

// (title, topic, author, created_at, votes); ids follow insertion order.
pub const ARTICLES: &[(&str, &str, &str, &str, i64)] = &[
    ("Living in the shadow of a great man", "mitch", "butter_bridge", "2020-07-09 20:11:00", 100),
    ("Sony Vaio; or, The Laptop", "mitch", "icellusedkars", "2020-10-16 05:03:00", 0),
    ("Eight pug gifs that remind me of mitch", "mitch", "icellusedkars", "2020-11-03 09:12:00", 0),
    ("Student SUES Mitch!", "mitch", "rogersop", "2020-05-06 01:14:00", 0),
    ("UNCOVERED: catspiracy to bring down democracy", "cats", "rogersop", "2020-08-03 13:14:00", 0),
    ("A", "mitch", "icellusedkars", "2020-10-18 01:00:00", 0),
    ("Z", "mitch", "icellusedkars", "2020-01-07 14:08:00", 0),
    ("Does Mitch predate civilisation?", "mitch", "icellusedkars", "2020-04-17 01:08:00", 0),
    ("They're not exactly dogs, are they?", "mitch", "butter_bridge", "2020-06-06 09:10:00", 0),
    ("Seven inspirational thought leaders from Manchester UK", "mitch", "rogersop", "2020-05-14 04:15:00", 0),
    ("Am I a cat?", "mitch", "icellusedkars", "2020-01-15 22:21:00", 0),
    ("Moustache", "mitch", "butter_bridge", "2020-10-11 11:24:00", 0),
    ("Another article about Mitch", "mitch", "butter_bridge", "2020-10-12 11:24:00", 0),
];

// (article_id, author, body, votes, created_at); ids follow insertion order.
pub const COMMENTS: &[(i64, &str, &str, i64, &str)] = &[
    (9, "butter_bridge", "Oh, I've got compassion running out of my nose, pal!", 16, "2020-04-06 12:17:00"),
    (1, "butter_bridge", "The beautiful thing about treasure is that it exists.", 14, "2020-10-31 03:03:00"),
    (1, "icellusedkars", "Replacing the quiet elegance of the dark suit and tie.", 100, "2020-03-01 01:13:00"),
    (1, "icellusedkars", "I carry a log - yes. Is it funny to you? It is not to me.", -100, "2020-02-23 12:01:00"),
    (1, "icellusedkars", "I hate streaming noses", 0, "2020-11-03 21:00:00"),
    (1, "icellusedkars", "I hate streaming eyes even more", 0, "2020-04-11 21:02:00"),
    (1, "icellusedkars", "Lobster pot", 0, "2020-05-15 20:19:00"),
    (1, "icellusedkars", "Delicious crackerbreads", 0, "2020-04-14 20:19:00"),
    (1, "icellusedkars", "Superficially charming", 0, "2020-01-01 03:08:00"),
    (3, "icellusedkars", "git push origin master", 0, "2020-06-20 07:24:00"),
    (3, "icellusedkars", "Ambidextrous marsupial", 0, "2020-09-19 23:10:00"),
    (1, "icellusedkars", "Massive intercranial brain haemorrhage", 0, "2020-03-02 07:10:00"),
    (1, "icellusedkars", "Fruit pastilles", 0, "2020-06-15 10:25:00"),
    (5, "icellusedkars", "What do you see? I have no idea where this will lead us.", 16, "2020-06-09 05:00:00"),
    (5, "butter_bridge", "I am 100% sure that we're not completely sure.", 1, "2020-11-24 00:08:00"),
    (6, "butter_bridge", "This is a bad article name", 1, "2020-10-11 15:23:00"),
    (9, "icellusedkars", "The owls are not what they seem.", 20, "2020-03-14 17:02:00"),
    (1, "butter_bridge", "This morning, I showered for nine minutes.", 16, "2020-07-21 00:20:00"),
];

const ARTICLE_IMG_URL: &str =
    "https://images.pexels.com/photos/158651/news-newsletter-newspaper-information-158651.jpeg?w=700&h=700";

async fn seed(pool: &SqlitePool) -> Result<()> {
    for &(slug, description) in TOPICS {
        sqlx::query("INSERT INTO topics (slug, description) VALUES (?, ?)")
            .bind(slug)
            .bind(description)
            .execute(pool)
            .await?;
    }
    for &(username, name, avatar_url) in USERS {
        sqlx::query("INSERT INTO users (username, name, avatar_url) VALUES (?, ?, ?)")
            .bind(username)
            .bind(name)
            .bind(avatar_url)
            .execute(pool)
            .await?;
    }
    for &(title, topic, author, created_at, votes) in ARTICLES {
        sqlx::query(
            "INSERT INTO articles (title, topic, author, body, created_at, votes, article_img_url)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(title)
        .bind(topic)
        .bind(author)
        .bind(format!("Body of {title}"))
        .bind(created_at)
        .bind(votes)
        .bind(ARTICLE_IMG_URL)
        .execute(pool)
        .await?;
    }
    for &(article_id, author, body, votes, created_at) in COMMENTS {
        sqlx::query(
            "INSERT INTO comments (article_id, author, body, votes, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(article_id)
        .bind(author)
        .bind(body)
        .bind(votes)
        .bind(created_at)
        .execute(pool)
        .await?;
    }
    Ok(())
}

/// A server on a random port backed by its own seeded database.
pub struct TestApp {
    pub base_url: String,
    pub pool: SqlitePool,
    pub client: Client,
    _db_dir: Option<TempDir>,
}

impl TestApp {
    /// In-memory database, so the pool is pinned to one connection.
    pub async fn spawn() -> Result<Self> {
        let pool = connect_pool("sqlite::memory:", 1).await?;
        Self::start(pool, None).await
    }

    /// File database in a temporary directory, served through a pool with
    /// `max_connections` connections so requests really run side by side.
    pub async fn spawn_on_file(max_connections: u32) -> Result<Self> {
        let dir = TempDir::new()?;
        let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("news.db").display());
        let pool = connect_pool(&db_url, max_connections).await?;
        Self::start(pool, Some(dir)).await
    }

    async fn start(pool: SqlitePool, db_dir: Option<TempDir>) -> Result<Self> {
        migrate_db(&pool).await?;
        seed(&pool).await?;

        let listener = bind_random_port()?;
        let base_url = format!("http://{}", listener.local_addr()?);
        tokio::spawn(serve(listener, pool.clone(), future::pending()));

        Ok(Self {
            base_url,
            pool,
            client: Client::new(),
            _db_dir: db_dir,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_json(&self, path: &str) -> Result<(u16, Value)> {
        let res = self.client.get(self.url(path)).send().await?;
        let status = res.status().as_u16();
        Ok((status, res.json().await?))
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Result<(u16, Value)> {
        let res = self.client.post(self.url(path)).json(body).send().await?;
        let status = res.status().as_u16();
        Ok((status, res.json().await?))
    }

    pub async fn patch_json(&self, path: &str, body: &Value) -> Result<(u16, Value)> {
        let res = self.client.patch(self.url(path)).json(body).send().await?;
        let status = res.status().as_u16();
        Ok((status, res.json().await?))
    }

    pub async fn delete(&self, path: &str) -> Result<u16> {
        let res = self.client.delete(self.url(path)).send().await?;
        Ok(res.status().as_u16())
    }
}

pub fn msg(body: &Value) -> &str {
    body["msg"].as_str().unwrap_or_default()
}
