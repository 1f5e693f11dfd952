use serde::Serialize;
use serde_json::Value;

use crate::models::{Article, ArticleSummary, Comment, Topic, User};

#[derive(Debug, Serialize)]
pub struct TopicWrapper {
    pub topic: Topic,
}

#[derive(Debug, Serialize)]
pub struct MultipleTopicsWrapper {
    pub topics: Vec<Topic>,
}

#[derive(Debug, Serialize)]
pub struct ArticleWrapper {
    pub article: Article,
}

#[derive(Debug, Serialize)]
pub struct MultipleArticlesWrapper {
    pub articles: Vec<ArticleSummary>,
    pub total_count: i64,
}

#[derive(Debug, Serialize)]
pub struct CommentWrapper {
    pub comment: Comment,
}

#[derive(Debug, Serialize)]
pub struct MultipleCommentsWrapper {
    pub comments: Vec<Comment>,
    pub total_count: i64,
}

#[derive(Debug, Serialize)]
pub struct UserWrapper {
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct MultipleUsersWrapper {
    pub users: Vec<User>,
}

#[derive(Debug, Serialize)]
pub struct EndpointsWrapper {
    pub endpoints: Value,
}
