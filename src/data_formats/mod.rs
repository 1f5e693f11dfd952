mod request;
mod wrapper;

pub use request::*;
pub use wrapper::*;

use serde::{Deserialize, Serialize};

/// Raw `GET /api/articles` query string. Values stay untyped until the
/// listing plan validates them.
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct ArticleQueryParams {
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub topic: Option<String>,
    pub limit: Option<String>,
    pub p: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct CommentQueryParams {
    pub limit: Option<String>,
    pub p: Option<String>,
}
