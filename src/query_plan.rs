//! Turns untrusted listing parameters into a plan that is safe to compose
//! into SQL. Only identifiers from the fixed tables below ever reach the
//! query text; user values are always bound.

use crate::{
    data_formats::{ArticleQueryParams, CommentQueryParams},
    errors::RequestError,
};

pub const DEFAULT_LIMIT: i64 = 10;
pub const DEFAULT_PAGE: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    Title,
    Author,
    #[default]
    CreatedAt,
    Votes,
    ArticleId,
    CommentsCount,
}

impl SortColumn {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "title" => Some(SortColumn::Title),
            "author" => Some(SortColumn::Author),
            "created_at" => Some(SortColumn::CreatedAt),
            "votes" => Some(SortColumn::Votes),
            "article_id" => Some(SortColumn::ArticleId),
            "comments_count" => Some(SortColumn::CommentsCount),
            _ => None,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortColumn::Title => "articles.title",
            SortColumn::Author => "articles.author",
            SortColumn::CreatedAt => "articles.created_at",
            SortColumn::Votes => "articles.votes",
            SortColumn::ArticleId => "articles.article_id",
            SortColumn::CommentsCount => "comments_count",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub page: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            page: DEFAULT_PAGE,
        }
    }
}

fn positive_integer(raw: Option<&str>, default: i64) -> Option<i64> {
    match raw {
        None => Some(default),
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|value| *value > 0)
            .map(i64::from),
    }
}

impl Pagination {
    /// Limit is checked before page.
    pub fn parse(limit: Option<&str>, page: Option<&str>) -> Result<Self, RequestError> {
        let limit = positive_integer(limit, DEFAULT_LIMIT).ok_or(RequestError::InvalidLimitValue)?;
        let page = positive_integer(page, DEFAULT_PAGE).ok_or(RequestError::InvalidPageValue)?;
        // The row offset must stay representable for the OFFSET bind.
        (page - 1)
            .checked_mul(limit)
            .ok_or(RequestError::InvalidPageValue)?;
        Ok(Self { limit, page })
    }

    /// Comment listings report any bad pagination value as plain invalid input.
    pub fn for_comments(params: &CommentQueryParams) -> Result<Self, RequestError> {
        Self::parse(params.limit.as_deref(), params.p.as_deref())
            .map_err(|_| RequestError::InvalidInput)
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// A validated article listing. The topic filter is only syntactically
/// accepted here; whether it names a known topic is checked against storage
/// with [`ArticleListPlan::check_topic`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArticleListPlan {
    pub sort_by: SortColumn,
    pub order: SortOrder,
    pub pagination: Pagination,
    pub topic: Option<String>,
}

impl ArticleListPlan {
    /// Checks run in a fixed order: sort_by, order, limit, page.
    pub fn from_params(params: ArticleQueryParams) -> Result<Self, RequestError> {
        let sort_by = match params.sort_by.as_deref() {
            Some(token) => SortColumn::parse(token).ok_or(RequestError::InvalidSortColumn)?,
            None => SortColumn::default(),
        };
        let order = match params.order.as_deref() {
            Some(token) => SortOrder::parse(token).ok_or(RequestError::InvalidOrderValue)?,
            None => SortOrder::default(),
        };
        let pagination = Pagination::parse(params.limit.as_deref(), params.p.as_deref())?;

        Ok(Self {
            sort_by,
            order,
            pagination,
            topic: params.topic,
        })
    }

    pub fn check_topic<S: AsRef<str>>(&self, known_slugs: &[S]) -> Result<(), RequestError> {
        match &self.topic {
            Some(topic) if !known_slugs.iter().any(|slug| slug.as_ref() == topic) => {
                Err(RequestError::InvalidTopicValue)
            }
            _ => Ok(()),
        }
    }

    pub fn order_by_clause(&self) -> String {
        format!(" ORDER BY {} {}", self.sort_by.as_sql(), self.order.as_sql())
    }

    pub fn limit(&self) -> i64 {
        self.pagination.limit
    }

    pub fn offset(&self) -> i64 {
        self.pagination.offset()
    }
}
