use serde::{de::Error as _, Deserialize, Deserializer};
use serde_json::Value;

use crate::errors::RequestError;

// Text fields take strings, numbers or booleans. Null, absent and blank
// values all count as missing.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(Value::Bool(flag)) => Ok(Some(flag.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a text value, found {other}"
        ))),
    }
}

fn require_fields(fields: &[(&'static str, bool)]) -> Result<(), RequestError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(RequestError::MissingRequiredFields(missing.join(", ")))
    }
}

// ----------------- Topic Request -----------------
#[derive(Deserialize, Debug, Default)]
pub struct CreateTopicRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTopic {
    pub slug: String,
    pub description: String,
}

impl CreateTopicRequest {
    pub fn validate(self) -> Result<NewTopic, RequestError> {
        require_fields(&[
            ("slug", self.slug.is_some()),
            ("description", self.description.is_some()),
        ])?;
        Ok(NewTopic {
            slug: self.slug.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
        })
    }
}

// ----------------- Article Request -----------------
#[derive(Deserialize, Debug, Default)]
pub struct CreateArticleRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub topic: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub article_img_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub author: String,
    pub title: String,
    pub body: String,
    pub topic: String,
    pub article_img_url: Option<String>,
}

impl CreateArticleRequest {
    pub fn validate(self) -> Result<NewArticle, RequestError> {
        require_fields(&[
            ("author", self.author.is_some()),
            ("title", self.title.is_some()),
            ("body", self.body.is_some()),
            ("topic", self.topic.is_some()),
        ])?;
        Ok(NewArticle {
            author: self.author.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            body: self.body.unwrap_or_default(),
            topic: self.topic.unwrap_or_default(),
            article_img_url: self.article_img_url,
        })
    }
}

// ----------------- Comment Request -----------------
#[derive(Deserialize, Debug, Default)]
pub struct CreateCommentRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub username: String,
    pub body: String,
}

impl CreateCommentRequest {
    pub fn validate(self) -> Result<NewComment, RequestError> {
        require_fields(&[
            ("username", self.username.is_some()),
            ("body", self.body.is_some()),
        ])?;
        Ok(NewComment {
            username: self.username.unwrap_or_default(),
            body: self.body.unwrap_or_default(),
        })
    }
}

// ----------------- Votes Request -----------------
#[derive(Deserialize, Debug, Default)]
pub struct VotesRequest {
    #[serde(default, alias = "upd_votes")]
    pub inc_votes: Option<Value>,
}

impl VotesRequest {
    /// The increment must be a JSON integer; numeric strings are rejected.
    pub fn delta(&self) -> Result<i64, RequestError> {
        self.inc_votes
            .as_ref()
            .and_then(Value::as_i64)
            .ok_or(RequestError::InvalidVotesValue)
    }
}
