use axum::{
    extract::Path,
    http::{StatusCode, Uri},
    Extension, Json,
};
use sqlx::SqlitePool;

use crate::{
    data_formats::{
        ArticleQueryParams, ArticleWrapper, CommentQueryParams, CommentWrapper,
        CreateArticleRequest, CreateCommentRequest, CreateTopicRequest, EndpointsWrapper,
        MultipleArticlesWrapper, MultipleCommentsWrapper, MultipleTopicsWrapper,
        MultipleUsersWrapper, TopicWrapper, UserWrapper, VotesRequest,
    },
    db_helpers::{
        add_comment_to_article_in_db, create_article_in_db, delete_article_in_db,
        delete_comment_in_db, get_article_by_id_in_db, get_comments_for_article_in_db,
        get_topics_in_db, get_user_by_username_in_db, get_users_in_db, insert_topic_in_db,
        list_articles_in_db, update_article_votes_in_db, update_comment_votes_in_db,
        validate_article_query,
    },
    errors::RequestError,
    extractors::{JsonBody, QueryParams, ResourceId},
    query_plan::Pagination,
    JsonResponse,
};

type JsonResult<T> = Result<JsonResponse<T>, RequestError>;

const ENDPOINTS: &str = include_str!("../endpoints.json");

// ----------------- Helper Handlers -----------------
pub async fn alive() -> &'static str {
    "alive"
}

pub async fn not_found(uri: Uri) -> RequestError {
    tracing::debug!(%uri, "no route matched");
    RequestError::RouteNotFound
}

pub async fn get_endpoints() -> JsonResult<EndpointsWrapper> {
    let endpoints = serde_json::from_str(ENDPOINTS).map_err(|e| {
        tracing::error!(error = %e, "endpoint catalog is not valid JSON");
        RequestError::ServerError
    })?;
    Ok((StatusCode::OK, Json(EndpointsWrapper { endpoints })))
}

// ----------------- Topic Handlers -----------------
pub async fn get_topics(Extension(pool): Extension<SqlitePool>) -> JsonResult<MultipleTopicsWrapper> {
    let topics = get_topics_in_db(&pool).await?;
    Ok((StatusCode::OK, Json(MultipleTopicsWrapper { topics })))
}

pub async fn post_topic(
    Extension(pool): Extension<SqlitePool>,
    JsonBody(request): JsonBody<CreateTopicRequest>,
) -> JsonResult<TopicWrapper> {
    let topic = insert_topic_in_db(&pool, request.validate()?).await?;
    Ok((StatusCode::CREATED, Json(TopicWrapper { topic })))
}

// ----------------- Article Handlers -----------------
pub async fn list_articles(
    Extension(pool): Extension<SqlitePool>,
    QueryParams(params): QueryParams<ArticleQueryParams>,
) -> JsonResult<MultipleArticlesWrapper> {
    let plan = validate_article_query(&pool, params).await?;
    let (articles, total_count) = list_articles_in_db(&pool, &plan).await?;
    Ok((
        StatusCode::OK,
        Json(MultipleArticlesWrapper {
            articles,
            total_count,
        }),
    ))
}

pub async fn post_article(
    Extension(pool): Extension<SqlitePool>,
    JsonBody(request): JsonBody<CreateArticleRequest>,
) -> JsonResult<ArticleWrapper> {
    let article = create_article_in_db(&pool, request.validate()?).await?;
    Ok((StatusCode::CREATED, Json(ArticleWrapper { article })))
}

pub async fn get_article(
    Extension(pool): Extension<SqlitePool>,
    ResourceId(article_id): ResourceId,
) -> JsonResult<ArticleWrapper> {
    let article = get_article_by_id_in_db(&pool, article_id).await?;
    Ok((StatusCode::OK, Json(ArticleWrapper { article })))
}

pub async fn patch_article(
    Extension(pool): Extension<SqlitePool>,
    ResourceId(article_id): ResourceId,
    JsonBody(request): JsonBody<VotesRequest>,
) -> JsonResult<ArticleWrapper> {
    let delta = request.delta()?;
    let article = update_article_votes_in_db(&pool, article_id, delta).await?;
    Ok((StatusCode::OK, Json(ArticleWrapper { article })))
}

pub async fn delete_article(
    Extension(pool): Extension<SqlitePool>,
    ResourceId(article_id): ResourceId,
) -> Result<StatusCode, RequestError> {
    delete_article_in_db(&pool, article_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----------------- Comment Handlers -----------------
pub async fn get_article_comments(
    Extension(pool): Extension<SqlitePool>,
    ResourceId(article_id): ResourceId,
    QueryParams(params): QueryParams<CommentQueryParams>,
) -> JsonResult<MultipleCommentsWrapper> {
    let pagination = Pagination::for_comments(&params)?;
    let (comments, total_count) =
        get_comments_for_article_in_db(&pool, article_id, pagination).await?;
    Ok((
        StatusCode::OK,
        Json(MultipleCommentsWrapper {
            comments,
            total_count,
        }),
    ))
}

pub async fn post_article_comment(
    Extension(pool): Extension<SqlitePool>,
    ResourceId(article_id): ResourceId,
    JsonBody(request): JsonBody<CreateCommentRequest>,
) -> JsonResult<CommentWrapper> {
    let comment = add_comment_to_article_in_db(&pool, article_id, request.validate()?).await?;
    Ok((StatusCode::CREATED, Json(CommentWrapper { comment })))
}

pub async fn patch_comment(
    Extension(pool): Extension<SqlitePool>,
    ResourceId(comment_id): ResourceId,
    JsonBody(request): JsonBody<VotesRequest>,
) -> JsonResult<CommentWrapper> {
    let delta = request.delta()?;
    let comment = update_comment_votes_in_db(&pool, comment_id, delta).await?;
    Ok((StatusCode::OK, Json(CommentWrapper { comment })))
}

pub async fn delete_comment(
    Extension(pool): Extension<SqlitePool>,
    ResourceId(comment_id): ResourceId,
) -> Result<StatusCode, RequestError> {
    delete_comment_in_db(&pool, comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----------------- User Handlers -----------------
pub async fn get_users(Extension(pool): Extension<SqlitePool>) -> JsonResult<MultipleUsersWrapper> {
    let users = get_users_in_db(&pool).await?;
    Ok((StatusCode::OK, Json(MultipleUsersWrapper { users })))
}

pub async fn get_user(
    Extension(pool): Extension<SqlitePool>,
    Path(username): Path<String>,
) -> JsonResult<UserWrapper> {
    let user = get_user_by_username_in_db(&pool, &username).await?;
    Ok((StatusCode::OK, Json(UserWrapper { user })))
}
