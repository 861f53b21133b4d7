//! Article handlers
//!
//! Endpoints for reading and editing articles.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::entities::{ArticleChanges, ArticleDetail, ArticleId, NewArticle};
use crate::domain::validation::FieldErrors;
use crate::error::AppError;
use crate::AppState;

/// Query parameters for paginated listings
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: u64,
}

impl PageQuery {
    /// Largest value the database accepts for LIMIT/OFFSET
    pub const MAX_VALUE: u64 = i64::MAX as u64;

    /// `(limit, offset)` once both fit in a signed 64-bit bind parameter
    pub fn bounds(&self) -> Result<(Option<u64>, u64), AppError> {
        let mut errors = FieldErrors::new();
        let message = format!(
            "Ensure this value is less than or equal to {}.",
            Self::MAX_VALUE
        );
        if self.limit.is_some_and(|limit| limit > Self::MAX_VALUE) {
            errors.add("limit", message.as_str());
        }
        if self.offset > Self::MAX_VALUE {
            errors.add("offset", message);
        }
        errors.into_result()?;
        Ok((self.limit, self.offset))
    }
}

/// One row of the article list
#[derive(Debug, Serialize)]
pub struct ArticleListItem {
    pub id: i64,
    pub title: String,
    pub content: String,
}

/// A comment as shown inside an article
#[derive(Debug, Serialize)]
pub struct ArticleCommentItem {
    pub id: i64,
    pub content: String,
}

/// Full article with its comments
#[derive(Debug, Serialize)]
pub struct ArticleDetailResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub comments: Vec<ArticleCommentItem>,
    pub num_of_comments: i64,
}

impl From<ArticleDetail> for ArticleDetailResponse {
    fn from(detail: ArticleDetail) -> Self {
        let article = detail.article;
        Self {
            id: article.id.0,
            title: article.title,
            content: article.content,
            image: article.image,
            created_at: article.created_at.to_rfc3339(),
            updated_at: article.updated_at.to_rfc3339(),
            comments: detail
                .comments
                .into_iter()
                .map(|c| ArticleCommentItem {
                    id: c.id.0,
                    content: c.content,
                })
                .collect(),
            num_of_comments: detail.num_of_comments,
        }
    }
}

/// Request to create an article
#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
}

/// Partial article update
#[derive(Debug, Deserialize)]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    /// Absent leaves the image alone; `null` clears it
    #[serde(default, deserialize_with = "present_or_null")]
    pub image: Option<Option<String>>,
}

/// Distinguishes a present `null` from an absent field
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// GET /articles
///
/// List articles, oldest first.
pub async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<ArticleListItem>>, AppError> {
    let (limit, offset) = query.bounds()?;
    let articles = state.article_service.list(limit, offset).await?;

    let items = articles
        .into_iter()
        .map(|a| ArticleListItem {
            id: a.id.0,
            title: a.title,
            content: a.content,
        })
        .collect();

    Ok(Json(items))
}

/// GET /articles/:id
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ArticleDetailResponse>, AppError> {
    let detail = state.article_service.get_detail(&ArticleId(id)).await?;
    Ok(Json(detail.into()))
}

/// POST /articles
///
/// Create an article. Requires authentication.
pub async fn create_article(
    State(state): State<AppState>,
    Json(request): Json<CreateArticleRequest>,
) -> Result<(StatusCode, Json<ArticleDetailResponse>), AppError> {
    let new_article = NewArticle::parse(
        request.title.as_deref(),
        request.content.as_deref(),
        request.image.as_deref(),
    )?;

    let detail = state.article_service.create(new_article).await?;

    Ok((StatusCode::CREATED, Json(detail.into())))
}

/// PUT /articles/:id
///
/// Update any subset of title, content, and image. Requires authentication.
pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateArticleRequest>,
) -> Result<Json<ArticleDetailResponse>, AppError> {
    let changes = ArticleChanges::parse(
        request.title.as_deref(),
        request.content.as_deref(),
        request.image.as_ref().map(|i| i.as_deref()),
    )?;

    let detail = state
        .article_service
        .update(&ArticleId(id), changes)
        .await?;

    Ok(Json(detail.into()))
}

/// DELETE /articles/:id
///
/// Delete an article and its comments. Requires authentication.
pub async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.article_service.delete(&ArticleId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
