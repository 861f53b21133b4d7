//! Comment handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{ArticleId, AuthContext, CommentId, CommentWithArticle};
use crate::error::AppError;
use crate::AppState;

/// The article a comment belongs to
#[derive(Debug, Serialize)]
pub struct CommentArticleResponse {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i64,
    pub article: CommentArticleResponse,
    pub content: String,
    pub author_name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<CommentWithArticle> for CommentResponse {
    fn from(item: CommentWithArticle) -> Self {
        let comment = item.comment;
        Self {
            id: comment.id.0,
            article: CommentArticleResponse {
                id: item.article.id.0,
                title: item.article.title,
            },
            content: comment.content,
            author_name: comment.author_name,
            created_at: comment.created_at.to_rfc3339(),
            updated_at: comment.updated_at.to_rfc3339(),
        }
    }
}

/// Body for creating or replacing a comment
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: Option<String>,
}

fn to_responses(items: Vec<CommentWithArticle>) -> Vec<CommentResponse> {
    items.into_iter().map(CommentResponse::from).collect()
}

/// GET /comments
pub async fn list_comments(
    State(state): State<AppState>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let comments = state.comment_service.list().await?;
    Ok(Json(to_responses(comments)))
}

/// GET /articles/:id/comments
pub async fn list_article_comments(
    State(state): State<AppState>,
    Path(article_id): Path<i64>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let comments = state
        .comment_service
        .list_for_article(&ArticleId(article_id))
        .await?;
    Ok(Json(to_responses(comments)))
}

/// GET /comments/:id
pub async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CommentResponse>, AppError> {
    let comment = state.comment_service.get(&CommentId(id)).await?;
    Ok(Json(comment.into()))
}

/// POST /articles/:id/comments
///
/// Comment on an article. Logged-in callers are recorded as the author,
/// everyone else as "anonymous".
pub async fn create_comment(
    State(state): State<AppState>,
    Path(article_id): Path<i64>,
    auth: Option<Extension<AuthContext>>,
    Json(request): Json<CommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    let comment = state
        .comment_service
        .create(
            &ArticleId(article_id),
            request.content.as_deref(),
            auth.as_ref().map(|Extension(ctx)| ctx),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(comment.into())))
}

/// PUT /comments/:id
///
/// Replace a comment's content. Requires authentication.
pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<CommentRequest>,
) -> Result<Json<CommentResponse>, AppError> {
    let comment = state
        .comment_service
        .update(&CommentId(id), request.content.as_deref())
        .await?;
    Ok(Json(comment.into()))
}

/// DELETE /comments/:id
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.comment_service.delete(&CommentId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /articles/:article_id/comments/:id
///
/// Delete a comment through its article; 404 if it belongs to another one.
pub async fn delete_article_comment(
    State(state): State<AppState>,
    Path((article_id, id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    state
        .comment_service
        .delete_for_article(&ArticleId(article_id), &CommentId(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
