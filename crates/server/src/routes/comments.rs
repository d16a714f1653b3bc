use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{
    db::models::ProjectComment,
    error::{AppError, Result},
    AppState,
};

use super::projects::{fetch_project, fetch_user, CommentJson};

pub fn router() -> Router<AppState> {
    Router::new().route("/:id/comments", post(add_comment))
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub user_id: i64,
    pub content: String,
    /// Position in the track, in seconds.
    pub timestamp: Option<f64>,
}

async fn add_comment(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
    Json(body): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentJson>)> {
    fetch_project(&state.db.pool, project_id).await?;

    if body.content.trim().is_empty() {
        return Err(AppError::Validation(
            "Comment content is required".to_string(),
        ));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO project_comments (project_id, user_id, content, timestamp, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(project_id)
    .bind(body.user_id)
    .bind(&body.content)
    .bind(body.timestamp)
    .bind(Utc::now())
    .execute(&state.db.pool)
    .await?;

    let comment =
        sqlx::query_as::<_, ProjectComment>("SELECT * FROM project_comments WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(&state.db.pool)
            .await?;

    let user = fetch_user(&state.db.pool, comment.user_id).await?;

    Ok((StatusCode::CREATED, Json(CommentJson { comment, user })))
}
