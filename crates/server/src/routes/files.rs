use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{db::models::ProjectFile, error::Result, AppState};

use super::projects::fetch_project;

pub fn router() -> Router<AppState> {
    Router::new().route("/:id/files", post(attach_file))
}

#[derive(Debug, Deserialize)]
pub struct AttachFileRequest {
    pub filename: String,
    pub original_filename: String,
    pub file_type: String,
    pub file_size: Option<i64>,
    pub file_path: String,
    pub uploaded_by: i64,
    #[serde(default)]
    pub is_stem: bool,
}

/// Record file metadata against a project. No bytes are transferred; the
/// path is stored as-is.
async fn attach_file(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
    Json(body): Json<AttachFileRequest>,
) -> Result<(StatusCode, Json<ProjectFile>)> {
    fetch_project(&state.db.pool, project_id).await?;

    let result = sqlx::query(
        r#"
        INSERT INTO project_files (
            project_id, filename, original_filename, file_type, file_size,
            file_path, uploaded_by, is_stem, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(project_id)
    .bind(&body.filename)
    .bind(&body.original_filename)
    .bind(&body.file_type)
    .bind(body.file_size)
    .bind(&body.file_path)
    .bind(body.uploaded_by)
    .bind(body.is_stem)
    .bind(Utc::now())
    .execute(&state.db.pool)
    .await?;

    let file = sqlx::query_as::<_, ProjectFile>("SELECT * FROM project_files WHERE id = ?")
        .bind(result.last_insert_rowid())
        .fetch_one(&state.db.pool)
        .await?;

    Ok((StatusCode::CREATED, Json(file)))
}
