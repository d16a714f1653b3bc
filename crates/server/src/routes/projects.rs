use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::{
    db::models::{Project, ProjectCollaborator, ProjectComment, ProjectFile, User},
    error::{AppError, Result},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route("/:id", get(get_project).put(update_project))
        .route("/:id/collaborate", post(request_collaboration))
        .route("/:id/collaborators/:collaborator_id", put(update_collaborator))
        .route("/:id/bounty/winner", post(select_bounty_winner))
        .merge(super::comments::router())
        .merge(super::files::router())
}

/// A project as it appears on the wire: identical to the stored row except
/// that `collaboration_needs` is decoded from JSON text into a list.
#[derive(Debug, Serialize)]
pub struct ProjectJson {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub bpm: Option<i64>,
    pub key: Option<String>,
    pub creator_id: i64,
    pub collaboration_needs: Vec<String>,
    pub monetization_type: String,
    pub bounty_amount: Option<f64>,
    pub bounty_deadline: Option<DateTime<Utc>>,
    pub bounty_winner_id: Option<i64>,
    pub is_unlockable: bool,
    pub unlock_price: Option<f64>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Project> for ProjectJson {
    fn from(project: Project) -> Self {
        let collaboration_needs = project.needs_list();
        Self {
            id: project.id,
            title: project.title,
            description: project.description,
            genre: project.genre,
            bpm: project.bpm,
            key: project.key,
            creator_id: project.creator_id,
            collaboration_needs,
            monetization_type: project.monetization_type,
            bounty_amount: project.bounty_amount,
            bounty_deadline: project.bounty_deadline,
            bounty_winner_id: project.bounty_winner_id,
            is_unlockable: project.is_unlockable,
            unlock_price: project.unlock_price,
            status: project.status,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

/// List item: the project plus its creator's profile and activity counts.
#[derive(Debug, Serialize)]
pub struct ProjectListItem {
    #[serde(flatten)]
    pub project: ProjectJson,
    pub creator: Option<User>,
    pub collaborator_count: i64,
    pub comment_count: i64,
}

#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectListItem>,
    pub total: i64,
    pub pages: i64,
    pub current_page: i64,
}

#[derive(Debug, Serialize)]
pub struct CollaboratorJson {
    #[serde(flatten)]
    pub collaborator: ProjectCollaborator,
    pub user: Option<User>,
}

#[derive(Debug, Serialize)]
pub struct CommentJson {
    #[serde(flatten)]
    pub comment: ProjectComment,
    pub user: Option<User>,
}

#[derive(Debug, Serialize)]
pub struct ProjectDetailResponse {
    #[serde(flatten)]
    pub project: ProjectJson,
    pub creator: Option<User>,
    pub collaborators: Vec<CollaboratorJson>,
    pub files: Vec<ProjectFile>,
    pub comments: Vec<CommentJson>,
}

pub(crate) async fn fetch_project(pool: &SqlitePool, id: i64) -> Result<Project> {
    sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))
}

pub(crate) async fn fetch_user(pool: &SqlitePool, id: i64) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Annotate a project with creator profile and collaborator/comment counts.
pub(crate) async fn annotate_project(pool: &SqlitePool, project: Project) -> Result<ProjectListItem> {
    let creator = fetch_user(pool, project.creator_id).await?;

    let collaborator_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM project_collaborators WHERE project_id = ?")
            .bind(project.id)
            .fetch_one(pool)
            .await?;

    let comment_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM project_comments WHERE project_id = ?")
            .bind(project.id)
            .fetch_one(pool)
            .await?;

    Ok(ProjectListItem {
        project: project.into(),
        creator,
        collaborator_count,
        comment_count,
    })
}

/// Accepts RFC 3339 as well as naive ISO-8601 timestamps (treated as UTC).
pub(crate) fn parse_deadline(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| AppError::Validation(format!("Invalid bounty_deadline: {raw}")))
}

#[derive(Debug, Deserialize)]
pub struct ListProjectsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub genre: Option<String>,
    pub status: Option<String>,
    pub monetization_type: Option<String>,
}

fn push_list_filters(qb: &mut QueryBuilder<'_, Sqlite>, query: &ListProjectsQuery) {
    let status = query.status.clone().unwrap_or_else(|| "active".to_string());
    qb.push(" WHERE status = ");
    qb.push_bind(status);

    // Empty-string params count as absent, not as filters
    if let Some(genre) = query.genre.as_deref().filter(|g| !g.is_empty()) {
        qb.push(" AND genre LIKE ");
        qb.push_bind(format!("%{genre}%"));
    }

    if let Some(monetization_type) = query
        .monetization_type
        .as_deref()
        .filter(|m| !m.is_empty())
    {
        qb.push(" AND monetization_type = ");
        qb.push_bind(monetization_type.to_string());
    }
}

async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ListProjectsQuery>,
) -> Result<Json<ProjectListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).max(1);

    let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM projects");
    push_list_filters(&mut count_query, &query);
    let total: i64 = count_query
        .build_query_scalar()
        .fetch_one(&state.db.pool)
        .await?;

    let mut select_query = QueryBuilder::new("SELECT * FROM projects");
    push_list_filters(&mut select_query, &query);
    select_query.push(" ORDER BY created_at DESC LIMIT ");
    select_query.push_bind(per_page);
    select_query.push(" OFFSET ");
    select_query.push_bind((page - 1) * per_page);

    let projects: Vec<Project> = select_query
        .build_query_as()
        .fetch_all(&state.db.pool)
        .await?;

    let mut items = Vec::with_capacity(projects.len());
    for project in projects {
        items.push(annotate_project(&state.db.pool, project).await?);
    }

    Ok(Json(ProjectListResponse {
        projects: items,
        total,
        pages: (total + per_page - 1) / per_page,
        current_page: page,
    }))
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
    pub creator_id: i64,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub bpm: Option<i64>,
    pub key: Option<String>,
    #[serde(default)]
    pub collaboration_needs: Vec<String>,
    pub monetization_type: Option<String>,
    pub bounty_amount: Option<f64>,
    pub bounty_deadline: Option<String>,
    #[serde(default)]
    pub is_unlockable: bool,
    pub unlock_price: Option<f64>,
}

async fn create_project(
    State(state): State<AppState>,
    Json(body): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectJson>)> {
    if body.title.trim().is_empty() {
        return Err(AppError::Validation("Project title is required".to_string()));
    }

    let collaboration_needs = serde_json::to_string(&body.collaboration_needs)
        .map_err(|e| AppError::Validation(format!("Invalid collaboration_needs: {e}")))?;

    let bounty_deadline = body
        .bounty_deadline
        .as_deref()
        .map(parse_deadline)
        .transpose()?;

    let monetization_type = body.monetization_type.unwrap_or_else(|| "free".to_string());
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO projects (
            title, description, genre, bpm, key, creator_id, collaboration_needs,
            monetization_type, bounty_amount, bounty_deadline, bounty_winner_id,
            is_unlockable, unlock_price, status, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NULL, ?, ?, 'active', ?, ?)
        "#,
    )
    .bind(&body.title)
    .bind(&body.description)
    .bind(&body.genre)
    .bind(body.bpm)
    .bind(&body.key)
    .bind(body.creator_id)
    .bind(&collaboration_needs)
    .bind(&monetization_type)
    .bind(body.bounty_amount)
    .bind(bounty_deadline)
    .bind(body.is_unlockable)
    .bind(body.unlock_price)
    .bind(now)
    .bind(now)
    .execute(&state.db.pool)
    .await?;

    let project = fetch_project(&state.db.pool, result.last_insert_rowid()).await?;

    Ok((StatusCode::CREATED, Json(project.into())))
}

async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProjectDetailResponse>> {
    let project = fetch_project(&state.db.pool, id).await?;
    let creator = fetch_user(&state.db.pool, project.creator_id).await?;

    let collaborator_rows = sqlx::query_as::<_, ProjectCollaborator>(
        "SELECT * FROM project_collaborators WHERE project_id = ? ORDER BY id ASC",
    )
    .bind(id)
    .fetch_all(&state.db.pool)
    .await?;

    let mut collaborators = Vec::with_capacity(collaborator_rows.len());
    for collaborator in collaborator_rows {
        let user = fetch_user(&state.db.pool, collaborator.user_id).await?;
        collaborators.push(CollaboratorJson { collaborator, user });
    }

    let files = sqlx::query_as::<_, ProjectFile>(
        "SELECT * FROM project_files WHERE project_id = ? ORDER BY id ASC",
    )
    .bind(id)
    .fetch_all(&state.db.pool)
    .await?;

    let comment_rows = sqlx::query_as::<_, ProjectComment>(
        "SELECT * FROM project_comments WHERE project_id = ? ORDER BY id ASC",
    )
    .bind(id)
    .fetch_all(&state.db.pool)
    .await?;

    let mut comments = Vec::with_capacity(comment_rows.len());
    for comment in comment_rows {
        let user = fetch_user(&state.db.pool, comment.user_id).await?;
        comments.push(CommentJson { comment, user });
    }

    Ok(Json(ProjectDetailResponse {
        project: project.into(),
        creator,
        collaborators,
        files,
        comments,
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub bpm: Option<i64>,
    pub key: Option<String>,
    pub status: Option<String>,
    pub collaboration_needs: Option<Vec<String>>,
    pub monetization_type: Option<String>,
    pub bounty_amount: Option<f64>,
    pub bounty_deadline: Option<String>,
    pub is_unlockable: Option<bool>,
    pub unlock_price: Option<f64>,
}

async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateProjectRequest>,
) -> Result<Json<ProjectJson>> {
    let mut project = fetch_project(&state.db.pool, id).await?;

    if let Some(title) = body.title {
        project.title = title;
    }
    if let Some(description) = body.description {
        project.description = Some(description);
    }
    if let Some(genre) = body.genre {
        project.genre = Some(genre);
    }
    if let Some(bpm) = body.bpm {
        project.bpm = Some(bpm);
    }
    if let Some(key) = body.key {
        project.key = Some(key);
    }
    if let Some(status) = body.status {
        project.status = status;
    }
    if let Some(needs) = body.collaboration_needs {
        let encoded = serde_json::to_string(&needs)
            .map_err(|e| AppError::Validation(format!("Invalid collaboration_needs: {e}")))?;
        project.collaboration_needs = Some(encoded);
    }
    if let Some(monetization_type) = body.monetization_type {
        project.monetization_type = monetization_type;
    }
    if let Some(bounty_amount) = body.bounty_amount {
        project.bounty_amount = Some(bounty_amount);
    }
    if let Some(raw) = body.bounty_deadline.as_deref() {
        project.bounty_deadline = Some(parse_deadline(raw)?);
    }
    if let Some(is_unlockable) = body.is_unlockable {
        project.is_unlockable = is_unlockable;
    }
    if let Some(unlock_price) = body.unlock_price {
        project.unlock_price = Some(unlock_price);
    }

    project.updated_at = Utc::now();

    sqlx::query(
        r#"
        UPDATE projects SET
            title = ?, description = ?, genre = ?, bpm = ?, key = ?, status = ?,
            collaboration_needs = ?, monetization_type = ?, bounty_amount = ?,
            bounty_deadline = ?, is_unlockable = ?, unlock_price = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&project.title)
    .bind(&project.description)
    .bind(&project.genre)
    .bind(project.bpm)
    .bind(&project.key)
    .bind(&project.status)
    .bind(&project.collaboration_needs)
    .bind(&project.monetization_type)
    .bind(project.bounty_amount)
    .bind(project.bounty_deadline)
    .bind(project.is_unlockable)
    .bind(project.unlock_price)
    .bind(project.updated_at)
    .bind(id)
    .execute(&state.db.pool)
    .await?;

    Ok(Json(project.into()))
}

#[derive(Debug, Deserialize)]
pub struct CollaborateRequest {
    pub user_id: i64,
    pub role: String,
}

async fn request_collaboration(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<CollaborateRequest>,
) -> Result<(StatusCode, Json<ProjectCollaborator>)> {
    fetch_project(&state.db.pool, id).await?;

    let existing: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM project_collaborators WHERE project_id = ? AND user_id = ?",
    )
    .bind(id)
    .bind(body.user_id)
    .fetch_one(&state.db.pool)
    .await?;

    if existing > 0 {
        return Err(AppError::BadRequest(
            "User is already a collaborator".to_string(),
        ));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO project_collaborators (project_id, user_id, role, status, created_at)
        VALUES (?, ?, ?, 'pending', ?)
        "#,
    )
    .bind(id)
    .bind(body.user_id)
    .bind(&body.role)
    .bind(Utc::now())
    .execute(&state.db.pool)
    .await?;

    let collaborator = sqlx::query_as::<_, ProjectCollaborator>(
        "SELECT * FROM project_collaborators WHERE id = ?",
    )
    .bind(result.last_insert_rowid())
    .fetch_one(&state.db.pool)
    .await?;

    Ok((StatusCode::CREATED, Json(collaborator)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateCollaboratorRequest {
    pub status: Option<String>,
    pub contribution_percentage: Option<f64>,
}

async fn update_collaborator(
    State(state): State<AppState>,
    Path((_project_id, collaborator_id)): Path<(i64, i64)>,
    Json(body): Json<UpdateCollaboratorRequest>,
) -> Result<Json<ProjectCollaborator>> {
    let mut collaborator = sqlx::query_as::<_, ProjectCollaborator>(
        "SELECT * FROM project_collaborators WHERE id = ?",
    )
    .bind(collaborator_id)
    .fetch_optional(&state.db.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Collaborator not found".to_string()))?;

    if let Some(status) = body.status {
        collaborator.status = status;
    }
    if let Some(percentage) = body.contribution_percentage {
        collaborator.contribution_percentage = Some(percentage);
    }

    sqlx::query(
        "UPDATE project_collaborators SET status = ?, contribution_percentage = ? WHERE id = ?",
    )
    .bind(&collaborator.status)
    .bind(collaborator.contribution_percentage)
    .bind(collaborator_id)
    .execute(&state.db.pool)
    .await?;

    Ok(Json(collaborator))
}

#[derive(Debug, Deserialize)]
pub struct SelectWinnerRequest {
    pub winner_id: i64,
}

async fn select_bounty_winner(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<SelectWinnerRequest>,
) -> Result<Json<ProjectJson>> {
    let project = fetch_project(&state.db.pool, id).await?;

    if project.monetization_type != "bounty" {
        return Err(AppError::BadRequest(
            "Project is not a bounty project".to_string(),
        ));
    }

    sqlx::query(
        "UPDATE projects SET bounty_winner_id = ?, status = 'completed', updated_at = ? WHERE id = ?",
    )
    .bind(body.winner_id)
    .bind(Utc::now())
    .bind(id)
    .execute(&state.db.pool)
    .await?;

    let project = fetch_project(&state.db.pool, id).await?;
    Ok(Json(project.into()))
}
