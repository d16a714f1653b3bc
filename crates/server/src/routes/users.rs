use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::{
    db::models::User,
    error::{AppError, Result},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user))
}

async fn fetch_user_or_404(pool: &SqlitePool, id: i64) -> Result<User> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id ASC")
        .fetch_all(&state.db.pool)
        .await?;
    Ok(Json(users))
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub wallet_address: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    if body.username.trim().is_empty() || body.email.trim().is_empty() {
        return Err(AppError::Validation(
            "Username and email are required".to_string(),
        ));
    }

    let existing: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ? OR username = ?")
            .bind(&body.email)
            .bind(&body.username)
            .fetch_one(&state.db.pool)
            .await?;

    if existing > 0 {
        return Err(AppError::BadRequest(
            "User with this email or username already exists".to_string(),
        ));
    }

    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO users (email, username, wallet_address, phone, bio, avatar_url, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&body.email)
    .bind(&body.username)
    .bind(&body.wallet_address)
    .bind(&body.phone)
    .bind(&body.bio)
    .bind(&body.avatar_url)
    .bind(now)
    .bind(now)
    .execute(&state.db.pool)
    .await?;

    let user = fetch_user_or_404(&state.db.pool, result.last_insert_rowid()).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<User>> {
    let user = fetch_user_or_404(&state.db.pool, id).await?;
    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub wallet_address: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<User>> {
    let mut user = fetch_user_or_404(&state.db.pool, id).await?;

    if let Some(username) = body.username {
        user.username = username;
    }
    if let Some(email) = body.email {
        user.email = email;
    }
    if let Some(wallet_address) = body.wallet_address {
        user.wallet_address = Some(wallet_address);
    }
    if let Some(phone) = body.phone {
        user.phone = Some(phone);
    }
    if let Some(bio) = body.bio {
        user.bio = Some(bio);
    }
    if let Some(avatar_url) = body.avatar_url {
        user.avatar_url = Some(avatar_url);
    }

    user.updated_at = Utc::now();

    sqlx::query(
        r#"
        UPDATE users SET username = ?, email = ?, wallet_address = ?, phone = ?,
            bio = ?, avatar_url = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.wallet_address)
    .bind(&user.phone)
    .bind(&user.bio)
    .bind(&user.avatar_url)
    .bind(user.updated_at)
    .bind(id)
    .execute(&state.db.pool)
    .await?;

    Ok(Json(user))
}
