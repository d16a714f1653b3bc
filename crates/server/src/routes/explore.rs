use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite};

use crate::{db::models::Project, error::Result, AppState};

use super::projects::{annotate_project, ProjectListItem};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(explore_projects))
}

#[derive(Debug, Deserialize)]
pub struct ExploreQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub sort_by: Option<String>,
    pub search: Option<String>,
    pub genre: Option<String>,
    pub monetization_type: Option<String>,
    pub min_bpm: Option<i64>,
    pub max_bpm: Option<i64>,
    /// Comma-separated list of required role labels.
    pub collaboration_needs: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExploreResponse {
    pub projects: Vec<ProjectListItem>,
    pub total: i64,
    pub pages: i64,
    pub current_page: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Shared between the count and select queries so pagination totals always
/// reflect the active filters.
fn push_explore_filters(qb: &mut QueryBuilder<'_, Sqlite>, query: &ExploreQuery, sort_by: &str) {
    qb.push(" WHERE status = 'active'");

    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let term = format!("%{search}%");
        qb.push(" AND (title LIKE ");
        qb.push_bind(term.clone());
        qb.push(" OR description LIKE ");
        qb.push_bind(term.clone());
        qb.push(" OR genre LIKE ");
        qb.push_bind(term);
        qb.push(")");
    }

    if let Some(genre) = query.genre.as_deref().filter(|g| !g.is_empty()) {
        qb.push(" AND genre LIKE ");
        qb.push_bind(format!("%{genre}%"));
    }

    if let Some(monetization_type) = query
        .monetization_type
        .as_deref()
        .filter(|m| !m.is_empty())
    {
        // "unlockable" is synthetic: it selects on the flag, not the type
        if monetization_type == "unlockable" {
            qb.push(" AND is_unlockable = 1");
        } else {
            qb.push(" AND monetization_type = ");
            qb.push_bind(monetization_type.to_string());
        }
    }

    // Zero counts as absent, like the empty-string params above
    if let Some(min_bpm) = query.min_bpm.filter(|&b| b != 0) {
        qb.push(" AND bpm >= ");
        qb.push_bind(min_bpm);
    }
    if let Some(max_bpm) = query.max_bpm.filter(|&b| b != 0) {
        qb.push(" AND bpm <= ");
        qb.push_bind(max_bpm);
    }

    // Substring match against the JSON-encoded needs column, ANDed per need.
    if let Some(needs) = query
        .collaboration_needs
        .as_deref()
        .filter(|n| !n.is_empty())
    {
        for need in needs.split(',') {
            let need = need.trim();
            if need.is_empty() {
                continue;
            }
            qb.push(" AND collaboration_needs LIKE ");
            qb.push_bind(format!("%{need}%"));
        }
    }

    // Bounty sort implies a bounty filter; it has to apply to the count too.
    if sort_by == "bounty" {
        qb.push(" AND bounty_amount IS NOT NULL");
    }
}

async fn explore_projects(
    State(state): State<AppState>,
    Query(query): Query<ExploreQuery>,
) -> Result<Json<ExploreResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(12).max(1);
    let sort_by = query.sort_by.clone().unwrap_or_else(|| "recent".to_string());

    let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM projects");
    push_explore_filters(&mut count_query, &query, &sort_by);
    let total: i64 = count_query
        .build_query_scalar()
        .fetch_one(&state.db.pool)
        .await?;

    let mut select_query = QueryBuilder::new("SELECT * FROM projects");
    push_explore_filters(&mut select_query, &query, &sort_by);

    match sort_by.as_str() {
        "bounty" => select_query.push(" ORDER BY bounty_amount DESC"),
        // trending/popular alias recent activity until real engagement
        // metrics exist
        "trending" | "popular" => select_query.push(" ORDER BY updated_at DESC"),
        _ => select_query.push(" ORDER BY created_at DESC"),
    };

    select_query.push(" LIMIT ");
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

    let pages = (total + per_page - 1) / per_page;

    Ok(Json(ExploreResponse {
        projects: items,
        total,
        pages,
        current_page: page,
        has_next: page < pages,
        has_prev: page > 1,
    }))
}
