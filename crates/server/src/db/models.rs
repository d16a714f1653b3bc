use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub wallet_address: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub bpm: Option<i64>,
    pub key: Option<String>,
    pub creator_id: i64,
    /// JSON-encoded list of role labels, decoded at the API boundary.
    pub collaboration_needs: Option<String>,
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

impl Project {
    /// Decode the stored JSON list of collaboration needs, falling back to an
    /// empty list when the column is null or holds something unparseable.
    pub fn needs_list(&self) -> Vec<String> {
        self.collaboration_needs
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectCollaborator {
    pub id: i64,
    pub project_id: i64,
    pub user_id: i64,
    pub role: String,
    pub status: String,
    pub contribution_percentage: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectComment {
    pub id: i64,
    pub project_id: i64,
    pub user_id: i64,
    pub content: String,
    /// Position in the track, in seconds.
    pub timestamp: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectFile {
    pub id: i64,
    pub project_id: i64,
    pub filename: String,
    pub original_filename: String,
    pub file_type: String,
    pub file_size: Option<i64>,
    pub file_path: String,
    pub uploaded_by: i64,
    pub is_stem: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project_with_needs(raw: Option<&str>) -> Project {
        Project {
            id: 1,
            title: "Test".to_string(),
            description: None,
            genre: None,
            bpm: None,
            key: None,
            creator_id: 1,
            collaboration_needs: raw.map(str::to_string),
            monetization_type: "free".to_string(),
            bounty_amount: None,
            bounty_deadline: None,
            bounty_winner_id: None,
            is_unlockable: false,
            unlock_price: None,
            status: "active".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn needs_list_decodes_json_array() {
        let project = project_with_needs(Some(r#"["Vocalist","Mix Engineer"]"#));
        assert_eq!(project.needs_list(), vec!["Vocalist", "Mix Engineer"]);
    }

    #[test]
    fn needs_list_defaults_to_empty_on_garbage() {
        assert!(project_with_needs(Some("not json")).needs_list().is_empty());
        assert!(project_with_needs(None).needs_list().is_empty());
    }
}
