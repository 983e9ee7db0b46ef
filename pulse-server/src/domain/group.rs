use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const GROUP_TITLE_MAX_CHARS: usize = 200;

/// Fallback blurb for groups created without a description.
pub const DEFAULT_GROUP_DESCRIPTION: &str = "A community without a description yet";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl Group {
    pub fn new(title: String, slug: String, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            slug,
            description: description.unwrap_or_else(|| DEFAULT_GROUP_DESCRIPTION.to_string()),
        }
    }
}
