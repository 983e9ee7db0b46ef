use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Directed subscription edge. The (user, author) pair is the identity;
/// at most one row exists per edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Follow {
    pub user_id: Uuid,
    pub author_id: Uuid,
}
