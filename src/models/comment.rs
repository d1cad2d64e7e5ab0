use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::content::ContentRef;

/// A comment attached to one content item through a polymorphic reference.
///
/// Comments carry their own liking-users set, separate from the content
/// interaction sets.
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: u64,
    pub user_id: u64,
    pub target: ContentRef,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub liked_by: HashSet<u64>,
}
