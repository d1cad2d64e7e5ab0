use chrono::{DateTime, Utc};

/// A newsletter signup. Emails are unique; re-subscribing is rejected.
#[derive(Debug, Clone)]
pub struct NewsletterSubscription {
    pub id: u64,
    pub email: String,
    pub first_name: String,
    pub created_at: DateTime<Utc>,
}
