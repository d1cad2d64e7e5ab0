use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::error::{AppError, AppResult};
use crate::models::{
    Award, Comment, ContentKind, ContentRef, Genre, Industry, Movie, News,
    NewsletterSubscription, Review, StreamingPlatform, User,
};

/// In-process relational store.
///
/// One typed table per entity, integer primary keys allocated per table.
/// The API layer shares a single instance behind `Arc<RwLock<Store>>`; each
/// request takes the lock for the duration of its unit of work, which is
/// what serializes concurrent writes here.
#[derive(Default)]
pub struct Store {
    next_user_id: u64,
    next_review_id: u64,
    next_movie_id: u64,
    next_news_id: u64,
    next_award_id: u64,
    next_genre_id: u64,
    next_industry_id: u64,
    next_platform_id: u64,
    next_comment_id: u64,
    next_subscription_id: u64,

    pub users: HashMap<u64, User>,
    pub reviews: HashMap<u64, Review>,
    pub movies: HashMap<u64, Movie>,
    pub news: HashMap<u64, News>,
    pub awards: HashMap<u64, Award>,
    pub genres: HashMap<u64, Genre>,
    pub industries: HashMap<u64, Industry>,
    pub platforms: HashMap<u64, StreamingPlatform>,
    pub comments: HashMap<u64, Comment>,
    pub subscriptions: HashMap<u64, NewsletterSubscription>,

    /// Blacklisted refresh tokens, mapped to their expiry timestamp so
    /// entries can be pruned once the token would have expired anyway.
    revoked_refresh: HashMap<String, i64>,
}

fn bump(seq: &mut u64) -> u64 {
    *seq += 1;
    *seq
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // Users

    pub fn insert_user(&mut self, mut user: User) -> u64 {
        let id = bump(&mut self.next_user_id);
        user.id = id;
        self.users.insert(id, user);
        id
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|u| u.email_address == email)
    }

    pub fn email_in_use(&self, email: &str) -> bool {
        self.user_by_email(email).is_some()
    }

    pub fn username_in_use(&self, username: &str) -> bool {
        self.users.values().any(|u| u.username == username)
    }

    // Content items

    pub fn insert_review(&mut self, mut review: Review) -> u64 {
        let id = bump(&mut self.next_review_id);
        review.id = id;
        self.reviews.insert(id, review);
        id
    }

    pub fn insert_movie(&mut self, mut movie: Movie) -> u64 {
        let id = bump(&mut self.next_movie_id);
        movie.id = id;
        self.movies.insert(id, movie);
        id
    }

    pub fn insert_news(&mut self, mut item: News) -> u64 {
        let id = bump(&mut self.next_news_id);
        item.id = id;
        self.news.insert(id, item);
        id
    }

    pub fn insert_award(&mut self, mut award: Award) -> u64 {
        let id = bump(&mut self.next_award_id);
        award.id = id;
        self.awards.insert(id, award);
        id
    }

    // Taxonomy

    pub fn insert_genre(&mut self, mut genre: Genre) -> u64 {
        let id = bump(&mut self.next_genre_id);
        genre.id = id;
        self.genres.insert(id, genre);
        id
    }

    pub fn insert_industry(&mut self, mut industry: Industry) -> u64 {
        let id = bump(&mut self.next_industry_id);
        industry.id = id;
        self.industries.insert(id, industry);
        id
    }

    pub fn insert_platform(&mut self, mut platform: StreamingPlatform) -> u64 {
        let id = bump(&mut self.next_platform_id);
        platform.id = id;
        self.platforms.insert(id, platform);
        id
    }

    // Polymorphic resolution
    //
    // The exhaustive matches below are the resolver: a type tag plus id
    // either reaches a concrete row's interaction sets or fails, and adding
    // a content type without extending them is a compile error.

    /// Publisher of a content item, if the reference resolves.
    pub fn content_publisher(&self, target: ContentRef) -> Option<u64> {
        match target.kind {
            ContentKind::Review => self.reviews.get(&target.id).map(|r| r.publisher_id),
            ContentKind::Movie => self.movies.get(&target.id).map(|m| m.publisher_id),
            ContentKind::News => self.news.get(&target.id).map(|n| n.publisher_id),
            ContentKind::Award => self.awards.get(&target.id).map(|a| a.publisher_id),
        }
    }

    pub fn content_exists(&self, target: ContentRef) -> bool {
        self.content_publisher(target).is_some()
    }

    pub fn liked_set_mut(&mut self, target: ContentRef) -> Option<&mut HashSet<u64>> {
        match target.kind {
            ContentKind::Review => self.reviews.get_mut(&target.id).map(|r| &mut r.liked_by),
            ContentKind::Movie => self.movies.get_mut(&target.id).map(|m| &mut m.liked_by),
            ContentKind::News => self.news.get_mut(&target.id).map(|n| &mut n.liked_by),
            ContentKind::Award => self.awards.get_mut(&target.id).map(|a| &mut a.liked_by),
        }
    }

    pub fn saved_set_mut(&mut self, target: ContentRef) -> Option<&mut HashSet<u64>> {
        match target.kind {
            ContentKind::Review => self.reviews.get_mut(&target.id).map(|r| &mut r.saved_by),
            ContentKind::Movie => self.movies.get_mut(&target.id).map(|m| &mut m.saved_by),
            ContentKind::News => self.news.get_mut(&target.id).map(|n| &mut n.saved_by),
            ContentKind::Award => self.awards.get_mut(&target.id).map(|a| &mut a.saved_by),
        }
    }

    /// Removes a content item and, with it, every comment referencing it.
    ///
    /// The polymorphic reference has no foreign-key constraint behind it, so
    /// cascading here is what keeps comments from dangling.
    pub fn delete_content(&mut self, target: ContentRef) -> AppResult<()> {
        let removed = match target.kind {
            ContentKind::Review => self.reviews.remove(&target.id).is_some(),
            ContentKind::Movie => self.movies.remove(&target.id).is_some(),
            ContentKind::News => self.news.remove(&target.id).is_some(),
            ContentKind::Award => self.awards.remove(&target.id).is_some(),
        };
        if !removed {
            return Err(AppError::NotFound(format!("No {} with id {}", target.kind, target.id)));
        }
        self.comments.retain(|_, c| c.target != target);
        Ok(())
    }

    // Comments

    pub fn insert_comment(&mut self, mut comment: Comment) -> u64 {
        let id = bump(&mut self.next_comment_id);
        comment.id = id;
        self.comments.insert(id, comment);
        id
    }

    pub fn comment_count(&self, target: ContentRef) -> usize {
        self.comments.values().filter(|c| c.target == target).count()
    }

    pub fn comments_for(&self, target: ContentRef) -> Vec<&Comment> {
        let mut comments: Vec<&Comment> =
            self.comments.values().filter(|c| c.target == target).collect();
        comments.sort_by_key(|c| c.id);
        comments
    }

    // Newsletter

    pub fn subscribe_newsletter(
        &mut self,
        email: String,
        first_name: String,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        if self.subscriptions.values().any(|s| s.email == email) {
            return Err(AppError::Validation("Email is already subscribed".to_string()));
        }
        let id = bump(&mut self.next_subscription_id);
        self.subscriptions.insert(
            id,
            NewsletterSubscription { id, email, first_name, created_at: now },
        );
        Ok(id)
    }

    // Refresh token blacklist

    pub fn revoke_refresh_token(&mut self, token: String, expires_at: i64, now_ts: i64) {
        self.revoked_refresh.retain(|_, exp| *exp > now_ts);
        self.revoked_refresh.insert(token, expires_at);
    }

    pub fn is_refresh_revoked(&self, token: &str) -> bool {
        self.revoked_refresh.contains_key(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, ReviewSubject};

    pub(crate) fn sample_user(name: &str) -> User {
        User {
            id: 0,
            email_address: format!("{}@example.com", name),
            username: name.to_string(),
            password_hash: "hash".to_string(),
            gender: Gender::default(),
            country: String::new(),
            profile_picture: None,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            created_at: Utc::now(),
        }
    }

    pub(crate) fn sample_review(publisher_id: u64, genre_id: u64) -> Review {
        Review {
            id: 0,
            title: "Dune".to_string(),
            subject: ReviewSubject::Movie,
            body: "Sand.".to_string(),
            cast: String::new(),
            director: String::new(),
            verdict: String::new(),
            rating: 8.5,
            genre_id,
            industry_id: 1,
            platform_id: 1,
            publisher_id,
            created_at: Utc::now(),
            liked_by: HashSet::new(),
            saved_by: HashSet::new(),
        }
    }

    fn sample_comment(user_id: u64, target: ContentRef) -> Comment {
        Comment {
            id: 0,
            user_id,
            target,
            body: "Agreed".to_string(),
            created_at: Utc::now(),
            liked_by: HashSet::new(),
        }
    }

    #[test]
    fn test_ids_are_sequential_per_table() {
        let mut store = Store::new();
        let u1 = store.insert_user(sample_user("a"));
        let u2 = store.insert_user(sample_user("b"));
        let r1 = store.insert_review(sample_review(u1, 1));
        assert_eq!((u1, u2), (1, 2));
        assert_eq!(r1, 1);
    }

    #[test]
    fn test_uniqueness_lookups() {
        let mut store = Store::new();
        store.insert_user(sample_user("a"));
        assert!(store.email_in_use("a@example.com"));
        assert!(store.username_in_use("a"));
        assert!(!store.email_in_use("b@example.com"));
    }

    #[test]
    fn test_resolver_misses_unknown_id() {
        let mut store = Store::new();
        let target = ContentRef::new(ContentKind::Review, 42);
        assert!(!store.content_exists(target));
        assert!(store.liked_set_mut(target).is_none());
        assert!(store.saved_set_mut(target).is_none());
    }

    #[test]
    fn test_delete_content_cascades_comments() {
        let mut store = Store::new();
        let user_id = store.insert_user(sample_user("a"));
        let review_id = store.insert_review(sample_review(user_id, 1));
        let other_id = store.insert_review(sample_review(user_id, 1));

        let target = ContentRef::new(ContentKind::Review, review_id);
        let other = ContentRef::new(ContentKind::Review, other_id);
        store.insert_comment(sample_comment(user_id, target));
        store.insert_comment(sample_comment(user_id, target));
        store.insert_comment(sample_comment(user_id, other));

        store.delete_content(target).unwrap();

        assert!(!store.content_exists(target));
        assert_eq!(store.comment_count(target), 0);
        assert_eq!(store.comment_count(other), 1);
    }

    #[test]
    fn test_delete_missing_content_is_not_found() {
        let mut store = Store::new();
        let err = store
            .delete_content(ContentRef::new(ContentKind::Movie, 9))
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_newsletter_rejects_duplicate_email() {
        let mut store = Store::new();
        let now = Utc::now();
        store
            .subscribe_newsletter("n@example.com".to_string(), "N".to_string(), now)
            .unwrap();
        let err = store
            .subscribe_newsletter("n@example.com".to_string(), "N".to_string(), now)
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_refresh_blacklist_prunes_expired_entries() {
        let mut store = Store::new();
        let now = Utc::now().timestamp();
        store.revoke_refresh_token("old".to_string(), now - 10, now);
        assert!(store.is_refresh_revoked("old"));

        // Inserting a fresh token prunes the already-expired one
        store.revoke_refresh_token("new".to_string(), now + 1000, now);
        assert!(!store.is_refresh_revoked("old"));
        assert!(store.is_refresh_revoked("new"));
    }
}
