use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::error::{AppError, AppResult};
use crate::models::{Comment, ContentKind, ContentRef};
use crate::store::Store;

/// Parses a URL type tag plus object id into a polymorphic reference.
///
/// An unknown tag is a `NotFound`, same as a missing object: the caller
/// addressed something that does not exist.
pub fn parse_target(tag: &str, object_id: u64) -> AppResult<ContentRef> {
    let kind: ContentKind = tag
        .parse()
        .map_err(|_| AppError::NotFound(format!("Unknown content type '{}'", tag)))?;
    Ok(ContentRef::new(kind, object_id))
}

fn missing(target: ContentRef) -> AppError {
    AppError::NotFound(format!("No {} with id {}", target.kind, target.id))
}

/// Flip membership: remove if present, insert if absent. Returns the new
/// membership state.
fn toggle_membership(set: &mut HashSet<u64>, user_id: u64) -> bool {
    if set.remove(&user_id) {
        false
    } else {
        set.insert(user_id);
        true
    }
}

/// Toggles `user_id` in the liked-set of the referenced content item.
pub fn toggle_like(store: &mut Store, tag: &str, object_id: u64, user_id: u64) -> AppResult<bool> {
    let target = parse_target(tag, object_id)?;
    let set = store.liked_set_mut(target).ok_or_else(|| missing(target))?;
    Ok(toggle_membership(set, user_id))
}

/// Toggles `user_id` in the saved-set of the referenced content item.
pub fn toggle_save(store: &mut Store, tag: &str, object_id: u64, user_id: u64) -> AppResult<bool> {
    let target = parse_target(tag, object_id)?;
    let set = store.saved_set_mut(target).ok_or_else(|| missing(target))?;
    Ok(toggle_membership(set, user_id))
}

/// Creates a comment on the referenced content item.
///
/// The reference is resolved before anything is written, so a comment never
/// enters the store pointing at nothing.
pub fn add_comment(
    store: &mut Store,
    tag: &str,
    object_id: u64,
    user_id: u64,
    body: &str,
    now: DateTime<Utc>,
) -> AppResult<Comment> {
    let target = parse_target(tag, object_id)?;
    if !store.content_exists(target) {
        return Err(missing(target));
    }

    let body = body.trim();
    if body.is_empty() {
        return Err(AppError::Validation("Content is required".to_string()));
    }

    let id = store.insert_comment(Comment {
        id: 0,
        user_id,
        target,
        body: body.to_string(),
        created_at: now,
        liked_by: HashSet::new(),
    });
    Ok(store.comments[&id].clone())
}

/// Toggles a like on a comment itself.
pub fn toggle_comment_like(store: &mut Store, comment_id: u64, user_id: u64) -> AppResult<bool> {
    let comment = store
        .comments
        .get_mut(&comment_id)
        .ok_or_else(|| AppError::NotFound(format!("No comment with id {}", comment_id)))?;
    Ok(toggle_membership(&mut comment.liked_by, user_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, News, ReviewSubject, Review, User};

    fn seeded_store() -> (Store, u64, u64, u64) {
        let mut store = Store::new();
        let user_id = store.insert_user(User {
            id: 0,
            email_address: "a@example.com".to_string(),
            username: "a".to_string(),
            password_hash: String::new(),
            gender: Gender::default(),
            country: String::new(),
            profile_picture: None,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            created_at: Utc::now(),
        });
        let review_id = store.insert_review(Review {
            id: 0,
            title: "Arrival".to_string(),
            subject: ReviewSubject::Movie,
            body: "Time.".to_string(),
            cast: String::new(),
            director: String::new(),
            verdict: String::new(),
            rating: 9.0,
            genre_id: 1,
            industry_id: 1,
            platform_id: 1,
            publisher_id: user_id,
            created_at: Utc::now(),
            liked_by: HashSet::new(),
            saved_by: HashSet::new(),
        });
        let news_id = store.insert_news(News {
            id: 0,
            title: "Casting news".to_string(),
            body: "Announced.".to_string(),
            image: None,
            publisher_id: user_id,
            created_at: Utc::now(),
            liked_by: HashSet::new(),
            saved_by: HashSet::new(),
        });
        (store, user_id, review_id, news_id)
    }

    #[test]
    fn test_toggle_like_flips_membership() {
        let (mut store, user_id, review_id, _) = seeded_store();

        assert!(toggle_like(&mut store, "review", review_id, user_id).unwrap());
        assert!(store.reviews[&review_id].liked_by.contains(&user_id));

        assert!(!toggle_like(&mut store, "review", review_id, user_id).unwrap());
        assert!(!store.reviews[&review_id].liked_by.contains(&user_id));
    }

    #[test]
    fn test_toggle_save_is_independent_of_like() {
        let (mut store, user_id, _, news_id) = seeded_store();

        assert!(toggle_save(&mut store, "news", news_id, user_id).unwrap());
        assert!(store.news[&news_id].saved_by.contains(&user_id));
        assert!(store.news[&news_id].liked_by.is_empty());
    }

    #[test]
    fn test_unknown_tag_is_not_found() {
        let (mut store, user_id, review_id, _) = seeded_store();
        let err = toggle_like(&mut store, "podcast", review_id, user_id).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_unknown_object_is_not_found() {
        let (mut store, user_id, _, _) = seeded_store();
        for tag in ["review", "movie", "news", "award"] {
            let err = toggle_like(&mut store, tag, 999, user_id).unwrap_err();
            assert!(matches!(err, AppError::NotFound(_)), "tag {}", tag);
            let err = toggle_save(&mut store, tag, 999, user_id).unwrap_err();
            assert!(matches!(err, AppError::NotFound(_)), "tag {}", tag);
            let err = add_comment(&mut store, tag, 999, user_id, "hi", Utc::now()).unwrap_err();
            assert!(matches!(err, AppError::NotFound(_)), "tag {}", tag);
        }
    }

    #[test]
    fn test_add_comment_attaches_to_target() {
        let (mut store, user_id, review_id, _) = seeded_store();
        let comment =
            add_comment(&mut store, "review", review_id, user_id, " great point ", Utc::now())
                .unwrap();

        assert_eq!(comment.target, ContentRef::new(ContentKind::Review, review_id));
        assert_eq!(comment.body, "great point");
        assert_eq!(store.comment_count(comment.target), 1);
    }

    #[test]
    fn test_empty_comment_rejected_without_record() {
        let (mut store, user_id, review_id, _) = seeded_store();
        for body in ["", "   ", "\n\t"] {
            let err = add_comment(&mut store, "review", review_id, user_id, body, Utc::now())
                .unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
        assert!(store.comments.is_empty());
    }

    #[test]
    fn test_toggle_comment_like() {
        let (mut store, user_id, review_id, _) = seeded_store();
        let comment =
            add_comment(&mut store, "review", review_id, user_id, "hi", Utc::now()).unwrap();

        assert!(toggle_comment_like(&mut store, comment.id, user_id).unwrap());
        assert!(!toggle_comment_like(&mut store, comment.id, user_id).unwrap());

        let err = toggle_comment_like(&mut store, 999, user_id).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
