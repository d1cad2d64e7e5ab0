use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{AppError, AppResult};
use crate::models::{ContentKind, ContentRef, Review, ReviewSubject};
use crate::store::Store;

/// Window for the most-popular ranking.
pub const POPULAR_WINDOW_DAYS: i64 = 60;
/// Window for the trending ranking; a strict subset of the popular window.
pub const TRENDING_WINDOW_DAYS: i64 = 2;

/// Engagement score of a review: likes plus comments, unweighted.
pub fn interaction_count(store: &Store, review: &Review) -> usize {
    review.liked_by.len() + store.comment_count(ContentRef::new(ContentKind::Review, review.id))
}

/// Reviews created within `window` of `now`, ordered by interaction count
/// descending. Ties fall back to id descending so offset pagination stays
/// stable across requests.
fn ranked_within<'a>(store: &'a Store, now: DateTime<Utc>, window: Duration) -> Vec<&'a Review> {
    let cutoff = now - window;
    let mut scored: Vec<(usize, &Review)> = store
        .reviews
        .values()
        .filter(|r| r.created_at >= cutoff)
        .map(|r| (interaction_count(store, r), r))
        .collect();
    scored.sort_by(|(sa, a), (sb, b)| sb.cmp(sa).then(b.id.cmp(&a.id)));
    scored.into_iter().map(|(_, r)| r).collect()
}

/// Most-popular ranking over the 60-day window.
pub fn most_popular(store: &Store, now: DateTime<Utc>) -> Vec<&Review> {
    ranked_within(store, now, Duration::days(POPULAR_WINDOW_DAYS))
}

/// Trending ranking over the 2-day window.
pub fn trending(store: &Store, now: DateTime<Utc>) -> Vec<&Review> {
    ranked_within(store, now, Duration::days(TRENDING_WINDOW_DAYS))
}

/// Other reviews in the same genre as `review_id`, excluding it, shuffled
/// by `seed`. A fixed seed yields a fixed order, which is what makes
/// paginating a "random" list coherent.
pub fn suggested(store: &Store, review_id: u64, seed: u64) -> AppResult<Vec<&Review>> {
    let review = store
        .reviews
        .get(&review_id)
        .ok_or_else(|| AppError::NotFound(format!("No review with id {}", review_id)))?;

    let mut matches: Vec<&Review> = store
        .reviews
        .values()
        .filter(|r| r.genre_id == review.genre_id && r.id != review_id)
        .collect();
    // Stable base order before shuffling, so the seed fully determines the result
    matches.sort_by_key(|r| r.id);
    matches.shuffle(&mut StdRng::seed_from_u64(seed));
    Ok(matches)
}

/// Reviews filtered by subject, newest first.
pub fn by_subject(store: &Store, subject: ReviewSubject) -> Vec<&Review> {
    let mut reviews: Vec<&Review> =
        store.reviews.values().filter(|r| r.subject == subject).collect();
    reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    reviews
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Comment, Review};
    use std::collections::HashSet;

    fn review_at(genre_id: u64, created_at: DateTime<Utc>) -> Review {
        Review {
            id: 0,
            title: "r".to_string(),
            subject: ReviewSubject::Movie,
            body: String::new(),
            cast: String::new(),
            director: String::new(),
            verdict: String::new(),
            rating: 7.0,
            genre_id,
            industry_id: 1,
            platform_id: 1,
            publisher_id: 1,
            created_at,
            liked_by: HashSet::new(),
            saved_by: HashSet::new(),
        }
    }

    fn like(store: &mut Store, review_id: u64, user_id: u64) {
        store
            .liked_set_mut(ContentRef::new(ContentKind::Review, review_id))
            .unwrap()
            .insert(user_id);
    }

    fn comment_on(store: &mut Store, review_id: u64, user_id: u64, now: DateTime<Utc>) {
        store.insert_comment(Comment {
            id: 0,
            user_id,
            target: ContentRef::new(ContentKind::Review, review_id),
            body: "c".to_string(),
            created_at: now,
            liked_by: HashSet::new(),
        });
    }

    #[test]
    fn test_popular_excludes_reviews_outside_window() {
        let mut store = Store::new();
        let now = Utc::now();
        let fresh = store.insert_review(review_at(1, now - Duration::days(10)));
        let stale = store.insert_review(review_at(1, now - Duration::days(61)));

        let ids: Vec<u64> = most_popular(&store, now).iter().map(|r| r.id).collect();
        assert!(ids.contains(&fresh));
        assert!(!ids.contains(&stale));
    }

    #[test]
    fn test_popular_orders_by_likes_plus_comments() {
        let mut store = Store::new();
        let now = Utc::now();
        let quiet = store.insert_review(review_at(1, now));
        let liked = store.insert_review(review_at(1, now));
        let discussed = store.insert_review(review_at(1, now));

        like(&mut store, liked, 1);
        like(&mut store, discussed, 1);
        comment_on(&mut store, discussed, 1, now);

        let ids: Vec<u64> = most_popular(&store, now).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![discussed, liked, quiet]);
    }

    #[test]
    fn test_ties_break_by_id_descending() {
        let mut store = Store::new();
        let now = Utc::now();
        let first = store.insert_review(review_at(1, now));
        let second = store.insert_review(review_at(1, now));

        let ids: Vec<u64> = most_popular(&store, now).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[test]
    fn test_trending_is_subset_of_popular() {
        let mut store = Store::new();
        let now = Utc::now();
        let recent = store.insert_review(review_at(1, now - Duration::days(1)));
        let older = store.insert_review(review_at(1, now - Duration::days(30)));

        let trending_ids: Vec<u64> = trending(&store, now).iter().map(|r| r.id).collect();
        let popular_ids: Vec<u64> = most_popular(&store, now).iter().map(|r| r.id).collect();

        assert_eq!(trending_ids, vec![recent]);
        for id in &trending_ids {
            assert!(popular_ids.contains(id));
        }
        assert!(popular_ids.contains(&older));
    }

    #[test]
    fn test_suggested_matches_genre_and_excludes_self() {
        let mut store = Store::new();
        let now = Utc::now();
        let target = store.insert_review(review_at(1, now));
        let same_genre = store.insert_review(review_at(1, now));
        let other_genre = store.insert_review(review_at(2, now));

        let ids: Vec<u64> = suggested(&store, target, 42).unwrap().iter().map(|r| r.id).collect();
        assert!(ids.contains(&same_genre));
        assert!(!ids.contains(&target));
        assert!(!ids.contains(&other_genre));
    }

    #[test]
    fn test_suggested_is_deterministic_per_seed() {
        let mut store = Store::new();
        let now = Utc::now();
        let target = store.insert_review(review_at(1, now));
        for _ in 0..20 {
            store.insert_review(review_at(1, now));
        }

        let first: Vec<u64> = suggested(&store, target, 7).unwrap().iter().map(|r| r.id).collect();
        let second: Vec<u64> = suggested(&store, target, 7).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(first, second);

        let reseeded: Vec<u64> =
            suggested(&store, target, 8).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(first.len(), reseeded.len());
    }

    #[test]
    fn test_suggested_unknown_review_is_not_found() {
        let store = Store::new();
        assert!(matches!(suggested(&store, 5, 0), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_by_subject_filters_and_sorts_newest_first() {
        let mut store = Store::new();
        let now = Utc::now();
        let old_movie = store.insert_review(review_at(1, now - Duration::days(3)));
        let new_movie = store.insert_review(review_at(1, now - Duration::days(1)));
        let mut show = review_at(1, now);
        show.subject = ReviewSubject::TvShow;
        let show = store.insert_review(show);

        let movie_ids: Vec<u64> =
            by_subject(&store, ReviewSubject::Movie).iter().map(|r| r.id).collect();
        assert_eq!(movie_ids, vec![new_movie, old_movie]);

        let show_ids: Vec<u64> =
            by_subject(&store, ReviewSubject::TvShow).iter().map(|r| r.id).collect();
        assert_eq!(show_ids, vec![show]);
    }
}
