use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span, request_id_middleware};

use super::handlers::{
    self, auth, awards, comments, interactions, movies, news, newsletter, rankings, reviews,
    taxonomy, users,
};
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Sessions & accounts
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/refresh-token", post(auth::refresh_token))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/change-password", post(auth::change_password))
        // Polymorphic interactions
        .route("/toggle-like/:tag/:object_id", post(interactions::toggle_like))
        .route("/toggle-save/:tag/:object_id", post(interactions::toggle_save))
        .route("/add-comment/:tag/:object_id", post(interactions::add_comment))
        .route("/my-comments/:tag/:object_id", get(interactions::my_comments))
        // Rankings
        .route("/popular-reviews", get(rankings::popular_reviews))
        .route("/trending-reviews", get(rankings::trending_reviews))
        .route("/suggested-reviews/:review_id", get(rankings::suggested_reviews))
        .route("/movie-reviews", get(rankings::movie_reviews))
        .route("/tv-show-reviews", get(rankings::tv_show_reviews))
        // Reviews
        .route("/reviews", get(reviews::list).post(reviews::create))
        .route(
            "/reviews/:id",
            get(reviews::get_one).put(reviews::update).delete(reviews::remove),
        )
        // Movies
        .route("/movies", get(movies::list).post(movies::create))
        .route(
            "/movies/:id",
            get(movies::get_one).put(movies::update).delete(movies::remove),
        )
        // News
        .route("/news", get(news::list).post(news::create))
        .route("/news/:id", get(news::get_one).put(news::update).delete(news::remove))
        // Awards
        .route("/awards", get(awards::list).post(awards::create))
        .route(
            "/awards/:id",
            get(awards::get_one).put(awards::update).delete(awards::remove),
        )
        // Taxonomy
        .route("/genres", get(taxonomy::list_genres).post(taxonomy::create_genre))
        .route(
            "/genres/:id",
            axum::routing::put(taxonomy::update_genre).delete(taxonomy::remove_genre),
        )
        .route("/industries", get(taxonomy::list_industries).post(taxonomy::create_industry))
        .route(
            "/industries/:id",
            axum::routing::put(taxonomy::update_industry).delete(taxonomy::remove_industry),
        )
        .route(
            "/streaming-platforms",
            get(taxonomy::list_platforms).post(taxonomy::create_platform),
        )
        .route(
            "/streaming-platforms/:id",
            axum::routing::put(taxonomy::update_platform).delete(taxonomy::remove_platform),
        )
        // Comments
        .route("/comments", get(comments::list))
        .route(
            "/comments/:id",
            get(comments::get_one).put(comments::update).delete(comments::remove),
        )
        .route("/comments/:id/toggle-like", post(comments::toggle_like))
        // Users
        .route("/users", get(users::list))
        .route("/users/:id", get(users::get_one).put(users::update))
        .route("/dashboard", get(users::dashboard))
        // Newsletter
        .route("/newsletter", post(newsletter::subscribe))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(CorsLayer::permissive()),
        )
}
