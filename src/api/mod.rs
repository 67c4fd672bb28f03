pub mod admin;
pub mod auth;
pub mod fixtures;
pub mod health;
pub mod leaderboard;
pub mod leagues;
pub mod predictions;
pub mod users;

use crate::config::Config;
use crate::db::Repository;
use crate::orchestration::{LeagueDirectory, PredictionBook, Recalculator, Reconciler};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Config,
    pub recalculator: Recalculator,
    pub reconciler: Reconciler,
    pub predictions: PredictionBook,
    pub leagues: LeagueDirectory,
}

impl AppState {
    pub fn new(repo: Arc<Repository>, config: Config) -> Self {
        let recalculator = Recalculator::new(repo.clone());
        let reconciler = Reconciler::new(repo.clone(), recalculator.clone());
        Self {
            predictions: PredictionBook::new(repo.clone()),
            leagues: LeagueDirectory::new(repo.clone()),
            repo,
            config,
            recalculator,
            reconciler,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/users", post(users::register))
        .route("/v1/fixtures", get(fixtures::list_fixtures))
        .route("/v1/fixtures/upcoming", get(fixtures::list_upcoming))
        .route(
            "/v1/fixtures/gameweek/:gameweek",
            get(fixtures::list_gameweek),
        )
        .route("/v1/fixtures/:id", get(fixtures::get_fixture))
        .route(
            "/v1/predictions",
            post(predictions::submit_prediction).get(predictions::list_predictions),
        )
        .route("/v1/predictions/:id", delete(predictions::delete_prediction))
        .route("/v1/leaderboard", get(leaderboard::get_leaderboard))
        .route(
            "/v1/leagues",
            post(leagues::create_league).get(leagues::list_leagues),
        )
        .route("/v1/leagues/join", post(leagues::join_league))
        .route(
            "/v1/leagues/:id/leaderboard",
            get(leagues::league_leaderboard),
        )
        .route("/v1/leagues/:id/membership", delete(leagues::leave_league))
        .route("/v1/admin/fixtures", post(admin::create_fixture))
        .route("/v1/admin/fixtures/:id/scores", put(admin::set_scores))
        .route("/v1/admin/recalculate", post(admin::recalculate_all))
        .route("/v1/admin/reconcile", post(admin::reconcile))
        .route(
            "/v1/admin/predictions/:id/points",
            post(admin::calculate_points),
        )
        .layer(cors)
        .with_state(state)
}
