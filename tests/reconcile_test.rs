use axum::http::StatusCode;
use matchday::api::{self, AppState};
use matchday::config::Config;
use matchday::db::init_db;
use matchday::domain::{Fixture, FixtureStatus, NewFixture, NewUser, Scoreline, TimeMs};
use matchday::Repository;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

const HOUR_MS: i64 = 3_600_000;

struct TestApp {
    app: axum::Router,
    state: AppState,
    db_path: String,
    _temp: TempDir,
}

async fn setup_test_app() -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();
    let pool = init_db(&db_path).await.expect("init_db failed");

    let repo = Arc::new(Repository::new(pool));
    let config = Config {
        port: 0,
        database_path: db_path.clone(),
        admin_token: "admin-secret".to_string(),
        reconcile_interval_secs: 0,
        reminder_interval_secs: 0,
        reminder_window_hours: 24,
        reminder_send_delay_ms: 0,
    };
    let state = AppState::new(repo, config);
    let app = api::create_router(state.clone());

    TestApp {
        app,
        state,
        db_path,
        _temp: temp_dir,
    }
}

async fn fixture_at(app: &TestApp, home: &str, away: &str, kickoff: TimeMs) -> Fixture {
    let new = NewFixture::new(home, away, kickoff, kickoff.plus_ms(-HOUR_MS), 1).unwrap();
    app.state.repo.insert_fixture(&new).await.unwrap()
}

async fn status_of(app: &TestApp, fixture: &Fixture) -> FixtureStatus {
    app.state
        .repo
        .get_fixture(fixture.id)
        .await
        .unwrap()
        .unwrap()
        .status
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_past_kickoff_goes_live() {
    let app = setup_test_app().await;
    let now = TimeMs::now();
    let started = fixture_at(&app, "Leeds", "Burnley", now.plus_ms(-HOUR_MS)).await;
    let later = fixture_at(&app, "Fulham", "Brentford", now.plus_ms(48 * HOUR_MS)).await;

    let report = app.state.reconciler.reconcile_at(now).await.unwrap();
    assert_eq!(report.went_live, vec![started.id]);
    assert!(report.finished.is_empty());

    assert_eq!(status_of(&app, &started).await, FixtureStatus::Live);
    assert_eq!(status_of(&app, &later).await, FixtureStatus::Upcoming);

    let again = app.state.reconciler.reconcile_at(now).await.unwrap();
    assert!(again.went_live.is_empty());
}

#[tokio::test]
async fn test_recorded_scores_finish_fixture_and_score_predictions() {
    let app = setup_test_app().await;
    let now = TimeMs::now();
    let fixture = fixture_at(&app, "Everton", "Wolves", now.plus_ms(48 * HOUR_MS)).await;
    let ann = app
        .state
        .repo
        .insert_user(&NewUser::new("ann", "ann@example.com").unwrap())
        .await
        .unwrap();
    let pick = app
        .state
        .repo
        .upsert_prediction(ann.id, &fixture, Scoreline::new(3, 1).unwrap(), false)
        .await
        .unwrap();

    // Scores imported without a status change.
    let raw = init_db(&app.db_path).await.unwrap();
    sqlx::query("UPDATE fixtures SET home_score = 2, away_score = 0 WHERE id = ?")
        .bind(fixture.id.as_i64())
        .execute(&raw)
        .await
        .unwrap();

    let report = app.state.reconciler.reconcile_at(now).await.unwrap();
    assert_eq!(report.finished, vec![fixture.id]);
    assert_eq!(report.recalculation.processed, 1);
    assert_eq!(status_of(&app, &fixture).await, FixtureStatus::Finished);

    let scored = app.state.repo.get_prediction(pick.id).await.unwrap().unwrap();
    assert_eq!(scored.points, 3);
}

#[tokio::test]
async fn test_fixture_reads_reconcile_first() {
    let app = setup_test_app().await;
    let now = TimeMs::now();
    let started = fixture_at(&app, "Leeds", "Burnley", now.plus_ms(-HOUR_MS)).await;
    fixture_at(&app, "Fulham", "Brentford", now.plus_ms(48 * HOUR_MS)).await;

    let (status, body) = get(app.app.clone(), "/v1/fixtures/upcoming").await;
    assert_eq!(status, StatusCode::OK);
    let upcoming = body.as_array().unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0]["homeTeam"], "Fulham");

    let (status, body) = get(app.app.clone(), &format!("/v1/fixtures/{}", started.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "live");
    assert!(body["homeScore"].is_null());

    let (status, body) = get(app.app.clone(), "/v1/fixtures/gameweek/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["awayTeam"], "Burnley");

    let (status, _) = get(app.app.clone(), "/v1/fixtures/gameweek/0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(app.app.clone(), "/v1/fixtures/404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_reconcile_endpoint() {
    let app = setup_test_app().await;
    let started = fixture_at(&app, "Leeds", "Burnley", TimeMs::now().plus_ms(-HOUR_MS)).await;

    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/v1/admin/reconcile")
        .header("x-admin-token", "admin-secret")
        .body(axum::body::Body::empty())
        .unwrap();
    let res = app.app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["wentLive"][0], started.id.as_i64());
    assert_eq!(v["recalculation"]["processed"], 0);
}

#[tokio::test]
async fn test_second_reconcile_is_a_no_op() {
    let app = setup_test_app().await;
    let now = TimeMs::now();
    fixture_at(&app, "Leeds", "Burnley", now.plus_ms(-HOUR_MS)).await;
    let scored = fixture_at(&app, "Everton", "Wolves", now.plus_ms(48 * HOUR_MS)).await;

    let raw = init_db(&app.db_path).await.unwrap();
    sqlx::query("UPDATE fixtures SET home_score = 1, away_score = 1 WHERE id = ?")
        .bind(scored.id.as_i64())
        .execute(&raw)
        .await
        .unwrap();

    let first = app.state.reconciler.reconcile_at(now).await.unwrap();
    assert_eq!(first.went_live.len(), 1);
    assert_eq!(first.finished, vec![scored.id]);

    let second = app.state.reconciler.reconcile_at(now).await.unwrap();
    assert!(second.went_live.is_empty());
    assert!(second.finished.is_empty());
    assert!(second.skipped.is_empty());
    assert_eq!(second.recalculation.processed, 0);
    assert!(second.recalculation.failures.is_empty());
}

#[tokio::test]
async fn test_stale_live_decision_does_not_override_result() {
    let app = setup_test_app().await;
    let now = TimeMs::now();
    let fixture = fixture_at(&app, "Leeds", "Burnley", now.plus_ms(-HOUR_MS)).await;

    // Status decided from a snapshot taken before the result arrives.
    let snapshot = app.state.repo.get_fixture(fixture.id).await.unwrap().unwrap();
    assert_eq!(snapshot.next_status(now), Some(FixtureStatus::Live));

    let score = Scoreline::new(2, 1).unwrap();
    app.state
        .repo
        .set_fixture_result(fixture.id, score)
        .await
        .unwrap();

    let changed = app
        .state
        .repo
        .set_fixture_status(fixture.id, snapshot.status, FixtureStatus::Live)
        .await
        .unwrap();
    assert!(!changed);

    let stored = app.state.repo.get_fixture(fixture.id).await.unwrap().unwrap();
    assert_eq!(stored.status, FixtureStatus::Finished);
    assert_eq!(stored.final_score(), Some(score));

    let report = app.state.reconciler.reconcile_at(now).await.unwrap();
    assert!(report.went_live.is_empty());
    assert!(report.finished.is_empty());
}

#[tokio::test]
async fn test_malformed_fixture_does_not_block_reconcile_or_reads() {
    let app = setup_test_app().await;
    let now = TimeMs::now();
    let broken = fixture_at(&app, "Leeds", "Burnley", now.plus_ms(-HOUR_MS)).await;
    let healthy = fixture_at(&app, "Everton", "Wolves", now.plus_ms(-HOUR_MS)).await;

    let raw = init_db(&app.db_path).await.unwrap();
    sqlx::query("UPDATE fixtures SET home_score = 1 WHERE id = ?")
        .bind(broken.id.as_i64())
        .execute(&raw)
        .await
        .unwrap();

    let report = app.state.reconciler.reconcile_at(now).await.unwrap();
    assert_eq!(report.skipped, vec![broken.id]);
    assert_eq!(report.went_live, vec![healthy.id]);

    let (status, body) = get(app.app.clone(), "/v1/fixtures").await;
    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], healthy.id.as_i64());

    let (status, body) = get(app.app.clone(), &format!("/v1/fixtures/{}", healthy.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "live");
}
