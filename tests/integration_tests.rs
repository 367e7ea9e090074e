//! Integration tests for the Gujarati Rewards Server API
//!
//! These tests verify the complete request/response cycle for all endpoints,
//! including the daily-login idempotency and bonus-once guarantees.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use hmac::{Hmac, Mac};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use gujarati_rewards_server::db::Db;

// Test configuration constants
const TEST_SECRET: &str = "test-secret-key";
const TEST_ADMIN_SECRET: &str = "test-admin-key";

// =============================================================================
// Test Helpers
// =============================================================================

/// Create a test configuration
fn test_config() -> gujarati_rewards_server::Config {
    gujarati_rewards_server::Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,                // Random port
        database_path: "".to_string(), // Will be set per test
        allowed_origins: vec!["http://localhost:5173".to_string()],
        environment: "test".to_string(),
        app_secret_key: TEST_SECRET.to_string(),
        admin_secret_key: Some(TEST_ADMIN_SECRET.to_string()),
    }
}

/// Create a test database in a temporary directory
fn create_test_db(temp_dir: &TempDir) -> Db {
    gujarati_rewards_server::open_database(temp_dir.path().join("test.db"))
        .expect("Failed to create test database")
}

/// Create a test app router
fn create_test_app(db: Db) -> Router {
    use gujarati_rewards_server::routes::*;

    let config = test_config();
    let state = gujarati_rewards_server::AppState { db, config };

    Router::new()
        .route("/health", get(health_check))
        .route("/api/register", post(register_user))
        .route("/api/session/start", post(start_session))
        .route("/api/activity", post(track_activity))
        .route("/api/progress", get(get_progress))
        .route("/admin/stats", get(admin_stats))
        .with_state(state)
}

/// Generate a unique user ID for a test
fn generate_user_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("test-user-{}", nanos)
}

/// Generate HMAC signature for data
fn sign(data: &str) -> String {
    type HmacSha256 = Hmac<sha2::Sha256>;
    let mut mac = HmacSha256::new_from_slice(TEST_SECRET.as_bytes()).unwrap();
    mac.update(data.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Parse response body as JSON
async fn body_to_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a POST request with JSON body
fn make_post_request(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

/// Create a GET request
fn make_get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Register a user and return (user_id, app)
async fn setup_registered_user(temp_dir: &TempDir) -> (String, Router) {
    let db = create_test_db(temp_dir);
    let app = create_test_app(db);
    let user_id = generate_user_id();

    let response = app
        .clone()
        .oneshot(make_post_request(
            "/api/register",
            json!({ "userId": user_id }).to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    (user_id, app)
}

/// Build a signed session-start request body for a user
fn session_body(user_id: &str) -> String {
    json!({
        "userId": user_id,
        "signature": sign(user_id),
        "timestamp": Utc::now().timestamp(),
    })
    .to_string()
}

/// Build a signed activity request body for a user
fn activity_body(user_id: &str, activity_type: &str) -> String {
    json!({
        "userId": user_id,
        "activityType": activity_type,
        "signature": sign(&format!("{}:{}", user_id, activity_type)),
        "timestamp": Utc::now().timestamp(),
    })
    .to_string()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));

    let response = app.oneshot(make_get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_user() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));
    let user_id = generate_user_id();

    let response = app
        .oneshot(make_post_request(
            "/api/register",
            json!({ "userId": user_id }).to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_register_duplicate_user_conflicts() {
    let temp_dir = TempDir::new().unwrap();
    let (user_id, app) = setup_registered_user(&temp_dir).await;

    let response = app
        .oneshot(make_post_request(
            "/api/register",
            json!({ "userId": user_id }).to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_invalid_user_id() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));

    let response = app
        .oneshot(make_post_request(
            "/api/register",
            json!({ "userId": "no spaces allowed" }).to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Session start (daily login)
// =============================================================================

#[tokio::test]
async fn test_first_session_credits_daily_login() {
    let temp_dir = TempDir::new().unwrap();
    let (user_id, app) = setup_registered_user(&temp_dir).await;

    let response = app
        .oneshot(make_post_request(
            "/api/session/start",
            session_body(&user_id),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["pointsEarned"], 10);
    assert_eq!(body["streakCount"], 1);
    assert_eq!(body["isNewLogin"], true);
    assert_eq!(body["showRewardBanner"], true);
    assert_eq!(body["points"], 10);

    // Fresh user: achievement snapshot present and zeroed
    let achievements = body["achievements"].as_array().unwrap();
    assert_eq!(achievements.len(), 2);
    assert_eq!(achievements[0]["currentCount"], 0);
    assert_eq!(achievements[0]["bonusClaimed"], false);
}

#[tokio::test]
async fn test_second_session_same_day_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let (user_id, app) = setup_registered_user(&temp_dir).await;

    let response = app
        .clone()
        .oneshot(make_post_request(
            "/api/session/start",
            session_body(&user_id),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Second tab / page reload the same day
    let response = app
        .oneshot(make_post_request(
            "/api/session/start",
            session_body(&user_id),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["pointsEarned"], 0);
    assert_eq!(body["streakCount"], 1);
    assert_eq!(body["isNewLogin"], false);
    assert_eq!(body["showRewardBanner"], false);
    // Point total unchanged by the duplicate
    assert_eq!(body["points"], 10);
}

#[tokio::test]
async fn test_session_for_unknown_user() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));
    let user_id = generate_user_id();

    let response = app
        .oneshot(make_post_request(
            "/api/session/start",
            session_body(&user_id),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_with_invalid_signature() {
    let temp_dir = TempDir::new().unwrap();
    let (user_id, app) = setup_registered_user(&temp_dir).await;

    let body = json!({
        "userId": user_id,
        "signature": sign("some-other-user"),
        "timestamp": Utc::now().timestamp(),
    })
    .to_string();

    let response = app
        .oneshot(make_post_request("/api/session/start", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_with_stale_timestamp() {
    let temp_dir = TempDir::new().unwrap();
    let (user_id, app) = setup_registered_user(&temp_dir).await;

    let body = json!({
        "userId": user_id,
        "signature": sign(&user_id),
        "timestamp": Utc::now().timestamp() - 3600,
    })
    .to_string();

    let response = app
        .oneshot(make_post_request("/api/session/start", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Activity tracking
// =============================================================================

#[tokio::test]
async fn test_track_single_quiz() {
    let temp_dir = TempDir::new().unwrap();
    let (user_id, app) = setup_registered_user(&temp_dir).await;

    let response = app
        .oneshot(make_post_request(
            "/api/activity",
            activity_body(&user_id, "quiz"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["activityType"], "quiz");
    assert_eq!(body["currentCount"], 1);
    assert_eq!(body["bonusClaimed"], false);
    assert_eq!(body["bonusPoints"], 0);
    assert_eq!(body["pointsEarned"], 10);
    assert_eq!(body["points"], 10);
}

#[tokio::test]
async fn test_thirty_quizzes_award_bonus_once() {
    let temp_dir = TempDir::new().unwrap();
    let (user_id, app) = setup_registered_user(&temp_dir).await;

    let mut last_body = json!(null);
    let mut bonus_calls = 0;
    for _ in 0..30 {
        let response = app
            .clone()
            .oneshot(make_post_request(
                "/api/activity",
                activity_body(&user_id, "quiz"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        last_body = body_to_json(response.into_body()).await;
        if last_body["bonusPoints"] != 0 {
            bonus_calls += 1;
        }
    }

    // The 30th quiz landed the one-time 50-point bonus
    assert_eq!(bonus_calls, 1);
    assert_eq!(last_body["currentCount"], 30);
    assert_eq!(last_body["bonusClaimed"], true);
    assert_eq!(last_body["bonusPoints"], 50);
    assert_eq!(last_body["pointsEarned"], 60);
    // 30 quizzes at 10 points plus the 50-point bonus
    assert_eq!(last_body["points"], 350);

    // A 31st quiz never repeats the bonus
    let response = app
        .oneshot(make_post_request(
            "/api/activity",
            activity_body(&user_id, "quiz"),
        ))
        .await
        .unwrap();
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["currentCount"], 31);
    assert_eq!(body["bonusPoints"], 0);
    assert_eq!(body["points"], 360);
}

#[tokio::test]
async fn test_quiz_and_game_progress_are_separate() {
    let temp_dir = TempDir::new().unwrap();
    let (user_id, app) = setup_registered_user(&temp_dir).await;

    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(make_post_request(
                "/api/activity",
                activity_body(&user_id, "quiz"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(make_post_request(
            "/api/activity",
            activity_body(&user_id, "game"),
        ))
        .await
        .unwrap();

    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["activityType"], "game");
    assert_eq!(body["currentCount"], 1);
}

#[tokio::test]
async fn test_track_unknown_activity_type() {
    let temp_dir = TempDir::new().unwrap();
    let (user_id, app) = setup_registered_user(&temp_dir).await;

    let response = app
        .oneshot(make_post_request(
            "/api/activity",
            activity_body(&user_id, "flashcard"),
        ))
        .await
        .unwrap();

    // Serde rejects the unknown enum variant at extraction time
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_track_activity_for_unknown_user() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));
    let user_id = generate_user_id();

    let response = app
        .oneshot(make_post_request(
            "/api/activity",
            activity_body(&user_id, "quiz"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Progress reads
// =============================================================================

#[tokio::test]
async fn test_progress_reflects_login_and_activity() {
    let temp_dir = TempDir::new().unwrap();
    let (user_id, app) = setup_registered_user(&temp_dir).await;

    let response = app
        .clone()
        .oneshot(make_post_request(
            "/api/session/start",
            session_body(&user_id),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(make_post_request(
            "/api/activity",
            activity_body(&user_id, "game"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(make_get_request(&format!(
            "/api/progress?userId={}",
            user_id
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["userId"], user_id.as_str());
    // 10 for the login, 10 for the game
    assert_eq!(body["points"], 20);
    assert_eq!(body["currentStreak"], 1);
    assert!(!body["lastLoginDate"].is_null());

    let achievements = body["achievements"].as_array().unwrap();
    assert_eq!(achievements[0]["activityType"], "quiz");
    assert_eq!(achievements[0]["currentCount"], 0);
    assert_eq!(achievements[1]["activityType"], "game");
    assert_eq!(achievements[1]["currentCount"], 1);
}

#[tokio::test]
async fn test_progress_for_unknown_user() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));

    let response = app
        .oneshot(make_get_request("/api/progress?userId=nobody-here"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Admin
// =============================================================================

#[tokio::test]
async fn test_admin_stats_requires_key() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));

    let response = app
        .oneshot(make_get_request("/admin/stats?key=wrong-key"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_stats_counts_records() {
    let temp_dir = TempDir::new().unwrap();
    let (user_id, app) = setup_registered_user(&temp_dir).await;

    let response = app
        .clone()
        .oneshot(make_post_request(
            "/api/session/start",
            session_body(&user_id),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(make_get_request(&format!(
            "/admin/stats?key={}",
            TEST_ADMIN_SECRET
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["profile_count"], 1);
    assert_eq!(body["login_record_count"], 1);
}
