//! Dashboard aggregation tests (GET /dashboard/get)

use axum::http::StatusCode;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};

mod common;
use common::{create_account, create_book, create_minigame, create_student, TestApp};

use eduplay::models::account::{AccountRole, AccountStatus};
use eduplay::models::minigame_history;

async fn record_attempt(app: &TestApp, minigame_id: i64, account_id: i64, correct: i32, incorrect: i32) {
    let now = Utc::now();
    minigame_history::ActiveModel {
        minigame_id: Set(minigame_id),
        account_id: Set(account_id),
        total_score: Set(correct * 10),
        correct_count: Set(correct),
        incorrect_count: Set(incorrect),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(app.db())
    .await
    .unwrap();
}

#[tokio::test]
async fn test_empty_dashboard_has_null_average() {
    let app = TestApp::new().await;
    let (_, token) = app.account_with_token("admin@school.test", AccountRole::Admin).await;

    let (status, body) = app.get("/dashboard/get", Some(&token)).await;

    assert_eq!(status, StatusCode::OK, "Body: {}", body);
    assert!(body["average_minigame_score"].is_null());
    assert_eq!(body["book_counts"]["total"], 0);
    assert_eq!(body["minigame_counts"]["total"], 0);
    assert_eq!(body["user_counts"]["total"], 1);
    assert_eq!(body["user_counts"]["by_role"]["admin"]["active"], 1);
}

#[tokio::test]
async fn test_counts_by_role_status_and_phase() {
    let app = TestApp::new().await;
    let (teacher, token) = app
        .account_with_token("teacher@school.test", AccountRole::Teacher)
        .await;
    create_account(app.db(), "s1@school.test", AccountRole::Student, AccountStatus::Active).await;
    create_account(app.db(), "s2@school.test", AccountRole::Student, AccountStatus::Inactive).await;
    create_book(app.db(), teacher.id, "One").await;
    create_book(app.db(), teacher.id, "Two").await;
    create_minigame(app.db(), teacher.id, "Past", -5).await;
    create_minigame(app.db(), teacher.id, "Future", 5).await;
    create_minigame(app.db(), teacher.id, "Later", 50).await;

    let (status, body) = app.get("/dashboard/get", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    let users = &body["user_counts"];
    assert_eq!(users["total"], 3);
    assert_eq!(users["inactive"], 1);
    assert_eq!(users["by_role"]["student"]["total"], 2);
    assert_eq!(users["by_role"]["student"]["inactive"], 1);
    assert_eq!(users["by_role"]["teacher"]["active"], 1);

    assert_eq!(body["book_counts"]["active"], 2);

    let games = &body["minigame_counts"];
    assert_eq!(games["total"], 3);
    assert_eq!(games["upcoming"], 2);
    assert_eq!(games["completed"], 1);
}

#[tokio::test]
async fn test_perfect_attempt_averages_one_hundred() {
    let app = TestApp::new().await;
    let (teacher, token) = app
        .account_with_token("teacher@school.test", AccountRole::Teacher)
        .await;
    let student = create_student(app.db(), "ana@school.test", teacher.id).await;
    let game = create_minigame(app.db(), teacher.id, "Quiz", -1).await;
    record_attempt(&app, game.id, student.id, 3, 0).await;

    let (_, body) = app.get("/dashboard/get", Some(&token)).await;
    assert_eq!(body["average_minigame_score"], 100.0);
}

#[tokio::test]
async fn test_average_skips_unanswered_attempts_and_rounds() {
    let app = TestApp::new().await;
    let (teacher, token) = app
        .account_with_token("teacher@school.test", AccountRole::Teacher)
        .await;
    let student = create_student(app.db(), "ana@school.test", teacher.id).await;
    let game = create_minigame(app.db(), teacher.id, "Quiz", -1).await;
    // 33.33.., 66.66.., 100 and one attempt with no answers
    record_attempt(&app, game.id, student.id, 1, 2).await;
    record_attempt(&app, game.id, student.id, 2, 1).await;
    record_attempt(&app, game.id, student.id, 1, 0).await;
    record_attempt(&app, game.id, student.id, 0, 0).await;

    let (_, body) = app.get("/dashboard/get", Some(&token)).await;
    assert_eq!(body["average_minigame_score"], 66.67);
}

#[tokio::test]
async fn test_teacher_scope_limits_users_and_average() {
    let app = TestApp::new().await;
    let (teacher, token) = app
        .account_with_token("teacher@school.test", AccountRole::Teacher)
        .await;
    let other_teacher =
        create_account(app.db(), "other@school.test", AccountRole::Teacher, AccountStatus::Active).await;
    let mine = create_student(app.db(), "mine@school.test", teacher.id).await;
    let theirs = create_student(app.db(), "theirs@school.test", other_teacher.id).await;
    let game = create_minigame(app.db(), teacher.id, "Quiz", -1).await;
    record_attempt(&app, game.id, mine.id, 1, 1).await;
    record_attempt(&app, game.id, theirs.id, 0, 4).await;

    let (_, body) = app
        .get(&format!("/dashboard/get?teacher_id={}", teacher.id), Some(&token))
        .await;
    assert_eq!(body["user_counts"]["total"], 1);
    assert_eq!(body["average_minigame_score"], 50.0);

    let (_, body) = app.get("/dashboard/get", Some(&token)).await;
    assert_eq!(body["average_minigame_score"], 25.0);
}

#[tokio::test]
async fn test_account_scope_limits_books() {
    let app = TestApp::new().await;
    let (teacher, token) = app
        .account_with_token("teacher@school.test", AccountRole::Teacher)
        .await;
    let other =
        create_account(app.db(), "other@school.test", AccountRole::Teacher, AccountStatus::Active).await;
    create_book(app.db(), teacher.id, "Mine").await;
    create_book(app.db(), other.id, "Theirs").await;

    let (_, body) = app
        .get(&format!("/dashboard/get?account_id={}", teacher.id), Some(&token))
        .await;
    assert_eq!(body["book_counts"]["total"], 1);
}

#[tokio::test]
async fn test_date_range_excludes_other_days() {
    let app = TestApp::new().await;
    let (teacher, token) = app
        .account_with_token("teacher@school.test", AccountRole::Teacher)
        .await;
    create_book(app.db(), teacher.id, "Today").await;

    let today = Utc::now().date_naive();
    let (_, body) = app
        .get(
            &format!("/dashboard/get?start_date={}&end_date={}", today, today),
            Some(&token),
        )
        .await;
    assert_eq!(body["book_counts"]["total"], 1);

    let (_, body) = app
        .get(
            "/dashboard/get?start_date=2001-01-01&end_date=2001-01-31",
            Some(&token),
        )
        .await;
    assert_eq!(body["book_counts"]["total"], 0);
    assert_eq!(body["user_counts"]["total"], 0);
}

#[tokio::test]
async fn test_reversed_range_is_unprocessable() {
    let app = TestApp::new().await;
    let (_, token) = app.account_with_token("admin@school.test", AccountRole::Admin).await;

    let (status, body) = app
        .get(
            "/dashboard/get?start_date=2025-02-01&end_date=2025-01-01",
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["end_date"].is_array());
}

#[tokio::test]
async fn test_student_cannot_view_dashboard() {
    let app = TestApp::new().await;
    let (_, token) = app.account_with_token("ana@school.test", AccountRole::Student).await;

    let (status, _) = app.get("/dashboard/get", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
