//! Auth flow integration tests
//!
//! Covers the token lifecycle:
//! - POST /auth/login  — role and token, unknown email, wrong password, inactive, deleted
//! - POST /auth/logout — revokes exactly the presenting token
//! - GET  /auth/get    — current account, missing/garbage bearer tokens
//! - POST /auth/change-password

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{create_account, TestApp, TEST_PASSWORD};

use eduplay::models::account::{self, AccountRole, AccountStatus};
use eduplay::models::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

async fn expire_all_tokens(app: &TestApp) {
    PersonalAccessToken::update_many()
        .col_expr(
            personal_access_token::Column::ExpiresAt,
            Expr::value(chrono::Utc::now() - chrono::Duration::hours(1)),
        )
        .exec(app.db())
        .await
        .unwrap();
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_returns_role_and_token() {
    let app = TestApp::new().await;
    create_account(app.db(), "teacher@school.test", AccountRole::Teacher, AccountStatus::Active).await;

    let (status, body) = app
        .post(
            "/auth/login",
            None,
            json!({ "email": "teacher@school.test", "password": TEST_PASSWORD }),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "Body: {}", body);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["type"], "teacher");
    assert_eq!(body["token"].as_str().unwrap().len(), 80);
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let app = TestApp::new().await;
    create_account(app.db(), "ana@school.test", AccountRole::Student, AccountStatus::Active).await;

    let (status, _) = app
        .post(
            "/auth/login",
            None,
            json!({ "email": "  ANA@School.test", "password": TEST_PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_unknown_email_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/auth/login",
            None,
            json!({ "email": "nobody@school.test", "password": TEST_PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("not associated"));
}

#[tokio::test]
async fn test_login_wrong_password_is_unauthorized() {
    let app = TestApp::new().await;
    create_account(app.db(), "ana@school.test", AccountRole::Student, AccountStatus::Active).await;

    let (status, _) = app
        .post(
            "/auth/login",
            None,
            json!({ "email": "ana@school.test", "password": "not-the-password" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_inactive_account_is_unauthorized_and_issues_no_token() {
    let app = TestApp::new().await;
    create_account(app.db(), "idle@school.test", AccountRole::Student, AccountStatus::Inactive).await;

    let (status, body) = app
        .post(
            "/auth/login",
            None,
            json!({ "email": "idle@school.test", "password": TEST_PASSWORD }),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].as_str().unwrap().contains("inactive"));
    assert_eq!(PersonalAccessToken::find().count(app.db()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_login_inactive_account_with_wrong_password_is_unauthorized() {
    let app = TestApp::new().await;
    create_account(app.db(), "idle@school.test", AccountRole::Student, AccountStatus::Inactive).await;

    let (status, _) = app
        .post(
            "/auth/login",
            None,
            json!({ "email": "idle@school.test", "password": "not-the-password" }),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(PersonalAccessToken::find().count(app.db()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_expired_token_is_rejected_and_removed() {
    let app = TestApp::new().await;
    let (_, token) = app.account_with_token("ana@school.test", AccountRole::Student).await;
    expire_all_tokens(&app).await;

    let (status, body) = app.get("/auth/get", Some(&token)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].as_str().unwrap().contains("expired"));
    assert_eq!(PersonalAccessToken::find().count(app.db()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_login_purges_expired_tokens() {
    let app = TestApp::new().await;
    app.account_with_token("ana@school.test", AccountRole::Student).await;
    app.account_with_token("ben@school.test", AccountRole::Student).await;
    expire_all_tokens(&app).await;

    app.login("ana@school.test").await;

    assert_eq!(PersonalAccessToken::find().count(app.db()).await.unwrap(), 1);
}

#[tokio::test]
async fn test_login_deleted_account_is_forbidden() {
    let app = TestApp::new().await;
    let gone = create_account(app.db(), "gone@school.test", AccountRole::Student, AccountStatus::Active).await;
    let mut active: account::ActiveModel = gone.into();
    active.deleted_at = Set(Some(chrono::Utc::now()));
    active.update(app.db()).await.unwrap();

    let (status, _) = app
        .post(
            "/auth/login",
            None,
            json!({ "email": "gone@school.test", "password": TEST_PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_login_validates_email_format() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post("/auth/login", None, json!({ "email": "nope", "password": "x" }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["email"].is_array());
}

#[tokio::test]
async fn test_login_and_logout_are_logged() {
    let app = TestApp::new().await;
    let (teacher, token) = app
        .account_with_token("teacher@school.test", AccountRole::Teacher)
        .await;

    let (status, _) = app.post("/auth/logout", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let logs = ActivityLog::find()
        .filter(eduplay::models::activity_log::Column::AccountId.eq(teacher.id))
        .all(app.db())
        .await
        .unwrap();
    let descriptions: Vec<_> = logs.iter().map(|l| l.description.as_str()).collect();
    assert!(descriptions.contains(&"Logged in"));
    assert!(descriptions.contains(&"Logged out"));
    assert!(logs.iter().all(|l| l.module == "auth"));
}

// ============================================================================
// Bearer token handling
// ============================================================================

#[tokio::test]
async fn test_get_current_user_with_token() {
    let app = TestApp::new().await;
    let (account, token) = app
        .account_with_token("ana@school.test", AccountRole::Student)
        .await;

    let (status, body) = app.get("/auth/get", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], account.id);
    assert_eq!(body["user"]["email"], "ana@school.test");
    assert!(body["user"].get("password").is_none(), "password hash must not leak");
}

#[tokio::test]
async fn test_protected_route_without_token_is_unauthorized() {
    let app = TestApp::new().await;

    let (status, _) = app.get("/auth/get", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_token_is_unauthorized() {
    let app = TestApp::new().await;

    let (status, _) = app.get("/auth/get", Some("deadbeef")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_only_presenting_token() {
    let app = TestApp::new().await;
    create_account(app.db(), "ana@school.test", AccountRole::Student, AccountStatus::Active).await;
    let first = app.login("ana@school.test").await;
    let second = app.login("ana@school.test").await;

    let (status, body) = app.post("/auth/logout", Some(&first), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logout successful");

    let (status, _) = app.get("/auth/get", Some(&first)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/auth/get", Some(&second)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_token_rejected_after_account_deactivated() {
    let app = TestApp::new().await;
    let (account, token) = app
        .account_with_token("ana@school.test", AccountRole::Student)
        .await;

    let mut active: account::ActiveModel = account.into();
    active.status = Set(AccountStatus::Inactive);
    active.update(app.db()).await.unwrap();

    let (status, _) = app.get("/auth/get", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Password change
// ============================================================================

#[tokio::test]
async fn test_change_password_then_login_with_new_password() {
    let app = TestApp::new().await;
    let (_, token) = app
        .account_with_token("ana@school.test", AccountRole::Student)
        .await;

    let (status, body) = app
        .post(
            "/auth/change-password",
            Some(&token),
            json!({
                "current_password": TEST_PASSWORD,
                "new_password": "brand-new-pass",
                "new_password_confirmation": "brand-new-pass",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "Body: {}", body);

    let (status, _) = app
        .post(
            "/auth/login",
            None,
            json!({ "email": "ana@school.test", "password": "brand-new-pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_change_password_wrong_current_password() {
    let app = TestApp::new().await;
    let (_, token) = app
        .account_with_token("ana@school.test", AccountRole::Student)
        .await;

    let (status, _) = app
        .post(
            "/auth/change-password",
            Some(&token),
            json!({
                "current_password": "wrong-password",
                "new_password": "brand-new-pass",
                "new_password_confirmation": "brand-new-pass",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_change_password_confirmation_mismatch() {
    let app = TestApp::new().await;
    let (_, token) = app
        .account_with_token("ana@school.test", AccountRole::Student)
        .await;

    let (status, body) = app
        .post(
            "/auth/change-password",
            Some(&token),
            json!({
                "current_password": TEST_PASSWORD,
                "new_password": "brand-new-pass",
                "new_password_confirmation": "different-pass",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["new_password"].is_array());
}
