//! Test helpers and utilities for integration testing.
//!
//! Sets up an in-memory database with the real migrator, seeds accounts and
//! drives the router through `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tempfile::TempDir;
use tower::util::ServiceExt;

use eduplay::endpoints::create_router;
use eduplay::migrations::Migrator;
use eduplay::models::account::{self, AccountRole, AccountStatus};
use eduplay::models::{book, minigame};
use eduplay::services::PdfStorage;
use eduplay::state::AppState;

pub const TEST_PASSWORD: &str = "secret-password";

/// Create an in-memory SQLite database for testing
pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run test migrations");

    db
}

/// Application under test plus the storage directory backing it
pub struct TestApp {
    pub state: AppState,
    pub storage_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = create_test_db().await;
        let storage_dir = tempfile::tempdir().expect("Failed to create storage dir");
        let state = AppState::new(db, PdfStorage::new(storage_dir.path()));
        Self { state, storage_dir }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.state.db
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    /// Send a request and decode the JSON body (`Null` when empty or not JSON)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request("GET", uri, token, None)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request("DELETE", uri, token, None)).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(request("POST", uri, token, Some(body))).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(request("PUT", uri, token, Some(body))).await
    }

    /// Log in through the API and return the bearer token
    pub async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .post(
                "/auth/login",
                None,
                serde_json::json!({ "email": email, "password": TEST_PASSWORD }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }

    /// Create an active account and log it in
    pub async fn account_with_token(
        &self,
        email: &str,
        role: AccountRole,
    ) -> (account::Model, String) {
        let account = create_account(self.db(), email, role, AccountStatus::Active).await;
        let token = self.login(email).await;
        (account, token)
    }
}

/// Build a request with an optional bearer token and JSON body
pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Insert an account directly, with a cheap bcrypt cost
pub async fn create_account(
    db: &DatabaseConnection,
    email: &str,
    role: AccountRole,
    status: AccountStatus,
) -> account::Model {
    let now = Utc::now();
    account::ActiveModel {
        teacher_id: Set(None),
        email: Set(email.to_string()),
        password: Set(bcrypt::hash(TEST_PASSWORD, 4).unwrap()),
        first_name: Set("Test".to_string()),
        middle_name: Set(None),
        last_name: Set(email.split('@').next().unwrap().to_string()),
        user_role: Set(role),
        status: Set(status),
        deleted_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

/// Insert a student owned by `teacher_id`
pub async fn create_student(
    db: &DatabaseConnection,
    email: &str,
    teacher_id: i64,
) -> account::Model {
    let student = create_account(db, email, AccountRole::Student, AccountStatus::Active).await;
    let mut active: account::ActiveModel = student.into();
    active.teacher_id = Set(Some(teacher_id));
    active.update(db).await.unwrap()
}

/// Insert a manual, active book
pub async fn create_book(db: &DatabaseConnection, owner_id: i64, title: &str) -> book::Model {
    let now = Utc::now();
    book::ActiveModel {
        title: Set(title.to_string()),
        description: Set(format!("{} description", title)),
        status: Set(book::BookStatus::Active),
        book_type: Set(book::BookType::Manual),
        file_path: Set(None),
        account_id: Set(owner_id),
        deleted_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

/// Insert a minigame starting `offset_hours` from now
pub async fn create_minigame(
    db: &DatabaseConnection,
    owner_id: i64,
    title: &str,
    offset_hours: i64,
) -> minigame::Model {
    let now = Utc::now();
    minigame::ActiveModel {
        title: Set(title.to_string()),
        default_timer: Set(30.0),
        default_points: Set(100),
        starts_at: Set(now + Duration::hours(offset_hours)),
        account_id: Set(owner_id),
        deleted_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

/// Body for one minigame question
pub fn question(text: &str, points: i32, page_number: Option<i32>) -> Value {
    serde_json::json!({
        "question": text,
        "correct_answer": 2,
        "option_1": "a",
        "option_2": "b",
        "option_3": "c",
        "option_4": "d",
        "points": points,
        "timer": 20.0,
        "page_number": page_number,
    })
}
