use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

use crate::endpoints::batch_response;
use crate::endpoints::extractors::{BookForm, ValidatedJson, ValidatedQuery};
use crate::error::Result;
use crate::middleware::{Authenticated, Authorized, Staff};
use crate::models::{book, book_content};
use crate::schemas::{
    BookListItem, BookQuery, DataResponse, MessageResponse, Page, StoreBookContents,
    UpdateBookContents,
};
use crate::services::books;
use crate::state::AppState;

/// Create book routes
pub fn books_routes(state: AppState) -> Router {
    Router::new()
        .route("/get", get(list_books))
        .route("/get/{id}", get(get_book))
        .route("/create", post(create_book))
        .route("/update/{id}", put(update_book).post(update_book))
        .route("/delete/{id}", delete(delete_book))
        .route("/contents/create/{book_id}", post(store_contents))
        .route("/contents/update", put(update_contents))
        .route("/contents/delete/{content_id}", delete(delete_content))
        .with_state(state)
}

async fn list_books(
    State(state): State<AppState>,
    Authenticated(_): Authenticated,
    ValidatedQuery(query): ValidatedQuery<BookQuery>,
) -> Result<Json<Page<BookListItem>>> {
    Ok(Json(books::list_books(&state.db, query).await?))
}

async fn get_book(
    State(state): State<AppState>,
    Authenticated(_): Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    let book = books::get_book(&state.db, id).await?;
    Ok(Json(json!({ "data": book })))
}

async fn create_book(
    State(state): State<AppState>,
    Authorized(ctx, _): Authorized<Staff>,
    form: BookForm,
) -> Result<(StatusCode, Json<DataResponse<book::Model>>)> {
    let book = books::create_book(&state.db, &state.storage, &ctx, form.payload, form.pdf).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new("Book has been successfully created", book)),
    ))
}

async fn update_book(
    State(state): State<AppState>,
    Authorized(ctx, _): Authorized<Staff>,
    Path(id): Path<i64>,
    form: BookForm,
) -> Result<Json<DataResponse<book::Model>>> {
    let book =
        books::update_book(&state.db, &state.storage, &ctx, id, form.payload, form.pdf).await?;
    Ok(Json(DataResponse::new("Book has been successfully updated", book)))
}

async fn delete_book(
    State(state): State<AppState>,
    Authorized(ctx, _): Authorized<Staff>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    books::delete_book(&state.db, &ctx, id).await?;
    Ok(Json(MessageResponse::new(
        "Book has been successfully marked as deleted",
    )))
}

async fn store_contents(
    State(state): State<AppState>,
    Authorized(ctx, _): Authorized<Staff>,
    Path(book_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<StoreBookContents>,
) -> Result<(StatusCode, Json<DataResponse<Vec<book_content::Model>>>)> {
    let contents = books::store_contents(&state.db, &ctx, book_id, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(
            "Book contents have been successfully created",
            contents,
        )),
    ))
}

async fn update_contents(
    State(state): State<AppState>,
    Authorized(ctx, _): Authorized<Staff>,
    ValidatedJson(req): ValidatedJson<UpdateBookContents>,
) -> Result<Response> {
    let outcome = books::update_contents(&state.db, &ctx, req).await?;
    Ok(batch_response(
        outcome,
        "Book contents have been successfully updated",
    ))
}

async fn delete_content(
    State(state): State<AppState>,
    Authorized(ctx, _): Authorized<Staff>,
    Path(content_id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    books::delete_content(&state.db, &ctx, content_id).await?;
    Ok(Json(MessageResponse::new(
        "Book content has been successfully deleted",
    )))
}
