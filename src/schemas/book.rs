use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::book::{self, BookStatus, BookType};
use crate::models::book_content;
use crate::schemas::AccountSummary;

pub const BOOKS_PER_PAGE: u64 = 10;

/// Book fields shared by create and update (JSON or multipart text parts)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookPayload {
    #[validate(length(min = 1, max = 255, message = "The title field is required."))]
    pub title: String,
    #[validate(length(min = 1, message = "The description field is required."))]
    pub description: String,
    pub status: BookStatus,
    #[serde(default)]
    pub book_type: Option<BookType>,
}

/// A PDF part received with a book form
#[derive(Debug, Clone)]
pub struct PdfUpload {
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct BookQuery {
    pub account_id: Option<i64>,
    pub status: Option<BookStatus>,
    pub search: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub per_page: Option<u64>,
    #[validate(range(min = 1, max = 100000))]
    pub page: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookListItem {
    #[serde(flatten)]
    pub book: book::Model,
    pub account: Option<AccountSummary>,
    pub contents_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookDetail {
    #[serde(flatten)]
    pub book: book::Model,
    pub account: Option<AccountSummary>,
    pub contents: Vec<book_content::Model>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewBookContent {
    #[validate(length(min = 1, message = "The content field is required."))]
    pub content: String,
    pub title: Option<String>,
    #[validate(length(min = 1, max = 32, message = "The page number field is required."))]
    pub page_number: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StoreBookContents {
    #[validate(length(min = 1, message = "The contents field is required."), nested)]
    pub contents: Vec<NewBookContent>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookContentUpdate {
    pub id: i64,
    #[validate(length(min = 1, message = "The content field is required."))]
    pub content: String,
    pub title: Option<String>,
    #[validate(length(min = 1, max = 32, message = "The page number field is required."))]
    pub page_number: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateBookContents {
    #[validate(length(min = 1, message = "The contents field is required."), nested)]
    pub contents: Vec<BookContentUpdate>,
}
