use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, LoaderTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::db::DbConn;
use crate::error::{AppError, Result};
use crate::middleware::AuthContext;
use crate::models::book::BookType;
use crate::models::prelude::*;
use crate::schemas::{
    AccountSummary, BatchOutcome, BookDetail, BookListItem, BookPayload, BookQuery,
    ContentError, Page, PageRequest, PdfUpload, StoreBookContents, UpdateBookContents,
    BOOKS_PER_PAGE,
};
use crate::services::ensure_owner;
use crate::services::storage::PdfStorage;

const PDF_REQUIRED: &str = "The pdf file field is required when book type is pdf.";

impl BookQuery {
    pub fn condition(&self) -> Condition {
        Condition::all()
            .add(book::Column::DeletedAt.is_null())
            .add_option(self.account_id.map(|id| book::Column::AccountId.eq(id)))
            .add_option(self.status.map(|s| book::Column::Status.eq(s)))
            .add_option(
                self.search
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| book::Column::Title.contains(s)),
            )
    }
}

/// Live books, most recently updated first
pub async fn list_books(db: &DbConn, query: BookQuery) -> Result<Page<BookListItem>> {
    let paging = PageRequest::new(query.page, query.per_page, BOOKS_PER_PAGE);

    let select = Book::find().filter(query.condition());
    let total = select.clone().count(db).await?;

    let books = select
        .order_by_desc(book::Column::UpdatedAt)
        .order_by_desc(book::Column::Id)
        .offset(paging.offset())
        .limit(paging.per_page)
        .all(db)
        .await?;

    let owners = books.load_one(Account, db).await?;

    let ids: Vec<i64> = books.iter().map(|b| b.id).collect();
    let counts: HashMap<i64, i64> = BookContent::find()
        .select_only()
        .column(book_content::Column::BookId)
        .column_as(book_content::Column::Id.count(), "count")
        .filter(book_content::Column::BookId.is_in(ids))
        .group_by(book_content::Column::BookId)
        .into_tuple::<(i64, i64)>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    let data = books
        .into_iter()
        .zip(owners)
        .map(|(book, owner)| BookListItem {
            contents_count: counts.get(&book.id).copied().unwrap_or(0) as u64,
            account: owner.as_ref().map(AccountSummary::from),
            book,
        })
        .collect();

    Ok(Page::new(data, paging.page, paging.per_page, total))
}

/// Any book by id, soft-deleted included, with its pages in reading order
pub async fn get_book(db: &DbConn, id: i64) -> Result<BookDetail> {
    let book = Book::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

    let mut contents = book.find_related(BookContent).all(db).await?;
    sort_by_page(&mut contents);

    let owner = book.find_related(Account).one(db).await?;

    Ok(BookDetail {
        account: owner.as_ref().map(AccountSummary::from),
        book,
        contents,
    })
}

async fn find_live_book(db: &DbConn, id: i64) -> Result<book::Model> {
    Book::find_by_id(id)
        .filter(book::Column::DeletedAt.is_null())
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
}

pub async fn create_book(
    db: &DbConn,
    storage: &PdfStorage,
    ctx: &AuthContext,
    payload: BookPayload,
    upload: Option<PdfUpload>,
) -> Result<book::Model> {
    let book_type = payload.book_type.unwrap_or_default();

    let file_path = match (book_type, upload) {
        (BookType::Pdf, Some(upload)) => Some(storage.store_pdf(&upload.bytes).await?),
        (BookType::Pdf, None) => return Err(AppError::invalid("pdf_file", PDF_REQUIRED)),
        (BookType::Manual, _) => None,
    };

    let now = Utc::now();
    let book = book::ActiveModel {
        title: Set(payload.title),
        description: Set(payload.description),
        status: Set(payload.status),
        book_type: Set(book_type),
        file_path: Set(file_path.clone()),
        account_id: Set(ctx.account_id()),
        deleted_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match book.insert(db).await {
        Ok(book) => {
            tracing::info!(book_id = book.id, account_id = ctx.account_id(), "Book created");
            Ok(book)
        }
        Err(e) => {
            if let Some(path) = file_path {
                storage.remove(&path).await?;
            }
            Err(e.into())
        }
    }
}

/// Update a book owned by the acting account
///
/// Switching to a manual book removes the stored PDF; a new upload replaces it.
pub async fn update_book(
    db: &DbConn,
    storage: &PdfStorage,
    ctx: &AuthContext,
    id: i64,
    payload: BookPayload,
    upload: Option<PdfUpload>,
) -> Result<book::Model> {
    let book = find_live_book(db, id).await?;
    ensure_owner(ctx, book.account_id, "book")?;

    let book_type = payload.book_type.unwrap_or(book.book_type);
    let previous = book.file_path.clone();

    let (file_path, stored) = match (book_type, upload) {
        (BookType::Manual, _) => (None, None),
        (BookType::Pdf, Some(upload)) => {
            let stored = storage.store_pdf(&upload.bytes).await?;
            (Some(stored.clone()), Some(stored))
        }
        (BookType::Pdf, None) => match &previous {
            Some(existing) => (Some(existing.clone()), None),
            None => return Err(AppError::invalid("pdf_file", PDF_REQUIRED)),
        },
    };

    let mut active: book::ActiveModel = book.into();
    active.title = Set(payload.title);
    active.description = Set(payload.description);
    active.status = Set(payload.status);
    active.book_type = Set(book_type);
    active.file_path = Set(file_path.clone());
    active.updated_at = Set(Utc::now());

    let book = match active.update(db).await {
        Ok(book) => book,
        Err(e) => {
            if let Some(path) = stored {
                storage.remove(&path).await?;
            }
            return Err(e.into());
        }
    };

    // The old file goes only once the row no longer references it
    if let Some(old) = previous.filter(|old| file_path.as_deref() != Some(old.as_str())) {
        storage.remove(&old).await?;
    }

    Ok(book)
}

/// Soft delete; the stored PDF is kept with the row
pub async fn delete_book(db: &DbConn, ctx: &AuthContext, id: i64) -> Result<book::Model> {
    let book = find_live_book(db, id).await?;
    ensure_owner(ctx, book.account_id, "book")?;

    let now = Utc::now();
    let mut active: book::ActiveModel = book.into();
    active.deleted_at = Set(Some(now));
    active.updated_at = Set(now);
    let book = active.update(db).await?;

    tracing::info!(book_id = id, account_id = ctx.account_id(), "Book deleted");
    Ok(book)
}

pub async fn store_contents(
    db: &DbConn,
    ctx: &AuthContext,
    book_id: i64,
    req: StoreBookContents,
) -> Result<Vec<book_content::Model>> {
    let book = find_live_book(db, book_id).await?;
    ensure_owner(ctx, book.account_id, "book")?;

    let txn = db.begin().await?;
    let now = Utc::now();
    let mut created = Vec::with_capacity(req.contents.len());

    for item in req.contents {
        let content = book_content::ActiveModel {
            book_id: Set(book_id),
            content: Set(item.content),
            title: Set(item.title),
            page_number: Set(item.page_number.trim().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        created.push(content.insert(&txn).await?);
    }

    txn.commit().await?;
    Ok(created)
}

/// Apply a batch of page edits, skipping pages of books the caller does not own
///
/// Every id must exist; otherwise the whole batch is rejected with 422.
pub async fn update_contents(
    db: &DbConn,
    ctx: &AuthContext,
    req: UpdateBookContents,
) -> Result<BatchOutcome<book_content::Model>> {
    let ids: Vec<i64> = req.contents.iter().map(|c| c.id).collect();

    let existing: HashMap<i64, (book_content::Model, Option<book::Model>)> = BookContent::find()
        .filter(book_content::Column::Id.is_in(ids))
        .find_also_related(Book)
        .all(db)
        .await?
        .into_iter()
        .map(|(content, book)| (content.id, (content, book)))
        .collect();

    if let Some(index) = req.contents.iter().position(|c| !existing.contains_key(&c.id)) {
        return Err(AppError::invalid(
            format!("contents.{}.id", index),
            format!("The selected contents.{}.id is invalid.", index),
        ));
    }

    let mut outcome = BatchOutcome {
        updated: Vec::new(),
        errors: Vec::new(),
    };
    let mut existing = existing;

    for item in req.contents {
        let Some((content, book)) = existing.remove(&item.id) else {
            // Repeated id in one batch; the first occurrence already applied
            continue;
        };

        let owned = book
            .map(|b| b.account_id == ctx.account_id())
            .unwrap_or(false);
        if !owned {
            tracing::warn!(
                content_id = item.id,
                account_id = ctx.account_id(),
                "Book content update denied"
            );
            outcome.errors.push(ContentError {
                content_id: item.id,
                error: "Unauthorized".to_string(),
            });
            continue;
        }

        let mut active: book_content::ActiveModel = content.into();
        active.content = Set(item.content);
        active.title = Set(item.title);
        active.page_number = Set(item.page_number.trim().to_string());
        active.updated_at = Set(Utc::now());
        outcome.updated.push(active.update(db).await?);
    }

    Ok(outcome)
}

pub async fn delete_content(db: &DbConn, ctx: &AuthContext, content_id: i64) -> Result<()> {
    let (content, book) = BookContent::find_by_id(content_id)
        .find_also_related(Book)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Book content not found".to_string()))?;

    let owner = book.map(|b| b.account_id).unwrap_or_default();
    ensure_owner(ctx, owner, "book content")?;

    content.delete(db).await?;
    Ok(())
}

/// Numeric page numbers first in numeric order, then the rest lexicographically
pub fn sort_by_page(contents: &mut [book_content::Model]) {
    contents.sort_by(|a, b| {
        compare_page_numbers(&a.page_number, &b.page_number).then(a.id.cmp(&b.id))
    });
}

fn compare_page_numbers(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<u64>(), b.trim().parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
