use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    sea_query::{Expr, Func, SimpleExpr},
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, LoaderTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::db::DbConn;
use crate::error::{AppError, Result};
use crate::middleware::AuthContext;
use crate::models::prelude::*;
use crate::schemas::{
    AccountSummary, BatchOutcome, ContentError, HistoryEntry, MinigameDetail, MinigameListItem,
    MinigamePayload, MinigamePhase, MinigameQuery, Page, PageRequest, StoreHistoryRequest,
    StoreMinigameContents, UpdateMinigameContents, MINIGAMES_PER_PAGE,
};
use crate::services::ensure_owner;

const COPY_SUFFIX: &str = " (Copy)";

impl MinigamePhase {
    /// Filter selecting minigames in this phase at `now`
    ///
    /// Ongoing and completed overlap: both hold once the start has passed,
    /// only ongoing holds at the exact start instant.
    pub fn condition(self, now: DateTime<Utc>) -> SimpleExpr {
        match self {
            MinigamePhase::Upcoming => minigame::Column::StartsAt.gt(now),
            MinigamePhase::Ongoing => minigame::Column::StartsAt.lte(now),
            MinigamePhase::Completed => minigame::Column::StartsAt.lt(now),
        }
    }
}

impl MinigameQuery {
    pub fn condition(&self, now: DateTime<Utc>) -> Condition {
        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                Expr::expr(Func::lower(Expr::col((Minigame, minigame::Column::Title))))
                    .like(format!("%{}%", s.to_lowercase()))
            });

        Condition::all()
            .add(minigame::Column::DeletedAt.is_null())
            .add_option(self.status.map(|phase| phase.condition(now)))
            .add_option(search)
            .add_option(self.account_id.map(|id| minigame::Column::AccountId.eq(id)))
    }
}

/// Sum of content points per minigame
async fn points_by_minigame<C: ConnectionTrait>(
    db: &C,
    minigame_ids: Vec<i64>,
) -> Result<HashMap<i64, (i64, i64)>> {
    if minigame_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i64, i64, i64)> = MinigameContent::find()
        .select_only()
        .column(minigame_content::Column::MinigameId)
        .column_as(minigame_content::Column::Id.count(), "count")
        .column_as(minigame_content::Column::Points.sum(), "points")
        .filter(minigame_content::Column::MinigameId.is_in(minigame_ids))
        .group_by(minigame_content::Column::MinigameId)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(id, count, points)| (id, (count, points)))
        .collect())
}

/// Live minigames, latest start first, with creator and content totals
pub async fn list_minigames(
    db: &DbConn,
    query: MinigameQuery,
    now: DateTime<Utc>,
) -> Result<Page<MinigameListItem>> {
    let paging = PageRequest::new(query.page, query.per_page, MINIGAMES_PER_PAGE);

    let select = Minigame::find().filter(query.condition(now));
    let total = select.clone().count(db).await?;

    let minigames = select
        .order_by_desc(minigame::Column::StartsAt)
        .order_by_desc(minigame::Column::Id)
        .offset(paging.offset())
        .limit(paging.per_page)
        .all(db)
        .await?;

    let owners = minigames.load_one(Account, db).await?;
    let totals = points_by_minigame(db, minigames.iter().map(|m| m.id).collect()).await?;

    let data = minigames
        .into_iter()
        .zip(owners)
        .map(|(minigame, owner)| {
            let (count, points) = totals.get(&minigame.id).copied().unwrap_or((0, 0));
            MinigameListItem {
                account: owner.as_ref().map(AccountSummary::from),
                contents_count: count as u64,
                contents_sum_points: points,
                minigame,
            }
        })
        .collect();

    Ok(Page::new(data, paging.page, paging.per_page, total))
}

/// Any minigame by id, soft-deleted included
pub async fn get_minigame(db: &DbConn, id: i64) -> Result<MinigameDetail> {
    let minigame = Minigame::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Minigame not found".to_string()))?;

    let mut contents = minigame.find_related(MinigameContent).all(db).await?;
    sort_by_page(&mut contents);

    let owner = minigame.find_related(Account).one(db).await?;

    Ok(MinigameDetail {
        account: owner.as_ref().map(AccountSummary::from),
        minigame,
        contents,
    })
}

async fn find_live_minigame(db: &DbConn, id: i64) -> Result<minigame::Model> {
    Minigame::find_by_id(id)
        .filter(minigame::Column::DeletedAt.is_null())
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Minigame not found".to_string()))
}

pub async fn create_minigame(
    db: &DbConn,
    ctx: &AuthContext,
    payload: MinigamePayload,
) -> Result<minigame::Model> {
    let now = Utc::now();
    let minigame = minigame::ActiveModel {
        title: Set(payload.title),
        default_timer: Set(payload.default_timer),
        default_points: Set(payload.default_points),
        starts_at: Set(payload.starts_at),
        account_id: Set(ctx.account_id()),
        deleted_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let minigame = minigame.insert(db).await?;

    tracing::info!(minigame_id = minigame.id, account_id = ctx.account_id(), "Minigame created");
    Ok(minigame)
}

pub async fn update_minigame(
    db: &DbConn,
    ctx: &AuthContext,
    id: i64,
    payload: MinigamePayload,
) -> Result<minigame::Model> {
    let minigame = find_live_minigame(db, id).await?;
    ensure_owner(ctx, minigame.account_id, "minigame")?;

    let mut active: minigame::ActiveModel = minigame.into();
    active.title = Set(payload.title);
    active.default_timer = Set(payload.default_timer);
    active.default_points = Set(payload.default_points);
    active.starts_at = Set(payload.starts_at);
    active.updated_at = Set(Utc::now());

    Ok(active.update(db).await?)
}

pub async fn delete_minigame(db: &DbConn, ctx: &AuthContext, id: i64) -> Result<minigame::Model> {
    let minigame = find_live_minigame(db, id).await?;
    ensure_owner(ctx, minigame.account_id, "minigame")?;

    let now = Utc::now();
    let mut active: minigame::ActiveModel = minigame.into();
    active.deleted_at = Set(Some(now));
    active.updated_at = Set(now);
    let minigame = active.update(db).await?;

    tracing::info!(minigame_id = id, account_id = ctx.account_id(), "Minigame deleted");
    Ok(minigame)
}

pub async fn store_contents(
    db: &DbConn,
    ctx: &AuthContext,
    minigame_id: i64,
    req: StoreMinigameContents,
) -> Result<Vec<minigame_content::Model>> {
    let minigame = find_live_minigame(db, minigame_id).await?;
    ensure_owner(ctx, minigame.account_id, "minigame")?;

    let txn = db.begin().await?;
    let now = Utc::now();
    let mut created = Vec::with_capacity(req.contents.len());

    for item in req.contents {
        let content = minigame_content::ActiveModel {
            minigame_id: Set(minigame_id),
            question: Set(item.question),
            correct_answer: Set(item.correct_answer),
            option_1: Set(item.option_1),
            option_2: Set(item.option_2),
            option_3: Set(item.option_3),
            option_4: Set(item.option_4),
            points: Set(item.points),
            timer: Set(item.timer),
            page_number: Set(item.page_number),
            account_id: Set(Some(ctx.account_id())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        created.push(content.insert(&txn).await?);
    }

    txn.commit().await?;
    Ok(created)
}

/// Apply a batch of question edits, skipping those of minigames the caller does not own
pub async fn update_contents(
    db: &DbConn,
    ctx: &AuthContext,
    req: UpdateMinigameContents,
) -> Result<BatchOutcome<minigame_content::Model>> {
    let ids: Vec<i64> = req.contents.iter().map(|c| c.id).collect();

    let mut existing: HashMap<i64, (minigame_content::Model, Option<minigame::Model>)> =
        MinigameContent::find()
            .filter(minigame_content::Column::Id.is_in(ids))
            .find_also_related(Minigame)
            .all(db)
            .await?
            .into_iter()
            .map(|(content, minigame)| (content.id, (content, minigame)))
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

    for item in req.contents {
        let Some((content, minigame)) = existing.remove(&item.id) else {
            continue;
        };

        let owned = minigame
            .map(|m| m.account_id == ctx.account_id())
            .unwrap_or(false);
        if !owned {
            tracing::warn!(
                content_id = item.id,
                account_id = ctx.account_id(),
                "Minigame content update denied"
            );
            outcome.errors.push(ContentError {
                content_id: item.id,
                error: "Unauthorized".to_string(),
            });
            continue;
        }

        let mut active: minigame_content::ActiveModel = content.into();
        active.question = Set(item.question);
        active.correct_answer = Set(item.correct_answer);
        active.option_1 = Set(item.option_1);
        active.option_2 = Set(item.option_2);
        active.option_3 = Set(item.option_3);
        active.option_4 = Set(item.option_4);
        active.points = Set(item.points);
        active.timer = Set(item.timer);
        active.page_number = Set(item.page_number);
        active.updated_at = Set(Utc::now());
        outcome.updated.push(active.update(db).await?);
    }

    Ok(outcome)
}

pub async fn delete_content(db: &DbConn, ctx: &AuthContext, content_id: i64) -> Result<()> {
    let (content, minigame) = MinigameContent::find_by_id(content_id)
        .find_also_related(Minigame)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Minigame content not found".to_string()))?;

    let owner = minigame.map(|m| m.account_id).unwrap_or_default();
    ensure_owner(ctx, owner, "minigame content")?;

    content.delete(db).await?;
    Ok(())
}

/// Questions of a minigame in page order, unnumbered ones last
pub async fn get_contents(db: &DbConn, minigame_id: i64) -> Result<Vec<minigame_content::Model>> {
    let minigame = Minigame::find_by_id(minigame_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Minigame not found".to_string()))?;

    let mut contents = minigame.find_related(MinigameContent).all(db).await?;
    sort_by_page(&mut contents);
    Ok(contents)
}

pub fn sort_by_page(contents: &mut [minigame_content::Model]) {
    contents.sort_by_key(|c| (c.page_number.is_none(), c.page_number, c.id));
}

/// Record one play attempt of the acting account; scores are stored as sent
pub async fn store_history(
    db: &DbConn,
    ctx: &AuthContext,
    req: StoreHistoryRequest,
) -> Result<minigame_history::Model> {
    let exists = Minigame::find_by_id(req.minigame_id).count(db).await? > 0;
    if !exists {
        return Err(AppError::invalid(
            "minigame_id",
            "The selected minigame id is invalid.",
        ));
    }

    let now = Utc::now();
    let history = minigame_history::ActiveModel {
        minigame_id: Set(req.minigame_id),
        account_id: Set(ctx.account_id()),
        total_score: Set(req.total_score),
        correct_count: Set(req.correct_count),
        incorrect_count: Set(req.incorrect_count),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(history.insert(db).await?)
}

/// Play history of one minigame (or all when `minigame_id` is negative)
///
/// With a student the attempts come newest first; without one they form a
/// leaderboard ordered by score.
pub async fn get_history(
    db: &DbConn,
    minigame_id: i64,
    student_id: Option<i64>,
) -> Result<Vec<HistoryEntry>> {
    let student_id = student_id.filter(|id| *id >= 0);

    let mut select = MinigameHistory::find();
    if minigame_id >= 0 {
        select = select.filter(minigame_history::Column::MinigameId.eq(minigame_id));
    }

    select = match student_id {
        Some(id) => select
            .filter(minigame_history::Column::AccountId.eq(id))
            .order_by_desc(minigame_history::Column::UpdatedAt),
        None => select.order_by_desc(minigame_history::Column::TotalScore),
    };

    let histories = select
        .order_by_desc(minigame_history::Column::Id)
        .all(db)
        .await?;

    let players = histories.load_one(Account, db).await?;
    let minigames = histories.load_one(Minigame, db).await?;

    let mut minigame_ids: Vec<i64> = histories.iter().map(|h| h.minigame_id).collect();
    minigame_ids.sort_unstable();
    minigame_ids.dedup();
    let totals = points_by_minigame(db, minigame_ids).await?;

    Ok(histories
        .into_iter()
        .zip(players)
        .zip(minigames)
        .map(|((history, player), minigame)| HistoryEntry {
            account: player.as_ref().map(AccountSummary::from),
            minigame_title: minigame.map(|m| m.title),
            total_possible_points: totals
                .get(&history.minigame_id)
                .map(|(_, points)| *points)
                .unwrap_or(0),
            history,
        })
        .collect())
}

/// Duplicate a minigame and all its questions under the acting account
///
/// The copy starts one day from now. Runs in a single transaction.
pub async fn copy_minigame(db: &DbConn, ctx: &AuthContext, id: i64) -> Result<MinigameDetail> {
    let source = Minigame::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Minigame not found".to_string()))?;
    let source_contents = source.find_related(MinigameContent).all(db).await?;

    let txn = db.begin().await?;
    let now = Utc::now();

    let copy = minigame::ActiveModel {
        title: Set(format!("{}{}", source.title, COPY_SUFFIX)),
        default_timer: Set(source.default_timer),
        default_points: Set(source.default_points),
        starts_at: Set(now + Duration::days(1)),
        account_id: Set(ctx.account_id()),
        deleted_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let copy = copy.insert(&txn).await?;

    let mut contents = Vec::with_capacity(source_contents.len());
    for content in source_contents {
        let cloned = minigame_content::ActiveModel {
            minigame_id: Set(copy.id),
            question: Set(content.question),
            correct_answer: Set(content.correct_answer),
            option_1: Set(content.option_1),
            option_2: Set(content.option_2),
            option_3: Set(content.option_3),
            option_4: Set(content.option_4),
            points: Set(content.points),
            timer: Set(content.timer),
            page_number: Set(content.page_number),
            account_id: Set(content.account_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        contents.push(cloned.insert(&txn).await?);
    }

    txn.commit().await?;
    sort_by_page(&mut contents);

    tracing::info!(
        source_id = id,
        minigame_id = copy.id,
        questions = contents.len(),
        "Minigame copied"
    );

    Ok(MinigameDetail {
        account: Some(AccountSummary::from(&ctx.account)),
        minigame: copy,
        contents,
    })
}
