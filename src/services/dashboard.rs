//! Read-only statistics across accounts, books, minigames and play history.

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QuerySelect, RelationTrait,
};

use crate::db::DbConn;
use crate::error::{AppError, Result};
use crate::models::account::{AccountRole, AccountStatus};
use crate::models::book::BookStatus;
use crate::models::prelude::*;
use crate::schemas::datetime::day_range;
use crate::schemas::{
    DashboardQuery, DashboardResponse, MinigameCounts, StatusCounts, UserCounts,
};

/// Resolved dashboard scope
#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardFilter {
    /// Half-open `updated_at` window
    pub range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub account_id: Option<i64>,
    pub teacher_id: Option<i64>,
}

impl DashboardFilter {
    /// The date window applies only when both ends are given
    pub fn from_query(query: &DashboardQuery) -> Result<Self> {
        let range = match (query.start_date, query.end_date) {
            (Some(start), Some(end)) if end < start => {
                return Err(AppError::invalid(
                    "end_date",
                    "The end date field must be a date after or equal to start date.",
                ));
            }
            (Some(start), Some(end)) => Some(day_range(start, end)),
            _ => None,
        };

        Ok(Self {
            range,
            account_id: query.account_id,
            teacher_id: query.teacher_id,
        })
    }
}

pub async fn get_dashboard(
    db: &DbConn,
    filter: DashboardFilter,
    now: DateTime<Utc>,
) -> Result<DashboardResponse> {
    Ok(DashboardResponse {
        user_counts: user_type_counts(db, &filter).await?,
        book_counts: book_counts(db, &filter).await?,
        minigame_counts: minigame_counts(db, &filter, now).await?,
        average_minigame_score: average_minigame_score(db, &filter).await?,
    })
}

/// Live accounts by role and status, optionally limited to one teacher's students
pub async fn user_type_counts(db: &DbConn, filter: &DashboardFilter) -> Result<UserCounts> {
    let mut condition = Condition::all()
        .add(account::Column::DeletedAt.is_null())
        .add_option(filter.teacher_id.map(|id| account::Column::TeacherId.eq(id)));
    if let Some((from, to)) = filter.range {
        condition = condition
            .add(account::Column::UpdatedAt.gte(from))
            .add(account::Column::UpdatedAt.lt(to));
    }

    let rows: Vec<(AccountRole, AccountStatus, i64)> = Account::find()
        .select_only()
        .column(account::Column::UserRole)
        .column(account::Column::Status)
        .column_as(account::Column::Id.count(), "count")
        .filter(condition)
        .group_by(account::Column::UserRole)
        .group_by(account::Column::Status)
        .into_tuple()
        .all(db)
        .await?;

    Ok(tally_users(&rows))
}

pub fn tally_users(rows: &[(AccountRole, AccountStatus, i64)]) -> UserCounts {
    let mut counts = UserCounts::default();

    for &(role, status, n) in rows {
        let n = n.max(0) as u64;
        let bucket = match role {
            AccountRole::Admin => &mut counts.by_role.admin,
            AccountRole::Teacher => &mut counts.by_role.teacher,
            AccountRole::Student => &mut counts.by_role.student,
        };

        bucket.total += n;
        counts.total += n;
        match status {
            AccountStatus::Active => {
                bucket.active += n;
                counts.active += n;
            }
            AccountStatus::Inactive => {
                bucket.inactive += n;
                counts.inactive += n;
            }
        }
    }

    counts
}

/// Live books by status
pub async fn book_counts(db: &DbConn, filter: &DashboardFilter) -> Result<StatusCounts> {
    let mut condition = Condition::all()
        .add(book::Column::DeletedAt.is_null())
        .add_option(filter.account_id.map(|id| book::Column::AccountId.eq(id)));
    if let Some((from, to)) = filter.range {
        condition = condition
            .add(book::Column::UpdatedAt.gte(from))
            .add(book::Column::UpdatedAt.lt(to));
    }

    let rows: Vec<(BookStatus, i64)> = Book::find()
        .select_only()
        .column(book::Column::Status)
        .column_as(book::Column::Id.count(), "count")
        .filter(condition)
        .group_by(book::Column::Status)
        .into_tuple()
        .all(db)
        .await?;

    let mut counts = StatusCounts::default();
    for (status, n) in rows {
        let n = n.max(0) as u64;
        counts.total += n;
        match status {
            BookStatus::Active => counts.active += n,
            BookStatus::Inactive => counts.inactive += n,
        }
    }
    Ok(counts)
}

/// Live minigames split at `now`: completed once started, upcoming before
pub async fn minigame_counts(
    db: &DbConn,
    filter: &DashboardFilter,
    now: DateTime<Utc>,
) -> Result<MinigameCounts> {
    let mut condition = Condition::all()
        .add(minigame::Column::DeletedAt.is_null())
        .add_option(filter.account_id.map(|id| minigame::Column::AccountId.eq(id)));
    if let Some((from, to)) = filter.range {
        condition = condition
            .add(minigame::Column::UpdatedAt.gte(from))
            .add(minigame::Column::UpdatedAt.lt(to));
    }

    let select = Minigame::find().filter(condition);
    let total = select.clone().count(db).await?;
    let upcoming = select
        .filter(minigame::Column::StartsAt.gt(now))
        .count(db)
        .await?;

    Ok(MinigameCounts {
        total,
        completed: total - upcoming,
        upcoming,
    })
}

/// Mean correct-answer percentage across play attempts
///
/// Attempts without any answers are left out; `None` when nothing remains.
pub async fn average_minigame_score(
    db: &DbConn,
    filter: &DashboardFilter,
) -> Result<Option<f64>> {
    let mut select = MinigameHistory::find()
        .select_only()
        .column_as(
            Expr::cust(
                "AVG(CAST(correct_count AS DOUBLE PRECISION) * 100.0 \
                 / NULLIF(correct_count + incorrect_count, 0))",
            ),
            "average",
        )
        .join(JoinType::InnerJoin, minigame_history::Relation::Account.def());

    if let Some(teacher_id) = filter.teacher_id {
        select = select.filter(account::Column::TeacherId.eq(teacher_id));
    }
    if let Some((from, to)) = filter.range {
        select = select
            .filter(minigame_history::Column::UpdatedAt.gte(from))
            .filter(minigame_history::Column::UpdatedAt.lt(to));
    }

    let average: Option<Option<f64>> = select.into_tuple().one(db).await?;
    Ok(average.flatten().map(round_percentage))
}

/// Round a percentage to two decimals
pub fn round_percentage(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
