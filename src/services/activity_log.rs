use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::db::DbConn;
use crate::error::{AppError, Result};
use crate::middleware::AuthContext;
use crate::models::prelude::*;
use crate::schemas::datetime::{day_range, start_of_day};
use crate::schemas::{
    ActivityLogEntry, ActivityLogQuery, CreateActivityLog, Page, PageRequest,
    ACTIVITY_LOGS_PER_PAGE,
};

/// Appends activity rows on behalf of other services
#[derive(Clone)]
pub struct ActivityLogService {
    db: DbConn,
}

impl ActivityLogService {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Record an action for `account_id`
    pub async fn record(
        &self,
        account_id: i64,
        description: impl Into<String>,
        module: &str,
    ) -> Result<activity_log::Model> {
        let entry = activity_log::ActiveModel {
            account_id: Set(account_id),
            description: Set(description.into()),
            module: Set(module.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        Ok(entry.insert(&self.db).await?)
    }

    /// Record an action; failures are logged and swallowed
    pub async fn record_quietly(&self, account_id: i64, description: impl Into<String>, module: &str) {
        if let Err(e) = self.record(account_id, description, module).await {
            tracing::warn!(account_id, error = %e, "Failed to write activity log");
        }
    }
}

pub async fn create_log(
    db: &DbConn,
    ctx: &AuthContext,
    req: CreateActivityLog,
) -> Result<activity_log::Model> {
    let entry = activity_log::ActiveModel {
        account_id: Set(ctx.account_id()),
        description: Set(req.description),
        module: Set(req.module),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    Ok(entry.insert(db).await?)
}

/// Filtered, newest-first page of logs joined with the author's name
pub async fn get_logs(db: &DbConn, query: ActivityLogQuery) -> Result<Page<ActivityLogEntry>> {
    let paging = PageRequest::new(query.page, query.per_page, ACTIVITY_LOGS_PER_PAGE);

    let mut condition = Condition::all();

    match (query.start_date, query.end_date) {
        (Some(start), Some(end)) => {
            if end < start {
                return Err(AppError::invalid(
                    "end_date",
                    "The end date field must be a date after or equal to start date.",
                ));
            }
            let (from, to) = day_range(start, end);
            condition = condition
                .add(activity_log::Column::CreatedAt.gte(from))
                .add(activity_log::Column::CreatedAt.lt(to));
        }
        (Some(start), None) => {
            condition = condition.add(activity_log::Column::CreatedAt.gte(start_of_day(start)));
        }
        (None, Some(end)) => {
            let (_, to) = day_range(end, end);
            condition = condition.add(activity_log::Column::CreatedAt.lt(to));
        }
        (None, None) => {}
    }

    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search.to_lowercase());
        let lower = |col: Expr| Expr::expr(Func::lower(col));
        condition = condition.add(
            Condition::any()
                .add(
                    lower(Expr::col((Account, account::Column::FirstName)))
                        .like(pattern.clone()),
                )
                .add(
                    lower(Expr::col((Account, account::Column::LastName)))
                        .like(pattern.clone()),
                )
                .add(
                    lower(Expr::col((ActivityLog, activity_log::Column::Description)))
                        .like(pattern),
                ),
        );
    }

    let select = ActivityLog::find()
        .find_also_related(Account)
        .filter(condition);

    let total = select.clone().count(db).await?;

    let rows = select
        .order_by_desc(activity_log::Column::CreatedAt)
        .order_by_desc(activity_log::Column::Id)
        .offset(paging.offset())
        .limit(paging.per_page)
        .all(db)
        .await?;

    let data = rows
        .into_iter()
        .map(|(log, account)| ActivityLogEntry {
            account_name: account.map(|a| a.display_name()).unwrap_or_default(),
            log,
        })
        .collect();

    Ok(Page::new(data, paging.page, paging.per_page, total))
}
