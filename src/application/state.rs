use crate::db::DbConn;
use crate::services::activity_log::ActivityLogService;
use crate::services::storage::PdfStorage;

/// Application state containing all shared resources
#[derive(Clone)]
pub struct AppState {
    pub db: DbConn,
    pub storage: PdfStorage,
    pub activity: ActivityLogService,
}

impl AppState {
    pub fn new(db: DbConn, storage: PdfStorage) -> Self {
        let activity = ActivityLogService::new(db.clone());
        Self {
            db,
            storage,
            activity,
        }
    }
}
