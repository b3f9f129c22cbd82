pub use sea_orm_migration::prelude::*;

mod m20250418_000001_create_accounts;
mod m20250418_000002_create_personal_access_tokens;
mod m20250418_000003_create_books;
mod m20250418_000004_create_book_contents;
mod m20250418_000005_create_minigames;
mod m20250418_000006_create_minigame_contents;
mod m20250418_000007_create_minigame_histories;
mod m20250418_000008_create_activity_logs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250418_000001_create_accounts::Migration),
            Box::new(m20250418_000002_create_personal_access_tokens::Migration),
            Box::new(m20250418_000003_create_books::Migration),
            Box::new(m20250418_000004_create_book_contents::Migration),
            Box::new(m20250418_000005_create_minigames::Migration),
            Box::new(m20250418_000006_create_minigame_contents::Migration),
            Box::new(m20250418_000007_create_minigame_histories::Migration),
            Box::new(m20250418_000008_create_activity_logs::Migration),
        ]
    }
}
