pub mod account;
pub mod activity_log;
pub mod book;
pub mod book_content;
pub mod minigame;
pub mod minigame_content;
pub mod minigame_history;
pub mod personal_access_token;

#[allow(unused_imports)]
pub mod prelude {
    pub use super::account::{self, Entity as Account};
    pub use super::activity_log::{self, Entity as ActivityLog};
    pub use super::book::{self, Entity as Book};
    pub use super::book_content::{self, Entity as BookContent};
    pub use super::minigame::{self, Entity as Minigame};
    pub use super::minigame_content::{self, Entity as MinigameContent};
    pub use super::minigame_history::{self, Entity as MinigameHistory};
    pub use super::personal_access_token::{self, Entity as PersonalAccessToken};
}
