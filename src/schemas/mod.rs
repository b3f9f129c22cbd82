pub mod account;
pub mod activity_log;
pub mod book;
pub mod common;
pub mod dashboard;
pub mod datetime;
pub mod minigame;

pub use account::*;
pub use activity_log::*;
pub use book::*;
pub use common::*;
pub use dashboard::*;
pub use minigame::*;
