pub mod config;
pub mod delete;
pub mod edit;
pub mod favorite;
pub mod list;
pub mod new;
pub mod remind;
pub mod watch;
