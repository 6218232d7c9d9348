pub mod add;
pub mod common;
pub mod delete;
pub mod export;
pub mod import;
pub mod list;
pub mod print;
pub mod show;
