pub mod add;
pub mod auth;
pub mod delete;
pub mod r#do;
pub mod edit;
pub mod export;
pub mod list;
pub mod show;
