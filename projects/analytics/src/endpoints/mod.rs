pub mod github;
pub mod health;
pub mod query;
pub mod tables;
