pub mod dashboard;
pub mod health;
pub mod websites;
