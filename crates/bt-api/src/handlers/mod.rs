//! API handlers grouped by entity

pub mod bugs;
pub mod dashboard;
pub mod projects;
pub mod users;
