//! Route handlers

pub mod health;
pub mod cases;
pub mod records;
pub mod plans;
pub mod assist;
pub mod users;
