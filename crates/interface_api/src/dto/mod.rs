//! Request and response bodies

pub mod cases;
pub mod records;
pub mod plans;
pub mod assist;
pub mod profiles;
