pub mod campus;
pub mod report;
pub mod user;
