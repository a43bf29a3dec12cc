pub mod campus_factory;
pub mod report_factory;
pub mod user_factory;
