pub mod m202508010001_create_campuses;
pub mod m202508010002_create_users;
pub mod m202508010003_create_reports;
pub mod m202508010004_create_report_votes;
pub mod m202508010005_create_comments;
pub mod m202508010006_create_audit_logs;
pub mod m202508010007_create_notifications;
