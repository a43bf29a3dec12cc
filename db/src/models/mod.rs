pub mod audit_log;
pub mod campus;
pub mod comment;
pub mod notification;
pub mod report;
pub mod report_vote;
pub mod user;

pub use audit_log::Entity as AuditLog;
pub use campus::Entity as Campus;
pub use comment::Entity as Comment;
pub use notification::Entity as Notification;
pub use report::Entity as Report;
pub use report_vote::Entity as ReportVote;
pub use user::Entity as User;
