//! Moderation engine: every privileged transition on a report goes through
//! here. Each operation re-checks the actor, the campus boundary and the
//! state machine against the current row, applies the transition as a single
//! UPDATE, then audits and notifies best-effort.

use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{PaginatorTrait, QueryFilter};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use util::config;

use crate::models::report::{self, Status};
use crate::models::{audit_log, notification, user};

pub const DEFAULT_REJECT_REASON: &str = "This report was rejected by the moderation team.";
pub const DEFAULT_RESOLVE_DETAILS: &str = "Issue resolved by moderation team.";

/// One offending input field with a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ModerationError {
    /// All field-level problems found in the input, reported together.
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldViolation>),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("only the reporter may perform this action")]
    NotOwner,

    #[error("the edit window for this report has expired")]
    EditWindowExpired,

    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

/// Actor must be usable at all: active and not banned.
fn guard_active(actor: &user::Model) -> Result<(), ModerationError> {
    if !actor.is_active_and_not_banned() {
        return Err(ModerationError::AccessDenied(
            "account is banned or deactivated".into(),
        ));
    }
    Ok(())
}

/// Moderation actions require a moderation role and, unless the actor is a
/// super-admin, the report must belong to the actor's campus.
pub fn guard_moderator(
    actor: &user::Model,
    report: &report::Model,
) -> Result<(), ModerationError> {
    guard_active(actor)?;
    if !actor.role.can_moderate() {
        return Err(ModerationError::AccessDenied(
            "moderation role required".into(),
        ));
    }
    if !actor.role.is_super_admin() && actor.campus_id != report.campus_id {
        return Err(ModerationError::AccessDenied(
            "report belongs to another campus".into(),
        ));
    }
    Ok(())
}

async fn fetch_report(db: &DbConn, report_id: i64) -> Result<report::Model, ModerationError> {
    report::Entity::find_by_id(report_id)
        .one(db)
        .await?
        .ok_or(ModerationError::NotFound("report"))
}

fn status_change(from: Status, to: Status, extra: Option<(&str, &str)>) -> Json {
    let mut changes = json!({ "status": { "from": from.to_string(), "to": to.to_string() } });
    if let Some((key, value)) = extra {
        changes[key] = json!(value);
    }
    changes
}

async fn notify_reporter(
    db: &DbConn,
    actor_id: i64,
    report: &report::Model,
    kind: notification::Kind,
    title: &str,
    message: &str,
    priority: notification::Priority,
) {
    if report.reporter_id == actor_id {
        return;
    }
    notification::Model::notify(
        db,
        report.reporter_id,
        Some(report.id),
        kind,
        title,
        message,
        priority,
    )
    .await;
}

/// Confirms a report as genuine. Only a `reported` report can be verified.
pub async fn verify(
    db: &DbConn,
    actor: &user::Model,
    report_id: i64,
    reason: Option<&str>,
) -> Result<report::Model, ModerationError> {
    let report = fetch_report(db, report_id).await?;
    guard_moderator(actor, &report)?;

    if report.status != Status::Reported {
        return Err(ModerationError::InvalidTransition(format!(
            "cannot verify a report in status '{}'",
            report.status
        )));
    }

    let from = report.status;
    let severity = report.severity;
    let title = report.title.clone();

    let mut active: report::ActiveModel = report.into();
    active.status = Set(Status::Verified);
    if let Some(reason) = reason {
        active.resolution_details = Set(Some(reason.to_owned()));
    }
    active.updated_at = Set(Utc::now());
    let updated = active.update(db).await?;

    audit_log::Model::record(
        db,
        actor.id,
        "verify_report",
        "report",
        report_id,
        Some(status_change(from, Status::Verified, reason.map(|r| ("reason", r)))),
    )
    .await;

    let priority = if severity >= config::min_severity_for_push() {
        notification::Priority::High
    } else {
        notification::Priority::Medium
    };
    notify_reporter(
        db,
        actor.id,
        &updated,
        notification::Kind::ReportVerified,
        "Your report was verified",
        &format!("Your report '{title}' has been verified by the moderation team."),
        priority,
    )
    .await;

    Ok(updated)
}

/// Marks a `reported` report as not genuine.
pub async fn reject(
    db: &DbConn,
    actor: &user::Model,
    report_id: i64,
    reason: Option<&str>,
) -> Result<report::Model, ModerationError> {
    let report = fetch_report(db, report_id).await?;
    guard_moderator(actor, &report)?;

    if report.status != Status::Reported {
        return Err(ModerationError::InvalidTransition(format!(
            "cannot reject a report in status '{}'",
            report.status
        )));
    }

    let from = report.status;
    let title = report.title.clone();
    let reason = reason.unwrap_or(DEFAULT_REJECT_REASON);

    let mut active: report::ActiveModel = report.into();
    active.status = Set(Status::Invalid);
    active.resolution_details = Set(Some(reason.to_owned()));
    active.updated_at = Set(Utc::now());
    let updated = active.update(db).await?;

    audit_log::Model::record(
        db,
        actor.id,
        "invalidate_report",
        "report",
        report_id,
        Some(status_change(from, Status::Invalid, Some(("reason", reason)))),
    )
    .await;

    notify_reporter(
        db,
        actor.id,
        &updated,
        notification::Kind::ReportInvalid,
        "Your report was marked invalid",
        &format!("Your report '{title}' was reviewed and marked invalid. {reason}"),
        notification::Priority::Low,
    )
    .await;

    Ok(updated)
}

/// Closes a report out. Allowed from every non-terminal status; resolving an
/// already-resolved report is rejected rather than treated as a no-op.
pub async fn resolve(
    db: &DbConn,
    actor: &user::Model,
    report_id: i64,
    details: Option<&str>,
) -> Result<report::Model, ModerationError> {
    let report = fetch_report(db, report_id).await?;
    guard_moderator(actor, &report)?;

    if report.status.is_terminal() {
        return Err(ModerationError::InvalidTransition(
            "report is already resolved".into(),
        ));
    }

    let from = report.status;
    let title = report.title.clone();
    let details = details.unwrap_or(DEFAULT_RESOLVE_DETAILS);
    let now = Utc::now();

    let mut active: report::ActiveModel = report.into();
    active.status = Set(Status::Resolved);
    active.resolved_by = Set(Some(actor.id));
    active.resolved_at = Set(Some(now));
    active.resolution_details = Set(Some(details.to_owned()));
    active.updated_at = Set(now);
    let updated = active.update(db).await?;

    audit_log::Model::record(
        db,
        actor.id,
        "resolve_report",
        "report",
        report_id,
        Some(status_change(from, Status::Resolved, Some(("details", details)))),
    )
    .await;

    notify_reporter(
        db,
        actor.id,
        &updated,
        notification::Kind::ReportResolved,
        "Your report was resolved",
        &format!("Your report '{title}' has been resolved. {details}"),
        notification::Priority::Medium,
    )
    .await;

    Ok(updated)
}

/// Owner (or admin) retraction. No physical removal: the report transitions
/// to `invalid` and stays queryable for the audit trail.
pub async fn soft_delete(
    db: &DbConn,
    actor: &user::Model,
    report_id: i64,
) -> Result<report::Model, ModerationError> {
    let report = fetch_report(db, report_id).await?;
    guard_active(actor)?;

    let is_owner = report.reporter_id == actor.id;
    if !is_owner && !actor.role.can_admin() {
        return Err(ModerationError::AccessDenied(
            "only the reporter or an admin may delete a report".into(),
        ));
    }
    if !actor.role.is_super_admin() && actor.campus_id != report.campus_id {
        return Err(ModerationError::AccessDenied(
            "report belongs to another campus".into(),
        ));
    }
    if report.status != Status::Reported {
        return Err(ModerationError::InvalidTransition(format!(
            "cannot delete a report in status '{}'",
            report.status
        )));
    }

    let from = report.status;
    let mut active: report::ActiveModel = report.into();
    active.status = Set(Status::Invalid);
    active.updated_at = Set(Utc::now());
    let updated = active.update(db).await?;

    audit_log::Model::record(
        db,
        actor.id,
        "delete_report",
        "report",
        report_id,
        Some(status_change(from, Status::Invalid, None)),
    )
    .await;

    Ok(updated)
}

/// Crowd spam flag, open to any authenticated user. Idempotent per flagger;
/// crossing the configured threshold flips the report to `spam` in the same
/// update, whatever its current status.
pub async fn report_spam(
    db: &DbConn,
    actor: &user::Model,
    report_id: i64,
) -> Result<report::Model, ModerationError> {
    let report = fetch_report(db, report_id).await?;
    guard_active(actor)?;

    let mut spam_reports = report.spam_reports.clone();
    if !spam_reports.insert(actor.id) {
        // Already flagged by this user.
        return Ok(report);
    }

    let threshold = config::spam_report_threshold();
    let crosses = spam_reports.len() >= threshold && !report.is_spam;
    let from = report.status;

    let mut active: report::ActiveModel = report.into();
    active.spam_reports = Set(spam_reports);
    if crosses {
        active.is_spam = Set(true);
        active.status = Set(Status::Spam);
    }
    active.updated_at = Set(Utc::now());
    let updated = active.update(db).await?;

    audit_log::Model::record(
        db,
        actor.id,
        "report_spam",
        "report",
        report_id,
        Some(json!({
            "spam_report_count": updated.spam_reports.len(),
            "auto_flagged": crosses,
            "status": { "from": from.to_string(), "to": updated.status.to_string() },
        })),
    )
    .await;

    Ok(updated)
}

/// Hands a report to a security-role user in the same campus.
pub async fn assign(
    db: &DbConn,
    actor: &user::Model,
    report_id: i64,
    assignee_id: i64,
) -> Result<report::Model, ModerationError> {
    let report = fetch_report(db, report_id).await?;
    guard_moderator(actor, &report)?;

    let assignee = user::Model::find_by_id(db, assignee_id)
        .await?
        .ok_or(ModerationError::NotFound("user"))?;
    if assignee.role != user::Role::Security {
        return Err(ModerationError::Validation(vec![FieldViolation::new(
            "assigned_to",
            "assignee must have the security role",
        )]));
    }
    if assignee.campus_id != report.campus_id {
        return Err(ModerationError::AccessDenied(
            "assignee belongs to another campus".into(),
        ));
    }

    let previous = report.assigned_to;
    let mut active: report::ActiveModel = report.into();
    active.assigned_to = Set(Some(assignee_id));
    active.updated_at = Set(Utc::now());
    let updated = active.update(db).await?;

    audit_log::Model::record(
        db,
        actor.id,
        "assign_report",
        "report",
        report_id,
        Some(json!({ "assigned_to": { "from": previous, "to": assignee_id } })),
    )
    .await;

    Ok(updated)
}

/// Replaces the moderator-only notes on a report.
pub async fn set_notes(
    db: &DbConn,
    actor: &user::Model,
    report_id: i64,
    notes: &str,
) -> Result<report::Model, ModerationError> {
    let report = fetch_report(db, report_id).await?;
    guard_moderator(actor, &report)?;

    let mut active: report::ActiveModel = report.into();
    active.moderator_notes = Set(Some(notes.to_owned()));
    active.updated_at = Set(Utc::now());
    let updated = active.update(db).await?;

    audit_log::Model::record(db, actor.id, "update_notes", "report", report_id, None).await;

    Ok(updated)
}

/// Bans an account. Admin-only; cross-campus only for super-admins. The ban
/// is recorded on the user row; enforcement happens in the actor guards.
pub async fn ban_user(
    db: &DbConn,
    actor: &user::Model,
    user_id: i64,
    reason: &str,
) -> Result<user::Model, ModerationError> {
    guard_active(actor)?;
    if !actor.role.can_admin() {
        return Err(ModerationError::AccessDenied("admin role required".into()));
    }
    if actor.id == user_id {
        return Err(ModerationError::AccessDenied(
            "you cannot ban yourself".into(),
        ));
    }

    let target = user::Model::find_by_id(db, user_id)
        .await?
        .ok_or(ModerationError::NotFound("user"))?;
    if !actor.role.is_super_admin() && actor.campus_id != target.campus_id {
        return Err(ModerationError::AccessDenied(
            "user belongs to another campus".into(),
        ));
    }

    let mut active: user::ActiveModel = target.into();
    active.is_banned = Set(true);
    active.banned_reason = Set(Some(reason.to_owned()));
    active.updated_at = Set(Utc::now());
    let banned = active.update(db).await?;

    audit_log::Model::record(
        db,
        actor.id,
        "ban_user",
        "user",
        user_id,
        Some(json!({ "reason": reason })),
    )
    .await;

    notification::Model::notify(
        db,
        user_id,
        None,
        notification::Kind::AccountBanned,
        "Your account has been banned",
        &format!("Your account has been banned. Reason: {reason}"),
        notification::Priority::High,
    )
    .await;

    Ok(banned)
}

/// Per-status counts for a campus's moderation dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModerationSummary {
    pub total: u64,
    pub reported: u64,
    pub verified: u64,
    pub invalid: u64,
    pub spam: u64,
    pub resolved: u64,
    pub spam_flagged: u64,
}

pub async fn summary(db: &DbConn, campus_id: i64) -> Result<ModerationSummary, ModerationError> {
    let scoped = report::Entity::find().filter(report::Column::CampusId.eq(campus_id));

    let mut by_status = [0u64; 5];
    for (slot, status) in by_status.iter_mut().zip([
        Status::Reported,
        Status::Verified,
        Status::Invalid,
        Status::Spam,
        Status::Resolved,
    ]) {
        *slot = scoped
            .clone()
            .filter(report::Column::Status.eq(status))
            .count(db)
            .await?;
    }

    Ok(ModerationSummary {
        total: scoped.clone().count(db).await?,
        reported: by_status[0],
        verified: by_status[1],
        invalid: by_status[2],
        spam: by_status[3],
        resolved: by_status[4],
        spam_flagged: scoped
            .filter(report::Column::IsSpam.eq(true))
            .count(db)
            .await?,
    })
}
