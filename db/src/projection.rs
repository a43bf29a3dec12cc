//! Role-based visibility projection.
//!
//! `report::Model` deliberately does not implement `Serialize`; the only way a
//! report leaves the system is through [`project`], which decides field by
//! field what the viewer may see. Decisions key off two capabilities rather
//! than role names, so the rules live in one place.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::comment::Model as Comment;
use crate::models::report::{Category, EditHistory, Model as Report, Status};
use crate::models::user::Model as User;

/// What a given viewer is allowed to see on a given report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub can_moderate: bool,
    pub is_owner: bool,
}

impl Capabilities {
    pub fn of(viewer: &User, report: &Report) -> Self {
        let same_campus = viewer.campus_id == report.campus_id;
        Self {
            can_moderate: viewer.role.can_moderate()
                && (same_campus || viewer.role.is_super_admin()),
            is_owner: viewer.id == report.reporter_id,
        }
    }

}

/// GeoJSON Point: longitude first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationView {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub coordinates: [f64; 2],
}

impl LocationView {
    fn point(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: "Point",
            coordinates: [longitude, latitude],
        }
    }
}

/// The outward shape of a report. Fields the viewer may not see are absent
/// from the JSON entirely, not nulled.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
    pub id: i64,
    /// Absent for anonymous reports unless the viewer is the owner or a
    /// moderator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter_id: Option<i64>,
    pub campus_id: i64,
    pub category: Category,
    pub severity: i32,
    pub title: String,
    pub description: String,
    pub location: LocationView,
    pub media_urls: Vec<String>,
    pub is_anonymous: bool,
    pub status: Status,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub moderator_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_details: Option<String>,

    pub confirm_count: i32,
    pub dispute_count: i32,
    pub net_votes: i32,
    pub comments_count: i32,
    pub views_count: i32,

    /// Moderator-only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spam_report_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_spam: Option<bool>,

    pub is_edited: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<DateTime<Utc>>,
    /// Owner and moderators only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_history: Option<EditHistory>,

    /// Present only on nearby-query results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<f64>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Projects a report for a viewer with the given capabilities.
pub fn project(report: &Report, caps: Capabilities) -> ReportView {
    let privileged = caps.can_moderate || caps.is_owner;

    let reporter_id = if report.is_anonymous && !privileged {
        None
    } else {
        Some(report.reporter_id)
    };

    ReportView {
        id: report.id,
        reporter_id,
        campus_id: report.campus_id,
        category: report.category,
        severity: report.severity,
        title: report.title.clone(),
        description: report.description.clone(),
        location: LocationView::point(report.longitude, report.latitude),
        media_urls: report.media_urls.0.clone(),
        is_anonymous: report.is_anonymous,
        status: report.status,

        moderator_notes: if caps.can_moderate {
            report.moderator_notes.clone()
        } else {
            None
        },
        assigned_to: if caps.can_moderate {
            report.assigned_to
        } else {
            None
        },
        resolved_by: if caps.can_moderate {
            report.resolved_by
        } else {
            None
        },
        resolved_at: report.resolved_at,
        resolution_details: report.resolution_details.clone(),

        confirm_count: report.confirm_count,
        dispute_count: report.dispute_count,
        net_votes: report.net_votes(),
        comments_count: report.comments_count,
        views_count: report.views_count,

        spam_report_count: caps.can_moderate.then(|| report.spam_reports.len()),
        is_spam: caps.can_moderate.then_some(report.is_spam),

        is_edited: report.is_edited,
        edited_at: report.edited_at,
        edit_history: privileged.then(|| report.edit_history.clone()),

        distance_m: None,

        created_at: report.created_at,
        updated_at: report.updated_at,
    }
}

/// Nearby results carry their computed distance.
pub fn project_with_distance(report: &Report, caps: Capabilities, distance_m: f64) -> ReportView {
    let mut view = project(report, caps);
    view.distance_m = Some((distance_m * 10.0).round() / 10.0);
    view
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: i64,
    pub report_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub content: String,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
}

/// Hides the author of an anonymous comment from everyone except the author
/// themselves and moderators.
pub fn project_comment(comment: &Comment, viewer: &User) -> CommentView {
    let privileged = viewer.role.can_moderate() || viewer.id == comment.user_id;
    CommentView {
        id: comment.id,
        report_id: comment.report_id,
        user_id: if comment.is_anonymous && !privileged {
            None
        } else {
            Some(comment.user_id)
        },
        content: comment.content.clone(),
        is_anonymous: comment.is_anonymous,
        created_at: comment.created_at,
    }
}

/// Convenience for handlers: capabilities straight from viewer + report.
pub fn view_for(report: &Report, viewer: &User) -> ReportView {
    project(report, Capabilities::of(viewer, report))
}
