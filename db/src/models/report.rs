//! Report entity and its field-level invariants.
//!
//! A report is the unit of mutation for the whole moderation core: status
//! transitions, vote tallies and spam tracking are all fields on this row, and
//! every transition is written as a single UPDATE (or a short transaction when
//! a vote row must move with the tallies) so no reader observes a half-applied
//! transition.

use chrono::{DateTime, Duration, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{Condition, FromJsonQueryResult, QueryFilter, TransactionTrait};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;
use util::config;

use crate::geo::{self, BoundingBox};
use crate::models::report_vote::{self, VoteType};
use crate::moderation::{FieldViolation, ModerationError};

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 200;
pub const DESCRIPTION_MIN: usize = 3;
pub const DESCRIPTION_MAX: usize = 2000;
pub const MEDIA_URLS_MAX: usize = 10;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Immutable after creation.
    pub reporter_id: i64,
    /// Immutable after creation; scopes every query.
    pub campus_id: i64,

    pub category: Category,
    pub severity: i32,
    pub title: String,
    pub description: String,

    /// GeoJSON Point semantics: longitude first on the wire.
    pub longitude: f64,
    pub latitude: f64,

    #[sea_orm(column_type = "Json")]
    pub media_urls: MediaUrls,
    pub is_anonymous: bool,

    pub status: Status,

    /// Visible to moderation roles only (see `projection`).
    pub moderator_notes: Option<String>,
    /// A security-role user in the same campus.
    pub assigned_to: Option<i64>,
    pub resolved_by: Option<i64>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolution_details: Option<String>,

    // Denormalized engagement counters, bumped with atomic increments.
    // They can drift from their sources if rows are removed out-of-band.
    pub confirm_count: i32,
    pub dispute_count: i32,
    pub comments_count: i32,
    pub views_count: i32,

    /// Distinct users who flagged this report as spam.
    #[sea_orm(column_type = "Json")]
    pub spam_reports: SpamReporters,
    pub is_spam: bool,

    pub is_edited: bool,
    pub edited_at: Option<DateTime<Utc>>,
    #[sea_orm(column_type = "Json")]
    pub edit_history: EditHistory,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Category {
    #[sea_orm(string_value = "theft")]
    Theft,
    #[sea_orm(string_value = "assault")]
    Assault,
    #[sea_orm(string_value = "harassment")]
    Harassment,
    #[sea_orm(string_value = "vandalism")]
    Vandalism,
    #[sea_orm(string_value = "suspicious_activity")]
    SuspiciousActivity,
    #[sea_orm(string_value = "emergency")]
    Emergency,
    #[sea_orm(string_value = "fire")]
    Fire,
    #[sea_orm(string_value = "medical")]
    Medical,
    #[sea_orm(string_value = "other")]
    Other,
}

/// Lifecycle status. `reported` is initial; `resolved` is terminal and is
/// reachable from every other status in one guarded step.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Status {
    #[sea_orm(string_value = "reported")]
    Reported,
    #[sea_orm(string_value = "verified")]
    Verified,
    #[sea_orm(string_value = "invalid")]
    Invalid,
    #[sea_orm(string_value = "spam")]
    Spam,
    #[sea_orm(string_value = "resolved")]
    Resolved,
}

impl Status {
    /// No transition leads out of `resolved`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Resolved)
    }
}

/// Ordered list of external media references, stored as JSON.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct MediaUrls(pub Vec<String>);

/// Set of user ids who flagged the report as spam. Kept sorted-free but
/// duplicate-free; membership insertion is idempotent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct SpamReporters(pub Vec<i64>);

impl SpamReporters {
    pub fn contains(&self, user_id: i64) -> bool {
        self.0.contains(&user_id)
    }

    /// Returns false when the user was already present.
    pub fn insert(&mut self, user_id: i64) -> bool {
        if self.contains(user_id) {
            return false;
        }
        self.0.push(user_id);
        true
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Append-only log of pre-edit snapshots.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct EditHistory(pub Vec<EditSnapshot>);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditSnapshot {
    pub edited_at: DateTime<Utc>,
    /// Field values as they were before the edit was applied.
    pub changes: EditChanges,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditChanges {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub severity: i32,
    pub media_urls: Vec<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReporterId",
        to = "super::user::Column::Id"
    )]
    Reporter,

    #[sea_orm(
        belongs_to = "super::campus::Entity",
        from = "Column::CampusId",
        to = "super::campus::Column::Id"
    )]
    Campus,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reporter.def()
    }
}

impl Related<super::campus::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campus.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Input for `Model::create`.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub reporter_id: i64,
    pub campus_id: i64,
    pub category: Category,
    pub severity: i32,
    pub title: String,
    pub description: String,
    pub longitude: f64,
    pub latitude: f64,
    pub media_urls: Vec<String>,
    pub is_anonymous: bool,
}

/// Partial update applied through the time-limited owner edit path.
#[derive(Debug, Clone, Default)]
pub struct ReportEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub severity: Option<i32>,
    pub media_urls: Option<Vec<String>>,
}

impl ReportEdit {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.severity.is_none()
            && self.media_urls.is_none()
    }
}

/// Optional constraints on the nearby query. The engine itself accepts any
/// positive radius; the [100, 10000] m bound is the API layer's business.
#[derive(Debug, Clone, Default)]
pub struct NearbyFilter {
    pub category: Option<Category>,
    pub min_severity: Option<i32>,
    pub status: Option<Status>,
    pub since: Option<DateTime<Utc>>,
    /// Results carry no guaranteed ordering unless this is set.
    pub order_by_distance: bool,
    pub limit: Option<usize>,
}

fn check_title(title: &str, violations: &mut Vec<FieldViolation>) {
    let len = title.trim().chars().count();
    if !(TITLE_MIN..=TITLE_MAX).contains(&len) {
        violations.push(FieldViolation::new(
            "title",
            format!("title must be {TITLE_MIN}-{TITLE_MAX} characters"),
        ));
    }
}

fn check_description(description: &str, violations: &mut Vec<FieldViolation>) {
    let len = description.trim().chars().count();
    if !(DESCRIPTION_MIN..=DESCRIPTION_MAX).contains(&len) {
        violations.push(FieldViolation::new(
            "description",
            format!("description must be {DESCRIPTION_MIN}-{DESCRIPTION_MAX} characters"),
        ));
    }
}

fn check_severity(severity: i32, violations: &mut Vec<FieldViolation>) {
    if !(1..=5).contains(&severity) {
        violations.push(FieldViolation::new(
            "severity",
            "severity must be between 1 and 5",
        ));
    }
}

fn check_location(longitude: f64, latitude: f64, violations: &mut Vec<FieldViolation>) {
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        violations.push(FieldViolation::new(
            "location",
            "longitude must be a finite number in [-180, 180]",
        ));
    }
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        violations.push(FieldViolation::new(
            "location",
            "latitude must be a finite number in [-90, 90]",
        ));
    }
}

fn check_media_urls(media_urls: &[String], violations: &mut Vec<FieldViolation>) {
    if media_urls.len() > MEDIA_URLS_MAX {
        violations.push(FieldViolation::new(
            "media_urls",
            format!("at most {MEDIA_URLS_MAX} media urls are allowed"),
        ));
    }
    for raw in media_urls {
        if Url::parse(raw).is_err() {
            violations.push(FieldViolation::new(
                "media_urls",
                format!("'{raw}' is not a well-formed URL"),
            ));
        }
    }
}

fn validate_new(new: &NewReport) -> Result<(), ModerationError> {
    let mut violations = Vec::new();
    check_title(&new.title, &mut violations);
    check_description(&new.description, &mut violations);
    check_severity(new.severity, &mut violations);
    check_location(new.longitude, new.latitude, &mut violations);
    check_media_urls(&new.media_urls, &mut violations);

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ModerationError::Validation(violations))
    }
}

fn validate_edit(edit: &ReportEdit) -> Result<(), ModerationError> {
    let mut violations = Vec::new();
    if let Some(title) = &edit.title {
        check_title(title, &mut violations);
    }
    if let Some(description) = &edit.description {
        check_description(description, &mut violations);
    }
    if let Some(severity) = edit.severity {
        check_severity(severity, &mut violations);
    }
    if let Some(media_urls) = &edit.media_urls {
        check_media_urls(media_urls, &mut violations);
    }
    if edit.is_empty() {
        violations.push(FieldViolation::new(
            "fields",
            "at least one editable field must be provided",
        ));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ModerationError::Validation(violations))
    }
}

impl Model {
    /// Creates a report in status `reported` with all counters zeroed.
    ///
    /// Every invariant violation is collected and returned at once.
    pub async fn create(db: &DbConn, new: NewReport) -> Result<Model, ModerationError> {
        validate_new(&new)?;

        let now = Utc::now();
        let report = ActiveModel {
            reporter_id: Set(new.reporter_id),
            campus_id: Set(new.campus_id),
            category: Set(new.category),
            severity: Set(new.severity),
            title: Set(new.title.trim().to_owned()),
            description: Set(new.description.trim().to_owned()),
            longitude: Set(new.longitude),
            latitude: Set(new.latitude),
            media_urls: Set(MediaUrls(new.media_urls)),
            is_anonymous: Set(new.is_anonymous),
            status: Set(Status::Reported),
            moderator_notes: Set(None),
            assigned_to: Set(None),
            resolved_by: Set(None),
            resolved_at: Set(None),
            resolution_details: Set(None),
            confirm_count: Set(0),
            dispute_count: Set(0),
            comments_count: Set(0),
            views_count: Set(0),
            spam_reports: Set(SpamReporters::default()),
            is_spam: Set(false),
            is_edited: Set(false),
            edited_at: Set(None),
            edit_history: Set(EditHistory::default()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        Ok(report)
    }

    pub async fn find_by_id(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub fn net_votes(&self) -> i32 {
        self.confirm_count - self.dispute_count
    }

    /// Whether `editor_id` may still edit this report at `now`.
    ///
    /// Edits are owner-only, inside the configured window, and only while no
    /// moderator has acted (status still `reported`).
    pub fn edit_guard(&self, editor_id: i64, now: DateTime<Utc>) -> Result<(), ModerationError> {
        if self.reporter_id != editor_id {
            return Err(ModerationError::NotOwner);
        }
        if self.status != Status::Reported {
            return Err(ModerationError::InvalidTransition(format!(
                "report in status '{}' can no longer be edited",
                self.status
            )));
        }
        let window = Duration::minutes(config::report_edit_window_minutes());
        if now - self.created_at > window {
            return Err(ModerationError::EditWindowExpired);
        }
        Ok(())
    }

    /// Applies an owner edit, appending exactly one pre-edit snapshot to
    /// `edit_history` and bumping `updated_at`.
    pub async fn apply_edit(
        self,
        db: &DbConn,
        editor_id: i64,
        edit: ReportEdit,
    ) -> Result<Model, ModerationError> {
        let now = Utc::now();
        self.edit_guard(editor_id, now)?;
        validate_edit(&edit)?;

        let mut history = self.edit_history.clone();
        history.0.push(EditSnapshot {
            edited_at: now,
            changes: EditChanges {
                title: self.title.clone(),
                description: self.description.clone(),
                category: self.category,
                severity: self.severity,
                media_urls: self.media_urls.0.clone(),
            },
        });

        let mut active: ActiveModel = self.into();
        if let Some(title) = edit.title {
            active.title = Set(title.trim().to_owned());
        }
        if let Some(description) = edit.description {
            active.description = Set(description.trim().to_owned());
        }
        if let Some(category) = edit.category {
            active.category = Set(category);
        }
        if let Some(severity) = edit.severity {
            active.severity = Set(severity);
        }
        if let Some(media_urls) = edit.media_urls {
            active.media_urls = Set(MediaUrls(media_urls));
        }
        active.is_edited = Set(true);
        active.edited_at = Set(Some(now));
        active.edit_history = Set(history);
        active.updated_at = Set(now);

        Ok(active.update(db).await?)
    }

    /// Unconditional +1 on the view counter; every detail read counts, with
    /// no per-viewer dedup. Does not touch `updated_at`.
    pub async fn increment_views(db: &DbConn, id: i64) -> Result<(), DbErr> {
        Entity::update_many()
            .col_expr(Column::ViewsCount, Expr::col(Column::ViewsCount).add(1))
            .filter(Column::Id.eq(id))
            .exec(db)
            .await
            .map(|_| ())
    }

    /// Records or changes a user's vote.
    ///
    /// Re-casting the same vote is a no-op; casting the opposite vote swaps
    /// the two tallies and the stored vote in one transaction, so concurrent
    /// voters never interleave into inconsistent counts.
    pub async fn add_vote(
        db: &DbConn,
        report_id: i64,
        user_id: i64,
        vote: VoteType,
    ) -> Result<Model, ModerationError> {
        let txn = db.begin().await?;

        let report = Entity::find_by_id(report_id)
            .one(&txn)
            .await?
            .ok_or(ModerationError::NotFound("report"))?;

        let existing = report_vote::Model::find_by_report_and_user(&txn, report_id, user_id).await?;

        match existing {
            Some(current) if current.vote == vote => {
                // Idempotent: same vote again changes nothing.
                txn.commit().await?;
                return Ok(report);
            }
            Some(current) => {
                let now = Utc::now();
                let mut active: report_vote::ActiveModel = current.into();
                active.vote = Set(vote);
                active.updated_at = Set(now);
                active.update(&txn).await?;

                let (inc, dec) = match vote {
                    VoteType::Confirm => (Column::ConfirmCount, Column::DisputeCount),
                    VoteType::Dispute => (Column::DisputeCount, Column::ConfirmCount),
                };
                Entity::update_many()
                    .col_expr(inc, Expr::col(inc).add(1))
                    .col_expr(dec, Expr::col(dec).sub(1))
                    .filter(Column::Id.eq(report_id))
                    .exec(&txn)
                    .await?;
            }
            None => {
                let now = Utc::now();
                report_vote::ActiveModel {
                    report_id: Set(report_id),
                    user_id: Set(user_id),
                    vote: Set(vote),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;

                let inc = match vote {
                    VoteType::Confirm => Column::ConfirmCount,
                    VoteType::Dispute => Column::DisputeCount,
                };
                Entity::update_many()
                    .col_expr(inc, Expr::col(inc).add(1))
                    .filter(Column::Id.eq(report_id))
                    .exec(&txn)
                    .await?;
            }
        }

        txn.commit().await?;

        Entity::find_by_id(report_id)
            .one(db)
            .await?
            .ok_or(ModerationError::NotFound("report"))
    }

    /// Clears a user's vote if present; a no-op (not an error) otherwise.
    pub async fn remove_vote(
        db: &DbConn,
        report_id: i64,
        user_id: i64,
    ) -> Result<Model, ModerationError> {
        let txn = db.begin().await?;

        let report = Entity::find_by_id(report_id)
            .one(&txn)
            .await?
            .ok_or(ModerationError::NotFound("report"))?;

        let existing = report_vote::Model::find_by_report_and_user(&txn, report_id, user_id).await?;

        let Some(current) = existing else {
            txn.commit().await?;
            return Ok(report);
        };

        let dec = match current.vote {
            VoteType::Confirm => Column::ConfirmCount,
            VoteType::Dispute => Column::DisputeCount,
        };

        report_vote::Entity::delete_by_id(current.id)
            .exec(&txn)
            .await?;
        Entity::update_many()
            .col_expr(dec, Expr::col(dec).sub(1))
            .filter(Column::Id.eq(report_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        Entity::find_by_id(report_id)
            .one(db)
            .await?
            .ok_or(ModerationError::NotFound("report"))
    }

    /// Campus-scoped radius search.
    ///
    /// A bounding-box prefilter runs in SQL; survivors are checked against the
    /// exact great-circle distance. Reports from other campuses never appear,
    /// regardless of distance.
    pub async fn find_nearby(
        db: &DbConn,
        campus_id: i64,
        longitude: f64,
        latitude: f64,
        radius_m: f64,
        filter: &NearbyFilter,
    ) -> Result<Vec<(Model, f64)>, ModerationError> {
        let mut violations = Vec::new();
        check_location(longitude, latitude, &mut violations);
        if !radius_m.is_finite() || radius_m <= 0.0 {
            violations.push(FieldViolation::new("radius", "radius must be positive"));
        }
        if !violations.is_empty() {
            return Err(ModerationError::Validation(violations));
        }

        let bbox = BoundingBox::around(longitude, latitude, radius_m);
        let lon_condition = if bbox.crosses_antimeridian() {
            Condition::any()
                .add(Column::Longitude.gte(bbox.west))
                .add(Column::Longitude.lte(bbox.east))
        } else {
            Condition::all()
                .add(Column::Longitude.gte(bbox.west))
                .add(Column::Longitude.lte(bbox.east))
        };

        let mut condition = Condition::all()
            .add(Column::CampusId.eq(campus_id))
            .add(Column::Latitude.gte(bbox.south))
            .add(Column::Latitude.lte(bbox.north))
            .add(lon_condition);

        if let Some(category) = filter.category {
            condition = condition.add(Column::Category.eq(category));
        }
        if let Some(min_severity) = filter.min_severity {
            condition = condition.add(Column::Severity.gte(min_severity));
        }
        if let Some(status) = filter.status {
            condition = condition.add(Column::Status.eq(status));
        }
        if let Some(since) = filter.since {
            condition = condition.add(Column::CreatedAt.gte(since));
        }

        let rows = Entity::find().filter(condition).all(db).await?;

        let mut hits: Vec<(Model, f64)> = rows
            .into_iter()
            .filter_map(|r| {
                let d = geo::haversine_m(longitude, latitude, r.longitude, r.latitude);
                (d <= radius_m).then_some((r, d))
            })
            .collect();

        if filter.order_by_distance {
            hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        }
        if let Some(limit) = filter.limit {
            hits.truncate(limit);
        }

        Ok(hits)
    }
}
