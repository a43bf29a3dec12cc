//! Comment entity. Comments hang off a report; creating one bumps the
//! report's denormalized comment counter in the same transaction and fires a
//! best-effort notification at the reporter.

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait};
use serde::Serialize;

use crate::models::{notification, report};
use crate::moderation::{FieldViolation, ModerationError};

pub const CONTENT_MIN: usize = 1;
pub const CONTENT_MAX: usize = 500;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub report_id: i64,
    pub user_id: i64,

    pub content: String,
    pub is_anonymous: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::report::Entity",
        from = "Column::ReportId",
        to = "super::report::Column::Id"
    )]
    Report,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Report.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Adds a comment and bumps the report's comment counter atomically.
    ///
    /// The reporter is notified afterwards unless they wrote the comment
    /// themselves; notification failure never fails the comment.
    pub async fn create(
        db: &DbConn,
        report_id: i64,
        user_id: i64,
        content: &str,
        is_anonymous: bool,
    ) -> Result<Model, ModerationError> {
        let trimmed = content.trim();
        let len = trimmed.chars().count();
        if !(CONTENT_MIN..=CONTENT_MAX).contains(&len) {
            return Err(ModerationError::Validation(vec![FieldViolation::new(
                "content",
                format!("content must be {CONTENT_MIN}-{CONTENT_MAX} characters"),
            )]));
        }

        let txn = db.begin().await?;

        let report = report::Entity::find_by_id(report_id)
            .one(&txn)
            .await?
            .ok_or(ModerationError::NotFound("report"))?;

        let now = Utc::now();
        let comment = ActiveModel {
            report_id: Set(report_id),
            user_id: Set(user_id),
            content: Set(trimmed.to_owned()),
            is_anonymous: Set(is_anonymous),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        report::Entity::update_many()
            .col_expr(
                report::Column::CommentsCount,
                Expr::col(report::Column::CommentsCount).add(1),
            )
            .filter(report::Column::Id.eq(report_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        if report.reporter_id != user_id {
            notification::Model::notify(
                db,
                report.reporter_id,
                Some(report_id),
                notification::Kind::NewComment,
                "New comment on your report",
                &format!("Someone commented on your report '{}'", report.title),
                notification::Priority::Low,
            )
            .await;
        }

        Ok(comment)
    }

    /// Comments for a report, oldest first.
    pub async fn list_for_report(db: &DbConn, report_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::ReportId.eq(report_id))
            .order_by_asc(Column::CreatedAt)
            .all(db)
            .await
    }
}
