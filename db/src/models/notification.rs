//! In-app notifications. Delivery is strictly best-effort: a failed insert is
//! logged and swallowed so it can never fail the operation that triggered it.

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub user_id: i64,
    pub report_id: Option<i64>,

    pub kind: Kind,
    pub title: String,
    pub message: String,
    pub priority: Priority,

    pub is_read: bool,
    pub created_at: DateTime<Utc>,
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
pub enum Kind {
    #[sea_orm(string_value = "report_verified")]
    ReportVerified,
    #[sea_orm(string_value = "report_invalid")]
    ReportInvalid,
    #[sea_orm(string_value = "report_resolved")]
    ReportResolved,
    #[sea_orm(string_value = "report_deleted")]
    ReportDeleted,
    #[sea_orm(string_value = "report_spam")]
    ReportSpam,
    #[sea_orm(string_value = "new_comment")]
    NewComment,
    #[sea_orm(string_value = "account_banned")]
    AccountBanned,
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
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Priority {
    #[sea_orm(string_value = "low")]
    Low,
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "high")]
    High,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Inserts a notification, logging (not propagating) any failure.
    pub async fn notify(
        db: &DbConn,
        user_id: i64,
        report_id: Option<i64>,
        kind: Kind,
        title: &str,
        message: &str,
        priority: Priority,
    ) {
        let result = ActiveModel {
            user_id: Set(user_id),
            report_id: Set(report_id),
            kind: Set(kind),
            title: Set(title.to_owned()),
            message: Set(message.to_owned()),
            priority: Set(priority),
            is_read: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await;

        if let Err(e) = result {
            tracing::warn!(user_id, ?kind, "failed to insert notification: {e}");
        }
    }

    /// Newest first; unread only when `unread_only` is set.
    pub async fn find_for_user(
        db: &DbConn,
        user_id: i64,
        unread_only: bool,
    ) -> Result<Vec<Model>, DbErr> {
        let mut query = Entity::find().filter(Column::UserId.eq(user_id));
        if unread_only {
            query = query.filter(Column::IsRead.eq(false));
        }
        query.order_by_desc(Column::CreatedAt).all(db).await
    }

    /// Marks one of the user's notifications read. Returns false when the
    /// notification does not exist or belongs to someone else.
    pub async fn mark_read(db: &DbConn, id: i64, user_id: i64) -> Result<bool, DbErr> {
        let Some(notification) = Entity::find_by_id(id)
            .filter(Column::UserId.eq(user_id))
            .one(db)
            .await?
        else {
            return Ok(false);
        };

        let mut active: ActiveModel = notification.into();
        active.is_read = Set(true);
        active.update(db).await?;
        Ok(true)
    }
}
