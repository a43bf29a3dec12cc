//! Per-user credibility vote on a report. One row per (report, user), enforced
//! by a unique index; the aggregate tallies live on the report row itself and
//! are kept in step transactionally (see `report::Model::add_vote`).

use chrono::{DateTime, Utc};
use sea_orm::QueryFilter;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "report_votes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub report_id: i64,
    pub user_id: i64,

    pub vote: VoteType,

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
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum VoteType {
    #[sea_orm(string_value = "confirm")]
    Confirm,
    #[sea_orm(string_value = "dispute")]
    Dispute,
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
    pub async fn find_by_report_and_user<C: ConnectionTrait>(
        db: &C,
        report_id: i64,
        user_id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::ReportId.eq(report_id))
            .filter(Column::UserId.eq(user_id))
            .one(db)
            .await
    }
}
