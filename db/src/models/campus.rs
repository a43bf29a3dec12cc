//! Campus entity. A campus is the tenant boundary: every report, user and
//! query is scoped to exactly one. Treated as a lookup collaborator; the only
//! statistic it carries is the moderator head-count used to gate registration.

use chrono::{DateTime, Utc};
use rand::Rng;
use sea_orm::ActiveValue::Set;
use sea_orm::QueryFilter;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "campuses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,
    pub join_code: String,
    pub moderator_count: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("No RelationDef implemented")
    }
}

impl ActiveModelBehavior for ActiveModel {}

const JOIN_CODE_LEN: usize = 8;
const JOIN_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

fn generate_join_code() -> String {
    let mut rng = rand::thread_rng();
    (0..JOIN_CODE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..JOIN_CODE_ALPHABET.len());
            JOIN_CODE_ALPHABET[idx] as char
        })
        .collect()
}

impl Model {
    pub async fn create(db: &DbConn, name: &str) -> Result<Model, DbErr> {
        let now = Utc::now();
        ActiveModel {
            name: Set(name.to_owned()),
            join_code: Set(generate_join_code()),
            moderator_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn find_by_join_code(db: &DbConn, join_code: &str) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::JoinCode.eq(join_code.to_uppercase()))
            .one(db)
            .await
    }

    pub(crate) async fn bump_moderator_count(db: &DbConn, campus_id: i64) -> Result<(), DbErr> {
        Entity::update_many()
            .col_expr(
                Column::ModeratorCount,
                Expr::col(Column::ModeratorCount).add(1),
            )
            .filter(Column::Id.eq(campus_id))
            .exec(db)
            .await
            .map(|_| ())
    }
}
