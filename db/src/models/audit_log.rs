//! Append-only audit trail of privileged actions. Recording is best-effort:
//! an insert failure is logged and swallowed so auditing can never veto the
//! action it describes.

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryFilter, QueryOrder, QuerySelect};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub actor_id: i64,
    /// Machine name of the action, e.g. `verify_report`.
    pub action: String,
    pub entity_type: String,
    pub entity_id: i64,

    /// Free-form JSON context for the action (old/new values, reasons).
    #[sea_orm(column_type = "Json", nullable)]
    pub changes: Option<Json>,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("No RelationDef implemented")
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Appends one audit entry; failures are logged, never propagated.
    pub async fn record(
        db: &DbConn,
        actor_id: i64,
        action: &str,
        entity_type: &str,
        entity_id: i64,
        changes: Option<Json>,
    ) {
        let result = ActiveModel {
            actor_id: Set(actor_id),
            action: Set(action.to_owned()),
            entity_type: Set(entity_type.to_owned()),
            entity_id: Set(entity_id),
            changes: Set(changes),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await;

        if let Err(e) = result {
            tracing::warn!(actor_id, action, "failed to record audit entry: {e}");
        }
    }

    /// Newest entries across all actors.
    pub async fn find_recent(db: &DbConn, limit: u64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .order_by_desc(Column::CreatedAt)
            .limit(limit)
            .all(db)
            .await
    }

    /// Full trail for one entity, newest first.
    pub async fn find_for_entity(
        db: &DbConn,
        entity_type: &str,
        entity_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::EntityType.eq(entity_type))
            .filter(Column::EntityId.eq(entity_id))
            .order_by_desc(Column::CreatedAt)
            .all(db)
            .await
    }
}
