use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202508010003_create_reports"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("reports"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Alias::new("reporter_id")).big_integer().not_null())
                    .col(ColumnDef::new(Alias::new("campus_id")).big_integer().not_null())
                    .col(ColumnDef::new(Alias::new("category")).string().not_null())
                    .col(ColumnDef::new(Alias::new("severity")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("title")).string().not_null())
                    .col(ColumnDef::new(Alias::new("description")).text().not_null())
                    // GeoJSON Point semantics: longitude first on the wire, stored flat here.
                    .col(ColumnDef::new(Alias::new("longitude")).double().not_null())
                    .col(ColumnDef::new(Alias::new("latitude")).double().not_null())
                    .col(ColumnDef::new(Alias::new("media_urls")).json().not_null())
                    .col(ColumnDef::new(Alias::new("is_anonymous")).boolean().not_null().default(false))
                    .col(ColumnDef::new(Alias::new("status")).string().not_null().default("reported"))
                    .col(ColumnDef::new(Alias::new("moderator_notes")).text())
                    .col(ColumnDef::new(Alias::new("assigned_to")).big_integer())
                    .col(ColumnDef::new(Alias::new("resolved_by")).big_integer())
                    .col(ColumnDef::new(Alias::new("resolved_at")).timestamp())
                    .col(ColumnDef::new(Alias::new("resolution_details")).text())
                    .col(ColumnDef::new(Alias::new("confirm_count")).integer().not_null().default(0))
                    .col(ColumnDef::new(Alias::new("dispute_count")).integer().not_null().default(0))
                    .col(ColumnDef::new(Alias::new("comments_count")).integer().not_null().default(0))
                    .col(ColumnDef::new(Alias::new("views_count")).integer().not_null().default(0))
                    .col(ColumnDef::new(Alias::new("spam_reports")).json().not_null())
                    .col(ColumnDef::new(Alias::new("is_spam")).boolean().not_null().default(false))
                    .col(ColumnDef::new(Alias::new("is_edited")).boolean().not_null().default(false))
                    .col(ColumnDef::new(Alias::new("edited_at")).timestamp())
                    .col(ColumnDef::new(Alias::new("edit_history")).json().not_null())
                    .col(ColumnDef::new(Alias::new("created_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(Alias::new("updated_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reports_reporter")
                            .from(Alias::new("reports"), Alias::new("reporter_id"))
                            .to(Alias::new("users"), Alias::new("id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reports_campus")
                            .from(Alias::new("reports"), Alias::new("campus_id"))
                            .to(Alias::new("campuses"), Alias::new("id")),
                    )
                    .to_owned(),
            )
            .await?;

        // Campus-scoped listing and the nearby bounding-box prefilter both lean
        // on these.
        manager
            .create_index(
                Index::create()
                    .name("idx_reports_campus_status")
                    .table(Alias::new("reports"))
                    .col(Alias::new("campus_id"))
                    .col(Alias::new("status"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reports_campus_lon_lat")
                    .table(Alias::new("reports"))
                    .col(Alias::new("campus_id"))
                    .col(Alias::new("longitude"))
                    .col(Alias::new("latitude"))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("reports")).to_owned())
            .await
    }
}
