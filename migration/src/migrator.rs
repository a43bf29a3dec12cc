use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202508010001_create_campuses::Migration),
            Box::new(migrations::m202508010002_create_users::Migration),
            Box::new(migrations::m202508010003_create_reports::Migration),
            Box::new(migrations::m202508010004_create_report_votes::Migration),
            Box::new(migrations::m202508010005_create_comments::Migration),
            Box::new(migrations::m202508010006_create_audit_logs::Migration),
            Box::new(migrations::m202508010007_create_notifications::Migration),
        ]
    }
}
