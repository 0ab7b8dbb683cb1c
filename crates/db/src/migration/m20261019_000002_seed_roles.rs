//! Seeds the built-in staff roles.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(SEED_ROLES_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DELETE FROM roles WHERE name IN ('Admin', 'Staff');")
            .await?;
        Ok(())
    }
}

const SEED_ROLES_SQL: &str = r"
INSERT INTO roles (name) VALUES ('Admin'), ('Staff')
ON CONFLICT (name) DO NOTHING;
";
