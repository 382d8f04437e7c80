use sea_orm_migration::prelude::*;

use crate::OPEN_SESSION_INDEX;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202510190003_create_attendance_sessions"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("attendance_sessions"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("user_id")).big_integer().not_null())
                    .col(ColumnDef::new(Alias::new("slot_id")).big_integer().not_null())
                    .col(ColumnDef::new(Alias::new("check_in_at")).timestamp().not_null())
                    .col(ColumnDef::new(Alias::new("check_out_at")).timestamp().null())
                    .col(ColumnDef::new(Alias::new("calendar_date")).date().not_null())
                    .col(ColumnDef::new(Alias::new("check_in_lat")).double().null())
                    .col(ColumnDef::new(Alias::new("check_in_lng")).double().null())
                    .col(ColumnDef::new(Alias::new("check_out_lat")).double().null())
                    .col(ColumnDef::new(Alias::new("check_out_lng")).double().null())
                    .col(ColumnDef::new(Alias::new("check_out_action")).string().null())
                    .col(
                        ColumnDef::new(Alias::new("client_reported_at"))
                            .timestamp()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_att_sess_user")
                            .from(Alias::new("attendance_sessions"), Alias::new("user_id"))
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_att_sess_slot")
                            .from(Alias::new("attendance_sessions"), Alias::new("slot_id"))
                            .to(Alias::new("slots"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_attendance_user_check_in")
                    .table(Alias::new("attendance_sessions"))
                    .col(Alias::new("user_id"))
                    .col(Alias::new("check_in_at"))
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // One open session per user. Partial indexes are not expressible through
        // the schema builder, so this one is raw SQL (valid on SQLite and Postgres).
        manager
            .get_connection()
            .execute_unprepared(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS {OPEN_SESSION_INDEX} \
                 ON attendance_sessions (user_id) WHERE check_out_at IS NULL"
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(Alias::new("attendance_sessions"))
                    .to_owned(),
            )
            .await
    }
}
