use sea_orm_migration::prelude::*;

/// Entitlement packs (购买的加次卡: 每日额外 spin/vote 次数)
#[derive(DeriveIden)]
enum EntitlementPacks {
    Table,
    Id,
    UserId,
    PackType,
    UnitsPerDay,
    DurationDays,
    GrantedAt,
    ExpiresAt,
    Status,
    CreatedAt,
    UpdatedAt,
}

/// Activity events (已发生的 spin/vote 动作, 用于按自然日统计配额消耗)
#[derive(DeriveIden)]
enum ActivityEvents {
    Table,
    Id,
    UserId,
    Action,
    Detail,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EntitlementPacks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EntitlementPacks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EntitlementPacks::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EntitlementPacks::PackType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EntitlementPacks::UnitsPerDay)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EntitlementPacks::DurationDays)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EntitlementPacks::GrantedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EntitlementPacks::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EntitlementPacks::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(EntitlementPacks::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp())
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EntitlementPacks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp())
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_entitlement_packs_user_status")
                    .table(EntitlementPacks::Table)
                    .col(EntitlementPacks::UserId)
                    .col(EntitlementPacks::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ActivityEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActivityEvents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ActivityEvents::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ActivityEvents::Action)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ActivityEvents::Detail).string_len(128).null())
                    .col(
                        ColumnDef::new(ActivityEvents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_events_user_action_created")
                    .table(ActivityEvents::Table)
                    .col(ActivityEvents::UserId)
                    .col(ActivityEvents::Action)
                    .col(ActivityEvents::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityEvents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EntitlementPacks::Table).to_owned())
            .await
    }
}
