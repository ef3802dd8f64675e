use sea_orm_migration::prelude::*;

/// Store purchases (saga state machine for multi-step purchases)
#[derive(DeriveIden)]
enum Purchases {
    Table,
    Id,
    UserId,
    ItemKey,
    Amount,
    State,
    ReferenceCode,
    ArtifactCode,
    FailureReason,
    CreatedAt,
    UpdatedAt,
}

/// One-time cosmetic unlocks granted by the prize wheel
#[derive(DeriveIden)]
enum Unlocks {
    Table,
    Id,
    UserId,
    UnlockKey,
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
                    .table(Purchases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Purchases::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Purchases::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Purchases::ItemKey).string_len(64).not_null())
                    .col(ColumnDef::new(Purchases::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Purchases::State).string_len(24).not_null())
                    .col(
                        ColumnDef::new(Purchases::ReferenceCode)
                            .string_len(40)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Purchases::ArtifactCode).string_len(40).null())
                    .col(ColumnDef::new(Purchases::FailureReason).text().null())
                    .col(
                        ColumnDef::new(Purchases::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp())
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Purchases::UpdatedAt)
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
                    .name("idx_purchases_user_created")
                    .table(Purchases::Table)
                    .col(Purchases::UserId)
                    .col(Purchases::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Unlocks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Unlocks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Unlocks::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Unlocks::UnlockKey).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Unlocks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // insert-or-ignore on (user_id, unlock_key) depends on this index
        manager
            .create_index(
                Index::create()
                    .name("idx_unlocks_user_key")
                    .table(Unlocks::Table)
                    .col(Unlocks::UserId)
                    .col(Unlocks::UnlockKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Unlocks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Purchases::Table).to_owned())
            .await
    }
}
