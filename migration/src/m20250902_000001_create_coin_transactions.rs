use sea_orm_migration::prelude::*;

/// Coin transactions (append-only ledger)
#[derive(DeriveIden)]
enum CoinTransactions {
    Table,
    Id,
    UserId,
    Kind,
    Category,
    Amount,
    Description,
    Metadata,
    ReferenceId,
    ReferenceType,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 金币账本表。余额永远由 SUM(amount) 推导，本表只追加不修改。
/// kind 使用字符串存储（不建 Postgres 枚举类型），以便同一套迁移同时
/// 跑在 Postgres 与测试用的 SQLite 上。
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CoinTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CoinTransactions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CoinTransactions::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CoinTransactions::Kind)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CoinTransactions::Category)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CoinTransactions::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CoinTransactions::Description).text().null())
                    .col(ColumnDef::new(CoinTransactions::Metadata).json().null())
                    .col(
                        ColumnDef::new(CoinTransactions::ReferenceId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CoinTransactions::ReferenceType)
                            .string_len(32)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CoinTransactions::CreatedAt)
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
                    .name("idx_coin_transactions_user_created")
                    .table(CoinTransactions::Table)
                    .col(CoinTransactions::UserId)
                    .col(CoinTransactions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_coin_transactions_user_kind")
                    .table(CoinTransactions::Table)
                    .col(CoinTransactions::UserId)
                    .col(CoinTransactions::Kind)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CoinTransactions::Table).to_owned())
            .await
    }
}
