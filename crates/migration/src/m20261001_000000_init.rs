//! Initial schema migration.
//!
//! - `users`: authentication and denormalized MANA/CASH balances
//! - `txns`: append-only ledger of value transfers between parties

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Password,
    Balance,
    CashBalance,
    CreatedAt,
}

#[derive(Iden)]
enum Txns {
    Table,
    Id,
    Category,
    FromType,
    FromId,
    ToType,
    ToId,
    Amount,
    Token,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(
                        ColumnDef::new(Users::Balance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Users::CashBalance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Txns
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Txns::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Txns::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Txns::Category).string().not_null())
                    .col(ColumnDef::new(Txns::FromType).string().not_null())
                    .col(ColumnDef::new(Txns::FromId).string().not_null())
                    .col(ColumnDef::new(Txns::ToType).string().not_null())
                    .col(ColumnDef::new(Txns::ToId).string().not_null())
                    .col(ColumnDef::new(Txns::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Txns::Token).string().not_null())
                    .col(ColumnDef::new(Txns::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-txns-from")
                    .table(Txns::Table)
                    .col(Txns::FromType)
                    .col(Txns::FromId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-txns-to")
                    .table(Txns::Table)
                    .col(Txns::ToType)
                    .col(Txns::ToId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Txns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
