//! Finance tracker schema.
//!
//! - `users`: one row per email, the profile kept as JSON text
//! - `periods`: month buckets with their running totals
//! - `period_transactions`: the entries of each bucket, in insertion order

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    Email,
    UserInfo,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Periods {
    Table,
    UserEmail,
    Name,
    Position,
    Income,
    Expenses,
    Savings,
}

#[derive(Iden)]
enum PeriodTransactions {
    Table,
    Id,
    UserEmail,
    PeriodName,
    Position,
    Kind,
    AmountMinor,
    Date,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::UserInfo)
                            .text()
                            .not_null()
                            .default("null"),
                    )
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Periods::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Periods::UserEmail).string().not_null())
                    .col(ColumnDef::new(Periods::Name).string().not_null())
                    .col(ColumnDef::new(Periods::Position).integer().not_null())
                    .col(ColumnDef::new(Periods::Income).big_integer().not_null())
                    .col(ColumnDef::new(Periods::Expenses).big_integer().not_null())
                    .col(ColumnDef::new(Periods::Savings).big_integer().not_null())
                    .primary_key(
                        Index::create()
                            .name("pk-periods")
                            .col(Periods::UserEmail)
                            .col(Periods::Name),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-periods-user_email")
                            .from(Periods::Table, Periods::UserEmail)
                            .to(Users::Table, Users::Email)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PeriodTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PeriodTransactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PeriodTransactions::UserEmail)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PeriodTransactions::PeriodName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PeriodTransactions::Position)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PeriodTransactions::Kind).string().not_null())
                    .col(
                        ColumnDef::new(PeriodTransactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PeriodTransactions::Date)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-period_transactions-user_email")
                            .from(PeriodTransactions::Table, PeriodTransactions::UserEmail)
                            .to(Users::Table, Users::Email)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-period_transactions-period")
                            .from(
                                PeriodTransactions::Table,
                                (PeriodTransactions::UserEmail, PeriodTransactions::PeriodName),
                            )
                            .to(Periods::Table, (Periods::UserEmail, Periods::Name))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-period_transactions-user_email-period_name")
                    .table(PeriodTransactions::Table)
                    .col(PeriodTransactions::UserEmail)
                    .col(PeriodTransactions::PeriodName)
                    .col(PeriodTransactions::Position)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PeriodTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Periods::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
