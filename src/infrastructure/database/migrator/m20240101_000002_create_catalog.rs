//! Create catalog tables
//!
//! Branches, the cars stationed at them, insurance options and accessories.
//! Prices are stored in cents.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Locations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Locations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Locations::City).string().not_null())
                    .col(ColumnDef::new(Locations::BranchName).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Cars::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cars::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cars::LocationId).integer().not_null())
                    .col(ColumnDef::new(Cars::Model).string().not_null())
                    .col(ColumnDef::new(Cars::DailyPriceCents).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cars_location")
                            .from(Cars::Table, Cars::LocationId)
                            .to(Locations::Table, Locations::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cars_location")
                    .table(Cars::Table)
                    .col(Cars::LocationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InsuranceOptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InsuranceOptions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InsuranceOptions::Name).string().not_null())
                    .col(
                        ColumnDef::new(InsuranceOptions::PricePerDayCents)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Accessories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accessories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Accessories::Name).string().not_null())
                    .col(
                        ColumnDef::new(Accessories::PriceFlatCents)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Accessories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InsuranceOptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cars::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Locations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Locations {
    Table,
    Id,
    City,
    BranchName,
}

#[derive(Iden)]
pub enum Cars {
    Table,
    Id,
    LocationId,
    Model,
    DailyPriceCents,
}

#[derive(Iden)]
pub enum InsuranceOptions {
    Table,
    Id,
    Name,
    PricePerDayCents,
}

#[derive(Iden)]
pub enum Accessories {
    Table,
    Id,
    Name,
    PriceFlatCents,
}
