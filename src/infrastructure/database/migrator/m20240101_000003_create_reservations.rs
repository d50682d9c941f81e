//! Create reservations and the reservation/accessory junction

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users::Users;
use super::m20240101_000002_create_catalog::{Accessories, Cars, InsuranceOptions, Locations};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::UserId).integer().not_null())
                    .col(ColumnDef::new(Reservations::CarId).integer().not_null())
                    .col(ColumnDef::new(Reservations::LocationId).integer().not_null())
                    .col(ColumnDef::new(Reservations::InsuranceId).integer())
                    .col(ColumnDef::new(Reservations::StartDate).date().not_null())
                    .col(ColumnDef::new(Reservations::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(Reservations::TotalPriceCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_user")
                            .from(Reservations::Table, Reservations::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_car")
                            .from(Reservations::Table, Reservations::CarId)
                            .to(Cars::Table, Cars::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_location")
                            .from(Reservations::Table, Reservations::LocationId)
                            .to(Locations::Table, Locations::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_insurance")
                            .from(Reservations::Table, Reservations::InsuranceId)
                            .to(InsuranceOptions::Table, InsuranceOptions::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_user")
                    .table(Reservations::Table)
                    .col(Reservations::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReservationAccessories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReservationAccessories::ReservationId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReservationAccessories::AccessoryId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ReservationAccessories::ReservationId)
                            .col(ReservationAccessories::AccessoryId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservation_accessories_reservation")
                            .from(
                                ReservationAccessories::Table,
                                ReservationAccessories::ReservationId,
                            )
                            .to(Reservations::Table, Reservations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservation_accessories_accessory")
                            .from(
                                ReservationAccessories::Table,
                                ReservationAccessories::AccessoryId,
                            )
                            .to(Accessories::Table, Accessories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReservationAccessories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Reservations {
    Table,
    Id,
    UserId,
    CarId,
    LocationId,
    InsuranceId,
    StartDate,
    EndDate,
    TotalPriceCents,
    CreatedAt,
}

#[derive(Iden)]
pub enum ReservationAccessories {
    Table,
    ReservationId,
    AccessoryId,
}
