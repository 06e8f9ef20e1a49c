use sea_orm_migration::{prelude::*, schema::*};

use super::m20250301_000001_create_users::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(uuid(Booking::Id).primary_key())
                    .col(string(Booking::Name).not_null())
                    .col(string(Booking::Email).not_null())
                    .col(string(Booking::Phone).not_null())
                    .col(string(Booking::Passport).not_null())
                    .col(json_binary(Booking::Services).not_null())
                    .col(string(Booking::Destination).not_null())
                    .col(date(Booking::StartDate).not_null())
                    .col(date_null(Booking::EndDate))
                    .col(text_null(Booking::Notes))
                    .col(string_len(Booking::PaymentMethod, 20).not_null())
                    .col(
                        string_len(Booking::PaymentStatus, 32)
                            .not_null()
                            .default("pending_confirmation"),
                    )
                    .col(string_null(Booking::PaymentProofUrl))
                    .col(string_len_null(Booking::CardLastFour, 4))
                    .col(uuid_null(Booking::UserId))
                    .col(
                        timestamp_with_time_zone(Booking::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Booking::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_user")
                            .from(Booking::Table, Booking::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_created_at")
                    .table(Booking::Table)
                    .col(Booking::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Booking::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Booking {
    #[sea_orm(iden = "bookings")]
    Table,
    Id,
    Name,
    Email,
    Phone,
    Passport,
    Services,
    Destination,
    StartDate,
    EndDate,
    Notes,
    PaymentMethod,
    PaymentStatus,
    PaymentProofUrl,
    CardLastFour,
    UserId,
    CreatedAt,
    UpdatedAt,
}
