use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Gallery::Table)
                    .if_not_exists()
                    .col(
                        uuid(Gallery::Id)
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(string(Gallery::Title).not_null())
                    .col(string_null(Gallery::TitleAr))
                    .col(text_null(Gallery::Description))
                    .col(text_null(Gallery::DescriptionAr))
                    .col(string(Gallery::ImageUrl).not_null())
                    .col(string_null(Gallery::Category))
                    .col(boolean(Gallery::IsActive).not_null().default(true))
                    .col(integer(Gallery::SortOrder).not_null().default(0))
                    .col(
                        timestamp_with_time_zone(Gallery::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Gallery::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Gallery::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Gallery {
    Table,
    Id,
    Title,
    TitleAr,
    Description,
    DescriptionAr,
    ImageUrl,
    Category,
    IsActive,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}
