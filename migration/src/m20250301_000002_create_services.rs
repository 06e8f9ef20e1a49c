use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Service::Table)
                    .if_not_exists()
                    .col(
                        uuid(Service::Id)
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(string(Service::Title).not_null())
                    .col(string_null(Service::TitleAr))
                    .col(text(Service::Description).not_null())
                    .col(text_null(Service::DescriptionAr))
                    .col(string(Service::Icon).not_null().default("Briefcase"))
                    .col(string_null(Service::ImageUrl))
                    .col(double_null(Service::Price))
                    .col(boolean(Service::IsActive).not_null().default(true))
                    .col(integer(Service::SortOrder).not_null().default(0))
                    .col(
                        timestamp_with_time_zone(Service::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Service::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Seed the starter catalog
        let insert = Query::insert()
            .into_table(Service::Table)
            .columns([
                Service::Title,
                Service::TitleAr,
                Service::Description,
                Service::Icon,
                Service::SortOrder,
            ])
            .values_panic(["Flight Booking".into(), "حجز الطيران".into(), "Domestic and international flights at competitive fares.".into(), "Plane".into(), 0.into()])
            .values_panic(["Hotel Reservations".into(), "حجز الفنادق".into(), "Hand-picked hotels for every budget.".into(), "Hotel".into(), 1.into()])
            .values_panic(["Umrah & Hajj".into(), "العمرة والحج".into(), "Complete pilgrimage packages with guidance.".into(), "Moon".into(), 2.into()])
            .values_panic(["Study Abroad".into(), "الدراسة في الخارج".into(), "Admissions, visas and travel for students.".into(), "GraduationCap".into(), 3.into()])
            .values_panic(["Business Travel".into(), "سفر الأعمال".into(), "Corporate trips arranged end to end.".into(), "Briefcase".into(), 4.into()])
            .values_panic(["Honeymoon Packages".into(), "رحلات شهر العسل".into(), "Romantic getaways to the best destinations.".into(), "Heart".into(), 5.into()])
            .values_panic(["Tour Packages".into(), "الباقات السياحية".into(), "Group and private tours with local guides.".into(), "Package".into(), 6.into()])
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Service::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Service {
    #[sea_orm(iden = "services")]
    Table,
    Id,
    Title,
    TitleAr,
    Description,
    DescriptionAr,
    Icon,
    ImageUrl,
    Price,
    IsActive,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}
