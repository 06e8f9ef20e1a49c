use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A customer booking. `services` holds the JSON array of
/// `{id, title}` snapshots captured at submission time.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub passport: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub services: Json,
    pub destination: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub notes: Option<String>,
    pub payment_method: String,
    pub payment_status: String,
    pub payment_proof_url: Option<String>,
    pub card_last_four: Option<String>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
