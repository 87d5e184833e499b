//! `SeaORM` Entity for loans table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Loans and other liabilities.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "loans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub business_id: i32,
    #[sea_orm(column_type = "String(StringLen::N(255))")]
    pub creditor_name: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub original_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub interest_rate: Option<Decimal>,
    #[sea_orm(column_type = "JsonBinary")]
    pub payment_schedule: Option<Json>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub outstanding_balance: Decimal,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::businesses::Entity",
        from = "Column::BusinessId",
        to = "super::businesses::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Businesses,
}

impl Related<super::businesses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Businesses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
