//! `SeaORM` Entity for chart_of_accounts table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "chart_of_accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub business_id: i32,
    #[sea_orm(column_type = "String(StringLen::N(255))")]
    pub account_name: String,
    #[sea_orm(column_type = "String(StringLen::N(50))")]
    pub account_type: String,
    #[sea_orm(column_type = "String(StringLen::N(50))")]
    pub account_number: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub description: Option<String>,
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
    #[sea_orm(has_many = "super::general_ledger::Entity")]
    GeneralLedger,
}

impl Related<super::businesses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Businesses.def()
    }
}

impl Related<super::general_ledger::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GeneralLedger.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
