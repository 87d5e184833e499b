//! `SeaORM` Entity for bank_accounts table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "bank_accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub business_id: i32,
    #[sea_orm(column_type = "String(StringLen::N(255))")]
    pub bank_name: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(255))")]
    pub account_name: Option<String>,
    #[sea_orm(unique, column_type = "String(StringLen::N(100))")]
    pub account_number: Option<String>,
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
    #[sea_orm(has_many = "super::bank_transactions::Entity")]
    BankTransactions,
    #[sea_orm(has_many = "super::bank_reconciliations::Entity")]
    BankReconciliations,
}

impl Related<super::businesses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Businesses.def()
    }
}

impl Related<super::bank_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankTransactions.def()
    }
}

impl Related<super::bank_reconciliations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankReconciliations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
