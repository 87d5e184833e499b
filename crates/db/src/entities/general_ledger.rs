//! `SeaORM` Entity for general_ledger table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ledger rows; `reference_type`/`reference_id` point at the source document.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "general_ledger")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub business_id: i32,
    pub transaction_date: Date,
    #[sea_orm(column_type = "Text")]
    pub description: Option<String>,
    pub account_id: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub debit: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub credit: Option<Decimal>,
    pub reference_id: Option<i32>,
    #[sea_orm(column_type = "String(StringLen::N(50))")]
    pub reference_type: Option<String>,
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
    #[sea_orm(
        belongs_to = "super::chart_of_accounts::Entity",
        from = "Column::AccountId",
        to = "super::chart_of_accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    ChartOfAccounts,
}

impl Related<super::businesses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Businesses.def()
    }
}

impl Related<super::chart_of_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChartOfAccounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
