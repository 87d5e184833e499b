//! `SeaORM` Entity for bank_reconciliations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "bank_reconciliations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub bank_account_id: i32,
    pub statement_date: Date,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub statement_balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub reconciled_balance: Option<Decimal>,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bank_accounts::Entity",
        from = "Column::BankAccountId",
        to = "super::bank_accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    BankAccounts,
}

impl Related<super::bank_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankAccounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
