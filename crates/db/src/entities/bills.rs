//! `SeaORM` Entity for bills table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase documents.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "bills")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub business_id: i32,
    #[sea_orm(unique, column_type = "String(StringLen::N(100))")]
    pub bill_number: String,
    pub date: Date,
    pub due_date: Date,
    pub supplier_id: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub taxes: Option<Decimal>,
    #[sea_orm(column_type = "String(StringLen::N(50))")]
    pub payment_status: Option<String>,
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
        belongs_to = "super::suppliers::Entity",
        from = "Column::SupplierId",
        to = "super::suppliers::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Suppliers,
    #[sea_orm(has_many = "super::bill_items::Entity")]
    BillItems,
    #[sea_orm(has_many = "super::payments_made::Entity")]
    PaymentsMade,
    #[sea_orm(has_many = "super::debit_notes::Entity")]
    DebitNotes,
}

impl Related<super::businesses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Businesses.def()
    }
}

impl Related<super::suppliers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Suppliers.def()
    }
}

impl Related<super::bill_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BillItems.def()
    }
}

impl Related<super::payments_made::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentsMade.def()
    }
}

impl Related<super::debit_notes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DebitNotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
