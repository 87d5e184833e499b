//! `SeaORM` Entity for tax_records table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tax filings.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "tax_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub business_id: i32,
    pub period_start: Date,
    pub period_end: Date,
    #[sea_orm(column_type = "String(StringLen::N(50))")]
    pub tax_type: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount_due: Option<Decimal>,
    pub filed: Option<bool>,
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
