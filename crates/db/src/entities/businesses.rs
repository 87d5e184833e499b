//! `SeaORM` Entity for businesses table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tenant root; every business-scoped table cascades from here.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "businesses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(255))")]
    pub name: String,
    #[sea_orm(column_type = "String(StringLen::N(50))")]
    pub r#type: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(100))")]
    pub industry: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub address: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(50))")]
    pub contact_phone: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(255))")]
    pub contact_email: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(50))")]
    pub tax_id: Option<String>,
    pub fiscal_year_start: Option<Date>,
    #[sea_orm(column_type = "String(StringLen::N(3))")]
    pub currency: Option<String>,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::employees::Entity")]
    Employees,
    #[sea_orm(has_many = "super::documents::Entity")]
    Documents,
    #[sea_orm(has_many = "super::users::Entity")]
    Users,
    #[sea_orm(has_many = "super::customers::Entity")]
    Customers,
    #[sea_orm(has_many = "super::suppliers::Entity")]
    Suppliers,
    #[sea_orm(has_many = "super::products::Entity")]
    Products,
    #[sea_orm(has_many = "super::services::Entity")]
    Services,
    #[sea_orm(has_many = "super::invoices::Entity")]
    Invoices,
    #[sea_orm(has_many = "super::bills::Entity")]
    Bills,
    #[sea_orm(has_many = "super::bank_accounts::Entity")]
    BankAccounts,
    #[sea_orm(has_many = "super::cash_accounts::Entity")]
    CashAccounts,
    #[sea_orm(has_many = "super::payments_made::Entity")]
    PaymentsMade,
    #[sea_orm(has_many = "super::payments_received::Entity")]
    PaymentsReceived,
    #[sea_orm(has_many = "super::fixed_assets::Entity")]
    FixedAssets,
    #[sea_orm(has_many = "super::loans::Entity")]
    Loans,
    #[sea_orm(has_many = "super::chart_of_accounts::Entity")]
    ChartOfAccounts,
    #[sea_orm(has_many = "super::expense_receipts::Entity")]
    ExpenseReceipts,
    #[sea_orm(has_many = "super::debit_notes::Entity")]
    DebitNotes,
    #[sea_orm(has_many = "super::sales_receipts::Entity")]
    SalesReceipts,
    #[sea_orm(has_many = "super::credit_notes::Entity")]
    CreditNotes,
    #[sea_orm(has_many = "super::general_ledger::Entity")]
    GeneralLedger,
    #[sea_orm(has_many = "super::tax_records::Entity")]
    TaxRecords,
    #[sea_orm(has_many = "super::settings::Entity")]
    Settings,
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employees.def()
    }
}

impl Related<super::documents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Documents.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::suppliers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Suppliers.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::services::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Services.def()
    }
}

impl Related<super::invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl Related<super::bills::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bills.def()
    }
}

impl Related<super::bank_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankAccounts.def()
    }
}

impl Related<super::cash_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashAccounts.def()
    }
}

impl Related<super::payments_made::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentsMade.def()
    }
}

impl Related<super::payments_received::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentsReceived.def()
    }
}

impl Related<super::fixed_assets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FixedAssets.def()
    }
}

impl Related<super::loans::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loans.def()
    }
}

impl Related<super::chart_of_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChartOfAccounts.def()
    }
}

impl Related<super::expense_receipts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseReceipts.def()
    }
}

impl Related<super::debit_notes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DebitNotes.def()
    }
}

impl Related<super::sales_receipts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SalesReceipts.def()
    }
}

impl Related<super::credit_notes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreditNotes.def()
    }
}

impl Related<super::general_ledger::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GeneralLedger.def()
    }
}

impl Related<super::tax_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaxRecords.def()
    }
}

impl Related<super::settings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Settings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
