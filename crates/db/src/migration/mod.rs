//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration.

pub use sea_orm_migration::prelude::*;

mod m20260115_000001_initial;

/// Every table created by the initial migration, in creation order.
pub const TABLES: [&str; 32] = [
    "businesses",
    "employees",
    "payroll_history",
    "timesheets",
    "documents",
    "users",
    "user_activity_logs",
    "audit_trails",
    "customers",
    "suppliers",
    "products",
    "services",
    "invoices",
    "invoice_items",
    "bills",
    "bill_items",
    "bank_accounts",
    "cash_accounts",
    "payments_made",
    "payments_received",
    "bank_transactions",
    "bank_reconciliations",
    "fixed_assets",
    "loans",
    "chart_of_accounts",
    "expense_receipts",
    "debit_notes",
    "sales_receipts",
    "credit_notes",
    "general_ledger",
    "tax_records",
    "settings",
];

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260115_000001_initial::Migration)]
    }
}
