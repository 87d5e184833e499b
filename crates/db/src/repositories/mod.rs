//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! [`Repositories`] bundles one of each around a shared connection pool and is
//! built once at startup.

pub mod asset;
pub mod audit;
pub mod banking;
pub mod bill;
pub mod business;
pub mod catalog;
pub mod counterparty;
pub mod document;
pub mod error;
pub mod invoice;
pub mod ledger;
mod lines;
pub mod note;
pub mod payment;
pub mod payroll;
pub mod settings;
pub mod user;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

pub use asset::{AssetRepository, NewFixedAsset, NewLoan, NewTaxRecord};
pub use audit::AuditRepository;
pub use banking::{BankingRepository, NewBankAccount, NewBankTransaction};
pub use bill::{BillRepository, BillWithItems, NewBill};
pub use business::{BusinessRepository, BusinessUpdate, NewBusiness};
pub use catalog::{CatalogRepository, NewProduct, NewService};
pub use counterparty::{CounterpartyRepository, NewCounterparty};
pub use document::{DocumentRepository, NewAttachment};
pub use error::{RepoError, RepoResult};
pub use invoice::{InvoiceRepository, InvoiceWithItems, NewInvoice};
pub use ledger::{LedgerRepository, NewAccount};
pub use note::{NewCreditNote, NewDebitNote, NoteRepository};
pub use payment::{NewPayment, PaymentRepository};
pub use payroll::{NewEmployee, PayrollRepository};
pub use settings::SettingsRepository;
pub use user::{NewUser, UserRepository};

/// Every repository, sharing one connection pool.
///
/// Cloning is cheap: each repository holds the same `Arc` to the pool.
#[derive(Debug, Clone)]
pub struct Repositories {
    /// Businesses.
    pub businesses: BusinessRepository,
    /// Users and credentials.
    pub users: UserRepository,
    /// Customers and suppliers.
    pub counterparties: CounterpartyRepository,
    /// Products and services.
    pub catalog: CatalogRepository,
    /// Invoices and their lines.
    pub invoices: InvoiceRepository,
    /// Bills and their lines.
    pub bills: BillRepository,
    /// Payments and receipts.
    pub payments: PaymentRepository,
    /// Credit and debit notes.
    pub notes: NoteRepository,
    /// Chart of accounts and general ledger.
    pub ledger: LedgerRepository,
    /// Attachment metadata.
    pub documents: DocumentRepository,
    /// Bank and cash accounts.
    pub banking: BankingRepository,
    /// Employees, pay runs and timesheets.
    pub payroll: PayrollRepository,
    /// Per-business settings.
    pub settings: SettingsRepository,
    /// Audit trail and activity log.
    pub audit: AuditRepository,
    /// Fixed assets, loans and tax records.
    pub assets: AssetRepository,
}

impl Repositories {
    /// Builds every repository around `db`.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            businesses: BusinessRepository::new(Arc::clone(&db)),
            users: UserRepository::new(Arc::clone(&db)),
            counterparties: CounterpartyRepository::new(Arc::clone(&db)),
            catalog: CatalogRepository::new(Arc::clone(&db)),
            invoices: InvoiceRepository::new(Arc::clone(&db)),
            bills: BillRepository::new(Arc::clone(&db)),
            payments: PaymentRepository::new(Arc::clone(&db)),
            notes: NoteRepository::new(Arc::clone(&db)),
            ledger: LedgerRepository::new(Arc::clone(&db)),
            documents: DocumentRepository::new(Arc::clone(&db)),
            banking: BankingRepository::new(Arc::clone(&db)),
            payroll: PayrollRepository::new(Arc::clone(&db)),
            settings: SettingsRepository::new(Arc::clone(&db)),
            audit: AuditRepository::new(Arc::clone(&db)),
            assets: AssetRepository::new(db),
        }
    }
}

/// Drops `repo` and drains the transaction log of the mock connection it
/// was built on.
#[cfg(test)]
pub(crate) fn transaction_log<R>(
    repo: R,
    db: Arc<DatabaseConnection>,
) -> Vec<sea_orm::Transaction> {
    drop(repo);
    Arc::try_unwrap(db)
        .expect("connection still shared")
        .into_transaction_log()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::settings;
    use ledgerly_shared::types::BusinessId;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_repositories_share_one_connection() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<settings::Model>::new()])
            .into_connection();
        let db = Arc::new(db);

        let repos = Repositories::new(Arc::clone(&db));
        let cloned = repos.clone();
        assert_eq!(Arc::strong_count(&db), 31);

        cloned.settings.get(BusinessId::new(1)).await.unwrap();
        drop(repos);

        let log = transaction_log(cloned, db);
        assert_eq!(log.len(), 1);
    }
}
