//! Entity aliases for glob import.

pub use super::audit_trails::Entity as AuditTrails;
pub use super::bank_accounts::Entity as BankAccounts;
pub use super::bank_reconciliations::Entity as BankReconciliations;
pub use super::bank_transactions::Entity as BankTransactions;
pub use super::bill_items::Entity as BillItems;
pub use super::bills::Entity as Bills;
pub use super::businesses::Entity as Businesses;
pub use super::cash_accounts::Entity as CashAccounts;
pub use super::chart_of_accounts::Entity as ChartOfAccounts;
pub use super::credit_notes::Entity as CreditNotes;
pub use super::customers::Entity as Customers;
pub use super::debit_notes::Entity as DebitNotes;
pub use super::documents::Entity as Documents;
pub use super::employees::Entity as Employees;
pub use super::expense_receipts::Entity as ExpenseReceipts;
pub use super::fixed_assets::Entity as FixedAssets;
pub use super::general_ledger::Entity as GeneralLedger;
pub use super::invoice_items::Entity as InvoiceItems;
pub use super::invoices::Entity as Invoices;
pub use super::loans::Entity as Loans;
pub use super::payments_made::Entity as PaymentsMade;
pub use super::payments_received::Entity as PaymentsReceived;
pub use super::payroll_history::Entity as PayrollHistory;
pub use super::products::Entity as Products;
pub use super::sales_receipts::Entity as SalesReceipts;
pub use super::services::Entity as Services;
pub use super::settings::Entity as Settings;
pub use super::suppliers::Entity as Suppliers;
pub use super::tax_records::Entity as TaxRecords;
pub use super::timesheets::Entity as Timesheets;
pub use super::user_activity_logs::Entity as UserActivityLogs;
pub use super::users::Entity as Users;
