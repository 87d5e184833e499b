//! PostgreSQL integration tests for the repositories and schema rules.
//!
//! Run with `cargo test -p ledgerly-db -- --ignored`; needs Docker or
//! `DATABASE_URL`.

mod common;

use chrono::NaiveDate;
use common::{TestDb, unique_number};
use ledgerly_core::audit::AuditEntry;
use ledgerly_core::documents::{LineItem, LineItemKind, PaymentStatus};
use ledgerly_core::identity::UserRole;
use ledgerly_core::ledger::{AccountType, LedgerPosting};
use ledgerly_core::payroll::{PayRun, TimesheetPeriod};
use ledgerly_core::settings::BusinessSettings;
use ledgerly_db::RepoError;
use ledgerly_db::entities::{
    bank_accounts, bank_reconciliations, bank_transactions, chart_of_accounts, employees,
    fixed_assets, loans, payroll_history, tax_records, timesheets,
};
use ledgerly_db::repositories::{
    NewAccount, NewBankAccount, NewBankTransaction, NewEmployee, NewFixedAsset, NewInvoice,
    NewLoan, NewPayment, NewProduct, NewTaxRecord, NewUser,
};
use ledgerly_shared::types::{
    AccountId, BankAccountId, BusinessId, CustomerId, EmployeeId, Hours, InvoiceId, Money,
    ProductId, UserId,
};
use rust_decimal_macros::dec;
use sea_orm::{EntityTrait, PrimaryKeyTrait};
use uuid::Uuid;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 15).expect("valid date")
}

fn money(value: &str) -> Money {
    Money::parse(value).expect("valid amount")
}

fn new_user(business_id: BusinessId) -> NewUser {
    NewUser {
        business_id,
        name: "Owner".to_string(),
        email: format!("owner-{}@example.com", Uuid::new_v4()),
        phone: None,
        password: "correct horse".to_string(),
        role: UserRole::Owner,
    }
}

async fn product(t: &TestDb, business_id: BusinessId) -> ProductId {
    let product = t
        .repos
        .catalog
        .create_product(NewProduct {
            business_id,
            name: "Widget".to_string(),
            sku: Some(unique_number("SKU")),
            description: None,
            purchase_price: Some(money("4.10")),
            sales_price: Some(money("19.99")),
            quantity_on_hand: 10,
        })
        .await
        .expect("Failed to create product");
    ProductId::new(product.id)
}

async fn invoice(
    t: &TestDb,
    business_id: BusinessId,
    customer_id: CustomerId,
    number: String,
) -> Result<InvoiceId, RepoError> {
    let product_id = product(t, business_id).await;
    let line = LineItem::new(LineItemKind::Product(product_id), 1, money("19.99"))?;
    let created = t
        .repos
        .invoices
        .create(NewInvoice {
            business_id,
            invoice_number: number,
            date: date(),
            due_date: date(),
            customer_id,
            taxes: Money::zero(),
            items: vec![line],
        })
        .await?;
    Ok(InvoiceId::new(created.invoice.id))
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_business_delete_cascades_to_dependents() {
    let t = TestDb::start().await;
    let business = t.business().await;
    let business_id = BusinessId::new(business.id);

    let user = t.repos.users.create(new_user(business_id)).await.expect("create user");
    t.customer(business_id).await;
    product(&t, business_id).await;
    t.repos
        .settings
        .upsert(business_id, &BusinessSettings::default())
        .await
        .expect("save settings");

    assert!(t.repos.businesses.delete(business_id).await.expect("delete business"));
    assert!(t.repos.businesses.find_by_id(business_id).await.expect("query").is_none());
    assert!(t.repos.users.find_by_id(UserId::new(user.id)).await.expect("query").is_none());
    assert_eq!(
        t.repos.settings.get(business_id).await.expect("query"),
        BusinessSettings::default()
    );
}

/// True once the row with primary key `id` no longer exists.
async fn gone<E>(t: &TestDb, id: i32) -> bool
where
    E: EntityTrait,
    i32: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    E::find_by_id(id)
        .one(t.db.as_ref())
        .await
        .expect("query")
        .is_none()
}

async fn ledger_account(t: &TestDb, business_id: BusinessId, name: &str) -> AccountId {
    let account = t
        .repos
        .ledger
        .create_account(NewAccount {
            business_id,
            account_name: name.to_string(),
            account_type: AccountType::Asset,
            account_number: None,
            description: None,
        })
        .await
        .expect("create account");
    AccountId::new(account.id)
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_business_delete_cascades_through_operational_tables() {
    let t = TestDb::start().await;
    let business_id = BusinessId::new(t.business().await.id);

    let employee = t
        .repos
        .payroll
        .create_employee(NewEmployee {
            business_id,
            name: "Jane Doe".to_string(),
            address: None,
            salary_rate: Some(money("3200.00")),
            tax_details: None,
            bank_account: None,
        })
        .await
        .expect("create employee");
    let employee_id = EmployeeId::new(employee.id);
    let pay = t
        .repos
        .payroll
        .record_payroll(
            employee_id,
            date(),
            PayRun {
                gross_pay: money("3200.00"),
                taxes_withheld: money("640.00"),
                other_deductions: money("96.00"),
            },
        )
        .await
        .expect("record payroll");
    let period = TimesheetPeriod::new(
        date(),
        date(),
        Hours::parse("7.50").expect("valid hours"),
    )
    .expect("valid period");
    let timesheet = t
        .repos
        .payroll
        .record_timesheet(employee_id, period)
        .await
        .expect("record timesheet");

    let bank = t
        .repos
        .banking
        .create_bank_account(NewBankAccount {
            business_id,
            bank_name: Some("First Bank".to_string()),
            account_name: Some("Operating".to_string()),
            account_number: Some(unique_number("ACC")),
        })
        .await
        .expect("create bank account");
    let bank_id = BankAccountId::new(bank.id);
    let line = t
        .repos
        .banking
        .record_transaction(NewBankTransaction {
            bank_account_id: bank_id,
            date: date(),
            description: Some("Deposit".to_string()),
            amount: money("250.00"),
        })
        .await
        .expect("record bank line");
    t.repos.banking.mark_reconciled(line.id).await.expect("reconcile line");
    let reconciliation = t
        .repos
        .banking
        .record_reconciliation(bank_id, date(), money("250.00"))
        .await
        .expect("record reconciliation");

    let account = ledger_account(&t, business_id, "Cash").await;
    let loan = t
        .repos
        .assets
        .create_loan(NewLoan {
            business_id,
            creditor_name: "Bank".to_string(),
            original_amount: money("5000.00"),
            interest_rate: None,
            payment_schedule: None,
        })
        .await
        .expect("create loan");
    let asset = t
        .repos
        .assets
        .create_fixed_asset(NewFixedAsset {
            business_id,
            name: "Van".to_string(),
            purchase_date: date(),
            purchase_price: money("18000.00"),
            depreciation_schedule: None,
        })
        .await
        .expect("create fixed asset");
    let tax = t
        .repos
        .assets
        .create_tax_record(NewTaxRecord {
            business_id,
            period_start: date(),
            period_end: date(),
            tax_type: Some("VAT".to_string()),
            amount_due: Some(money("410.00")),
        })
        .await
        .expect("create tax record");

    assert!(t.repos.businesses.delete(business_id).await.expect("delete business"));

    assert!(gone::<employees::Entity>(&t, employee.id).await);
    assert!(gone::<payroll_history::Entity>(&t, pay.id).await);
    assert!(gone::<timesheets::Entity>(&t, timesheet.id).await);
    assert!(gone::<bank_accounts::Entity>(&t, bank.id).await);
    assert!(gone::<bank_transactions::Entity>(&t, line.id).await);
    assert!(gone::<bank_reconciliations::Entity>(&t, reconciliation.id).await);
    assert!(gone::<chart_of_accounts::Entity>(&t, account.get()).await);
    assert!(gone::<loans::Entity>(&t, loan.id).await);
    assert!(gone::<fixed_assets::Entity>(&t, asset.id).await);
    assert!(gone::<tax_records::Entity>(&t, tax.id).await);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_ledger_rows_block_business_delete() {
    let t = TestDb::start().await;
    let business_id = BusinessId::new(t.business().await.id);
    let cash = ledger_account(&t, business_id, "Cash").await;
    let equity = ledger_account(&t, business_id, "Capital").await;
    t.repos
        .ledger
        .post(
            business_id,
            &[
                LedgerPosting::debit(cash, date(), money("100.00")),
                LedgerPosting::credit(equity, date(), money("100.00")),
            ],
        )
        .await
        .expect("post ledger rows");

    // general_ledger.fkAccount is RESTRICT and is checked when the account
    // cascade runs, before the ledger rows themselves are removed.
    let err = t.repos.businesses.delete(business_id).await.unwrap_err();
    assert!(matches!(err, RepoError::Restricted(_)), "got {err:?}");
    assert!(t.repos.businesses.find_by_id(business_id).await.expect("query").is_some());
    assert!(!gone::<chart_of_accounts::Entity>(&t, cash.get()).await);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_business_with_invoice_cannot_be_deleted() {
    let t = TestDb::start().await;
    let business_id = BusinessId::new(t.business().await.id);
    let customer_id = CustomerId::new(t.customer(business_id).await.id);
    let invoice_id = invoice(&t, business_id, customer_id, unique_number("INV"))
        .await
        .expect("create invoice");

    // invoices.fkCustomer is RESTRICT, so the customer cascade fails.
    let err = t.repos.businesses.delete(business_id).await.unwrap_err();
    assert!(matches!(err, RepoError::Restricted(_)), "got {err:?}");
    assert!(t.repos.businesses.find_by_id(business_id).await.expect("query").is_some());
    assert!(
        t.repos
            .invoices
            .find_by_id(invoice_id)
            .await
            .expect("query")
            .is_some()
    );
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_audited_user_blocks_business_delete() {
    let t = TestDb::start().await;
    let business = t.business().await;
    let business_id = BusinessId::new(business.id);
    let user = t.repos.users.create(new_user(business_id)).await.expect("create user");

    let entry = AuditEntry::created("businesses", business.id, &business, UserId::new(user.id))
        .expect("snapshot");
    t.repos.audit.record(entry).await.expect("record audit");

    let err = t.repos.businesses.delete(business_id).await.unwrap_err();
    assert!(matches!(err, RepoError::Restricted(_)), "got {err:?}");
    assert!(t.repos.businesses.find_by_id(business_id).await.expect("query").is_some());
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_customer_with_invoice_cannot_be_deleted() {
    let t = TestDb::start().await;
    let business_id = BusinessId::new(t.business().await.id);
    let customer_id = CustomerId::new(t.customer(business_id).await.id);
    invoice(&t, business_id, customer_id, unique_number("INV"))
        .await
        .expect("create invoice");

    let err = t.repos.counterparties.delete_customer(customer_id).await.unwrap_err();
    assert!(matches!(err, RepoError::Restricted(_)), "got {err:?}");
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_invoice_number_is_unique_across_businesses() {
    let t = TestDb::start().await;
    let number = unique_number("INV");

    let first = BusinessId::new(t.business().await.id);
    let first_customer = CustomerId::new(t.customer(first).await.id);
    invoice(&t, first, first_customer, number.clone())
        .await
        .expect("first invoice");

    let second = BusinessId::new(t.business().await.id);
    let second_customer = CustomerId::new(t.customer(second).await.id);
    let err = invoice(&t, second, second_customer, number).await.unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)), "got {err:?}");
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_invoice_delete_cascades_items_and_unlinks_payments() {
    let t = TestDb::start().await;
    let business_id = BusinessId::new(t.business().await.id);
    let customer_id = CustomerId::new(t.customer(business_id).await.id);
    let invoice_id = invoice(&t, business_id, customer_id, unique_number("INV"))
        .await
        .expect("create invoice");

    let payment = t
        .repos
        .payments
        .record_received(
            NewPayment {
                business_id,
                date: date(),
                amount: money("5.00"),
                payment_method: None,
            },
            Some(invoice_id),
        )
        .await
        .expect("record payment");

    let refreshed = t.repos.invoices.find_by_id(invoice_id).await.expect("query").expect("exists");
    assert_eq!(
        PaymentStatus::from_column(refreshed.payment_status.as_deref()).expect("status"),
        PaymentStatus::Partial
    );

    assert!(t.repos.invoices.delete(invoice_id).await.expect("delete invoice"));
    assert!(t.repos.invoices.find_with_items(invoice_id).await.expect("query").is_none());
    assert!(t.repos.payments.list_for_invoice(invoice_id).await.expect("query").is_empty());

    let orphan = ledgerly_db::entities::payments_received::Entity::find_by_id(payment.id)
        .one(t.db.as_ref())
        .await
        .expect("query")
        .expect("payment survives");
    assert_eq!(orphan.invoice_id, None);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_money_round_trips_exactly() {
    let t = TestDb::start().await;
    let business_id = BusinessId::new(t.business().await.id);
    let customer_id = CustomerId::new(t.customer(business_id).await.id);
    let invoice_id = invoice(&t, business_id, customer_id, unique_number("INV"))
        .await
        .expect("create invoice");

    let loaded = t
        .repos
        .invoices
        .find_with_items(invoice_id)
        .await
        .expect("query")
        .expect("exists");
    assert_eq!(loaded.invoice.total_amount, dec!(19.99));
    assert_eq!(loaded.invoice.total_amount.to_string(), "19.99");
    assert_eq!(loaded.items[0].price, money("19.99"));
    assert_eq!(loaded.items[0].quantity, 1);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_duplicate_email_is_rejected() {
    let t = TestDb::start().await;
    let business_id = BusinessId::new(t.business().await.id);
    let user = new_user(business_id);

    t.repos.users.create(user.clone()).await.expect("first user");
    let err = t.repos.users.create(user).await.unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)), "got {err:?}");
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_change_role_sets_updated_at() {
    let t = TestDb::start().await;
    let business_id = BusinessId::new(t.business().await.id);
    let user = t.repos.users.create(new_user(business_id)).await.expect("create user");

    let updated = t
        .repos
        .users
        .change_role(UserId::new(user.id), UserRole::Viewer)
        .await
        .expect("change role");
    assert_eq!(updated.role, "viewer");
    assert!(updated.updated_at >= user.updated_at);
}
