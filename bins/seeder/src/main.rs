//! Database seeder for Ledgerly development and testing.
//!
//! Creates one demo business with an owner, a customer, a supplier, a
//! product, a small chart of accounts, one invoice with a partial payment
//! and the matching ledger rows. Running it twice is a no-op: the owner's
//! email is the marker.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use chrono::{Days, Utc};
use ledgerly_core::documents::{LineItem, LineItemKind};
use ledgerly_core::identity::UserRole;
use ledgerly_core::ledger::{AccountType, LedgerPosting};
use ledgerly_db::Repositories;
use ledgerly_db::repositories::{
    NewAccount, NewBankAccount, NewBusiness, NewCounterparty, NewInvoice, NewPayment, NewProduct,
    NewUser,
};
use ledgerly_shared::AppConfig;
use ledgerly_shared::types::{AccountId, BusinessId, CustomerId, InvoiceId, Money, ProductId};

const OWNER_EMAIL: &str = "owner@ledgerly.dev";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    println!("Connecting to database...");
    let db = ledgerly_db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    let repos = Repositories::new(Arc::new(db));

    if repos.users.find_by_email(OWNER_EMAIL).await?.is_some() {
        println!("  Demo data already present, skipping...");
        return Ok(());
    }

    println!("Seeding demo business...");
    let business = repos
        .businesses
        .create(NewBusiness {
            name: "Demo Trading Co".to_string(),
            business_type: Some("retail".to_string()),
            industry: Some("Hardware".to_string()),
            address: Some("1 Market Street".to_string()),
            contact_phone: None,
            contact_email: Some("hello@ledgerly.dev".to_string()),
            tax_id: None,
            fiscal_year_start: None,
            currency: None,
        })
        .await?;
    let business_id = BusinessId::new(business.id);

    println!("Seeding owner...");
    repos
        .users
        .create(NewUser {
            business_id,
            name: "Demo Owner".to_string(),
            email: OWNER_EMAIL.to_string(),
            phone: None,
            password: "ledgerly-demo".to_string(),
            role: UserRole::Owner,
        })
        .await?;
    println!("  Created owner: {OWNER_EMAIL}");

    println!("Seeding counterparties and catalog...");
    let customer = repos
        .counterparties
        .create_customer(counterparty(business_id, "Acme Retail", "Net 30"))
        .await?;
    repos
        .counterparties
        .create_supplier(counterparty(business_id, "Bolt Wholesale", "Net 15"))
        .await?;
    let product = repos
        .catalog
        .create_product(NewProduct {
            business_id,
            name: "Widget".to_string(),
            sku: Some("WID-001".to_string()),
            description: Some("Standard widget".to_string()),
            purchase_price: Some(Money::parse("4.10")?),
            sales_price: Some(Money::parse("19.99")?),
            quantity_on_hand: 100,
        })
        .await?;

    println!("Seeding chart of accounts...");
    let mut accounts = Vec::new();
    for (number, name, account_type) in [
        ("1000", "Cash", AccountType::Asset),
        ("1100", "Accounts Receivable", AccountType::Asset),
        ("2000", "Accounts Payable", AccountType::Liability),
        ("3000", "Owner's Equity", AccountType::Equity),
        ("4000", "Sales", AccountType::Income),
        ("5000", "Cost of Goods Sold", AccountType::Expense),
    ] {
        let account = repos
            .ledger
            .create_account(NewAccount {
                business_id,
                account_name: name.to_string(),
                account_type,
                account_number: Some(number.to_string()),
                description: None,
            })
            .await?;
        accounts.push(AccountId::new(account.id));
    }
    println!("  Inserted {} accounts", accounts.len());

    repos
        .banking
        .create_bank_account(NewBankAccount {
            business_id,
            bank_name: Some("First Demo Bank".to_string()),
            account_name: Some("Operating".to_string()),
            account_number: Some("000123456".to_string()),
        })
        .await?;
    repos
        .banking
        .create_cash_account(business_id, Some("Till".to_string()))
        .await?;

    println!("Seeding invoice and payment...");
    let today = Utc::now().date_naive();
    let due = today.checked_add_days(Days::new(30)).unwrap_or(today);
    let line = LineItem::new(
        LineItemKind::Product(ProductId::new(product.id)),
        3,
        Money::parse("19.99")?,
    )?;
    let invoice = repos
        .invoices
        .create(NewInvoice {
            business_id,
            invoice_number: "INV-DEMO-0001".to_string(),
            date: today,
            due_date: due,
            customer_id: CustomerId::new(customer.id),
            taxes: Money::parse("4.80")?,
            items: vec![line],
        })
        .await?;
    let invoice_id = InvoiceId::new(invoice.invoice.id);
    let total = Money::new(invoice.invoice.total_amount)?;

    let deposit = Money::parse("20.00")?;
    repos
        .payments
        .record_received(
            NewPayment {
                business_id,
                date: today,
                amount: deposit,
                payment_method: Some("bank_transfer".to_string()),
            },
            Some(invoice_id),
        )
        .await?;

    let (cash, receivable, sales) = (accounts[0], accounts[1], accounts[4]);
    let postings = [
        LedgerPosting::debit(receivable, today, total)
            .with_description("INV-DEMO-0001")
            .with_reference(invoice_id),
        LedgerPosting::credit(sales, today, total)
            .with_description("INV-DEMO-0001")
            .with_reference(invoice_id),
        LedgerPosting::debit(cash, today, deposit).with_description("Deposit on INV-DEMO-0001"),
        LedgerPosting::credit(receivable, today, deposit)
            .with_description("Deposit on INV-DEMO-0001"),
    ];
    let posted = repos.ledger.post(business_id, &postings).await?;
    println!("  Posted {posted} ledger rows");

    println!("Seeding complete!");
    Ok(())
}

fn counterparty(business_id: BusinessId, name: &str, terms: &str) -> NewCounterparty {
    NewCounterparty {
        business_id,
        name: name.to_string(),
        phone: None,
        email: None,
        address: None,
        payment_terms: Some(terms.to_string()),
    }
}
