//! Payments received against invoices and made against bills.
//!
//! Recording a payment linked to a document also refreshes that document's
//! `payment_status` inside the same transaction. The document row is locked
//! before the payment is inserted, so concurrent payments against one
//! document settle one after another.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use ledgerly_core::DomainError;
use ledgerly_core::documents::PaymentStatus;
use ledgerly_shared::types::{BillId, BusinessId, CustomerId, InvoiceId, Money, SupplierId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::error::{RepoError, RepoResult};
use crate::entities::{
    bills, expense_receipts, invoices, payments_made, payments_received, sales_receipts,
};

/// Input for recording a payment or receipt.
#[derive(Debug, Clone)]
pub struct NewPayment {
    /// Business recording the payment.
    pub business_id: BusinessId,
    /// Payment date.
    pub date: NaiveDate,
    /// Amount paid.
    pub amount: Money,
    /// Free-form method, e.g. `bank transfer`.
    pub payment_method: Option<String>,
}

/// Payment repository.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: Arc<DatabaseConnection>,
}

/// Sums stored amounts. The total is only compared, never stored, so it is
/// not bounded by the money column's precision.
fn sum_paid(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts.into_iter().sum()
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Records a payment from a customer, optionally settling an invoice.
    ///
    /// # Errors
    ///
    /// - [`RepoError::NotFound`] if `invoice_id` names no invoice
    /// - [`RepoError::MissingReference`] if the business does not exist
    pub async fn record_received(
        &self,
        input: NewPayment,
        invoice_id: Option<InvoiceId>,
    ) -> RepoResult<payments_received::Model> {
        let now = Utc::now().naive_utc();
        let txn = self.db.begin().await?;

        let invoice = match invoice_id {
            Some(id) => Some(
                invoices::Entity::find_by_id(id.get())
                    .lock_exclusive()
                    .one(&txn)
                    .await?
                    .ok_or(RepoError::not_found("invoice", id.get()))?,
            ),
            None => None,
        };

        let payment = payments_received::ActiveModel {
            business_id: Set(input.business_id.get()),
            date: Set(input.date),
            amount: Set(input.amount.value()),
            payment_method: Set(input.payment_method),
            invoice_id: Set(invoice_id.map(InvoiceId::get)),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        if let Some(invoice) = invoice {
            let invoice_id = invoice.id;
            let status = Self::settle_invoice(&txn, invoice).await?;
            tracing::debug!(invoice_id, status = %status, "invoice status refreshed");
        }

        txn.commit().await?;
        Ok(payment)
    }

    /// Records a payment to a supplier, optionally settling a bill.
    ///
    /// # Errors
    ///
    /// - [`RepoError::NotFound`] if `bill_id` names no bill
    /// - [`RepoError::MissingReference`] if the business does not exist
    pub async fn record_made(
        &self,
        input: NewPayment,
        bill_id: Option<BillId>,
    ) -> RepoResult<payments_made::Model> {
        let now = Utc::now().naive_utc();
        let txn = self.db.begin().await?;

        let bill = match bill_id {
            Some(id) => Some(
                bills::Entity::find_by_id(id.get())
                    .lock_exclusive()
                    .one(&txn)
                    .await?
                    .ok_or(RepoError::not_found("bill", id.get()))?,
            ),
            None => None,
        };

        let payment = payments_made::ActiveModel {
            business_id: Set(input.business_id.get()),
            date: Set(input.date),
            amount: Set(input.amount.value()),
            payment_method: Set(input.payment_method),
            bill_id: Set(bill_id.map(BillId::get)),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        if let Some(bill) = bill {
            let bill_id = bill.id;
            let status = Self::settle_bill(&txn, bill).await?;
            tracing::debug!(bill_id, status = %status, "bill status refreshed");
        }

        txn.commit().await?;
        Ok(payment)
    }

    /// Recomputes the status of a locked invoice from its payments.
    async fn settle_invoice<C: ConnectionTrait>(
        conn: &C,
        invoice: invoices::Model,
    ) -> RepoResult<PaymentStatus> {
        let paid = sum_paid(
            payments_received::Entity::find()
                .filter(payments_received::Column::InvoiceId.eq(invoice.id))
                .all(conn)
                .await?
                .into_iter()
                .map(|p| p.amount),
        );
        let total = Money::new(invoice.total_amount).map_err(DomainError::from)?;
        let status = PaymentStatus::from_amounts(total, paid);

        let mut active: invoices::ActiveModel = invoice.into();
        active.payment_status = Set(Some(status.as_str().to_string()));
        active.updated_at = Set(Some(Utc::now().naive_utc()));
        active.update(conn).await?;

        Ok(status)
    }

    async fn settle_bill<C: ConnectionTrait>(
        conn: &C,
        bill: bills::Model,
    ) -> RepoResult<PaymentStatus> {
        let paid = sum_paid(
            payments_made::Entity::find()
                .filter(payments_made::Column::BillId.eq(bill.id))
                .all(conn)
                .await?
                .into_iter()
                .map(|p| p.amount),
        );
        let total = Money::new(bill.total_amount).map_err(DomainError::from)?;
        let status = PaymentStatus::from_amounts(total, paid);

        let mut active: bills::ActiveModel = bill.into();
        active.payment_status = Set(Some(status.as_str().to_string()));
        active.updated_at = Set(Some(Utc::now().naive_utc()));
        active.update(conn).await?;

        Ok(status)
    }

    /// Records an expense paid on the spot, optionally naming the supplier.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::MissingReference`] for an unknown business or supplier.
    pub async fn record_expense_receipt(
        &self,
        input: NewPayment,
        supplier_id: Option<SupplierId>,
        category: Option<String>,
    ) -> RepoResult<expense_receipts::Model> {
        let now = Utc::now().naive_utc();
        let receipt = expense_receipts::ActiveModel {
            business_id: Set(input.business_id.get()),
            date: Set(input.date),
            supplier_id: Set(supplier_id.map(SupplierId::get)),
            amount: Set(input.amount.value()),
            category: Set(category),
            payment_method: Set(input.payment_method),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        };
        Ok(receipt.insert(self.db.as_ref()).await?)
    }

    /// Records a cash sale, optionally naming the customer.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::MissingReference`] for an unknown business or customer.
    pub async fn record_sales_receipt(
        &self,
        input: NewPayment,
        customer_id: Option<CustomerId>,
    ) -> RepoResult<sales_receipts::Model> {
        let now = Utc::now().naive_utc();
        let receipt = sales_receipts::ActiveModel {
            business_id: Set(input.business_id.get()),
            date: Set(input.date),
            customer_id: Set(customer_id.map(CustomerId::get)),
            total_amount: Set(input.amount.value()),
            payment_method: Set(input.payment_method),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        };
        Ok(receipt.insert(self.db.as_ref()).await?)
    }

    /// Lists payments received against an invoice, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_invoice(&self, id: InvoiceId) -> RepoResult<Vec<payments_received::Model>> {
        Ok(payments_received::Entity::find()
            .filter(payments_received::Column::InvoiceId.eq(id.get()))
            .order_by_asc(payments_received::Column::Date)
            .order_by_asc(payments_received::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    /// Lists payments made against a bill, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_bill(&self, id: BillId) -> RepoResult<Vec<payments_made::Model>> {
        Ok(payments_made::Entity::find()
            .filter(payments_made::Column::BillId.eq(id.get()))
            .order_by_asc(payments_made::Column::Date)
            .order_by_asc(payments_made::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::transaction_log;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()
    }

    fn received(id: i32, amount: Decimal) -> payments_received::Model {
        payments_received::Model {
            id,
            business_id: 1,
            date: date(),
            amount,
            payment_method: Some("cash".to_string()),
            invoice_id: Some(7),
            created_at: None,
            updated_at: None,
        }
    }

    fn invoice(status: &str) -> invoices::Model {
        invoices::Model {
            id: 7,
            business_id: 1,
            invoice_number: "INV-00007".to_string(),
            date: date(),
            due_date: date(),
            customer_id: 3,
            total_amount: dec!(100.00),
            taxes: Some(dec!(0.00)),
            payment_status: Some(status.to_string()),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_sum_paid_is_exact() {
        let total = sum_paid([dec!(0.10), dec!(0.20), dec!(19.99)]);
        assert_eq!(total, dec!(20.29));
    }

    #[test]
    fn test_sum_paid_exceeds_money_column() {
        // Two payments at the NUMERIC(10,2) maximum still settle the invoice.
        let total = sum_paid([dec!(99999999.99), dec!(99999999.99)]);
        assert_eq!(total, dec!(199999999.98));
        let invoice_total = Money::parse("99999999.99").unwrap();
        assert_eq!(
            PaymentStatus::from_amounts(invoice_total, total),
            PaymentStatus::Paid
        );
    }

    #[tokio::test]
    async fn test_partial_payment_marks_invoice_partial() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![invoice("unpaid")]])
            .append_query_results([vec![received(1, dec!(40.00))]])
            .append_query_results([vec![received(1, dec!(40.00))]])
            .append_query_results([vec![invoice("partial")]])
            .into_connection();
        let db = Arc::new(db);
        let repo = PaymentRepository::new(Arc::clone(&db));

        let payment = repo
            .record_received(
                NewPayment {
                    business_id: BusinessId::new(1),
                    date: date(),
                    amount: Money::parse("40").unwrap(),
                    payment_method: Some("cash".to_string()),
                },
                Some(InvoiceId::new(7)),
            )
            .await
            .unwrap();
        assert_eq!(payment.invoice_id, Some(7));

        let log = format!("{:?}", transaction_log(repo, db));
        let lock = log.find("FOR UPDATE").unwrap();
        let insert = log.find("INSERT INTO \\\"payments_received\\\"").unwrap();
        assert!(lock < insert, "invoice must be locked before the payment is written");
        assert!(log.contains("\\\"payment_status\\\""));
        assert!(log.contains("partial"));
        assert!(log.contains("\\\"updated_at\\\""));
    }

    #[tokio::test]
    async fn test_payment_against_missing_bill_writes_nothing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<bills::Model>::new()])
            .into_connection();
        let db = Arc::new(db);
        let repo = PaymentRepository::new(Arc::clone(&db));

        let err = repo
            .record_made(
                NewPayment {
                    business_id: BusinessId::new(1),
                    date: date(),
                    amount: Money::parse("10").unwrap(),
                    payment_method: None,
                },
                Some(BillId::new(404)),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound { entity: "bill", .. }));

        let log = format!("{:?}", transaction_log(repo, db));
        assert!(!log.contains("INSERT"));
    }

    #[tokio::test]
    async fn test_unlinked_payment_touches_no_invoice() {
        let mut unlinked = received(2, dec!(5.00));
        unlinked.invoice_id = None;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![unlinked]])
            .into_connection();
        let db = Arc::new(db);
        let repo = PaymentRepository::new(Arc::clone(&db));

        repo.record_received(
            NewPayment {
                business_id: BusinessId::new(1),
                date: date(),
                amount: Money::parse("5").unwrap(),
                payment_method: None,
            },
            None,
        )
        .await
        .unwrap();

        let log = format!("{:?}", transaction_log(repo, db));
        assert!(!log.contains("\\\"invoices\\\""));
    }
}
