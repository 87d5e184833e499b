//! Bill repository, the purchase-side mirror of invoices.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use ledgerly_core::DomainError;
use ledgerly_core::documents::{LineItem, PaymentStatus, document_total};
use ledgerly_shared::types::{BillId, BusinessId, Money, PageRequest, PageResponse, SupplierId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::error::{RepoError, RepoResult};
use super::lines;
use crate::entities::{bill_items, bills};

/// Input for recording a supplier bill.
#[derive(Debug, Clone)]
pub struct NewBill {
    /// Receiving business.
    pub business_id: BusinessId,
    /// Supplier's document number, globally unique.
    pub bill_number: String,
    /// Bill date.
    pub date: NaiveDate,
    /// Payment due date.
    pub due_date: NaiveDate,
    /// Issuing supplier.
    pub supplier_id: SupplierId,
    /// Tax amount on top of the lines.
    pub taxes: Money,
    /// Lines, in display order.
    pub items: Vec<LineItem>,
}

/// A bill header with its typed lines.
#[derive(Debug, Clone)]
pub struct BillWithItems {
    /// Header row.
    pub bill: bills::Model,
    /// Lines, in insertion order.
    pub items: Vec<LineItem>,
}

/// Bill repository.
#[derive(Debug, Clone)]
pub struct BillRepository {
    db: Arc<DatabaseConnection>,
}

impl BillRepository {
    /// Creates a new bill repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Records a bill and its lines atomically.
    ///
    /// # Errors
    ///
    /// - [`RepoError::Domain`] if the total overflows `NUMERIC(10, 2)`
    /// - [`RepoError::Duplicate`] if the bill number is taken
    /// - [`RepoError::MissingReference`] for an unknown supplier, product or service
    pub async fn create(&self, input: NewBill) -> RepoResult<BillWithItems> {
        let total = document_total(&input.items)?
            .checked_add(input.taxes)
            .map_err(DomainError::from)?;
        let now = Utc::now().naive_utc();

        let txn = self.db.begin().await?;

        let bill = bills::ActiveModel {
            business_id: Set(input.business_id.get()),
            bill_number: Set(input.bill_number),
            date: Set(input.date),
            due_date: Set(input.due_date),
            supplier_id: Set(input.supplier_id.get()),
            total_amount: Set(total.value()),
            taxes: Set(Some(input.taxes.value())),
            payment_status: Set(Some(PaymentStatus::default().as_str().to_string())),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        if !input.items.is_empty() {
            let rows = input.items.iter().map(|item| {
                let cols = item.columns();
                bill_items::ActiveModel {
                    bill_id: Set(bill.id),
                    item_type: Set(cols.item_type),
                    product_id: Set(cols.product_id),
                    service_id: Set(cols.service_id),
                    quantity: Set(Some(cols.quantity)),
                    price: Set(cols.price.value()),
                    total: Set(cols.total.value()),
                    ..Default::default()
                }
            });
            bill_items::Entity::insert_many(rows)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;

        tracing::info!(bill_id = bill.id, business_id = bill.business_id, total = %total, "bill recorded");
        Ok(BillWithItems {
            bill,
            items: input.items,
        })
    }

    /// Finds a bill by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: BillId) -> RepoResult<Option<bills::Model>> {
        Ok(bills::Entity::find_by_id(id.get()).one(self.db.as_ref()).await?)
    }

    /// Loads a bill with its lines.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Domain`] if a stored line is malformed.
    pub async fn find_with_items(&self, id: BillId) -> RepoResult<Option<BillWithItems>> {
        let Some(bill) = bills::Entity::find_by_id(id.get()).one(self.db.as_ref()).await? else {
            return Ok(None);
        };

        let items = bill
            .find_related(bill_items::Entity)
            .order_by_asc(bill_items::Column::Id)
            .all(self.db.as_ref())
            .await?
            .iter()
            .map(lines::from_bill_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(BillWithItems { bill, items }))
    }

    /// Sets the payment status and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if the bill does not exist.
    pub async fn update_payment_status(
        &self,
        id: BillId,
        status: PaymentStatus,
    ) -> RepoResult<bills::Model> {
        let bill = bills::Entity::find_by_id(id.get())
            .one(self.db.as_ref())
            .await?
            .ok_or(RepoError::not_found("bill", id.get()))?;

        let mut active: bills::ActiveModel = bill.into();
        active.payment_status = Set(Some(status.as_str().to_string()));
        active.updated_at = Set(Some(Utc::now().naive_utc()));

        Ok(active.update(self.db.as_ref()).await?)
    }

    /// Deletes a bill. Lines cascade; payments and debit notes are unlinked.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: BillId) -> RepoResult<bool> {
        let result = bills::Entity::delete_by_id(id.get())
            .exec(self.db.as_ref())
            .await
            .map_err(RepoError::on_delete)?;
        Ok(result.rows_affected > 0)
    }

    /// Lists a business's bills, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_business(
        &self,
        business_id: BusinessId,
        page: PageRequest,
    ) -> RepoResult<PageResponse<bills::Model>> {
        let paginator = bills::Entity::find()
            .filter(bills::Column::BusinessId.eq(business_id.get()))
            .order_by_desc(bills::Column::Date)
            .order_by_desc(bills::Column::Id)
            .paginate(self.db.as_ref(), page.limit());

        let total = paginator.num_items().await?;
        let data = paginator.fetch_page(page.page_index()).await?;
        Ok(PageResponse::new(data, page, total))
    }

    /// Lists unpaid or partially paid bills due on or before `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_due(&self, business_id: BusinessId, date: NaiveDate) -> RepoResult<Vec<bills::Model>> {
        Ok(bills::Entity::find()
            .filter(bills::Column::BusinessId.eq(business_id.get()))
            .filter(bills::Column::DueDate.lte(date))
            .filter(bills::Column::PaymentStatus.ne(PaymentStatus::Paid.as_str()))
            .order_by_asc(bills::Column::DueDate)
            .all(self.db.as_ref())
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::transaction_log;
    use ledgerly_core::documents::LineItemKind;
    use ledgerly_shared::types::ProductId;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_overflowing_total_never_opens_a_transaction() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let db = Arc::new(db);
        let repo = BillRepository::new(Arc::clone(&db));

        let line = LineItem::new(
            LineItemKind::Product(ProductId::new(1)),
            1,
            Money::parse("99999999.99").unwrap(),
        )
        .unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let err = repo
            .create(NewBill {
                business_id: BusinessId::new(1),
                bill_number: "B-1".to_string(),
                date,
                due_date: date,
                supplier_id: SupplierId::new(1),
                taxes: Money::parse("1.00").unwrap(),
                items: vec![line],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, RepoError::Domain(DomainError::Amount(_))));
        assert!(transaction_log(repo, db).is_empty());
    }

    #[tokio::test]
    async fn test_find_with_items_null_quantity_is_one() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let header = bills::Model {
            id: 1,
            business_id: 1,
            bill_number: "B-1".to_string(),
            date,
            due_date: date,
            supplier_id: 2,
            total_amount: dec!(12.50),
            taxes: None,
            payment_status: None,
            created_at: None,
            updated_at: None,
        };
        let row = bill_items::Model {
            id: 1,
            bill_id: 1,
            item_type: "product".to_string(),
            product_id: Some(8),
            service_id: None,
            quantity: None,
            price: dec!(12.50),
            total: dec!(12.50),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![header]])
            .append_query_results([vec![row]])
            .into_connection();
        let repo = BillRepository::new(Arc::new(db));

        let found = repo.find_with_items(BillId::new(1)).await.unwrap().unwrap();
        assert_eq!(found.items[0].quantity, 1);
        assert_eq!(
            PaymentStatus::from_column(found.bill.payment_status.as_deref()).unwrap(),
            PaymentStatus::Unpaid
        );
    }
}
