//! Invoice repository.
//!
//! Headers and lines are written in one transaction; lines are validated
//! through [`LineItem`] before anything reaches the database.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use ledgerly_core::documents::{LineItem, PaymentStatus, document_total};
use ledgerly_core::settings::InvoiceTemplate;
use ledgerly_shared::types::{BusinessId, CustomerId, InvoiceId, Money, PageRequest, PageResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::error::{RepoError, RepoResult};
use super::lines;
use crate::entities::{invoice_items, invoices};

/// Input for creating an invoice.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    /// Issuing business.
    pub business_id: BusinessId,
    /// Document number, globally unique.
    pub invoice_number: String,
    /// Issue date.
    pub date: NaiveDate,
    /// Payment due date.
    pub due_date: NaiveDate,
    /// Billed customer.
    pub customer_id: CustomerId,
    /// Tax amount on top of the lines.
    pub taxes: Money,
    /// Lines, in display order.
    pub items: Vec<LineItem>,
}

/// An invoice header with its typed lines.
#[derive(Debug, Clone)]
pub struct InvoiceWithItems {
    /// Header row.
    pub invoice: invoices::Model,
    /// Lines, in insertion order.
    pub items: Vec<LineItem>,
}

/// Invoice repository.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: Arc<DatabaseConnection>,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Creates an invoice and its lines atomically.
    ///
    /// `total_amount` is the sum of the line totals plus `taxes`.
    ///
    /// # Errors
    ///
    /// - [`RepoError::Domain`] if the total overflows `NUMERIC(10, 2)`
    /// - [`RepoError::Duplicate`] if the invoice number is taken
    /// - [`RepoError::MissingReference`] for an unknown customer, product or service
    pub async fn create(&self, input: NewInvoice) -> RepoResult<InvoiceWithItems> {
        let total = document_total(&input.items)?
            .checked_add(input.taxes)
            .map_err(ledgerly_core::DomainError::from)?;
        let now = Utc::now().naive_utc();

        let txn = self.db.begin().await?;

        let invoice = invoices::ActiveModel {
            business_id: Set(input.business_id.get()),
            invoice_number: Set(input.invoice_number),
            date: Set(input.date),
            due_date: Set(input.due_date),
            customer_id: Set(input.customer_id.get()),
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
                invoice_items::ActiveModel {
                    invoice_id: Set(invoice.id),
                    item_type: Set(cols.item_type),
                    product_id: Set(cols.product_id),
                    service_id: Set(cols.service_id),
                    quantity: Set(Some(cols.quantity)),
                    price: Set(cols.price.value()),
                    total: Set(cols.total.value()),
                    ..Default::default()
                }
            });
            invoice_items::Entity::insert_many(rows)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;

        tracing::info!(
            invoice_id = invoice.id,
            business_id = invoice.business_id,
            lines = input.items.len(),
            total = %total,
            "invoice created"
        );
        Ok(InvoiceWithItems {
            invoice,
            items: input.items,
        })
    }

    /// Finds an invoice by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: InvoiceId) -> RepoResult<Option<invoices::Model>> {
        Ok(invoices::Entity::find_by_id(id.get()).one(self.db.as_ref()).await?)
    }

    /// Loads an invoice with its lines.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Domain`] if a stored line is malformed.
    pub async fn find_with_items(&self, id: InvoiceId) -> RepoResult<Option<InvoiceWithItems>> {
        let Some(invoice) = invoices::Entity::find_by_id(id.get()).one(self.db.as_ref()).await? else {
            return Ok(None);
        };

        let rows = invoice
            .find_related(invoice_items::Entity)
            .order_by_asc(invoice_items::Column::Id)
            .all(self.db.as_ref())
            .await?;
        let items = rows
            .iter()
            .map(lines::from_invoice_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(InvoiceWithItems { invoice, items }))
    }

    /// Sets the payment status and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if the invoice does not exist.
    pub async fn update_payment_status(
        &self,
        id: InvoiceId,
        status: PaymentStatus,
    ) -> RepoResult<invoices::Model> {
        let invoice = invoices::Entity::find_by_id(id.get())
            .one(self.db.as_ref())
            .await?
            .ok_or(RepoError::not_found("invoice", id.get()))?;

        let mut active: invoices::ActiveModel = invoice.into();
        active.payment_status = Set(Some(status.as_str().to_string()));
        active.updated_at = Set(Some(Utc::now().naive_utc()));

        Ok(active.update(self.db.as_ref()).await?)
    }

    /// Deletes an invoice. Lines cascade; payments and credit notes keep
    /// their rows with the link set to `NULL`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: InvoiceId) -> RepoResult<bool> {
        let result = invoices::Entity::delete_by_id(id.get())
            .exec(self.db.as_ref())
            .await
            .map_err(RepoError::on_delete)?;
        Ok(result.rows_affected > 0)
    }

    /// Lists a business's invoices, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_business(
        &self,
        business_id: BusinessId,
        page: PageRequest,
    ) -> RepoResult<PageResponse<invoices::Model>> {
        let paginator = invoices::Entity::find()
            .filter(invoices::Column::BusinessId.eq(business_id.get()))
            .order_by_desc(invoices::Column::Date)
            .order_by_desc(invoices::Column::Id)
            .paginate(self.db.as_ref(), page.limit());

        let total = paginator.num_items().await?;
        let data = paginator.fetch_page(page.page_index()).await?;
        Ok(PageResponse::new(data, page, total))
    }

    /// Proposes the next invoice number for a business from its template.
    ///
    /// Numbers are unique across all businesses, so the caller must still
    /// handle [`RepoError::Duplicate`] on insert.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn suggest_number(
        &self,
        business_id: BusinessId,
        template: &InvoiceTemplate,
    ) -> RepoResult<String> {
        let issued = invoices::Entity::find()
            .filter(invoices::Column::BusinessId.eq(business_id.get()))
            .count(self.db.as_ref())
            .await?;
        let next = u32::try_from(issued).unwrap_or(u32::MAX - 1).saturating_add(1);
        Ok(template.number_for(next))
    }
}
