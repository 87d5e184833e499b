//! Credit notes (to customers) and debit notes (from suppliers).

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use ledgerly_shared::types::{BillId, BusinessId, CustomerId, InvoiceId, Money, SupplierId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::error::{RepoError, RepoResult};
use crate::entities::{credit_notes, debit_notes};

/// Input for a credit note.
#[derive(Debug, Clone)]
pub struct NewCreditNote {
    /// Issuing business.
    pub business_id: BusinessId,
    /// Note number, globally unique.
    pub credit_number: String,
    /// Note date.
    pub date: NaiveDate,
    /// Credited customer.
    pub customer_id: CustomerId,
    /// Credited amount.
    pub amount: Money,
    /// Reason shown on the note.
    pub reason: Option<String>,
    /// Invoice being corrected, if any.
    pub invoice_id: Option<InvoiceId>,
}

/// Input for a debit note.
#[derive(Debug, Clone)]
pub struct NewDebitNote {
    /// Receiving business.
    pub business_id: BusinessId,
    /// Note number, globally unique.
    pub debit_number: String,
    /// Note date.
    pub date: NaiveDate,
    /// Supplier the note is raised against.
    pub supplier_id: SupplierId,
    /// Debited amount.
    pub amount: Money,
    /// Reason shown on the note.
    pub reason: Option<String>,
    /// Bill being corrected, if any.
    pub bill_id: Option<BillId>,
}

/// Credit and debit note repository.
#[derive(Debug, Clone)]
pub struct NoteRepository {
    db: Arc<DatabaseConnection>,
}

impl NoteRepository {
    /// Creates a new note repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Issues a credit note.
    ///
    /// # Errors
    ///
    /// - [`RepoError::Duplicate`] if the note number is taken
    /// - [`RepoError::MissingReference`] for an unknown customer or invoice
    pub async fn create_credit_note(&self, input: NewCreditNote) -> RepoResult<credit_notes::Model> {
        let now = Utc::now().naive_utc();
        let note = credit_notes::ActiveModel {
            business_id: Set(input.business_id.get()),
            credit_number: Set(input.credit_number),
            date: Set(input.date),
            customer_id: Set(input.customer_id.get()),
            amount: Set(input.amount.value()),
            reason: Set(input.reason),
            invoice_id: Set(input.invoice_id.map(InvoiceId::get)),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        tracing::info!(credit_note_id = note.id, invoice_id = ?note.invoice_id, "credit note issued");
        Ok(note)
    }

    /// Records a debit note.
    ///
    /// # Errors
    ///
    /// - [`RepoError::Duplicate`] if the note number is taken
    /// - [`RepoError::MissingReference`] for an unknown supplier or bill
    pub async fn create_debit_note(&self, input: NewDebitNote) -> RepoResult<debit_notes::Model> {
        let now = Utc::now().naive_utc();
        let note = debit_notes::ActiveModel {
            business_id: Set(input.business_id.get()),
            debit_number: Set(input.debit_number),
            date: Set(input.date),
            supplier_id: Set(input.supplier_id.get()),
            amount: Set(input.amount.value()),
            reason: Set(input.reason),
            bill_id: Set(input.bill_id.map(BillId::get)),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        tracing::info!(debit_note_id = note.id, bill_id = ?note.bill_id, "debit note recorded");
        Ok(note)
    }

    /// Lists credit notes raised against an invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn credit_notes_for_invoice(&self, id: InvoiceId) -> RepoResult<Vec<credit_notes::Model>> {
        Ok(credit_notes::Entity::find()
            .filter(credit_notes::Column::InvoiceId.eq(id.get()))
            .order_by_asc(credit_notes::Column::Date)
            .all(self.db.as_ref())
            .await?)
    }

    /// Lists debit notes raised against a bill.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn debit_notes_for_bill(&self, id: BillId) -> RepoResult<Vec<debit_notes::Model>> {
        Ok(debit_notes::Entity::find()
            .filter(debit_notes::Column::BillId.eq(id.get()))
            .order_by_asc(debit_notes::Column::Date)
            .all(self.db.as_ref())
            .await?)
    }

    /// Lists a customer's credit notes, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn credit_notes_for_customer(
        &self,
        id: CustomerId,
    ) -> RepoResult<Vec<credit_notes::Model>> {
        Ok(credit_notes::Entity::find()
            .filter(credit_notes::Column::CustomerId.eq(id.get()))
            .order_by_desc(credit_notes::Column::Date)
            .all(self.db.as_ref())
            .await?)
    }

    /// Lists a supplier's debit notes, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn debit_notes_for_supplier(
        &self,
        id: SupplierId,
    ) -> RepoResult<Vec<debit_notes::Model>> {
        Ok(debit_notes::Entity::find()
            .filter(debit_notes::Column::SupplierId.eq(id.get()))
            .order_by_desc(debit_notes::Column::Date)
            .all(self.db.as_ref())
            .await?)
    }

    /// Deletes a credit note.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete_credit_note(&self, id: i32) -> RepoResult<bool> {
        let result = credit_notes::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(RepoError::on_delete)?;
        Ok(result.rows_affected > 0)
    }
}
