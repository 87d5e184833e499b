//! Chart of accounts and general ledger rows.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use ledgerly_core::DomainError;
use ledgerly_core::documents::DocumentReference;
use ledgerly_core::ledger::{AccountType, LedgerPosting};
use ledgerly_shared::types::{AccountId, BusinessId, Money};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::error::{RepoError, RepoResult};
use crate::entities::{chart_of_accounts, general_ledger};

/// Input for a chart of accounts entry.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Owning business.
    pub business_id: BusinessId,
    /// Display name.
    pub account_name: String,
    /// Classification.
    pub account_type: AccountType,
    /// Optional account code, e.g. `1100`.
    pub account_number: Option<String>,
    /// Description.
    pub description: Option<String>,
}

/// Rebuilds a posting from a stored ledger row. `NULL` amounts read as zero.
///
/// # Errors
///
/// Returns [`DomainError`] if an amount does not fit or the reference
/// columns are half-populated.
pub fn posting_from_row(row: &general_ledger::Model) -> Result<LedgerPosting, DomainError> {
    let amount = |value: Option<rust_decimal::Decimal>| {
        value.map_or(Ok(Money::zero()), Money::new)
    };
    Ok(LedgerPosting {
        account_id: AccountId::new(row.account_id),
        transaction_date: row.transaction_date,
        description: row.description.clone(),
        debit: amount(row.debit)?,
        credit: amount(row.credit)?,
        reference: DocumentReference::from_columns(row.reference_type.as_deref(), row.reference_id)?,
    })
}

/// Ledger repository.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: Arc<DatabaseConnection>,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Adds an account to the chart of accounts.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::MissingReference`] if the business does not exist.
    pub async fn create_account(&self, input: NewAccount) -> RepoResult<chart_of_accounts::Model> {
        let now = Utc::now().naive_utc();
        let account = chart_of_accounts::ActiveModel {
            business_id: Set(input.business_id.get()),
            account_name: Set(input.account_name),
            account_type: Set(input.account_type.as_str().to_string()),
            account_number: Set(input.account_number),
            description: Set(input.description),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        };
        Ok(account.insert(self.db.as_ref()).await?)
    }

    /// Lists a business's accounts, ordered by account number then name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(
        &self,
        business_id: BusinessId,
    ) -> RepoResult<Vec<chart_of_accounts::Model>> {
        Ok(chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::BusinessId.eq(business_id.get()))
            .order_by_asc(chart_of_accounts::Column::AccountNumber)
            .order_by_asc(chart_of_accounts::Column::AccountName)
            .all(self.db.as_ref())
            .await?)
    }

    /// Lists accounts of one type.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts_of_type(
        &self,
        business_id: BusinessId,
        account_type: AccountType,
    ) -> RepoResult<Vec<chart_of_accounts::Model>> {
        Ok(chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::BusinessId.eq(business_id.get()))
            .filter(chart_of_accounts::Column::AccountType.eq(account_type.as_str()))
            .order_by_asc(chart_of_accounts::Column::AccountName)
            .all(self.db.as_ref())
            .await?)
    }

    /// Deletes an account.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Restricted`] while ledger rows post to it.
    pub async fn delete_account(&self, id: AccountId) -> RepoResult<bool> {
        let result = chart_of_accounts::Entity::delete_by_id(id.get())
            .exec(self.db.as_ref())
            .await
            .map_err(RepoError::on_delete)?;
        Ok(result.rows_affected > 0)
    }

    /// Appends postings in one transaction. Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::MissingReference`] if an account does not exist;
    /// nothing is written in that case.
    pub async fn post(&self, business_id: BusinessId, postings: &[LedgerPosting]) -> RepoResult<usize> {
        if postings.is_empty() {
            return Ok(0);
        }

        let now = Utc::now().naive_utc();
        let rows = postings.iter().map(|posting| {
            let (reference_type, reference_id) = posting
                .reference
                .as_ref()
                .map(DocumentReference::columns)
                .unzip();
            general_ledger::ActiveModel {
                business_id: Set(business_id.get()),
                transaction_date: Set(posting.transaction_date),
                description: Set(posting.description.clone()),
                account_id: Set(posting.account_id.get()),
                debit: Set(Some(posting.debit.value())),
                credit: Set(Some(posting.credit.value())),
                reference_id: Set(reference_id),
                reference_type: Set(reference_type),
                created_at: Set(Some(now)),
                updated_at: Set(Some(now)),
                ..Default::default()
            }
        });

        let txn = self.db.begin().await?;
        general_ledger::Entity::insert_many(rows)
            .exec_without_returning(&txn)
            .await?;
        txn.commit().await?;

        tracing::debug!(business_id = business_id.get(), rows = postings.len(), "ledger rows posted");
        Ok(postings.len())
    }

    /// Lists postings that cite `reference`, in posting order.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Domain`] if a stored row is malformed.
    pub async fn list_for_reference(
        &self,
        reference: &DocumentReference,
    ) -> RepoResult<Vec<LedgerPosting>> {
        let (kind, id) = reference.columns();
        let rows = general_ledger::Entity::find()
            .filter(general_ledger::Column::ReferenceType.eq(kind))
            .filter(general_ledger::Column::ReferenceId.eq(id))
            .order_by_asc(general_ledger::Column::Id)
            .all(self.db.as_ref())
            .await?;

        Ok(rows
            .iter()
            .map(posting_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    /// Lists an account's postings between two dates, inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Domain`] if a stored row is malformed.
    pub async fn list_for_account(
        &self,
        account_id: AccountId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepoResult<Vec<LedgerPosting>> {
        let rows = general_ledger::Entity::find()
            .filter(general_ledger::Column::AccountId.eq(account_id.get()))
            .filter(general_ledger::Column::TransactionDate.between(from, to))
            .order_by_asc(general_ledger::Column::TransactionDate)
            .order_by_asc(general_ledger::Column::Id)
            .all(self.db.as_ref())
            .await?;

        Ok(rows
            .iter()
            .map(posting_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::transaction_log;
    use ledgerly_shared::types::InvoiceId;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn row(reference_type: Option<&str>, reference_id: Option<i32>) -> general_ledger::Model {
        general_ledger::Model {
            id: 1,
            business_id: 1,
            transaction_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            description: Some("sale".to_string()),
            account_id: 12,
            debit: Some(dec!(19.99)),
            credit: None,
            reference_id,
            reference_type: reference_type.map(str::to_string),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_posting_from_row_reads_reference_and_null_credit() {
        let posting = posting_from_row(&row(Some("invoice"), Some(5))).unwrap();
        assert_eq!(posting.reference, Some(DocumentReference::from(InvoiceId::new(5))));
        assert_eq!(posting.debit, Money::parse("19.99").unwrap());
        assert!(posting.credit.is_zero());
    }

    #[test]
    fn test_posting_from_row_rejects_half_reference() {
        assert!(posting_from_row(&row(Some("invoice"), None)).is_err());
    }

    #[tokio::test]
    async fn test_post_writes_reference_columns() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 2,
            }])
            .into_connection();
        let db = Arc::new(db);
        let repo = LedgerRepository::new(Arc::clone(&db));

        let date = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        let amount = Money::parse("19.99").unwrap();
        let reference = DocumentReference::from(InvoiceId::new(5));
        let postings = [
            LedgerPosting::debit(AccountId::new(1), date, amount).with_reference(reference.clone()),
            LedgerPosting::credit(AccountId::new(2), date, amount).with_reference(reference),
        ];

        let written = repo.post(BusinessId::new(1), &postings).await.unwrap();
        assert_eq!(written, 2);

        let log = format!("{:?}", transaction_log(repo, db));
        assert!(log.contains("\\\"reference_type\\\""));
        assert!(log.contains("invoice"));
    }

    #[tokio::test]
    async fn test_post_nothing_skips_database() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let db = Arc::new(db);
        let repo = LedgerRepository::new(Arc::clone(&db));

        assert_eq!(repo.post(BusinessId::new(1), &[]).await.unwrap(), 0);
        assert!(transaction_log(repo, db).is_empty());
    }
}
