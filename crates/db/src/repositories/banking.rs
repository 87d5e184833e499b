//! Bank and cash accounts, bank transactions and reconciliations.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use ledgerly_core::DomainError;
use ledgerly_shared::types::{BankAccountId, BusinessId, Money};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::error::{RepoError, RepoResult};
use crate::entities::{bank_accounts, bank_reconciliations, bank_transactions, cash_accounts};

/// Input for a bank account.
#[derive(Debug, Clone)]
pub struct NewBankAccount {
    /// Owning business.
    pub business_id: BusinessId,
    /// Bank name.
    pub bank_name: Option<String>,
    /// Account holder name.
    pub account_name: Option<String>,
    /// Account number, globally unique when present.
    pub account_number: Option<String>,
}

/// Input for a bank statement line.
#[derive(Debug, Clone)]
pub struct NewBankTransaction {
    /// Account the line belongs to.
    pub bank_account_id: BankAccountId,
    /// Value date.
    pub date: NaiveDate,
    /// Statement text.
    pub description: Option<String>,
    /// Signed amount; withdrawals are negative.
    pub amount: Money,
}

/// Banking repository.
#[derive(Debug, Clone)]
pub struct BankingRepository {
    db: Arc<DatabaseConnection>,
}

impl BankingRepository {
    /// Creates a new banking repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Opens a bank account.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Duplicate`] if the account number is taken.
    pub async fn create_bank_account(&self, input: NewBankAccount) -> RepoResult<bank_accounts::Model> {
        let now = Utc::now().naive_utc();
        let account = bank_accounts::ActiveModel {
            business_id: Set(input.business_id.get()),
            bank_name: Set(input.bank_name),
            account_name: Set(input.account_name),
            account_number: Set(input.account_number),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        };
        Ok(account.insert(self.db.as_ref()).await?)
    }

    /// Lists a business's bank accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_bank_accounts(
        &self,
        business_id: BusinessId,
    ) -> RepoResult<Vec<bank_accounts::Model>> {
        Ok(bank_accounts::Entity::find()
            .filter(bank_accounts::Column::BusinessId.eq(business_id.get()))
            .order_by_asc(bank_accounts::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    /// Opens a cash account (petty cash, till).
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::MissingReference`] if the business does not exist.
    pub async fn create_cash_account(
        &self,
        business_id: BusinessId,
        account_name: Option<String>,
    ) -> RepoResult<cash_accounts::Model> {
        let now = Utc::now().naive_utc();
        let account = cash_accounts::ActiveModel {
            business_id: Set(business_id.get()),
            account_name: Set(account_name),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        };
        Ok(account.insert(self.db.as_ref()).await?)
    }

    /// Lists a business's cash accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_cash_accounts(
        &self,
        business_id: BusinessId,
    ) -> RepoResult<Vec<cash_accounts::Model>> {
        Ok(cash_accounts::Entity::find()
            .filter(cash_accounts::Column::BusinessId.eq(business_id.get()))
            .order_by_asc(cash_accounts::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    /// Records a statement line, initially unreconciled.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::MissingReference`] if the account does not exist.
    pub async fn record_transaction(
        &self,
        input: NewBankTransaction,
    ) -> RepoResult<bank_transactions::Model> {
        let now = Utc::now().naive_utc();
        let transaction = bank_transactions::ActiveModel {
            bank_account_id: Set(input.bank_account_id.get()),
            date: Set(input.date),
            description: Set(input.description),
            amount: Set(input.amount.value()),
            reconciled: Set(Some(false)),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        };
        Ok(transaction.insert(self.db.as_ref()).await?)
    }

    /// Lists unreconciled lines of an account, oldest first.
    /// `NULL` counts as unreconciled.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_unreconciled(
        &self,
        account_id: BankAccountId,
    ) -> RepoResult<Vec<bank_transactions::Model>> {
        Ok(bank_transactions::Entity::find()
            .filter(bank_transactions::Column::BankAccountId.eq(account_id.get()))
            .filter(
                bank_transactions::Column::Reconciled
                    .eq(false)
                    .or(bank_transactions::Column::Reconciled.is_null()),
            )
            .order_by_asc(bank_transactions::Column::Date)
            .order_by_asc(bank_transactions::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    /// Marks one statement line as reconciled and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if the line does not exist.
    pub async fn mark_reconciled(&self, id: i32) -> RepoResult<bank_transactions::Model> {
        let transaction = bank_transactions::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepoError::not_found("bank transaction", id))?;

        let mut active: bank_transactions::ActiveModel = transaction.into();
        active.reconciled = Set(Some(true));
        active.updated_at = Set(Some(Utc::now().naive_utc()));

        Ok(active.update(self.db.as_ref()).await?)
    }

    /// Records a statement check. The reconciled balance is the sum of all
    /// reconciled lines dated on or before the statement date.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Domain`] if the balance overflows.
    pub async fn record_reconciliation(
        &self,
        account_id: BankAccountId,
        statement_date: NaiveDate,
        statement_balance: Money,
    ) -> RepoResult<bank_reconciliations::Model> {
        let txn = self.db.begin().await?;

        let reconciled = bank_transactions::Entity::find()
            .filter(bank_transactions::Column::BankAccountId.eq(account_id.get()))
            .filter(bank_transactions::Column::Reconciled.eq(true))
            .filter(bank_transactions::Column::Date.lte(statement_date))
            .all(&txn)
            .await?;
        let balance = reconciled
            .iter()
            .try_fold(Money::zero(), |acc, line| -> Result<Money, DomainError> {
                Ok(acc.checked_add(Money::new(line.amount)?)?)
            })?;

        let now = Utc::now().naive_utc();
        let reconciliation = bank_reconciliations::ActiveModel {
            bank_account_id: Set(account_id.get()),
            statement_date: Set(statement_date),
            statement_balance: Set(statement_balance.value()),
            reconciled_balance: Set(Some(balance.value())),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        if balance != statement_balance {
            tracing::warn!(
                bank_account_id = account_id.get(),
                statement = %statement_balance,
                reconciled = %balance,
                "statement does not match reconciled lines"
            );
        }
        Ok(reconciliation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::transaction_log;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn line(id: i32, amount: Decimal, reconciled: Option<bool>) -> bank_transactions::Model {
        bank_transactions::Model {
            id,
            bank_account_id: 1,
            date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            description: None,
            amount,
            reconciled,
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_mark_reconciled_sets_updated_at() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![line(4, dec!(10.00), None)],
                vec![line(4, dec!(10.00), Some(true))],
            ])
            .into_connection();
        let db = Arc::new(db);
        let repo = BankingRepository::new(Arc::clone(&db));

        let updated = repo.mark_reconciled(4).await.unwrap();
        assert_eq!(updated.reconciled, Some(true));

        let log = format!("{:?}", transaction_log(repo, db));
        assert!(log.contains("\\\"updated_at\\\""));
    }

    #[tokio::test]
    async fn test_reconciliation_sums_reconciled_lines() {
        let date = NaiveDate::from_ymd_opt(2026, 4, 30).unwrap();
        let stored = bank_reconciliations::Model {
            id: 1,
            bank_account_id: 1,
            statement_date: date,
            statement_balance: dec!(70.01),
            reconciled_balance: Some(dec!(70.01)),
            created_at: None,
            updated_at: None,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                line(1, dec!(100.00), Some(true)),
                line(2, dec!(-29.99), Some(true)),
            ]])
            .append_query_results([vec![stored]])
            .into_connection();
        let db = Arc::new(db);
        let repo = BankingRepository::new(Arc::clone(&db));

        let reconciliation = repo
            .record_reconciliation(BankAccountId::new(1), date, Money::parse("70.01").unwrap())
            .await
            .unwrap();
        assert_eq!(reconciliation.reconciled_balance, Some(dec!(70.01)));

        let log = format!("{:?}", transaction_log(repo, db));
        assert!(log.contains("70.01"));
    }
}
