//! Fixed assets, loans and tax records.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use ledgerly_core::DomainError;
use ledgerly_shared::types::{BusinessId, LoanId, Money, Rate};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde_json::Value;

use super::error::{RepoError, RepoResult};
use crate::entities::{fixed_assets, loans, tax_records};

/// Input for a fixed asset.
#[derive(Debug, Clone)]
pub struct NewFixedAsset {
    /// Owning business.
    pub business_id: BusinessId,
    /// Name.
    pub name: String,
    /// Acquisition date.
    pub purchase_date: NaiveDate,
    /// Acquisition cost; also the opening book value.
    pub purchase_price: Money,
    /// Depreciation plan, schema owned by the client.
    pub depreciation_schedule: Option<Value>,
}

/// Input for a loan.
#[derive(Debug, Clone)]
pub struct NewLoan {
    /// Borrowing business.
    pub business_id: BusinessId,
    /// Lender.
    pub creditor_name: String,
    /// Principal; also the opening balance.
    pub original_amount: Money,
    /// Annual rate in percent.
    pub interest_rate: Option<Rate>,
    /// Repayment plan, schema owned by the client.
    pub payment_schedule: Option<Value>,
}

/// Input for a tax record.
#[derive(Debug, Clone)]
pub struct NewTaxRecord {
    /// Liable business.
    pub business_id: BusinessId,
    /// First day of the period.
    pub period_start: NaiveDate,
    /// Last day of the period.
    pub period_end: NaiveDate,
    /// Tax kind, e.g. `VAT`.
    pub tax_type: Option<String>,
    /// Amount owed.
    pub amount_due: Option<Money>,
}

/// Asset and liability repository.
#[derive(Debug, Clone)]
pub struct AssetRepository {
    db: Arc<DatabaseConnection>,
}

impl AssetRepository {
    /// Creates a new asset repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Registers a fixed asset at its purchase price.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::MissingReference`] if the business does not exist.
    pub async fn create_fixed_asset(&self, input: NewFixedAsset) -> RepoResult<fixed_assets::Model> {
        let now = Utc::now().naive_utc();
        let asset = fixed_assets::ActiveModel {
            business_id: Set(input.business_id.get()),
            name: Set(input.name),
            purchase_date: Set(input.purchase_date),
            purchase_price: Set(input.purchase_price.value()),
            depreciation_schedule: Set(input.depreciation_schedule),
            current_value: Set(Some(input.purchase_price.value())),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        };
        Ok(asset.insert(self.db.as_ref()).await?)
    }

    /// Writes a new book value and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if the asset does not exist.
    pub async fn revalue_asset(&self, id: i32, current_value: Money) -> RepoResult<fixed_assets::Model> {
        let asset = fixed_assets::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepoError::not_found("fixed asset", id))?;

        let mut active: fixed_assets::ActiveModel = asset.into();
        active.current_value = Set(Some(current_value.value()));
        active.updated_at = Set(Some(Utc::now().naive_utc()));

        Ok(active.update(self.db.as_ref()).await?)
    }

    /// Lists a business's fixed assets by purchase date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_fixed_assets(
        &self,
        business_id: BusinessId,
    ) -> RepoResult<Vec<fixed_assets::Model>> {
        Ok(fixed_assets::Entity::find()
            .filter(fixed_assets::Column::BusinessId.eq(business_id.get()))
            .order_by_asc(fixed_assets::Column::PurchaseDate)
            .all(self.db.as_ref())
            .await?)
    }

    /// Records a loan with its full principal outstanding.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::MissingReference`] if the business does not exist.
    pub async fn create_loan(&self, input: NewLoan) -> RepoResult<loans::Model> {
        let now = Utc::now().naive_utc();
        let loan = loans::ActiveModel {
            business_id: Set(input.business_id.get()),
            creditor_name: Set(input.creditor_name),
            original_amount: Set(input.original_amount.value()),
            interest_rate: Set(input.interest_rate.map(Rate::value)),
            payment_schedule: Set(input.payment_schedule),
            outstanding_balance: Set(input.original_amount.value()),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        };
        Ok(loan.insert(self.db.as_ref()).await?)
    }

    /// Reduces the outstanding balance by a repayment and bumps `updated_at`.
    ///
    /// The loan row stays locked until the new balance is written, so
    /// concurrent repayments are all applied.
    ///
    /// # Errors
    ///
    /// - [`RepoError::NotFound`] if the loan does not exist
    /// - [`RepoError::Domain`] if the stored balance does not fit
    pub async fn record_repayment(&self, id: LoanId, amount: Money) -> RepoResult<loans::Model> {
        let txn = self.db.begin().await?;
        let loan = loans::Entity::find_by_id(id.get())
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(RepoError::not_found("loan", id.get()))?;

        let balance = Money::new(loan.outstanding_balance)
            .and_then(|outstanding| outstanding.checked_sub(amount))
            .map_err(DomainError::from)?;

        let mut active: loans::ActiveModel = loan.into();
        active.outstanding_balance = Set(balance.value());
        active.updated_at = Set(Some(Utc::now().naive_utc()));
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Lists a business's loans.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_loans(&self, business_id: BusinessId) -> RepoResult<Vec<loans::Model>> {
        Ok(loans::Entity::find()
            .filter(loans::Column::BusinessId.eq(business_id.get()))
            .order_by_asc(loans::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    /// Records a tax liability, initially unfiled.
    ///
    /// # Errors
    ///
    /// - [`RepoError::Domain`] if the period ends before it starts
    /// - [`RepoError::MissingReference`] if the business does not exist
    pub async fn create_tax_record(&self, input: NewTaxRecord) -> RepoResult<tax_records::Model> {
        if input.period_end < input.period_start {
            return Err(DomainError::InvalidPeriod {
                start: input.period_start,
                end: input.period_end,
            }
            .into());
        }

        let now = Utc::now().naive_utc();
        let record = tax_records::ActiveModel {
            business_id: Set(input.business_id.get()),
            period_start: Set(input.period_start),
            period_end: Set(input.period_end),
            tax_type: Set(input.tax_type),
            amount_due: Set(input.amount_due.map(Money::value)),
            filed: Set(Some(false)),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        };
        Ok(record.insert(self.db.as_ref()).await?)
    }

    /// Marks a tax record as filed and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if the record does not exist.
    pub async fn mark_filed(&self, id: i32) -> RepoResult<tax_records::Model> {
        let record = tax_records::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepoError::not_found("tax record", id))?;

        let mut active: tax_records::ActiveModel = record.into();
        active.filed = Set(Some(true));
        active.updated_at = Set(Some(Utc::now().naive_utc()));

        Ok(active.update(self.db.as_ref()).await?)
    }

    /// Lists unfiled tax records, earliest period first. `NULL` counts as
    /// unfiled.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_unfiled(&self, business_id: BusinessId) -> RepoResult<Vec<tax_records::Model>> {
        Ok(tax_records::Entity::find()
            .filter(tax_records::Column::BusinessId.eq(business_id.get()))
            .filter(
                Condition::any()
                    .add(tax_records::Column::Filed.eq(false))
                    .add(tax_records::Column::Filed.is_null()),
            )
            .order_by_asc(tax_records::Column::PeriodStart)
            .all(self.db.as_ref())
            .await?)
    }
}
