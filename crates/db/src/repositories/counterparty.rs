//! Customers and suppliers.
//!
//! Both tables share one shape, so they share one input type.

use std::sync::Arc;

use chrono::Utc;
use ledgerly_shared::types::{BusinessId, CustomerId, SupplierId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::error::{RepoError, RepoResult};
use crate::entities::{customers, suppliers};

/// Input for creating a customer or supplier.
#[derive(Debug, Clone)]
pub struct NewCounterparty {
    /// Owning business.
    pub business_id: BusinessId,
    /// Name.
    pub name: String,
    /// Phone.
    pub phone: Option<String>,
    /// Email.
    pub email: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Payment terms, e.g. `Net 30`.
    pub payment_terms: Option<String>,
}

/// Repository for customers and suppliers.
#[derive(Debug, Clone)]
pub struct CounterpartyRepository {
    db: Arc<DatabaseConnection>,
}

impl CounterpartyRepository {
    /// Creates a new counterparty repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Creates a customer.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::MissingReference`] if the business does not exist.
    pub async fn create_customer(&self, input: NewCounterparty) -> RepoResult<customers::Model> {
        let now = Utc::now().naive_utc();
        let customer = customers::ActiveModel {
            business_id: Set(input.business_id.get()),
            name: Set(input.name),
            phone: Set(input.phone),
            email: Set(input.email),
            address: Set(input.address),
            payment_terms: Set(input.payment_terms),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        };
        Ok(customer.insert(self.db.as_ref()).await?)
    }

    /// Finds a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_customer(&self, id: CustomerId) -> RepoResult<Option<customers::Model>> {
        Ok(customers::Entity::find_by_id(id.get()).one(self.db.as_ref()).await?)
    }

    /// Lists customers of a business by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_customers(&self, business_id: BusinessId) -> RepoResult<Vec<customers::Model>> {
        Ok(customers::Entity::find()
            .filter(customers::Column::BusinessId.eq(business_id.get()))
            .order_by_asc(customers::Column::Name)
            .all(self.db.as_ref())
            .await?)
    }

    /// Deletes a customer.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Restricted`] while invoices, credit notes or
    /// sales receipts still reference the customer.
    pub async fn delete_customer(&self, id: CustomerId) -> RepoResult<bool> {
        let result = customers::Entity::delete_by_id(id.get())
            .exec(self.db.as_ref())
            .await
            .map_err(RepoError::on_delete)?;
        Ok(result.rows_affected > 0)
    }

    /// Creates a supplier.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::MissingReference`] if the business does not exist.
    pub async fn create_supplier(&self, input: NewCounterparty) -> RepoResult<suppliers::Model> {
        let now = Utc::now().naive_utc();
        let supplier = suppliers::ActiveModel {
            business_id: Set(input.business_id.get()),
            name: Set(input.name),
            phone: Set(input.phone),
            email: Set(input.email),
            address: Set(input.address),
            payment_terms: Set(input.payment_terms),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        };
        Ok(supplier.insert(self.db.as_ref()).await?)
    }

    /// Finds a supplier by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_supplier(&self, id: SupplierId) -> RepoResult<Option<suppliers::Model>> {
        Ok(suppliers::Entity::find_by_id(id.get()).one(self.db.as_ref()).await?)
    }

    /// Lists suppliers of a business by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_suppliers(&self, business_id: BusinessId) -> RepoResult<Vec<suppliers::Model>> {
        Ok(suppliers::Entity::find()
            .filter(suppliers::Column::BusinessId.eq(business_id.get()))
            .order_by_asc(suppliers::Column::Name)
            .all(self.db.as_ref())
            .await?)
    }

    /// Deletes a supplier.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Restricted`] while bills, debit notes or
    /// expense receipts still reference the supplier.
    pub async fn delete_supplier(&self, id: SupplierId) -> RepoResult<bool> {
        let result = suppliers::Entity::delete_by_id(id.get())
            .exec(self.db.as_ref())
            .await
            .map_err(RepoError::on_delete)?;
        Ok(result.rows_affected > 0)
    }
}
