//! Business repository: the tenant root.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use ledgerly_shared::types::BusinessId;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, Set};

use super::error::{RepoError, RepoResult};
use crate::entities::{businesses, users};

/// Default ISO currency of a new business.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Input for creating a business.
#[derive(Debug, Clone, Default)]
pub struct NewBusiness {
    /// Legal or trading name.
    pub name: String,
    /// Legal form, e.g. `LLC`.
    pub business_type: Option<String>,
    /// Industry.
    pub industry: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Contact phone.
    pub contact_phone: Option<String>,
    /// Contact email.
    pub contact_email: Option<String>,
    /// EIN, VAT or similar.
    pub tax_id: Option<String>,
    /// First day of the fiscal year.
    pub fiscal_year_start: Option<NaiveDate>,
    /// ISO currency; `USD` when absent.
    pub currency: Option<String>,
}

/// Partial update of a business. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct BusinessUpdate {
    /// New name.
    pub name: Option<String>,
    /// New address (`Some(None)` clears it).
    pub address: Option<Option<String>>,
    /// New contact email (`Some(None)` clears it).
    pub contact_email: Option<Option<String>>,
    /// New tax id (`Some(None)` clears it).
    pub tax_id: Option<Option<String>>,
    /// New currency.
    pub currency: Option<String>,
}

/// Business repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct BusinessRepository {
    db: Arc<DatabaseConnection>,
}

impl BusinessRepository {
    /// Creates a new business repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Creates a business.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: NewBusiness) -> RepoResult<businesses::Model> {
        let now = Utc::now().naive_utc();
        let business = businesses::ActiveModel {
            name: Set(input.name),
            r#type: Set(input.business_type),
            industry: Set(input.industry),
            address: Set(input.address),
            contact_phone: Set(input.contact_phone),
            contact_email: Set(input.contact_email),
            tax_id: Set(input.tax_id),
            fiscal_year_start: Set(input.fiscal_year_start),
            currency: Set(Some(
                input.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            )),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        };

        let business = business.insert(self.db.as_ref()).await?;
        tracing::info!(business_id = business.id, "business created");
        Ok(business)
    }

    /// Finds a business by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: BusinessId) -> RepoResult<Option<businesses::Model>> {
        Ok(businesses::Entity::find_by_id(id.get()).one(self.db.as_ref()).await?)
    }

    /// Applies a partial update and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if the business does not exist.
    pub async fn update(
        &self,
        id: BusinessId,
        update: BusinessUpdate,
    ) -> RepoResult<businesses::Model> {
        let existing = businesses::Entity::find_by_id(id.get())
            .one(self.db.as_ref())
            .await?
            .ok_or(RepoError::not_found("business", id.get()))?;

        let mut active: businesses::ActiveModel = existing.into();
        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(address) = update.address {
            active.address = Set(address);
        }
        if let Some(contact_email) = update.contact_email {
            active.contact_email = Set(contact_email);
        }
        if let Some(tax_id) = update.tax_id {
            active.tax_id = Set(tax_id);
        }
        if let Some(currency) = update.currency {
            active.currency = Set(Some(currency));
        }
        active.updated_at = Set(Some(Utc::now().naive_utc()));

        Ok(active.update(self.db.as_ref()).await?)
    }

    /// Deletes a business and, through `ON DELETE CASCADE`, everything it owns.
    ///
    /// Returns `false` if the business did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Restricted`] while a row outside the cascade
    /// (an audit trail entry written by one of its users) still points into it.
    pub async fn delete(&self, id: BusinessId) -> RepoResult<bool> {
        let result = businesses::Entity::delete_by_id(id.get())
            .exec(self.db.as_ref())
            .await
            .map_err(RepoError::on_delete)?;

        if result.rows_affected > 0 {
            tracing::info!(business_id = id.get(), "business deleted");
        }
        Ok(result.rows_affected > 0)
    }

    /// Loads a business together with its users.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_with_users(
        &self,
        id: BusinessId,
    ) -> RepoResult<Option<(businesses::Model, Vec<users::Model>)>> {
        let Some(business) = businesses::Entity::find_by_id(id.get()).one(self.db.as_ref()).await? else {
            return Ok(None);
        };
        let members = business.find_related(users::Entity).all(self.db.as_ref()).await?;
        Ok(Some((business, members)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::transaction_log;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn business(id: i32, name: &str) -> businesses::Model {
        let now = Utc::now().naive_utc();
        businesses::Model {
            id,
            name: name.to_string(),
            r#type: None,
            industry: None,
            address: None,
            contact_phone: None,
            contact_email: None,
            tax_id: None,
            fiscal_year_start: None,
            currency: Some("USD".to_string()),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![business(1, "Acme")]])
            .into_connection();
        let repo = BusinessRepository::new(Arc::new(db));

        let found = repo.find_by_id(BusinessId::new(1)).await.unwrap().unwrap();
        assert_eq!(found.name, "Acme");
    }

    #[tokio::test]
    async fn test_update_sets_updated_at() {
        let mut renamed = business(1, "Acme Ltd");
        renamed.updated_at = Some(Utc::now().naive_utc());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![business(1, "Acme")], vec![renamed]])
            .into_connection();
        let db = Arc::new(db);
        let repo = BusinessRepository::new(Arc::clone(&db));

        let updated = repo
            .update(
                BusinessId::new(1),
                BusinessUpdate {
                    name: Some("Acme Ltd".to_string()),
                    ..BusinessUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Acme Ltd");

        let log = format!("{:?}", transaction_log(repo, db));
        assert!(log.contains("UPDATE \\\"businesses\\\" SET"));
        assert!(log.contains("\\\"updated_at\\\""));
    }

    #[tokio::test]
    async fn test_update_missing_business() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<businesses::Model>::new()])
            .into_connection();
        let repo = BusinessRepository::new(Arc::new(db));

        let err = repo
            .update(BusinessId::new(9), BusinessUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound { entity: "business", id: 9 }));
    }

    #[tokio::test]
    async fn test_delete_reports_missing_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let repo = BusinessRepository::new(Arc::new(db));

        assert!(!repo.delete(BusinessId::new(3)).await.unwrap());
    }
}
