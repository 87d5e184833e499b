//! Products and services.

use std::sync::Arc;

use chrono::Utc;
use ledgerly_shared::types::{BusinessId, Money, ProductId, ServiceId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::error::{RepoError, RepoResult};
use crate::entities::{products, services};

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Owning business.
    pub business_id: BusinessId,
    /// Name.
    pub name: String,
    /// Stock keeping unit, globally unique when present.
    pub sku: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Cost price.
    pub purchase_price: Option<Money>,
    /// List price.
    pub sales_price: Option<Money>,
    /// Opening stock.
    pub quantity_on_hand: i32,
}

/// Input for creating a service.
#[derive(Debug, Clone)]
pub struct NewService {
    /// Owning business.
    pub business_id: BusinessId,
    /// Name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// List price.
    pub sales_price: Option<Money>,
}

/// Repository for the product and service catalog.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    db: Arc<DatabaseConnection>,
}

impl CatalogRepository {
    /// Creates a new catalog repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Creates a product.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Duplicate`] if the SKU is taken.
    pub async fn create_product(&self, input: NewProduct) -> RepoResult<products::Model> {
        let now = Utc::now().naive_utc();
        let product = products::ActiveModel {
            business_id: Set(input.business_id.get()),
            name: Set(input.name),
            sku: Set(input.sku),
            description: Set(input.description),
            purchase_price: Set(input.purchase_price.map(Money::value)),
            sales_price: Set(input.sales_price.map(Money::value)),
            quantity_on_hand: Set(Some(input.quantity_on_hand)),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        };
        Ok(product.insert(self.db.as_ref()).await?)
    }

    /// Finds a product by SKU.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_product_by_sku(&self, sku: &str) -> RepoResult<Option<products::Model>> {
        Ok(products::Entity::find()
            .filter(products::Column::Sku.eq(sku))
            .one(self.db.as_ref())
            .await?)
    }

    /// Lists products of a business by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_products(&self, business_id: BusinessId) -> RepoResult<Vec<products::Model>> {
        Ok(products::Entity::find()
            .filter(products::Column::BusinessId.eq(business_id.get()))
            .order_by_asc(products::Column::Name)
            .all(self.db.as_ref())
            .await?)
    }

    /// Adds `delta` (which may be negative) to the stock level and bumps
    /// `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if the product does not exist.
    pub async fn adjust_stock(&self, id: ProductId, delta: i32) -> RepoResult<products::Model> {
        let product = products::Entity::find_by_id(id.get())
            .one(self.db.as_ref())
            .await?
            .ok_or(RepoError::not_found("product", id.get()))?;

        let on_hand = product.quantity_on_hand.unwrap_or(0).saturating_add(delta);
        let mut active: products::ActiveModel = product.into();
        active.quantity_on_hand = Set(Some(on_hand));
        active.updated_at = Set(Some(Utc::now().naive_utc()));

        Ok(active.update(self.db.as_ref()).await?)
    }

    /// Deletes a product.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Restricted`] while invoice or bill lines use it.
    pub async fn delete_product(&self, id: ProductId) -> RepoResult<bool> {
        let result = products::Entity::delete_by_id(id.get())
            .exec(self.db.as_ref())
            .await
            .map_err(RepoError::on_delete)?;
        Ok(result.rows_affected > 0)
    }

    /// Creates a service.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::MissingReference`] if the business does not exist.
    pub async fn create_service(&self, input: NewService) -> RepoResult<services::Model> {
        let now = Utc::now().naive_utc();
        let service = services::ActiveModel {
            business_id: Set(input.business_id.get()),
            name: Set(input.name),
            description: Set(input.description),
            sales_price: Set(input.sales_price.map(Money::value)),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        };
        Ok(service.insert(self.db.as_ref()).await?)
    }

    /// Lists services of a business by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_services(&self, business_id: BusinessId) -> RepoResult<Vec<services::Model>> {
        Ok(services::Entity::find()
            .filter(services::Column::BusinessId.eq(business_id.get()))
            .order_by_asc(services::Column::Name)
            .all(self.db.as_ref())
            .await?)
    }

    /// Deletes a service.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Restricted`] while invoice or bill lines use it.
    pub async fn delete_service(&self, id: ServiceId) -> RepoResult<bool> {
        let result = services::Entity::delete_by_id(id.get())
            .exec(self.db.as_ref())
            .await
            .map_err(RepoError::on_delete)?;
        Ok(result.rows_affected > 0)
    }
}
