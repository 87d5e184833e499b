//! Per-business settings, one row per business.

use std::sync::Arc;

use chrono::Utc;
use ledgerly_core::settings::{BusinessSettings, SettingsColumns};
use ledgerly_shared::types::BusinessId;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::error::RepoResult;
use crate::entities::settings;

/// Settings repository.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    db: Arc<DatabaseConnection>,
}

fn columns_of(row: settings::Model) -> SettingsColumns {
    SettingsColumns {
        invoice_template: row.invoice_template,
        tax_rates: row.tax_rates,
        reporting_periods: row.reporting_periods,
    }
}

impl SettingsRepository {
    /// Creates a new settings repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Loads a business's settings, or defaults when none are stored.
    ///
    /// # Errors
    ///
    /// Returns [`super::RepoError::Domain`] if a stored column holds JSON of
    /// the wrong shape.
    pub async fn get(&self, business_id: BusinessId) -> RepoResult<BusinessSettings> {
        let row = settings::Entity::find()
            .filter(settings::Column::BusinessId.eq(business_id.get()))
            .one(self.db.as_ref())
            .await?;

        match row {
            Some(row) => Ok(BusinessSettings::from_columns(columns_of(row))?),
            None => Ok(BusinessSettings::default()),
        }
    }

    /// Validates and stores settings, replacing any existing row.
    ///
    /// A single `INSERT .. ON CONFLICT (business_id) DO UPDATE`, so two
    /// writers racing on a business without settings both succeed and the
    /// last one wins. `created_at` keeps the first writer's timestamp.
    ///
    /// # Errors
    ///
    /// - [`super::RepoError::Domain`] if the settings fail validation
    /// - [`super::RepoError::MissingReference`] if the business does not exist
    pub async fn upsert(
        &self,
        business_id: BusinessId,
        value: &BusinessSettings,
    ) -> RepoResult<settings::Model> {
        let columns = value.to_columns()?;
        let now = Utc::now().naive_utc();

        let row = settings::ActiveModel {
            business_id: Set(business_id.get()),
            invoice_template: Set(columns.invoice_template),
            tax_rates: Set(columns.tax_rates),
            reporting_periods: Set(columns.reporting_periods),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        };
        let row = settings::Entity::insert(row)
            .on_conflict(
                OnConflict::column(settings::Column::BusinessId)
                    .update_columns([
                        settings::Column::InvoiceTemplate,
                        settings::Column::TaxRates,
                        settings::Column::ReportingPeriods,
                        settings::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(self.db.as_ref())
            .await?;

        tracing::debug!(business_id = business_id.get(), "settings saved");
        Ok(row)
    }
}
