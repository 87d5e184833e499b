//! Audit trail and user activity log.
//!
//! Both tables are append-only; rows are never updated.

use std::sync::Arc;

use chrono::Utc;
use ledgerly_core::audit::{ActivityEntry, AuditEntry};
use ledgerly_core::identity::AuditAction;
use ledgerly_shared::types::UserId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use super::error::RepoResult;
use crate::entities::{audit_trails, user_activity_logs};

/// Audit repository.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    db: Arc<DatabaseConnection>,
}

impl AuditRepository {
    /// Creates a new audit repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Appends an audit trail row.
    ///
    /// # Errors
    ///
    /// Returns [`super::RepoError::MissingReference`] if the user does not
    /// exist.
    pub async fn record(&self, entry: AuditEntry) -> RepoResult<audit_trails::Model> {
        tracing::debug!(
            table = %entry.table_name,
            record_id = entry.record_id,
            action = %entry.action,
            "audit"
        );
        let row = audit_trails::ActiveModel {
            table_name: Set(entry.table_name),
            record_id: Set(entry.record_id),
            action: Set(entry.action.as_str().to_string()),
            old_data: Set(entry.old_data),
            new_data: Set(entry.new_data),
            user_id: Set(entry.user_id.get()),
            timestamp: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        Ok(row.insert(self.db.as_ref()).await?)
    }

    /// Appends a user activity row.
    ///
    /// # Errors
    ///
    /// Returns [`super::RepoError::MissingReference`] if the user does not
    /// exist.
    pub async fn log_activity(&self, entry: ActivityEntry) -> RepoResult<user_activity_logs::Model> {
        let row = user_activity_logs::ActiveModel {
            user_id: Set(entry.user_id.get()),
            action: Set(entry.action),
            details: Set(entry.details),
            timestamp: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        Ok(row.insert(self.db.as_ref()).await?)
    }

    /// History of one record, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_record(
        &self,
        table_name: &str,
        record_id: i32,
    ) -> RepoResult<Vec<audit_trails::Model>> {
        Ok(audit_trails::Entity::find()
            .filter(audit_trails::Column::TableName.eq(table_name))
            .filter(audit_trails::Column::RecordId.eq(record_id))
            .order_by_asc(audit_trails::Column::Timestamp)
            .order_by_asc(audit_trails::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    /// A user's most recent activity, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_activity(
        &self,
        user_id: UserId,
        limit: u64,
    ) -> RepoResult<Vec<user_activity_logs::Model>> {
        Ok(user_activity_logs::Entity::find()
            .filter(user_activity_logs::Column::UserId.eq(user_id.get()))
            .order_by_desc(user_activity_logs::Column::Timestamp)
            .limit(limit)
            .all(self.db.as_ref())
            .await?)
    }

    /// Parses the stored action of an audit row.
    ///
    /// # Errors
    ///
    /// Returns [`super::RepoError::Domain`] for an unknown action.
    pub fn action_of(row: &audit_trails::Model) -> RepoResult<AuditAction> {
        Ok(AuditAction::parse(&row.action)?)
    }
}
