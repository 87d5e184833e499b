//! Audit trail snapshots and user activity records.

use ledgerly_shared::types::UserId;
use serde::Serialize;
use serde_json::Value;

use crate::DomainError;
use crate::identity::AuditAction;

/// One `audit_trails` row before it is written.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    /// Table of the changed row.
    pub table_name: String,
    /// Primary key of the changed row.
    pub record_id: i32,
    /// What happened.
    pub action: AuditAction,
    /// Row before the change (`None` on create).
    pub old_data: Option<Value>,
    /// Row after the change (`None` on delete).
    pub new_data: Option<Value>,
    /// Who made the change.
    pub user_id: UserId,
}

impl AuditEntry {
    /// Records an insert.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Snapshot`] if the row does not serialize.
    pub fn created<T: Serialize>(
        table_name: &str,
        record_id: i32,
        new: &T,
        user_id: UserId,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            table_name: table_name.to_string(),
            record_id,
            action: AuditAction::Create,
            old_data: None,
            new_data: Some(snapshot(new)?),
            user_id,
        })
    }

    /// Records an update.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Snapshot`] if either row does not serialize.
    pub fn updated<T: Serialize>(
        table_name: &str,
        record_id: i32,
        old: &T,
        new: &T,
        user_id: UserId,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            table_name: table_name.to_string(),
            record_id,
            action: AuditAction::Update,
            old_data: Some(snapshot(old)?),
            new_data: Some(snapshot(new)?),
            user_id,
        })
    }

    /// Records a delete.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Snapshot`] if the row does not serialize.
    pub fn deleted<T: Serialize>(
        table_name: &str,
        record_id: i32,
        old: &T,
        user_id: UserId,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            table_name: table_name.to_string(),
            record_id,
            action: AuditAction::Delete,
            old_data: Some(snapshot(old)?),
            new_data: None,
            user_id,
        })
    }

    /// Top-level keys whose values differ between the two snapshots.
    ///
    /// `updated_at` is ignored since every mutation touches it.
    #[must_use]
    pub fn changed_fields(&self) -> Vec<String> {
        let empty = serde_json::Map::new();
        let old = self.old_data.as_ref().and_then(Value::as_object).unwrap_or(&empty);
        let new = self.new_data.as_ref().and_then(Value::as_object).unwrap_or(&empty);

        let mut fields: Vec<String> = old
            .keys()
            .chain(new.keys())
            .filter(|key| key.as_str() != "updated_at")
            .filter(|key| old.get(key.as_str()) != new.get(key.as_str()))
            .cloned()
            .collect();
        fields.sort();
        fields.dedup();
        fields
    }
}

/// One `user_activity_logs` row before it is written.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    /// Acting user.
    pub user_id: UserId,
    /// Short verb phrase, e.g. `invoice.sent`.
    pub action: String,
    /// Free-form context.
    pub details: Option<Value>,
}

impl ActivityEntry {
    /// An activity without details.
    #[must_use]
    pub fn new(user_id: UserId, action: impl Into<String>) -> Self {
        Self {
            user_id,
            action: action.into(),
            details: None,
        }
    }

    /// Attaches details.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

fn snapshot<T: Serialize>(row: &T) -> Result<Value, DomainError> {
    serde_json::to_value(row).map_err(|e| DomainError::Snapshot(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Row {
        name: &'static str,
        status: &'static str,
        updated_at: &'static str,
    }

    #[test]
    fn test_created_has_only_new_data() {
        let row = Row {
            name: "Acme",
            status: "unpaid",
            updated_at: "t0",
        };
        let entry = AuditEntry::created("invoices", 1, &row, UserId::new(2)).unwrap();
        assert_eq!(entry.action, AuditAction::Create);
        assert!(entry.old_data.is_none());
        assert_eq!(entry.new_data.unwrap()["name"], json!("Acme"));
    }

    #[test]
    fn test_deleted_has_only_old_data() {
        let row = Row {
            name: "Acme",
            status: "paid",
            updated_at: "t0",
        };
        let entry = AuditEntry::deleted("invoices", 1, &row, UserId::new(2)).unwrap();
        assert_eq!(entry.action.as_str(), "delete");
        assert!(entry.new_data.is_none());
    }

    #[test]
    fn test_changed_fields_ignores_updated_at() {
        let old = Row {
            name: "Acme",
            status: "unpaid",
            updated_at: "t0",
        };
        let new = Row {
            name: "Acme",
            status: "paid",
            updated_at: "t1",
        };
        let entry = AuditEntry::updated("invoices", 1, &old, &new, UserId::new(2)).unwrap();
        assert_eq!(entry.changed_fields(), vec!["status".to_string()]);
    }

    #[test]
    fn test_activity_details() {
        let entry = ActivityEntry::new(UserId::new(1), "login").with_details(json!({"ip": "10.0.0.1"}));
        assert_eq!(entry.action, "login");
        assert_eq!(entry.details.unwrap()["ip"], json!("10.0.0.1"));
    }
}
