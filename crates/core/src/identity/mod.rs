//! Users, roles and authentication.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification
//! - User role definitions
//! - Audit and activity action vocabularies

mod password;

pub use password::{PasswordError, hash_password, needs_rehash, verify_password};

string_enum! {
    /// Role of a user within their business (`users.role`).
    UserRole, "user role" {
        /// Full access, owns the business record.
        Owner => "owner",
        /// Full access except deleting the business.
        Admin => "admin",
        /// Manages ledgers, taxes and reconciliations.
        Accountant => "accountant",
        /// Records day-to-day documents.
        Bookkeeper => "bookkeeper",
        /// Read-only access.
        Viewer => "viewer",
    }
}

impl UserRole {
    /// Returns the privilege level of a role (higher = more privileges).
    #[must_use]
    pub const fn level(&self) -> u8 {
        match self {
            Self::Owner => 100,
            Self::Admin => 80,
            Self::Accountant => 60,
            Self::Bookkeeper => 40,
            Self::Viewer => 20,
        }
    }

    /// Returns true if this role has at least the privileges of `required`.
    #[must_use]
    pub const fn satisfies(&self, required: Self) -> bool {
        self.level() >= required.level()
    }

    /// Returns true if this role may write financial documents.
    #[must_use]
    pub const fn can_write_documents(&self) -> bool {
        !matches!(self, Self::Viewer)
    }
}

string_enum! {
    /// Kind of change captured in `audit_trails.action`.
    AuditAction, "audit action" {
        /// Row inserted.
        Create => "create",
        /// Row modified.
        Update => "update",
        /// Row removed.
        Delete => "delete",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("owner", UserRole::Owner)]
    #[case("Owner", UserRole::Owner)]
    #[case(" ACCOUNTANT ", UserRole::Accountant)]
    #[case("bookkeeper", UserRole::Bookkeeper)]
    fn test_role_parse_is_case_insensitive(#[case] raw: &str, #[case] expected: UserRole) {
        assert_eq!(UserRole::parse(raw).unwrap(), expected);
    }

    #[test]
    fn test_role_writes_lowercase() {
        assert_eq!(UserRole::Accountant.to_string(), "accountant");
        assert_eq!(serde_json::to_string(&UserRole::Owner).unwrap(), "\"owner\"");
    }

    #[test]
    fn test_unknown_role() {
        let err = UserRole::parse("janitor").unwrap_err();
        assert_eq!(err.to_string(), "Unknown user role: 'janitor'");
    }

    #[test]
    fn test_role_hierarchy() {
        assert!(UserRole::Owner.satisfies(UserRole::Admin));
        assert!(UserRole::Accountant.satisfies(UserRole::Bookkeeper));
        assert!(!UserRole::Viewer.satisfies(UserRole::Bookkeeper));
        assert!(!UserRole::Viewer.can_write_documents());
    }

    #[test]
    fn test_audit_action_values() {
        let values: Vec<_> = AuditAction::ALL.iter().map(AuditAction::as_str).collect();
        assert_eq!(values, ["create", "update", "delete"]);
    }
}
