//! User repository for database operations.

use std::sync::Arc;

use chrono::Utc;
use ledgerly_core::identity::{UserRole, hash_password, verify_password};
use ledgerly_shared::types::{BusinessId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::error::{RepoError, RepoResult};
use crate::entities::users;

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Owning business.
    pub business_id: BusinessId,
    /// Display name.
    pub name: String,
    /// Login email, globally unique.
    pub email: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Plaintext password; only the hash is stored.
    pub password: String,
    /// Role within the business.
    pub role: UserRole,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Creates a user with a hashed password.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Duplicate`] if the email is taken and
    /// [`RepoError::MissingReference`] if the business does not exist.
    pub async fn create(&self, input: NewUser) -> RepoResult<users::Model> {
        let password_hash = hash_password(&input.password)?;
        let now = Utc::now().naive_utc();

        let user = users::ActiveModel {
            name: Set(input.name),
            email: Set(input.email.trim().to_lowercase()),
            phone: Set(input.phone),
            password_hash: Set(password_hash),
            role: Set(input.role.as_str().to_string()),
            business_id: Set(input.business_id.get()),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        };

        let user = user.insert(self.db.as_ref()).await?;
        tracing::info!(user_id = user.id, business_id = user.business_id, "user created");
        Ok(user)
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: UserId) -> RepoResult<Option<users::Model>> {
        Ok(users::Entity::find_by_id(id.get()).one(self.db.as_ref()).await?)
    }

    /// Finds a user by email (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<users::Model>> {
        Ok(users::Entity::find()
            .filter(users::Column::Email.eq(email.trim().to_lowercase()))
            .one(self.db.as_ref())
            .await?)
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email.trim().to_lowercase()))
            .count(self.db.as_ref())
            .await?;

        Ok(count > 0)
    }

    /// Returns the user when `password` matches the stored hash.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Password`] if the stored hash is malformed.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> RepoResult<Option<users::Model>> {
        let Some(user) = self.find_by_email(email).await? else {
            return Ok(None);
        };
        if verify_password(password, &user.password_hash)? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    /// Lists the users of a business, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_business(&self, business_id: BusinessId) -> RepoResult<Vec<users::Model>> {
        Ok(users::Entity::find()
            .filter(users::Column::BusinessId.eq(business_id.get()))
            .order_by_asc(users::Column::Name)
            .all(self.db.as_ref())
            .await?)
    }

    /// Changes a user's role and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if the user does not exist.
    pub async fn change_role(&self, id: UserId, role: UserRole) -> RepoResult<users::Model> {
        let user = users::Entity::find_by_id(id.get())
            .one(self.db.as_ref())
            .await?
            .ok_or(RepoError::not_found("user", id.get()))?;

        let mut active: users::ActiveModel = user.into();
        active.role = Set(role.as_str().to_string());
        active.updated_at = Set(Some(Utc::now().naive_utc()));

        let user = active.update(self.db.as_ref()).await?;
        tracing::info!(user_id = user.id, role = %role, "user role changed");
        Ok(user)
    }

    /// Deletes a user. Activity logs cascade.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Restricted`] while audit trails or uploaded
    /// documents still reference the user.
    pub async fn delete(&self, id: UserId) -> RepoResult<bool> {
        let result = users::Entity::delete_by_id(id.get())
            .exec(self.db.as_ref())
            .await
            .map_err(RepoError::on_delete)?;
        Ok(result.rows_affected > 0)
    }
}

/// Parses the stored role of a user row.
///
/// # Errors
///
/// Returns [`RepoError::Domain`] for a role outside the known set.
pub fn role_of(user: &users::Model) -> RepoResult<UserRole> {
    Ok(UserRole::parse(&user.role)?)
}
