//! File metadata attached to business documents.
//!
//! Only the path is stored; the bytes live wherever the uploader put them.

use std::sync::Arc;

use chrono::Utc;
use ledgerly_core::documents::DocumentReference;
use ledgerly_shared::types::{BusinessId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::error::{RepoError, RepoResult};
use crate::entities::documents;

/// Input for attaching a file.
#[derive(Debug, Clone)]
pub struct NewAttachment {
    /// Owning business.
    pub business_id: BusinessId,
    /// Original file name.
    pub file_name: String,
    /// Storage path or URL.
    pub file_path: String,
    /// Document the file belongs to; `None` for loose uploads.
    pub reference: Option<DocumentReference>,
    /// Uploading user.
    pub uploaded_by: UserId,
}

/// Document attachment repository.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    db: Arc<DatabaseConnection>,
}

impl DocumentRepository {
    /// Creates a new document repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Stores attachment metadata.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::MissingReference`] for an unknown business or
    /// user.
    pub async fn attach(&self, input: NewAttachment) -> RepoResult<documents::Model> {
        let (reference_type, reference_id) =
            input.reference.as_ref().map(DocumentReference::columns).unzip();
        let now = Utc::now().naive_utc();

        let document = documents::ActiveModel {
            business_id: Set(input.business_id.get()),
            file_name: Set(input.file_name),
            file_path: Set(input.file_path),
            reference_id: Set(reference_id),
            reference_type: Set(reference_type),
            uploaded_by: Set(input.uploaded_by.get()),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        tracing::debug!(document_id = document.id, file_name = %document.file_name, "attachment stored");
        Ok(document)
    }

    /// Lists attachments of one document, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_reference(
        &self,
        reference: &DocumentReference,
    ) -> RepoResult<Vec<documents::Model>> {
        let (kind, id) = reference.columns();
        Ok(documents::Entity::find()
            .filter(documents::Column::ReferenceType.eq(kind))
            .filter(documents::Column::ReferenceId.eq(id))
            .order_by_asc(documents::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    /// Reads the typed reference back from a stored row.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Domain`] if only half the reference is set.
    pub fn reference_of(document: &documents::Model) -> RepoResult<Option<DocumentReference>> {
        Ok(DocumentReference::from_columns(
            document.reference_type.as_deref(),
            document.reference_id,
        )?)
    }

    /// Removes attachment metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: i32) -> RepoResult<bool> {
        let result = documents::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(RepoError::on_delete)?;
        Ok(result.rows_affected > 0)
    }
}
