use uuid::Uuid;

use dossier_storage::documents;

use crate::{DossierService, Error, Result};

impl DossierService {
	/// Removes the document row, then its chunk points.
	pub async fn delete(&self, doc_id: Uuid) -> Result<()> {
		let mut tx = self.db.begin().await?;
		let removed = documents::delete_document(&mut *tx, doc_id).await?;

		if !removed {
			return Err(Error::NotFound { message: format!("Document {doc_id} does not exist.") });
		}

		tx.commit().await?;

		self.qdrant.delete_document(doc_id).await?;

		tracing::info!(doc_id = %doc_id, "Document deleted.");

		Ok(())
	}
}
