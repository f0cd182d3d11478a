use dossier_storage::documents;

use crate::{DocumentData, DossierService, Result};

impl DossierService {
	/// All documents, newest first.
	pub async fn list(&self) -> Result<Vec<DocumentData>> {
		let records = documents::list_documents(&self.db.pool).await?;

		Ok(records.into_iter().map(DocumentData::from_record).collect())
	}
}
