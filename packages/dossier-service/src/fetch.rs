use uuid::Uuid;

use dossier_storage::documents;

use crate::{DocumentData, DossierService, Error, Result};

impl DossierService {
	pub async fn fetch(&self, doc_id: Uuid) -> Result<DocumentData> {
		let record = documents::get_document(&self.db.pool, doc_id).await?.ok_or_else(|| {
			Error::NotFound { message: format!("Document {doc_id} does not exist.") }
		})?;

		Ok(DocumentData::from_record(record))
	}
}
