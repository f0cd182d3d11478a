use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use dossier_chunking::ChunkingConfig;
use dossier_storage::{documents, models::DocumentRecord, qdrant::ChunkPoint};

use crate::{DossierService, Error, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadRequest {
	pub filename: String,
	pub content_type: String,
	pub content: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DocumentData {
	pub id: Uuid,
	pub filename: String,
	pub content_type: String,
	pub file_size: i64,
	pub chunk_count: i32,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl DocumentData {
	pub(crate) fn from_record(record: DocumentRecord) -> Self {
		Self {
			id: record.doc_id,
			filename: record.filename,
			content_type: record.content_type,
			file_size: record.file_size,
			chunk_count: record.chunk_count,
			created_at: record.created_at,
			updated_at: record.updated_at,
		}
	}
}

impl DossierService {
	pub async fn upload(&self, req: UploadRequest) -> Result<DocumentData> {
		validate_upload_request(&req)?;

		let now = OffsetDateTime::now_utc();
		let doc_id = Uuid::new_v4();
		let content_hash = blake3::hash(req.content.as_bytes()).to_hex().to_string();
		let chunk_cfg = ChunkingConfig {
			max_chars: self.cfg.chunking.max_chars,
			overlap_chars: self.cfg.chunking.overlap_chars,
		};
		let chunks = dossier_chunking::split_text(&req.content, &chunk_cfg);
		let texts = chunks.iter().map(|chunk| chunk.text.clone()).collect::<Vec<_>>();
		let vectors = self.providers.embedding.embed(&self.cfg.providers.embedding, &texts).await?;

		if vectors.len() != chunks.len() {
			return Err(Error::Provider {
				message: format!(
					"Embedding provider returned {} vectors for {} chunks.",
					vectors.len(),
					chunks.len()
				),
			});
		}

		let expected_dim = self.cfg.storage.vector.vector_dim as usize;

		if vectors.iter().any(|vector| vector.len() != expected_dim) {
			return Err(Error::Provider {
				message: format!("Embedding provider returned a non-{expected_dim}d vector."),
			});
		}

		let record = DocumentRecord {
			doc_id,
			filename: req.filename.trim().to_string(),
			content_type: req.content_type.trim().to_string(),
			file_size: req.content.len() as i64,
			chunk_count: chunks.len() as i32,
			content_hash,
			created_at: now,
			updated_at: now,
		};
		let mut tx = self.db.begin().await?;

		documents::insert_document(&mut *tx, &record).await?;

		tx.commit().await?;

		let points = chunks
			.into_iter()
			.zip(vectors)
			.map(|(chunk, vector)| ChunkPoint {
				chunk_id: Uuid::new_v4(),
				doc_id,
				chunk_index: chunk.chunk_index,
				source: record.filename.clone(),
				text: chunk.text,
				vector,
			})
			.collect::<Vec<_>>();

		self.qdrant.upsert_chunks(points).await?;

		tracing::info!(doc_id = %doc_id, chunk_count = record.chunk_count, "Document ingested.");

		Ok(DocumentData::from_record(record))
	}
}

fn validate_upload_request(req: &UploadRequest) -> Result<()> {
	let mut errors = BTreeMap::new();

	if req.filename.trim().is_empty() {
		errors.insert("filename".to_string(), "required".to_string());
	}
	if req.content_type.trim().is_empty() {
		errors.insert("content_type".to_string(), "required".to_string());
	}
	if req.content.trim().is_empty() {
		errors.insert("content".to_string(), "required".to_string());
	}
	if !errors.is_empty() {
		return Err(Error::Validation { errors });
	}

	Ok(())
}
