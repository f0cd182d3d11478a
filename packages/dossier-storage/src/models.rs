use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DocumentRecord {
	pub doc_id: Uuid,
	pub filename: String,
	pub content_type: String,
	pub file_size: i64,
	pub chunk_count: i32,
	pub content_hash: String,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}
