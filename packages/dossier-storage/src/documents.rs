use sqlx::PgExecutor;
use uuid::Uuid;

use crate::{Result, models::DocumentRecord};

pub async fn insert_document<'e, E>(executor: E, doc: &DocumentRecord) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO documents (
	doc_id,
	filename,
	content_type,
	file_size,
	chunk_count,
	content_hash,
	created_at,
	updated_at
)
VALUES ($1,$2,$3,$4,$5,$6,$7,$8)",
	)
	.bind(doc.doc_id)
	.bind(doc.filename.as_str())
	.bind(doc.content_type.as_str())
	.bind(doc.file_size)
	.bind(doc.chunk_count)
	.bind(doc.content_hash.as_str())
	.bind(doc.created_at)
	.bind(doc.updated_at)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn get_document<'e, E>(executor: E, doc_id: Uuid) -> Result<Option<DocumentRecord>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, DocumentRecord>(
		"\
SELECT
	doc_id,
	filename,
	content_type,
	file_size,
	chunk_count,
	content_hash,
	created_at,
	updated_at
FROM documents
WHERE doc_id = $1
LIMIT 1",
	)
	.bind(doc_id)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

pub async fn list_documents<'e, E>(executor: E) -> Result<Vec<DocumentRecord>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, DocumentRecord>(
		"\
SELECT
	doc_id,
	filename,
	content_type,
	file_size,
	chunk_count,
	content_hash,
	created_at,
	updated_at
FROM documents
ORDER BY created_at DESC",
	)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

pub async fn delete_document<'e, E>(executor: E, doc_id: Uuid) -> Result<bool>
where
	E: PgExecutor<'e>,
{
	let result =
		sqlx::query("DELETE FROM documents WHERE doc_id = $1").bind(doc_id).execute(executor).await?;

	Ok(result.rows_affected() > 0)
}
