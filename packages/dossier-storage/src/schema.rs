/// Bootstrap DDL. Statements are idempotent so startup can run them on every
/// boot; `ensure_schema` serializes concurrent bootstrapping with an
/// advisory lock.
const INIT_SQL: &str = "\
CREATE TABLE IF NOT EXISTS documents (
	doc_id       UUID PRIMARY KEY,
	filename     TEXT NOT NULL,
	content_type TEXT NOT NULL,
	file_size    BIGINT NOT NULL,
	chunk_count  INTEGER NOT NULL DEFAULT 0,
	content_hash TEXT NOT NULL,
	created_at   TIMESTAMPTZ NOT NULL,
	updated_at   TIMESTAMPTZ NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_documents_created_at ON documents (created_at DESC);
CREATE INDEX IF NOT EXISTS idx_documents_content_hash ON documents (content_hash)";

pub fn render_schema() -> String {
	INIT_SQL.to_string()
}
