use std::collections::HashMap;

use qdrant_client::qdrant::{ScoredPoint, Value, value::Kind};
use serde::{Deserialize, Serialize};

use crate::{DossierService, Error, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueryRequest {
	pub question: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetrievalChunk {
	pub text: String,
	pub similarity_score: f32,
	pub source: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueryData {
	pub answer: String,
	pub retrieved_chunks: Vec<RetrievalChunk>,
}

impl DossierService {
	pub async fn query(&self, req: QueryRequest) -> Result<QueryData> {
		let question = validate_question(&req.question)?;

		let vectors = self
			.providers
			.embedding
			.embed(&self.cfg.providers.embedding, &[question.to_string()])
			.await?;
		let vector = vectors.into_iter().next().ok_or_else(|| Error::Provider {
			message: "Embedding provider returned no vector for the question.".to_string(),
		})?;
		let points = self.qdrant.search(vector, self.cfg.query.top_k).await?;
		let retrieved_chunks =
			points.iter().filter_map(retrieval_chunk_from_point).collect::<Vec<_>>();
		let context =
			retrieved_chunks.iter().map(|chunk| chunk.text.clone()).collect::<Vec<_>>();
		let answer = self
			.providers
			.generation
			.answer(&self.cfg.providers.generation, question, &context)
			.await?;

		tracing::info!(retrieved = retrieved_chunks.len(), "Query answered.");

		Ok(QueryData { answer, retrieved_chunks })
	}
}

fn validate_question(question: &str) -> Result<&str> {
	let trimmed = question.trim();

	if trimmed.is_empty() {
		return Err(Error::field("question", "required"));
	}

	Ok(trimmed)
}

/// Points missing a text payload are skipped rather than failing the whole
/// query; they cannot contribute context anyway.
fn retrieval_chunk_from_point(point: &ScoredPoint) -> Option<RetrievalChunk> {
	let text = payload_string(&point.payload, "text")?;
	let source = payload_string(&point.payload, "source").unwrap_or_else(|| "unknown".to_string());

	Some(RetrievalChunk { text, similarity_score: point.score, source })
}

fn payload_string(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
	let value = payload.get(key)?;

	match &value.kind {
		Some(Kind::StringValue(text)) => Some(text.to_string()),
		_ => None,
	}
}
