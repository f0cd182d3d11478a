use qdrant_client::{
	Payload,
	qdrant::{
		Condition, CreateCollectionBuilder, DeletePointsBuilder, Distance, Filter, PointStruct,
		Query, QueryPointsBuilder, ScoredPoint, UpsertPointsBuilder, VectorParamsBuilder,
	},
};
use uuid::Uuid;

use crate::{Error, Result};

/// One chunk headed for the vector store. The payload carries everything the
/// query path needs to assemble a retrieval result without a second lookup.
#[derive(Debug, Clone)]
pub struct ChunkPoint {
	pub chunk_id: Uuid,
	pub doc_id: Uuid,
	pub chunk_index: i32,
	pub source: String,
	pub text: String,
	pub vector: Vec<f32>,
}

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &dossier_config::Vector) -> Result<Self> {
		if cfg.backend != dossier_config::VECTOR_BACKEND_QDRANT {
			return Err(Error::InvalidArgument(format!(
				"Unsupported vector backend {:?}.",
				cfg.backend
			)));
		}

		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	pub async fn ensure_collection(&self) -> Result<()> {
		if self.client.collection_exists(&self.collection).await? {
			return Ok(());
		}

		let builder = CreateCollectionBuilder::new(self.collection.clone())
			.vectors_config(VectorParamsBuilder::new(self.vector_dim as u64, Distance::Cosine));

		self.client.create_collection(builder).await?;

		Ok(())
	}

	pub async fn upsert_chunks(&self, chunks: Vec<ChunkPoint>) -> Result<()> {
		if chunks.is_empty() {
			return Ok(());
		}

		let points = chunks
			.into_iter()
			.map(|chunk| {
				let mut payload = Payload::new();

				payload.insert("doc_id", chunk.doc_id.to_string());
				payload.insert("chunk_index", chunk.chunk_index as i64);
				payload.insert("source", chunk.source);
				payload.insert("text", chunk.text);

				PointStruct::new(chunk.chunk_id.to_string(), chunk.vector, payload)
			})
			.collect::<Vec<_>>();

		self.client
			.upsert_points(UpsertPointsBuilder::new(self.collection.clone(), points).wait(true))
			.await?;

		Ok(())
	}

	pub async fn search(&self, vector: Vec<f32>, limit: u32) -> Result<Vec<ScoredPoint>> {
		let search = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(vector))
			.with_payload(true)
			.limit(limit as u64);
		let response = self.client.query(search).await?;

		Ok(response.result)
	}

	pub async fn delete_document(&self, doc_id: Uuid) -> Result<()> {
		let filter = Filter::must([Condition::matches("doc_id", doc_id.to_string())]);

		self.client
			.delete_points(
				DeletePointsBuilder::new(self.collection.clone()).points(filter).wait(true),
			)
			.await?;

		Ok(())
	}
}
