use std::sync::Arc;

use dossier_service::{DossierService, Providers};
use dossier_storage::{db::Db, qdrant::QdrantStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<DossierService>,
}
impl AppState {
	pub async fn new(config: dossier_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let qdrant = QdrantStore::new(&config.storage.vector)?;

		qdrant.ensure_collection().await?;

		let service = DossierService::new(config, db, qdrant, Providers::http());

		Ok(Self { service: Arc::new(service) })
	}
}
