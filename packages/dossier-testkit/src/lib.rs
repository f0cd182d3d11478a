mod error;

pub use error::{Error, Result};

use std::{collections::HashSet, env, str::FromStr, sync::Mutex};

use qdrant_client::Qdrant;
use sqlx::{
	ConnectOptions, Connection, Executor,
	postgres::{PgConnectOptions, PgConnection},
};
use uuid::Uuid;

/// Base DSN for disposable test databases, if the environment provides one.
pub fn env_dsn() -> Option<String> {
	env::var("DOSSIER_PG_DSN").ok().filter(|value| !value.trim().is_empty())
}

/// Qdrant URL for tests that need a live vector store.
pub fn env_qdrant_url() -> Option<String> {
	env::var("DOSSIER_QDRANT_URL").ok().filter(|value| !value.trim().is_empty())
}

/// A freshly created Postgres database plus any Qdrant collections handed
/// out through [`collection_name`](Self::collection_name). Call
/// [`cleanup`](Self::cleanup) at the end of the test; nothing is removed
/// implicitly.
pub struct TestDatabase {
	name: String,
	dsn: String,
	admin_options: PgConnectOptions,
	collections: Mutex<HashSet<String>>,
}
impl TestDatabase {
	pub async fn new(base_dsn: &str) -> Result<Self> {
		let base_options: PgConnectOptions = PgConnectOptions::from_str(base_dsn)
			.map_err(|err| Error::Message(format!("Failed to parse DOSSIER_PG_DSN: {err}.")))?;
		let admin_options = base_options.clone().database("postgres");
		let mut admin_conn = PgConnection::connect_with(&admin_options)
			.await
			.map_err(|err| Error::Message(format!("Failed to connect as admin: {err}.")))?;
		let name = format!("dossier_test_{}", Uuid::new_v4().simple());
		let create_sql = format!(r#"CREATE DATABASE "{}""#, name);

		admin_conn
			.execute(create_sql.as_str())
			.await
			.map_err(|err| Error::Message(format!("Failed to create test database: {err}.")))?;

		let dsn = base_options.database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, admin_options, collections: Mutex::new(HashSet::new()) })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Registers and returns a collection name scoped to this database so
	/// `cleanup` can drop it from Qdrant as well.
	pub fn collection_name(&self, prefix: &str) -> String {
		let collection = format!("{prefix}_{}", self.name);
		let mut tracked = self.collections.lock().unwrap_or_else(|err| err.into_inner());

		tracked.insert(collection.clone());

		collection
	}

	pub async fn cleanup(self) -> Result<()> {
		let collections = {
			let tracked = self.collections.lock().unwrap_or_else(|err| err.into_inner());

			tracked.iter().cloned().collect::<Vec<_>>()
		};
		let db_result = drop_database(&self.name, &self.admin_options).await;
		let qdrant_result = drop_qdrant_collections(&collections).await;

		db_result?;
		qdrant_result
	}
}

async fn drop_database(name: &str, admin_options: &PgConnectOptions) -> Result<()> {
	let mut admin_conn = PgConnection::connect_with(admin_options)
		.await
		.map_err(|err| Error::Message(format!("Failed to connect as admin: {err}.")))?;
	let drop_sql = format!(r#"DROP DATABASE IF EXISTS "{}" WITH (FORCE)"#, name);

	admin_conn
		.execute(drop_sql.as_str())
		.await
		.map_err(|err| Error::Message(format!("Failed to drop test database: {err}.")))?;

	Ok(())
}

async fn drop_qdrant_collections(collections: &[String]) -> Result<()> {
	if collections.is_empty() {
		return Ok(());
	}

	let Some(url) = env_qdrant_url() else {
		return Ok(());
	};
	let client = Qdrant::from_url(&url)
		.build()
		.map_err(|err| Error::Message(format!("Failed to build Qdrant client: {err}.")))?;

	for collection in collections {
		client
			.delete_collection(collection)
			.await
			.map_err(|err| Error::Message(format!("Failed to drop collection: {err}.")))?;
	}

	Ok(())
}
