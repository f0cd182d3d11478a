use std::time::Duration;

use sqlx::{PgPool, Postgres, Transaction, postgres::PgPoolOptions};

use crate::{Result, schema};

pub struct Db {
	pub pool: PgPool,
}
impl Db {
	pub async fn connect(cfg: &dossier_config::Postgres) -> Result<Self> {
		let mut options = PgPoolOptions::new()
			.max_connections(cfg.pool_max_conns)
			.min_connections(cfg.pool_min_conns)
			.acquire_timeout(Duration::from_millis(cfg.acquire_timeout_ms));

		if let Some(secs) = cfg.max_lifetime_secs {
			options = options.max_lifetime(Duration::from_secs(secs));
		}

		let pool = options.connect(&cfg.dsn).await?;

		Ok(Self { pool })
	}

	/// Opens a request-scoped session.
	///
	/// Pending writes are committed only by an explicit `commit()`; a
	/// transaction dropped on any failure path rolls back, and the
	/// connection returns to the pool in every case.
	pub async fn begin(&self) -> Result<Transaction<'_, Postgres>> {
		Ok(self.pool.begin().await?)
	}

	pub async fn ensure_schema(&self) -> Result<()> {
		let sql = schema::render_schema();
		let lock_id: i64 = 4_155_901;
		// the advisory lock is connection-scoped; taking it inside one
		// transaction releases it with the transaction
		let mut tx = self.pool.begin().await?;

		sqlx::query("SELECT pg_advisory_xact_lock($1)").bind(lock_id).execute(&mut *tx).await?;

		for statement in sql.split(';') {
			let trimmed = statement.trim();

			if trimmed.is_empty() {
				continue;
			}

			sqlx::query(trimmed).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		Ok(())
	}

	pub async fn close(&self) {
		self.pool.close().await;
	}
}
