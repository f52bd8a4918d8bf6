use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::services::response::ServiceError;

const SCHEMA: [&str; 4] = [
	r#"CREATE TABLE IF NOT EXISTS posts (
		id TEXT PRIMARY KEY,
		user_id TEXT,
		username TEXT NOT NULL DEFAULT '',
		avatar TEXT NOT NULL DEFAULT '',
		media_url TEXT NOT NULL DEFAULT '',
		video_url TEXT NOT NULL DEFAULT '',
		thumbnail TEXT NOT NULL DEFAULT '',
		media_kind TEXT,
		description TEXT NOT NULL DEFAULT '',
		hashtags TEXT[] NOT NULL DEFAULT '{}',
		spice_count BIGINT NOT NULL DEFAULT 0,
		comments_count BIGINT NOT NULL DEFAULT 0,
		shares_count BIGINT NOT NULL DEFAULT 0,
		mood TEXT,
		audio_layers JSONB NOT NULL DEFAULT '[]',
		created_at TIMESTAMPTZ NOT NULL DEFAULT now()
	)"#,
	r#"CREATE INDEX IF NOT EXISTS posts_created_at_idx ON posts (created_at DESC)"#,
	r#"CREATE TABLE IF NOT EXISTS spices (
		post_id TEXT NOT NULL REFERENCES posts (id) ON DELETE CASCADE,
		user_id TEXT NOT NULL,
		level SMALLINT NOT NULL,
		created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
		PRIMARY KEY (post_id, user_id)
	)"#,
	r#"CREATE TABLE IF NOT EXISTS media (
		key TEXT PRIMARY KEY,
		content_type TEXT NOT NULL,
		data BYTEA NOT NULL,
		created_at TIMESTAMPTZ NOT NULL DEFAULT now()
	)"#,
];

pub async fn connection_pool(url: &str) -> Result<PgPool, ServiceError> {
	PgPoolOptions::new().max_connections(30).connect(url).await.map_err(|err| {
		tracing::error!("database connection failed: {}", err);
		ServiceError::DatabaseError(Box::new(err))
	})
}

/// Creates the feed tables when they are missing.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), ServiceError> {
	for statement in SCHEMA {
		sqlx::query(statement).execute(pool).await?;
	}
	Ok(())
}
