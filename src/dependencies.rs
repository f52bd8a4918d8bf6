use std::sync::{Arc, OnceLock};

use async_nats::Client;

use crate::{
	adapters::repositories::{InMemoryRepository, PostRepository, RemoteRepository},
	config::Config,
	database::{connection_pool, ensure_schema},
	services::response::ServiceError,
};

pub fn config() -> &'static Config {
	static CONFIG: OnceLock<Config> = OnceLock::new();
	CONFIG.get_or_init(|| Config::new().expect("Environment misconfigured!"))
}

pub async fn queue_client(url: &str) -> Result<Client, ServiceError> {
	async_nats::ConnectOptions::new().name("peperr").connect(url).await.map_err(|err| {
		tracing::error!("queue connection failed: {:?}", err);
		ServiceError::QueueServiceError
	})
}

/// Picks the post repository once at startup. Without backend credentials,
/// or when the backend cannot be reached, the app runs on demo data.
pub async fn repository(config: &Config) -> Arc<dyn PostRepository> {
	let Some((database_url, queue_url)) = config.backend() else {
		tracing::info!("no backend configured, running in demo mode");
		return Arc::new(InMemoryRepository::new());
	};

	match remote_repository(config, database_url, queue_url).await {
		Ok(repository) => {
			tracing::info!("connected to backend");
			Arc::new(repository)
		}
		Err(err) => {
			tracing::error!("backend unreachable, falling back to demo mode: {}", err);
			Arc::new(InMemoryRepository::new())
		}
	}
}

async fn remote_repository(
	config: &Config,
	database_url: &str,
	queue_url: &str,
) -> Result<RemoteRepository, ServiceError> {
	let pool = connection_pool(database_url).await?;
	ensure_schema(&pool).await?;
	let queue = queue_client(queue_url).await?;
	Ok(RemoteRepository::new(pool, queue, config.feed_page_size, &config.public_base_url))
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::{adapters::repositories::FeedMode, config::DEFAULT_PAGE_SIZE};

	#[tokio::test]
	async fn test_missing_credentials_select_demo_mode() {
		let config = Config {
			log_level: "warn".into(),
			server_ip_port: "0.0.0.0:80".into(),
			queue_url: None,
			database_url: None,
			public_base_url: "http://localhost/peperr".into(),
			allow_origins: String::new(),
			feed_page_size: DEFAULT_PAGE_SIZE,
		};
		assert_eq!(repository(&config).await.mode(), FeedMode::Demo);
	}
}
