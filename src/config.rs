use crate::services::response::ServiceError;

pub const DEFAULT_PAGE_SIZE: i64 = 50;

pub struct Config {
	/// Which errors we want to log
	pub log_level: String,

	/// Port server is listening to
	pub server_ip_port: String,
	/// Backend credentials. Both must be present for connected mode.
	pub queue_url: Option<String>,
	pub database_url: Option<String>,
	/// Base under which uploaded media is served back.
	pub public_base_url: String,
	pub allow_origins: String,
	pub feed_page_size: i64,
}

impl Config {
	pub fn new() -> Result<Config, ServiceError> {
		dotenv::dotenv().ok();
		let queue_url = non_empty_var("QUEUE_URL");
		let database_url = non_empty_var("DATABASE_URL");
		let log_level = std::env::var("LOG_LEVEL").unwrap_or("warn".to_string());
		let server_ip_port = std::env::var("SERVER_IP_PORT").unwrap_or("0.0.0.0:80".into());
		let public_base_url = std::env::var("PUBLIC_BASE_URL").unwrap_or("http://localhost/peperr".to_string());
		let allow_origins = std::env::var("ALLOW_ORIGINS").unwrap_or("http://localhost:3000,http://localhost:3001".to_string());
		let feed_page_size = match std::env::var("FEED_PAGE_SIZE") {
			Ok(value) => value.parse::<i64>().map_err(|_| ServiceError::ParsingError)?,
			Err(_) => DEFAULT_PAGE_SIZE,
		};

		Ok(Config {
			queue_url,
			log_level,
			server_ip_port,
			database_url,
			public_base_url,
			allow_origins,
			feed_page_size,
		})
	}

	/// Missing backend credentials mean demo mode, not an error.
	pub fn backend(&self) -> Option<(&str, &str)> {
		match (self.database_url.as_deref(), self.queue_url.as_deref()) {
			(Some(database_url), Some(queue_url)) => Some((database_url, queue_url)),
			_ => None,
		}
	}
}

fn non_empty_var(key: &str) -> Option<String> {
	std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_backend_needs_both_urls() {
		let mut config = Config {
			log_level: "warn".into(),
			server_ip_port: "0.0.0.0:80".into(),
			queue_url: Some("nats://localhost:4222".into()),
			database_url: None,
			public_base_url: "http://localhost/peperr".into(),
			allow_origins: String::new(),
			feed_page_size: DEFAULT_PAGE_SIZE,
		};
		assert!(config.backend().is_none());

		config.database_url = Some("postgres://localhost/peperr".into());
		assert_eq!(config.backend(), Some(("postgres://localhost/peperr", "nats://localhost:4222")));
	}
}
