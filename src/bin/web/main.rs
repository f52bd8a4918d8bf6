pub mod routers;

use std::net::SocketAddr;

use axum::{
	http::{HeaderValue, Method},
	Router,
};

use peperr::{
	dependencies::{config, repository},
	services::feed::FeedService,
};
use routers::FeedState;
use tower_http::{
	cors::{AllowOrigin, CorsLayer},
	trace::TraceLayer,
};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	dotenv::dotenv().ok();

	// ! Tracing
	tracing_subscriber::registry()
		.with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
			// axum logs rejections from built-in extractors with the `axum::rejection`
			// target, at `TRACE` level. `axum::rejection=trace` enables showing those events
			format!("peperr={},tower_http=debug,axum::rejection=trace", config().log_level).into()
		}))
		.with(tracing_subscriber::fmt::layer())
		.init();

	// ! Feed
	tracing::info!("Feed is being activated...");
	let mut feed = FeedService::new(repository(config()).await);
	feed.activate().await;
	tracing::info!("Feed running in {:?} mode", feed.mode());
	let feed_state: FeedState = feed.into();

	let routers = Router::new()
		.nest("/posts", routers::post_routers())
		.nest("/media", routers::media_routers())
		.with_state(feed_state);

	let origins = config()
		.allow_origins
		.split(',')
		.filter_map(|origin| HeaderValue::from_str(origin.trim()).ok())
		.collect::<Vec<_>>();

	let service_name = "/peperr";
	let app = Router::new()
		.nest(service_name, routers)
		.layer(
			CorsLayer::new()
				.allow_origin(AllowOrigin::list(origins))
				.allow_methods([Method::GET, Method::POST]),
		)
		.layer(TraceLayer::new_for_http());

	let addr: SocketAddr = config().server_ip_port.parse()?;
	tracing::info!("Start Web Server on {}", addr);
	let listener = tokio::net::TcpListener::bind(addr).await?;
	axum::serve(listener, app).await?;
	Ok(())
}
