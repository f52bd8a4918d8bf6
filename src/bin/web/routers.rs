use std::{ops::Deref, sync::Arc};

use axum::{
	extract::{
		ws::{Message, WebSocket},
		Path, State, WebSocketUpgrade,
	},
	http::{header, StatusCode},
	response::IntoResponse,
	routing::{get, post},
	Json, Router,
};

use peperr::{
	adapters::media::content_type_for_key,
	domain::{
		identity::{Identity, Profile},
		post::commands::{AddSpice, CreatePost, MediaPayload},
		spice::MAX_LEVEL,
	},
	services::{
		feed::FeedService,
		response::{ServiceError, ServiceResponse},
	},
};

#[derive(Clone)]
pub struct FeedState(pub Arc<FeedService>);
impl From<FeedService> for FeedState {
	fn from(value: FeedService) -> Self {
		Self(Arc::new(value))
	}
}
impl Deref for FeedState {
	type Target = FeedService;
	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

async fn feed_route(State(state): State<FeedState>) -> ServiceResponse {
	state.view().into()
}

async fn next_post_route(State(state): State<FeedState>) -> ServiceResponse {
	state.next_post();
	state.view().into()
}

async fn create_post_route(
	State(state): State<FeedState>,
	Json(cmd): Json<CreatePost>,
) -> Result<ServiceResponse, ServiceError> {
	let identity = Identity {
		uid: cmd.user_id,
		display_name: cmd.display_name.clone(),
		avatar_url: cmd.photo_url.clone(),
	};
	let profile = Profile {
		display_name: cmd.display_name,
		username: cmd.username,
		photo_url: cmd.photo_url,
		..Default::default()
	};
	let id = state
		.create_post(&identity, &profile, MediaPayload::DataUri(cmd.media), cmd.media_kind, &cmd.description, cmd.mood)
		.await?;
	Ok(ServiceResponse::Created { id })
}

async fn add_spice_route(
	State(state): State<FeedState>,
	Path(post_id): Path<String>,
	Json(cmd): Json<AddSpice>,
) -> StatusCode {
	state.add_spice(&post_id, &cmd.user_id, cmd.level.min(MAX_LEVEL)).await;
	StatusCode::ACCEPTED
}

async fn user_posts_route(
	State(state): State<FeedState>,
	Path(user_id): Path<String>,
) -> ServiceResponse {
	state.user_posts(&user_id).await.into()
}

async fn feed_websocket_route(
	ws: WebSocketUpgrade,
	State(state): State<FeedState>,
) -> impl IntoResponse {
	ws.on_upgrade(|socket| run_feed_socket(socket, state))
}

/// Pushes every feed snapshot to one connected client until it leaves.
async fn run_feed_socket(
	mut socket: WebSocket,
	state: FeedState,
) {
	let mut feed = state.watch();
	loop {
		let payload = serde_json::to_string(&*feed.borrow_and_update());
		match payload {
			Ok(text) => {
				if socket.send(Message::Text(text)).await.is_err() {
					return;
				}
			}
			Err(err) => {
				tracing::error!("feed serialization error: {}", err);
				return;
			}
		}

		loop {
			tokio::select! {
				changed = feed.changed() => {
					if changed.is_err() {
						return;
					}
					break;
				}
				incoming = socket.recv() => match incoming {
					Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return,
					Some(Ok(_)) => {}
				}
			}
		}
	}
}

async fn media_route(
	State(state): State<FeedState>,
	Path(key): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
	let data = state.media(&key).await?;
	Ok(([(header::CONTENT_TYPE, content_type_for_key(&key))], data))
}

pub fn post_routers() -> Router<FeedState> {
	Router::new()
		.route("/", get(feed_route).post(create_post_route))
		.route("/next", post(next_post_route))
		.route("/ws", get(feed_websocket_route))
		.route("/user/:user_id", get(user_posts_route))
		.route("/:post_id/spice", post(add_spice_route))
}

pub fn media_routers() -> Router<FeedState> {
	Router::new().route("/*key", get(media_route))
}

#[cfg(test)]
mod test {
	use axum::{body::Body, http::Request};
	use peperr::adapters::repositories::InMemoryRepository;
	use serde_json::{json, Value};
	use tower::ServiceExt;

	use super::*;

	async fn app() -> Router {
		let mut feed = FeedService::new(Arc::new(InMemoryRepository::new()));
		feed.activate().await;
		Router::new().nest("/posts", post_routers()).with_state(FeedState::from(feed))
	}

	async fn body_json(response: axum::response::Response) -> Value {
		let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
		serde_json::from_slice(&body).unwrap()
	}

	fn post_json(
		uri: &str,
		body: Value,
	) -> Request<Body> {
		Request::builder()
			.method("POST")
			.uri(uri)
			.header(header::CONTENT_TYPE, "application/json")
			.body(Body::from(body.to_string()))
			.unwrap()
	}

	fn get_request(uri: &str) -> Request<Body> {
		Request::builder().uri(uri).body(Body::empty()).unwrap()
	}

	#[tokio::test]
	async fn test_feed_route_lists_sample_posts() {
		let response = app().await.oneshot(get_request("/posts")).await.unwrap();
		assert_eq!(response.status(), StatusCode::OK);

		let feed = body_json(response).await;
		assert_eq!(feed["posts"].as_array().unwrap().len(), 3);
		assert_eq!(feed["active_index"], 0);
	}

	#[tokio::test]
	async fn test_create_then_list() {
		'_given: {
			let app = app().await;

			'_when: {
				let response = app
					.clone()
					.oneshot(post_json(
						"/posts",
						json!({
							"user_id": "u1",
							"username": "migo",
							"media": "data:image/jpeg;base64,aGVsbG8=",
							"media_kind": "photo",
							"description": "Fire! #hot #peperr",
						}),
					))
					.await
					.unwrap();
				assert_eq!(response.status(), StatusCode::CREATED);
				let id = body_json(response).await["id"].as_str().unwrap().to_string();

				let feed = body_json(app.oneshot(get_request("/posts")).await.unwrap()).await;
				assert_eq!(feed["posts"][0]["id"], id.as_str());
				assert_eq!(feed["posts"][0]["username"], "migo");
				assert_eq!(feed["posts"][0]["spice_count"], 0);
				assert_eq!(feed["posts"][0]["hashtags"], json!(["hot", "peperr"]));
			}
		}
	}

	#[tokio::test]
	async fn test_spice_route_clamps_level() {
		let app = app().await;
		let response = app
			.clone()
			.oneshot(post_json("/posts/1/spice", json!({ "user_id": "x", "level": 150 })))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::ACCEPTED);

		let feed = body_json(app.oneshot(get_request("/posts")).await.unwrap()).await;
		assert_eq!(feed["posts"][0]["spice_count"], 82_100);
	}

	#[tokio::test]
	async fn test_next_route_wraps() {
		let app = app().await;
		for expected in [1, 2, 0] {
			let feed = body_json(app.clone().oneshot(post_json("/posts/next", json!({}))).await.unwrap()).await;
			assert_eq!(feed["active_index"], expected);
		}
	}
}
