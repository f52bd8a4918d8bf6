use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use tokio::sync::{watch, Mutex};
use uuid::Uuid;

use super::{build_post, Feed, FeedMode, FeedSubscription, PostRepository, SpiceLedger};
use crate::{
	adapters::media::payload_bytes,
	domain::post::{
		commands::{MediaPayload, NewPost},
		sample::sample_posts,
		MediaKind, Post, PostId,
	},
	services::response::ServiceError,
};

pub const LOCAL_BLOB_PREFIX: &str = "blob:peperr/";

/// Offline repository. Seeded with the sample feed; every write is applied
/// to the in-memory list right away and pushed to subscribers.
pub struct InMemoryRepository {
	feed: watch::Sender<Feed>,
	ledger: Mutex<SpiceLedger>,
	blobs: Mutex<HashMap<String, Bytes>>,
}

impl Default for InMemoryRepository {
	fn default() -> Self {
		Self::with_posts(sample_posts())
	}
}

impl InMemoryRepository {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_posts(posts: Vec<Post>) -> Self {
		let (feed, _) = watch::channel(Arc::new(posts));
		Self {
			feed,
			ledger: Default::default(),
			blobs: Default::default(),
		}
	}

	pub fn posts(&self) -> Feed {
		self.feed.borrow().clone()
	}
}

#[async_trait]
impl PostRepository for InMemoryRepository {
	fn mode(&self) -> FeedMode {
		FeedMode::Demo
	}

	async fn subscribe(&self) -> FeedSubscription {
		FeedSubscription::new(self.feed.subscribe(), None)
	}

	async fn upload_media(
		&self,
		_user_id: &str,
		media: &MediaPayload,
		_kind: MediaKind,
	) -> Result<String, ServiceError> {
		match media {
			MediaPayload::DataUri(uri) => Ok(uri.clone()),
			MediaPayload::Blob(_) => {
				let key = Uuid::new_v4().to_string();
				self.blobs.lock().await.insert(key.clone(), payload_bytes(media)?);
				Ok(format!("{LOCAL_BLOB_PREFIX}{key}"))
			}
		}
	}

	async fn create_post(
		&self,
		post: NewPost,
	) -> Result<PostId, ServiceError> {
		let media_url = self.upload_media(&post.user_id, &post.media, post.media_kind).await?;
		let id = format!("demo-{}", Uuid::new_v4().simple());
		let record = build_post(id.clone(), &post, media_url, Utc::now());

		tracing::info!("demo mode: adding post {} to feed", id);
		self.feed.send_modify(|feed| Arc::make_mut(feed).insert(0, record));
		Ok(id)
	}

	async fn add_spice(
		&self,
		post_id: &str,
		user_id: &str,
		level: u8,
	) -> Result<(), ServiceError> {
		let exists = self.feed.borrow().iter().any(|p| p.id == post_id);
		if !exists {
			return Err(ServiceError::EntityNotFound);
		}
		let delta = self.ledger.lock().await.record(post_id, user_id, level);
		self.feed.send_modify(|feed| {
			if let Some(post) = Arc::make_mut(feed).iter_mut().find(|p| p.id == post_id) {
				post.apply_spice_delta(delta);
			}
		});
		Ok(())
	}

	async fn user_posts(
		&self,
		user_id: &str,
	) -> Result<Vec<Post>, ServiceError> {
		Ok(self.feed.borrow().iter().filter(|p| p.user_id.as_deref() == Some(user_id)).cloned().collect())
	}

	async fn media(
		&self,
		key: &str,
	) -> Result<Bytes, ServiceError> {
		let key = key.strip_prefix(LOCAL_BLOB_PREFIX).unwrap_or(key);
		self.blobs.lock().await.get(key).cloned().ok_or(ServiceError::EntityNotFound)
	}
}
