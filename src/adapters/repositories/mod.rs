pub mod memory;
pub(crate) mod post_repository;

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::{sync::watch, task::JoinHandle};

use crate::{
	domain::post::{
		commands::{MediaPayload, NewPost},
		entity::{extract_hashtags, DEFAULT_MOOD},
		MediaKind, Post, PostId, UserId,
	},
	services::response::ServiceError,
};

pub use memory::InMemoryRepository;
pub use post_repository::RemoteRepository;

/// Snapshot of the feed, newest first.
pub type Feed = Arc<Vec<Post>>;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FeedMode {
	/// No backend: sample data, local blobs, optimistic writes.
	Demo,
	Connected,
}

#[async_trait]
pub trait PostRepository: Send + Sync {
	fn mode(&self) -> FeedMode;

	/// Opens a live view on the newest posts. Each update replaces the list.
	async fn subscribe(&self) -> FeedSubscription;

	/// Stores media and returns the URL it can be fetched from.
	async fn upload_media(
		&self,
		user_id: &str,
		media: &MediaPayload,
		kind: MediaKind,
	) -> Result<String, ServiceError>;

	async fn create_post(
		&self,
		post: NewPost,
	) -> Result<PostId, ServiceError>;

	/// Records `level` as `user_id`'s contribution to the post. A repeat
	/// contribution replaces the previous one and the tally moves by the delta.
	async fn add_spice(
		&self,
		post_id: &str,
		user_id: &str,
		level: u8,
	) -> Result<(), ServiceError>;

	async fn user_posts(
		&self,
		user_id: &str,
	) -> Result<Vec<Post>, ServiceError>;

	/// Bytes of previously uploaded media, looked up by key or URL.
	async fn media(
		&self,
		key: &str,
	) -> Result<Bytes, ServiceError>;
}

/// Live feed handle. Dropping it closes the underlying subscription.
pub struct FeedSubscription {
	receiver: watch::Receiver<Feed>,
	task: Option<JoinHandle<()>>,
}

impl FeedSubscription {
	pub fn new(
		receiver: watch::Receiver<Feed>,
		task: Option<JoinHandle<()>>,
	) -> Self {
		Self { receiver, task }
	}

	/// A second handle on the same snapshots.
	pub fn source(&self) -> watch::Receiver<Feed> {
		self.receiver.clone()
	}

	pub fn current(&self) -> Feed {
		self.receiver.borrow().clone()
	}

	/// Waits for the next snapshot. `None` once the source is gone.
	pub async fn changed(&mut self) -> Option<Feed> {
		self.receiver.changed().await.ok()?;
		Some(self.receiver.borrow_and_update().clone())
	}
}

impl Drop for FeedSubscription {
	fn drop(&mut self) {
		if let Some(task) = self.task.take() {
			task.abort();
		}
	}
}

/// Last level each contributor recorded on each post.
#[derive(Debug, Default)]
pub struct SpiceLedger(HashMap<(PostId, UserId), u8>);

impl SpiceLedger {
	/// Stores the new level and returns how much the post tally must move.
	pub fn record(
		&mut self,
		post_id: &str,
		user_id: &str,
		level: u8,
	) -> i64 {
		let previous = self.0.insert((post_id.to_string(), user_id.to_string()), level);
		level as i64 - previous.unwrap_or(0) as i64
	}

	pub fn get(
		&self,
		post_id: &str,
		user_id: &str,
	) -> Option<u8> {
		self.0.get(&(post_id.to_string(), user_id.to_string())).copied()
	}
}

/// Fresh post record with zeroed counters.
pub(crate) fn build_post(
	id: PostId,
	new: &NewPost,
	media_url: String,
	created_at: DateTime<Utc>,
) -> Post {
	Post {
		id,
		user_id: Some(new.user_id.clone()),
		username: new.username.clone(),
		avatar: new.avatar.clone(),
		video_url: match new.media_kind {
			MediaKind::Video => media_url.clone(),
			MediaKind::Photo => String::new(),
		},
		thumbnail: media_url.clone(),
		media_url,
		media_kind: Some(new.media_kind),
		description: new.description.clone(),
		hashtags: extract_hashtags(&new.description),
		spice_count: 0,
		comments: 0,
		shares: 0,
		created_at: Some(created_at),
		seeded_age: None,
		mood: Some(new.mood.clone().unwrap_or_else(|| DEFAULT_MOOD.to_string())),
		audio_layers: Vec::new(),
	}
}
