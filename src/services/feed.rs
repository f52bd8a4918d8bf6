use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use tokio::{sync::watch, task::JoinHandle};

use crate::{
	adapters::repositories::{Feed, FeedMode, PostRepository},
	domain::{
		identity::{Identity, Profile, Suggestion},
		post::{
			commands::{MediaPayload, NewPost},
			MediaKind, Post, PostId,
		},
	},
	services::response::ServiceError,
};

/// What the display layer renders: the ordered posts and which one is active.
#[derive(Clone, Debug, Default, Serialize)]
pub struct FeedView {
	pub posts: Feed,
	pub active_index: usize,
	/// Freshly created post the pointer jumps to once it heads the list.
	#[serde(skip)]
	awaited_head: Option<PostId>,
}

impl FeedView {
	fn apply_snapshot(
		&mut self,
		posts: Feed,
	) {
		if self.active_index >= posts.len() {
			self.active_index = 0;
		}
		self.posts = posts;
		self.settle_awaited_head();
	}

	fn await_head(
		&mut self,
		id: PostId,
	) {
		self.awaited_head = Some(id);
		self.settle_awaited_head();
	}

	fn settle_awaited_head(&mut self) {
		let arrived = match (&self.awaited_head, self.posts.first()) {
			(Some(id), Some(head)) => *id == head.id,
			_ => false,
		};
		if arrived {
			self.active_index = 0;
			self.awaited_head = None;
		}
	}

	pub fn active_post(&self) -> Option<&Post> {
		self.posts.get(self.active_index).or(self.posts.first())
	}
}

/// Feed data layer. Sole owner of the post list and the only path through
/// which tallies change.
pub struct FeedService {
	repository: Arc<dyn PostRepository>,
	view: Arc<watch::Sender<FeedView>>,
	source: Option<watch::Receiver<Feed>>,
	listener: Option<JoinHandle<()>>,
}

impl FeedService {
	pub fn new(repository: Arc<dyn PostRepository>) -> Self {
		let (view, _) = watch::channel(FeedView::default());
		Self {
			repository,
			view: Arc::new(view),
			source: None,
			listener: None,
		}
	}

	pub fn mode(&self) -> FeedMode {
		self.repository.mode()
	}

	/// Opens the live subscription. Calling it again replaces the previous one.
	pub async fn activate(&mut self) {
		self.deactivate();

		let mut subscription = self.repository.subscribe().await;
		let initial = subscription.current();
		self.view.send_modify(|view| view.apply_snapshot(initial));
		self.source = Some(subscription.source());

		let view = self.view.clone();
		self.listener = Some(tokio::spawn(async move {
			while let Some(posts) = subscription.changed().await {
				tracing::debug!("feed snapshot with {} posts", posts.len());
				view.send_modify(|view| view.apply_snapshot(posts));
			}
		}));
	}

	/// Closes the live subscription; the last snapshot stays readable.
	pub fn deactivate(&mut self) {
		if let Some(listener) = self.listener.take() {
			listener.abort();
		}
		self.source = None;
	}

	/// Pulls the repository's latest snapshot in right away, so local writes
	/// show up without waiting for the listener.
	fn sync(&self) {
		let Some(source) = self.source.as_ref() else {
			return;
		};
		let latest = source.borrow().clone();
		self.view.send_if_modified(|view| {
			if Arc::ptr_eq(&view.posts, &latest) {
				return false;
			}
			view.apply_snapshot(latest);
			true
		});
	}

	pub fn watch(&self) -> watch::Receiver<FeedView> {
		self.view.subscribe()
	}

	pub fn view(&self) -> FeedView {
		self.view.borrow().clone()
	}

	pub fn posts(&self) -> Feed {
		self.view.borrow().posts.clone()
	}

	pub fn active_index(&self) -> usize {
		self.view.borrow().active_index
	}

	pub fn active_post(&self) -> Option<Post> {
		self.view.borrow().active_post().cloned()
	}

	/// Advances the active pointer, wrapping to the start past the end.
	pub fn next_post(&self) -> Option<usize> {
		let mut next = None;
		self.view.send_if_modified(|view| {
			if view.posts.is_empty() {
				return false;
			}
			view.active_index = (view.active_index + 1) % view.posts.len();
			next = Some(view.active_index);
			true
		});
		next
	}

	pub fn select(
		&self,
		index: usize,
	) -> Result<(), ServiceError> {
		let mut selected = false;
		self.view.send_if_modified(|view| {
			selected = index < view.posts.len();
			if selected {
				view.active_index = index;
			}
			selected
		});
		if selected {
			Ok(())
		} else {
			Err(ServiceError::BadRequest)
		}
	}

	/// Publishes a post. Upload or write failures are returned to the caller.
	/// The pointer moves to the new post as soon as a snapshot carries it.
	pub async fn create_post(
		&self,
		identity: &Identity,
		profile: &Profile,
		media: MediaPayload,
		media_kind: MediaKind,
		description: &str,
		mood: Option<String>,
	) -> Result<PostId, ServiceError> {
		tracing::info!("creating {} post for {}", media_kind, identity.uid);
		let new_post = NewPost {
			user_id: identity.uid.clone(),
			username: profile.author_name(),
			avatar: profile.author_avatar(&identity.uid),
			media,
			media_kind,
			description: description.to_string(),
			mood,
		};

		let id = self.repository.create_post(new_post).await.map_err(|err| {
			tracing::error!("create post error: {}", err);
			err
		})?;

		self.view.send_modify(|view| view.await_head(id.clone()));
		self.sync();
		Ok(id)
	}

	/// Records a contribution. Failures are logged and dropped; the level is
	/// expected in 0..=100 already.
	pub async fn add_spice(
		&self,
		post_id: &str,
		user_id: &str,
		level: u8,
	) {
		match self.repository.add_spice(post_id, user_id, level).await {
			Ok(()) => self.sync(),
			Err(err) => tracing::error!("add spice error on {}: {}", post_id, err),
		}
	}

	pub async fn spice_active(
		&self,
		identity: &Identity,
		level: u8,
	) {
		let Some(post) = self.active_post() else {
			return;
		};
		self.add_spice(&post.id, &identity.uid, level).await;
	}

	pub async fn user_posts(
		&self,
		user_id: &str,
	) -> Vec<Post> {
		self.repository.user_posts(user_id).await.unwrap_or_else(|err| {
			tracing::error!("get user posts error: {}", err);
			Vec::new()
		})
	}

	pub async fn media(
		&self,
		key: &str,
	) -> Result<Bytes, ServiceError> {
		self.repository.media(key).await
	}

	/// Creation text prefilled from a caption suggestion.
	pub fn prefill(
		&self,
		suggestion: Option<&Suggestion>,
	) -> String {
		suggestion.map(Suggestion::prefill).unwrap_or_default()
	}
}

impl Drop for FeedService {
	fn drop(&mut self) {
		self.deactivate();
	}
}
