use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::domain::{
	identity::Identity,
	post::PostId,
	spice::{meter::SpiceMeter, SpiceEvent, MAX_LEVEL},
};

use super::feed::FeedService;

/// The active feed card: one spice meter bound to whichever post is on
/// screen, forwarding each locked-in level to the feed.
pub struct CardHandler {
	feed: Arc<FeedService>,
	identity: Identity,
	meter: SpiceMeter,
	pressed_post: Option<PostId>,
}

impl CardHandler {
	pub fn new(
		feed: Arc<FeedService>,
		identity: Identity,
	) -> (Self, UnboundedReceiver<SpiceEvent>) {
		let (meter, events) = SpiceMeter::new();
		(
			Self {
				feed,
				identity,
				meter,
				pressed_post: None,
			},
			events,
		)
	}

	pub fn meter(&self) -> &SpiceMeter {
		&self.meter
	}

	pub async fn press_down(&mut self) {
		self.pressed_post = self.feed.active_post().map(|post| post.id);
		self.meter.press_down().await;
	}

	/// Locks the session and records it on the post that was pressed, even
	/// if the feed moved underneath.
	pub async fn press_up(&mut self) -> Option<u8> {
		let level = self.meter.press_up().await?.min(MAX_LEVEL);
		match self.pressed_post.as_deref() {
			Some(post_id) => self.feed.add_spice(post_id, &self.identity.uid, level).await,
			None => tracing::warn!("spice of {} dropped, no post on screen", level),
		}
		Some(level)
	}

	/// Moves to the next post, discarding the current session.
	pub async fn next_post(&mut self) -> Option<usize> {
		self.meter.reset().await;
		self.pressed_post = None;
		self.feed.next_post()
	}
}

#[cfg(test)]
mod test {
	use std::time::Duration;

	use tokio::time::sleep;

	use super::*;
	use crate::adapters::repositories::InMemoryRepository;

	async fn card(uid: &str) -> (CardHandler, Arc<FeedService>) {
		let mut feed = FeedService::new(Arc::new(InMemoryRepository::new()));
		feed.activate().await;
		let feed = Arc::new(feed);
		let (card, _events) = CardHandler::new(
			feed.clone(),
			Identity {
				uid: uid.into(),
				..Default::default()
			},
		);
		(card, feed)
	}

	#[tokio::test(start_paused = true)]
	async fn test_release_records_on_active_post() {
		'_given: {
			let (mut card, feed) = card("x").await;
			let before = feed.active_post().unwrap().spice_count;

			'_when: {
				card.press_down().await;
				sleep(Duration::from_millis(525)).await;
				assert_eq!(card.press_up().await, Some(40));

				assert_eq!(feed.active_post().unwrap().spice_count, before + 40);
			}
		}
	}

	#[tokio::test(start_paused = true)]
	async fn test_repeat_press_replaces_contribution() {
		let (mut card, feed) = card("x").await;
		let before = feed.active_post().unwrap().spice_count;

		card.press_down().await;
		sleep(Duration::from_millis(525)).await;
		card.press_up().await;

		card.press_down().await;
		sleep(Duration::from_millis(1_025)).await;
		assert_eq!(card.press_up().await, Some(80));

		assert_eq!(feed.active_post().unwrap().spice_count, before + 80);
	}

	#[tokio::test(start_paused = true)]
	async fn test_navigation_discards_session() {
		let (mut card, feed) = card("x").await;
		let tallies: Vec<u64> = feed.posts().iter().map(|p| p.spice_count).collect();

		card.press_down().await;
		sleep(Duration::from_millis(225)).await;
		assert_eq!(card.next_post().await, Some(1));
		assert_eq!(card.press_up().await, None);
		assert_eq!(card.meter().snapshot().await.level(), 0);

		let after: Vec<u64> = feed.posts().iter().map(|p| p.spice_count).collect();
		assert_eq!(tallies, after);
	}
}
