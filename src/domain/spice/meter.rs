use std::sync::Arc;

use tokio::{
	sync::{mpsc, Mutex},
	task::JoinHandle,
	time::{interval_at, sleep, Instant},
};

use super::{SpiceEvent, SpiceSession, LABEL_WINDOW, TICK_INTERVAL};

/// Timer-driven wrapper around a [`SpiceSession`] for the active post.
///
/// The charging ticker and the label timer are owned tasks; every exit path
/// (release, new press, reset, drop) aborts them.
pub struct SpiceMeter {
	session: Arc<Mutex<SpiceSession>>,
	events: mpsc::UnboundedSender<SpiceEvent>,
	ticker: Option<JoinHandle<()>>,
	label_timer: Option<JoinHandle<()>>,
}

impl SpiceMeter {
	pub fn new() -> (Self, mpsc::UnboundedReceiver<SpiceEvent>) {
		let (tx, rx) = mpsc::unbounded_channel();
		(
			Self {
				session: Arc::new(Mutex::new(SpiceSession::new())),
				events: tx,
				ticker: None,
				label_timer: None,
			},
			rx,
		)
	}

	pub async fn snapshot(&self) -> SpiceSession {
		self.session.lock().await.clone()
	}

	pub async fn press_down(&mut self) {
		self.cancel_timers();
		self.session.lock().await.press();
		self.ticker = Some(self.spawn_ticker());
	}

	/// Ends the press. Returns the locked-in level, if the session locked.
	pub async fn press_up(&mut self) -> Option<u8> {
		if let Some(ticker) = self.ticker.take() {
			ticker.abort();
		}
		let locked = self.session.lock().await.release();
		let Some(SpiceEvent::Locked(level)) = locked else {
			return None;
		};
		tracing::debug!("spice locked in at {}", level);
		let _ = self.events.send(SpiceEvent::Locked(level));
		self.label_timer = Some(self.spawn_label_timer());
		Some(level)
	}

	/// Discards the session without emitting, e.g. when the active post changes.
	pub async fn reset(&mut self) {
		self.cancel_timers();
		self.session.lock().await.reset();
	}

	fn cancel_timers(&mut self) {
		if let Some(ticker) = self.ticker.take() {
			ticker.abort();
		}
		if let Some(label_timer) = self.label_timer.take() {
			label_timer.abort();
		}
	}

	fn spawn_ticker(&self) -> JoinHandle<()> {
		let session = self.session.clone();
		let events = self.events.clone();
		tokio::spawn(async move {
			let mut interval = interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
			loop {
				interval.tick().await;
				let mut guard = session.lock().await;
				if !guard.is_charging() {
					break;
				}
				// charging goes on without a listener
				for event in guard.tick() {
					let _ = events.send(event);
				}
			}
		})
	}

	fn spawn_label_timer(&self) -> JoinHandle<()> {
		let session = self.session.clone();
		let events = self.events.clone();
		tokio::spawn(async move {
			sleep(LABEL_WINDOW).await;
			if let Some(event) = session.lock().await.label_timeout() {
				let _ = events.send(event);
			}
		})
	}
}

impl Drop for SpiceMeter {
	fn drop(&mut self) {
		self.cancel_timers();
	}
}
