//! Spice meter: press-and-hold intensity input.
//!
//! [`SpiceSession`] is the pure state machine, fed with discrete inputs
//! (`press`, `tick`, `release`, `label_timeout`) and answering with the
//! [`SpiceEvent`]s the display layer has to act on. [`meter::SpiceMeter`]
//! drives it from tokio timers.
pub mod meter;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const TICK_INTERVAL: Duration = Duration::from_millis(50);
pub const LABEL_WINDOW: Duration = Duration::from_secs(2);

pub const TICK_INCREMENT: u8 = 4;
pub const MAX_LEVEL: u8 = 100;
pub const HAPTIC_STEP: u8 = 10;
pub const HAPTIC_PULSE: u32 = 15;
pub const CRITICAL_LEVEL: u8 = 85;
pub const CRITICAL_RESET_LEVEL: u8 = 80;
pub const CRITICAL_PULSE: u32 = 100;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum SpiceState {
	#[default]
	Idle,
	Charging,
	/// Final value captured, numeric label still on screen.
	Locked,
	/// Final value captured, label hidden, bar still showing it.
	Displayed,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum SpiceEvent {
	/// Vibrate for the given intensity.
	Haptic(u32),
	/// Level went past the critical mark; heightened overlay on.
	Critical,
	/// Session locked in with this final value. Emitted once per session.
	Locked(u8),
	LabelHidden,
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpiceBand {
	Doux,
	Moyen,
	Fort,
	ExtraFort,
}

impl SpiceBand {
	pub fn from_percent(level: u8) -> Self {
		match level {
			0..=24 => Self::Doux,
			25..=49 => Self::Moyen,
			50..=74 => Self::Fort,
			_ => Self::ExtraFort,
		}
	}

	pub fn label(&self) -> &'static str {
		match self {
			Self::Doux => "🌶️ Doux",
			Self::Moyen => "🌶️🌶️ Moyen",
			Self::Fort => "🌶️🌶️🌶️ Fort",
			Self::ExtraFort => "🔥 EXTRA FORT",
		}
	}
}

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct SpiceSession {
	state: SpiceState,
	level: u8,
	final_level: u8,
	critical: bool,
}

impl SpiceSession {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn state(&self) -> SpiceState {
		self.state
	}
	pub fn level(&self) -> u8 {
		self.level
	}
	pub fn final_level(&self) -> u8 {
		self.final_level
	}
	pub fn is_locked(&self) -> bool {
		matches!(self.state, SpiceState::Locked | SpiceState::Displayed)
	}
	pub fn is_charging(&self) -> bool {
		self.state == SpiceState::Charging
	}
	pub fn critical_overlay(&self) -> bool {
		self.critical
	}

	/// Level the bar shows. A locked session keeps showing its final value.
	pub fn displayed_level(&self) -> u8 {
		match self.state {
			SpiceState::Idle => 0,
			SpiceState::Charging => self.level,
			SpiceState::Locked | SpiceState::Displayed => self.final_level,
		}
	}

	pub fn label_visible(&self) -> bool {
		match self.state {
			SpiceState::Charging => self.level > 0,
			SpiceState::Locked => true,
			_ => false,
		}
	}

	pub fn band(&self) -> SpiceBand {
		SpiceBand::from_percent(self.displayed_level())
	}

	/// Starts a fresh session, discarding whatever came before.
	pub fn press(&mut self) {
		*self = Self {
			state: SpiceState::Charging,
			..Default::default()
		};
	}

	/// Back to idle without emitting anything, e.g. on navigation.
	pub fn reset(&mut self) {
		*self = Self::default();
	}

	pub fn tick(&mut self) -> Vec<SpiceEvent> {
		let mut events = Vec::new();
		if !self.is_charging() {
			return events;
		}

		let prev = self.level;
		self.level = prev.saturating_add(TICK_INCREMENT).min(MAX_LEVEL);

		if self.level / HAPTIC_STEP > prev / HAPTIC_STEP {
			events.push(SpiceEvent::Haptic(HAPTIC_PULSE));
		}

		if self.level < CRITICAL_RESET_LEVEL {
			self.critical = false;
		} else if self.level >= CRITICAL_LEVEL && !self.critical {
			self.critical = true;
			events.push(SpiceEvent::Critical);
			events.push(SpiceEvent::Haptic(CRITICAL_PULSE));
		}
		events
	}

	pub fn release(&mut self) -> Option<SpiceEvent> {
		if !self.is_charging() {
			return None;
		}
		if self.level == 0 {
			self.state = SpiceState::Idle;
			return None;
		}
		self.final_level = self.level;
		self.state = SpiceState::Locked;
		Some(SpiceEvent::Locked(self.final_level))
	}

	pub fn label_timeout(&mut self) -> Option<SpiceEvent> {
		if self.state != SpiceState::Locked {
			return None;
		}
		self.state = SpiceState::Displayed;
		Some(SpiceEvent::LabelHidden)
	}
}

#[cfg(test)]
mod test {
	use rand::Rng;

	use super::*;

	fn charge(
		session: &mut SpiceSession,
		ticks: usize,
	) -> Vec<SpiceEvent> {
		(0..ticks).flat_map(|_| session.tick()).collect()
	}

	#[test]
	fn test_level_is_monotonic_and_capped() {
		let mut rng = rand::thread_rng();
		for _ in 0..20 {
			let mut session = SpiceSession::new();
			session.press();
			let mut prev = 0;
			for _ in 0..rng.gen_range(0..80) {
				session.tick();
				assert!(session.level() >= prev);
				assert!(session.level() <= MAX_LEVEL);
				prev = session.level();
			}
		}
	}

	#[test]
	fn test_release_emits_level_once() {
		'_given: {
			let mut session = SpiceSession::new();
			session.press();
			charge(&mut session, 10);

			'_when: {
				let first = session.release();
				let second = session.release();

				assert_eq!(first, Some(SpiceEvent::Locked(40)));
				assert_eq!(second, None);
				assert!(session.is_locked());
				assert_eq!(session.final_level(), 40);
			}
		}
	}

	#[test]
	fn test_release_before_first_tick_emits_nothing() {
		let mut session = SpiceSession::new();
		session.press();
		assert_eq!(session.release(), None);
		assert_eq!(session.state(), SpiceState::Idle);
	}

	#[test]
	fn test_haptic_on_each_crossed_multiple_of_ten() {
		let mut session = SpiceSession::new();
		session.press();
		let events = charge(&mut session, 5);
		// 4, 8, 12, 16, 20: crossed 10 and 20
		assert_eq!(events, vec![SpiceEvent::Haptic(HAPTIC_PULSE), SpiceEvent::Haptic(HAPTIC_PULSE)]);
	}

	#[test]
	fn test_critical_fires_once_per_session() {
		let mut session = SpiceSession::new();
		session.press();
		let events = charge(&mut session, 40);
		let criticals = events.iter().filter(|e| **e == SpiceEvent::Critical).count();
		assert_eq!(criticals, 1);
		assert!(events.contains(&SpiceEvent::Haptic(CRITICAL_PULSE)));
		assert_eq!(session.level(), MAX_LEVEL);

		// level 88 is the first value at or past 85
		let mut session = SpiceSession::new();
		session.press();
		charge(&mut session, 21);
		assert_eq!(session.level(), 84);
		assert!(!session.critical_overlay());
		assert!(session.tick().contains(&SpiceEvent::Critical));
	}

	#[test]
	fn test_no_haptics_once_capped() {
		let mut session = SpiceSession::new();
		session.press();
		charge(&mut session, 25);
		assert!(session.tick().is_empty());
	}

	#[test]
	fn test_new_press_starts_from_zero() {
		let mut session = SpiceSession::new();
		session.press();
		charge(&mut session, 30);
		session.release();
		assert_eq!(session.displayed_level(), 100);

		session.press();
		assert_eq!(session.level(), 0);
		assert!(!session.is_locked());
		assert!(!session.critical_overlay());
	}

	#[test]
	fn test_label_window_keeps_bar_level() {
		let mut session = SpiceSession::new();
		session.press();
		charge(&mut session, 15);
		session.release();
		assert!(session.label_visible());

		assert_eq!(session.label_timeout(), Some(SpiceEvent::LabelHidden));
		assert!(!session.label_visible());
		assert_eq!(session.displayed_level(), 60);
		assert_eq!(session.band(), SpiceBand::Fort);
		assert_eq!(session.label_timeout(), None);
	}

	#[test]
	fn test_tick_ignored_when_not_charging() {
		let mut session = SpiceSession::new();
		assert!(session.tick().is_empty());
		assert_eq!(session.level(), 0);
	}

	#[test]
	fn test_band_boundaries() {
		assert_eq!(SpiceBand::from_percent(0), SpiceBand::Doux);
		assert_eq!(SpiceBand::from_percent(24), SpiceBand::Doux);
		assert_eq!(SpiceBand::from_percent(25), SpiceBand::Moyen);
		assert_eq!(SpiceBand::from_percent(50), SpiceBand::Fort);
		assert_eq!(SpiceBand::from_percent(75), SpiceBand::ExtraFort);
		assert_eq!(SpiceBand::from_percent(100), SpiceBand::ExtraFort);
		assert_eq!(SpiceBand::ExtraFort.label(), "🔥 EXTRA FORT");
	}
}
