// Sound spheres: spatial mix of a post's audio layers driven by device tilt.
use std::collections::HashSet;

use serde::Serialize;

use crate::domain::post::AudioLayer;

/// Degrees of roll mapped onto the full [-1, 1] pan range.
const TILT_RANGE: f32 = 45.0;
/// Pitch at which the phone is considered neutral.
const NEUTRAL_PITCH: f32 = 45.0;
pub const HIDDEN_NAME: &str = "???";

#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize)]
pub struct Tilt {
	pub x: f32,
	pub y: f32,
}

impl Tilt {
	/// `gamma` is left/right roll, `beta` front/back pitch, both in degrees.
	pub fn from_orientation(
		gamma: Option<f32>,
		beta: Option<f32>,
	) -> Self {
		let x = gamma.map(|g| g / TILT_RANGE).unwrap_or(0.0);
		let y = beta.map(|b| (b - NEUTRAL_PITCH) / TILT_RANGE).unwrap_or(0.0);
		Self {
			x: x.clamp(-1.0, 1.0),
			y: y.clamp(-1.0, 1.0),
		}
	}
}

#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct MixedLayer {
	pub id: String,
	pub name: String,
	pub volume: f32,
	pub is_hidden: bool,
	pub revealed: bool,
}

#[derive(Debug, Default)]
pub struct SoundMixer {
	layers: Vec<AudioLayer>,
	tilt: Tilt,
	muted: bool,
	discovered: HashSet<String>,
}

impl SoundMixer {
	pub fn new(layers: Vec<AudioLayer>) -> Self {
		Self {
			layers,
			..Default::default()
		}
	}

	pub fn set_tilt(
		&mut self,
		gamma: Option<f32>,
		beta: Option<f32>,
	) {
		self.tilt = Tilt::from_orientation(gamma, beta);
	}

	pub fn tilt(&self) -> Tilt {
		self.tilt
	}

	pub fn toggle_mute(&mut self) -> bool {
		self.muted = !self.muted;
		self.muted
	}

	/// Marks a hidden layer as found. Returns false for unknown or visible layers.
	pub fn discover(
		&mut self,
		id: &str,
	) -> bool {
		let hidden = self.layers.iter().any(|l| l.id == id && l.is_hidden);
		if hidden {
			self.discovered.insert(id.to_string());
		}
		hidden
	}

	pub fn is_revealed(
		&self,
		layer: &AudioLayer,
	) -> bool {
		!layer.is_hidden || self.discovered.contains(&layer.id)
	}

	pub fn volume(
		&self,
		layer: &AudioLayer,
	) -> f32 {
		if self.muted {
			return 0.0;
		}
		layer.volume * (1.0 - (self.tilt.x - layer.pan).abs() / 2.0)
	}

	pub fn mix(&self) -> Vec<MixedLayer> {
		self.layers
			.iter()
			.map(|layer| {
				let revealed = self.is_revealed(layer);
				MixedLayer {
					id: layer.id.clone(),
					name: if revealed { layer.name.clone() } else { HIDDEN_NAME.to_string() },
					volume: self.volume(layer),
					is_hidden: layer.is_hidden,
					revealed,
				}
			})
			.collect()
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::domain::post::sample::sample_posts;

	fn approx(
		a: f32,
		b: f32,
	) -> bool {
		(a - b).abs() < 1e-5
	}

	#[test]
	fn test_tilt_is_clamped() {
		let tilt = Tilt::from_orientation(Some(90.0), Some(-45.0));
		assert_eq!(tilt, Tilt { x: 1.0, y: -1.0 });
		assert_eq!(Tilt::from_orientation(None, None), Tilt::default());
	}

	#[test]
	fn test_volume_follows_pan_distance() {
		let layers = sample_posts().remove(0).audio_layers;
		let mut mixer = SoundMixer::new(layers.clone());

		// flat phone: centred layer at full volume
		assert!(approx(mixer.volume(&layers[0]), 1.0));
		assert!(approx(mixer.volume(&layers[1]), 0.8 * (1.0 - 0.3 / 2.0)));

		// tilt fully right brings the right-panned secret layer up
		mixer.set_tilt(Some(45.0), None);
		assert!(approx(mixer.volume(&layers[2]), 0.6 * (1.0 - 0.2 / 2.0)));
		assert!(approx(mixer.volume(&layers[0]), 0.5));
	}

	#[test]
	fn test_mute_silences_every_layer() {
		let mut mixer = SoundMixer::new(sample_posts().remove(0).audio_layers);
		assert!(mixer.toggle_mute());
		assert!(mixer.mix().iter().all(|l| l.volume == 0.0));
		assert!(!mixer.toggle_mute());
	}

	#[test]
	fn test_hidden_layer_revealed_on_discovery() {
		let mut mixer = SoundMixer::new(sample_posts().remove(0).audio_layers);
		assert_eq!(mixer.mix()[2].name, HIDDEN_NAME);
		assert!(!mixer.discover("main"));
		assert!(mixer.discover("secret"));
		assert_eq!(mixer.mix()[2].name, "🔥 Secret Drop");
	}
}
