use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::services::response::ServiceError;

/// Tally above which a post is flagged as trending.
pub const TRENDING_THRESHOLD: u64 = 10_000;
pub const DEFAULT_MOOD: &str = "default";
pub const JUST_NOW: &str = "maintenant";

pub type PostId = String;
pub type UserId = String;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
	Photo,
	Video,
}

impl MediaKind {
	pub fn extension(&self) -> &'static str {
		match self {
			Self::Photo => "jpg",
			Self::Video => "webm",
		}
	}
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Photo => "photo",
			Self::Video => "video",
		}
	}
}

impl Display for MediaKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for MediaKind {
	type Err = ServiceError;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"photo" => Ok(Self::Photo),
			"video" => Ok(Self::Video),
			_ => Err(ServiceError::ParsingError),
		}
	}
}

/// A named track of a post's soundtrack, positioned in the stereo field.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct AudioLayer {
	pub id: String,
	pub name: String,
	/// 0.0 ..= 1.0
	pub volume: f32,
	/// -1.0 (left) ..= 1.0 (right)
	pub pan: f32,
	/// Easter egg layer, revealed once discovered.
	pub is_hidden: bool,
}

impl AudioLayer {
	pub fn new(
		id: &str,
		name: &str,
		volume: f32,
		pan: f32,
		is_hidden: bool,
	) -> Self {
		Self {
			id: id.to_string(),
			name: name.to_string(),
			volume,
			pan,
			is_hidden,
		}
	}
}

#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Post {
	pub id: PostId,
	pub user_id: Option<UserId>,
	pub username: String,
	pub avatar: String,
	pub media_url: String,
	pub video_url: String,
	pub thumbnail: String,
	pub media_kind: Option<MediaKind>,
	pub description: String,
	pub hashtags: Vec<String>,
	pub spice_count: u64,
	pub comments: u64,
	pub shares: u64,
	pub created_at: Option<DateTime<Utc>>,
	/// Fixed age label for seeded posts that carry no timestamp.
	pub seeded_age: Option<String>,
	pub mood: Option<String>,
	pub audio_layers: Vec<AudioLayer>,
}

impl Post {
	pub fn is_trending(&self) -> bool {
		self.spice_count > TRENDING_THRESHOLD
	}

	pub fn time_ago(
		&self,
		now: DateTime<Utc>,
	) -> String {
		match (self.created_at, self.seeded_age.as_ref()) {
			(Some(created_at), _) => time_ago(created_at, now),
			(None, Some(label)) => label.clone(),
			(None, None) => JUST_NOW.to_string(),
		}
	}

	/// Moves the tally by a signed delta. Never drops below zero.
	pub(crate) fn apply_spice_delta(
		&mut self,
		delta: i64,
	) {
		self.spice_count = self.spice_count.saturating_add_signed(delta);
	}
}

/// Scans `#word` tokens, where a word is ASCII alphanumerics or `_`.
/// Tags keep source order and case, without the leading `#`.
pub fn extract_hashtags(text: &str) -> Vec<String> {
	let mut tags = Vec::new();
	let mut rest = text;
	while let Some(pos) = rest.find('#') {
		rest = &rest[pos + 1..];
		let end = rest
			.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
			.unwrap_or(rest.len());
		if end > 0 {
			tags.push(rest[..end].to_string());
		}
		rest = &rest[end..];
	}
	tags
}

const MONTHS_FR: [&str; 12] = [
	"janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.", "déc.",
];

pub fn time_ago(
	created_at: DateTime<Utc>,
	now: DateTime<Utc>,
) -> String {
	let mins = (now - created_at).num_minutes();
	let hours = mins / 60;
	let days = hours / 24;

	if mins < 1 {
		JUST_NOW.to_string()
	} else if mins < 60 {
		format!("{mins}min")
	} else if hours < 24 {
		format!("{hours}h")
	} else if days < 7 {
		format!("{days}j")
	} else {
		format!("{} {}", created_at.day(), MONTHS_FR[created_at.month0() as usize])
	}
}

pub fn format_count(count: u64) -> String {
	if count >= 1_000_000 {
		format!("{:.1}M", count as f64 / 1_000_000.0)
	} else if count >= 1_000 {
		format!("{:.1}k", count as f64 / 1_000.0)
	} else {
		count.to_string()
	}
}
