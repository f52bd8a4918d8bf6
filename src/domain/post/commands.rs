use bytes::Bytes;
use serde::Deserialize;

use super::entity::{MediaKind, UserId};

/// Captured media as handed over by the camera collaborator.
#[derive(Clone, Debug, PartialEq)]
pub enum MediaPayload {
	/// Already-encoded `data:` URI.
	DataUri(String),
	Blob(Bytes),
}

impl From<String> for MediaPayload {
	fn from(value: String) -> Self {
		MediaPayload::DataUri(value)
	}
}
impl From<Bytes> for MediaPayload {
	fn from(value: Bytes) -> Self {
		MediaPayload::Blob(value)
	}
}

/// Everything a repository needs to publish a post.
#[derive(Clone, Debug)]
pub struct NewPost {
	pub user_id: UserId,
	pub username: String,
	pub avatar: String,
	pub media: MediaPayload,
	pub media_kind: MediaKind,
	pub description: String,
	pub mood: Option<String>,
}

/// Web-facing create command. Media travels as a data URI.
#[derive(Clone, Debug, Deserialize)]
pub struct CreatePost {
	pub user_id: String,
	pub display_name: Option<String>,
	pub username: Option<String>,
	pub photo_url: Option<String>,
	pub media: String,
	pub media_kind: MediaKind,
	pub description: String,
	pub mood: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AddSpice {
	pub user_id: String,
	pub level: u8,
}
