use serde::{Deserialize, Serialize};

pub const ANONYMOUS: &str = "Anonyme";

/// Signed-in user as handed over by the auth provider.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct Identity {
	pub uid: String,
	pub display_name: Option<String>,
	pub avatar_url: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct Profile {
	pub display_name: Option<String>,
	pub username: Option<String>,
	pub photo_url: Option<String>,
	pub total_spice: u64,
	pub followers: u64,
	pub following: u64,
}

impl Profile {
	/// Name shown on a post authored by this profile.
	pub fn author_name(&self) -> String {
		self.display_name
			.as_deref()
			.filter(|name| !name.is_empty())
			.or(self.username.as_deref().filter(|name| !name.is_empty()))
			.unwrap_or(ANONYMOUS)
			.to_string()
	}

	pub fn author_avatar(
		&self,
		uid: &str,
	) -> String {
		match self.photo_url.as_deref() {
			Some(url) if !url.is_empty() => url.to_string(),
			_ => format!("https://picsum.photos/seed/{uid}/200/200"),
		}
	}
}

/// Caption idea returned by the text-generation collaborator.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct Suggestion {
	pub title: String,
	pub description: String,
	pub suggested_audio: Option<String>,
}

impl Suggestion {
	pub fn prefill(&self) -> String {
		match (self.title.is_empty(), self.description.is_empty()) {
			(true, _) => self.description.clone(),
			(false, true) => self.title.clone(),
			(false, false) => format!("{}\n{}", self.title, self.description),
		}
	}
}
