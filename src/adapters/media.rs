use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use uuid::Uuid;

use crate::{
	domain::post::{commands::MediaPayload, MediaKind},
	services::response::ServiceError,
};

/// Storage key for an uploaded media file: `posts/{user}/{millis}-{nonce}.{ext}`.
/// The nonce keeps uploads from the same user in the same millisecond apart.
pub fn media_key(
	user_id: &str,
	kind: MediaKind,
	millis: i64,
	nonce: Uuid,
) -> String {
	format!("posts/{user_id}/{millis}-{}.{}", nonce.simple(), kind.extension())
}

pub fn content_type(kind: MediaKind) -> &'static str {
	match kind {
		MediaKind::Photo => "image/jpeg",
		MediaKind::Video => "video/webm",
	}
}

/// Content type for a stored key, judged by its extension.
pub fn content_type_for_key(key: &str) -> &'static str {
	match key.rsplit('.').next() {
		Some("webm") => content_type(MediaKind::Video),
		Some("jpg") | Some("jpeg") => content_type(MediaKind::Photo),
		_ => "application/octet-stream",
	}
}

/// Decodes `data:[<mime>][;base64],<payload>`.
pub fn decode_data_uri(uri: &str) -> Result<Bytes, ServiceError> {
	let rest = uri.strip_prefix("data:").ok_or(ServiceError::InvalidDataUri)?;
	let (header, data) = rest.split_once(',').ok_or(ServiceError::InvalidDataUri)?;
	if header.ends_with(";base64") {
		STANDARD.decode(data.trim()).map(Bytes::from).map_err(|err| {
			tracing::warn!("data uri is not valid base64: {}", err);
			ServiceError::InvalidDataUri
		})
	} else {
		Ok(Bytes::copy_from_slice(data.as_bytes()))
	}
}

pub fn payload_bytes(payload: &MediaPayload) -> Result<Bytes, ServiceError> {
	match payload {
		MediaPayload::DataUri(uri) => decode_data_uri(uri),
		MediaPayload::Blob(bytes) => Ok(bytes.clone()),
	}
}
