use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::{
	domain::post::{Post, PostId},
	services::feed::FeedView,
};

pub type AnyError = dyn std::error::Error + Send + Sync;

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ServiceResponse {
	Feed(FeedView),
	Posts(Vec<Post>),
	Created { id: PostId },
}

impl From<FeedView> for ServiceResponse {
	fn from(value: FeedView) -> Self {
		ServiceResponse::Feed(value)
	}
}

impl From<Vec<Post>> for ServiceResponse {
	fn from(value: Vec<Post>) -> Self {
		ServiceResponse::Posts(value)
	}
}

impl IntoResponse for ServiceResponse {
	fn into_response(self) -> Response {
		match self {
			created @ ServiceResponse::Created { .. } => (StatusCode::CREATED, Json(created)).into_response(),
			other => Json(other).into_response(),
		}
	}
}

#[derive(Debug, Error)]
pub enum ServiceError {
	#[error("media upload failed: {0}")]
	UploadFailed(String),
	#[error("post write failed: {0}")]
	WriteFailed(String),
	#[error("EntityNotFound")]
	EntityNotFound,
	#[error("InvalidDataUri")]
	InvalidDataUri,
	#[error("ParsingError")]
	ParsingError,
	#[error("BadRequest")]
	BadRequest,
	#[error("QueueServiceError")]
	QueueServiceError,
	#[error("{0}")]
	DatabaseError(Box<AnyError>),
}

impl From<sqlx::Error> for ServiceError {
	fn from(value: sqlx::Error) -> Self {
		match value {
			sqlx::Error::RowNotFound => ServiceError::EntityNotFound,
			err => ServiceError::DatabaseError(Box::new(err)),
		}
	}
}

impl IntoResponse for ServiceError {
	fn into_response(self) -> Response {
		let status = match self {
			ServiceError::EntityNotFound => StatusCode::NOT_FOUND,
			ServiceError::InvalidDataUri | ServiceError::ParsingError | ServiceError::BadRequest => StatusCode::BAD_REQUEST,
			ServiceError::UploadFailed(_) | ServiceError::WriteFailed(_) => StatusCode::BAD_GATEWAY,
			ServiceError::QueueServiceError | ServiceError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
		};
		(status, self.to_string()).into_response()
	}
}
