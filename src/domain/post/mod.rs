pub mod commands;
pub mod entity;
pub mod sample;

pub use entity::{extract_hashtags, AudioLayer, MediaKind, Post, PostId, UserId};
