pub mod identity;
pub mod post;
pub mod sound;
pub mod spice;
