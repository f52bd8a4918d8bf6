//! Peperr feed core: the spice meter, the sound spheres mixer and the live
//! post feed, over either demo data or a Postgres + NATS backend.
pub mod adapters;
pub mod config;
pub mod database;
pub mod dependencies;
pub mod domain;
pub mod services;
