//! Administrative backend for a multilingual blog module.
//!
//! The crate is layered the usual way: `domain` holds entities and shared
//! enums, `application` the admin services and the repository traits they
//! depend on, `infra` the Postgres adapters, image storage and the axum
//! admin surface, and `config` the layered runtime configuration.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod util;
