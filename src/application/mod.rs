//! Application services layer.

pub mod admin;
pub mod auth;
pub mod error;
pub mod meta;
pub mod repos;
