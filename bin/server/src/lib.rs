//! Recruitment portal web server.
//!
//! This crate wires the authentication and role-authorization core into an
//! Axum application: Google OAuth login, the sealed cookie session,
//! Postgres persistence and the role-gated route groups.

pub mod app;
pub mod auth;
pub mod config;
pub mod portal;

#[cfg(test)]
mod testing;
