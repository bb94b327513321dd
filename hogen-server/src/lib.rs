//! # Hogen Server
//!
//! HTTP front end for the Hogen dialect translation service.
//!
//! The router is assembled by [`routes::create_app`] from an
//! [`infra::app_state::AppState`], which owns the translator, the batch
//! orchestrator, the activity tracker and the keep-alive scheduler. The
//! binary in `main.rs` loads configuration, builds that state, starts the
//! scheduler and serves until a shutdown signal arrives.

pub mod handlers;
pub mod infra;
pub mod routes;
