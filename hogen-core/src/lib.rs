//! # Hogen Core
//!
//! Core library for the Hogen dialect translation service.
//!
//! ## Overview
//!
//! `hogen-core` carries everything the HTTP layer needs that is not HTTP:
//!
//! - **Dialect Catalog**: the fixed set of regional dialects the service can target
//! - **Validation**: pure checks that turn raw request bodies into normalized requests
//! - **Translation**: the [`translation::Translator`] seam and the Gemini-backed adapter
//! - **Batch Orchestration**: chunked, bounded fan-out with order-restored results
//! - **Activity Tracking**: organic-traffic counters read by status endpoints
//! - **Keep-Alive**: the self-ping scheduler that keeps a hosted instance awake
//!
//! ## Architecture
//!
//! - [`api`]: route constants and wire contracts shared with the server
//! - [`dialect`]: [`dialect::DialectCatalog`] and [`dialect::Dialect`]
//! - [`language`]: [`language::LanguageType`] and [`language::Direction`]
//! - [`validation`]: request validation pipeline
//! - [`translation`]: provider adapter and prompt contract
//! - [`batch`]: [`batch::BatchOrchestrator`]
//! - [`activity`]: [`activity::ActivityTracker`]
//! - [`keep_alive`]: [`keep_alive::KeepAliveScheduler`]
//! - [`error`]: error taxonomy
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use hogen_core::{
//!     batch::{BatchOrchestrator, BatchSettings},
//!     dialect::DialectCatalog,
//!     translation::UnconfiguredTranslator,
//!     validation::{ValidationLimits, validate_batch_request},
//!     api::types::BatchTranslateRequestBody,
//! };
//!
//! async fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     let body: BatchTranslateRequestBody = serde_json::from_str(
//!         r#"{"texts":["今日は疲れました"],"from":"standard","to":"dialect","dialect":"osaka"}"#,
//!     )?;
//!     let job = validate_batch_request(
//!         &body,
//!         &DialectCatalog::standard(),
//!         &ValidationLimits::default(),
//!     )?;
//!
//!     let orchestrator = BatchOrchestrator::new(
//!         Arc::new(UnconfiguredTranslator),
//!         BatchSettings::default(),
//!     );
//!     let outcome = orchestrator.run(&job).await;
//!     println!("{} of {} translated", outcome.success_count, outcome.total_count);
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Route constants and request/response contracts
pub mod api;

/// Organic traffic accounting
pub mod activity;

/// Chunked batch translation
pub mod batch;

/// Supported dialect catalog
pub mod dialect;

/// Error types
pub mod error;

/// Self-ping scheduler
pub mod keep_alive;

/// Language registers and translation direction
pub mod language;

/// Translation provider seam and Gemini adapter
pub mod translation;

/// Request validation pipeline
pub mod validation;

pub use dialect::{Dialect, DialectCatalog};
pub use error::{ProviderError, ValidationError};
pub use language::{Direction, LanguageType};
