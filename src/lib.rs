// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # resource-client
//!
//! An async client for paginated, filterable collection APIs: a GET on a
//! collection answers `{"results": [...], "pages": N, "total": N}`.
//!
//! ## Features
//!
//! - **Immutable resources**: build request targets with chained, pure
//!   combinators (`query`, `filter`, `sort`, `only`, `embed`, `index`)
//! - **Structured query codec**: nested and array-valued parameters in
//!   `key[sub]=` / `key[]=` form
//! - **Lazy collection iteration**: `each`, `each_page` and `while_results`
//!   as restartable streams, plus one-request `count` and `first`
//! - **Auth**: bearer token, basic, custom headers, or session login
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use futures::TryStreamExt;
//! use resource_client::{Client, Result};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Client::with_token("https://api.example.com/api/v1", "secret")?;
//!
//!     let tickets = client
//!         .resource("tickets")?
//!         .filter(json!({"status": "open"}))?
//!         .sort(["created_at,desc"]);
//!
//!     println!("{} open tickets", tickets.count().await?);
//!
//!     let mut records = Box::pin(tickets.each());
//!     while let Some(ticket) = records.try_next().await? {
//!         println!("{}", ticket["id"]);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Client ── resource(path) ──▶ Resource ── combinators ──▶ ... │
//! └──────────────────────────────────────────────────────────────┘
//!        │                          │
//! ┌──────┴──────┬─────────────┬─────┴───────┬──────────────────┐
//! │  Transport  │     Uri     │ Collection  │     Response     │
//! ├─────────────┼─────────────┼─────────────┼──────────────────┤
//! │ reqwest     │ query codec │ each_page   │ memoized body    │
//! │ auth        │ resolve     │ each        │ Location header  │
//! │ rate limit  │ subpath     │ count/first │ error_for_status │
//! └─────────────┴─────────────┴─────────────┴──────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: Add docs before 1.0 release

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Structured query parameter codec
pub mod query;

/// Immutable URI values
pub mod uri;

/// Authentication implementations
pub mod auth;

/// HTTP transport with rate limiting
pub mod http;

/// API client
pub mod client;

/// API responses
pub mod response;

/// Resources and their combinators
pub mod resource;

/// Collection iteration
pub mod collection;

/// Client settings
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorKind, Result};
pub use types::*;

// Re-export commonly used types
pub use auth::{AuthConfig, Credentials};
pub use client::{Client, ClientBuilder, ClientConfig, DEFAULT_PER_PAGE};
pub use collection::Page;
pub use config::Settings;
pub use query::{QueryMap, QueryValue};
pub use resource::{Filter, Resource};
pub use response::{Body, Response};
pub use uri::Uri;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
