//! # YouTube Music Provider
//!
//! Implements the `CollectionProvider` trait for YouTube Music.
//!
//! ## Overview
//!
//! This module provides:
//! - Browser-header authentication with `SAPISIDHASH` request signing
//! - Library and playlist browsing with continuation paging
//! - Playlist deletion, track removal and track rating
//! - Status classification onto `BridgeError` (409 is a write conflict)
//! - Exponential backoff for rate limiting and server errors

pub mod auth;
pub mod connector;
pub mod error;
pub mod parser;
pub mod types;

pub use auth::BrowserAuth;
pub use connector::YtMusicConnector;
pub use error::{Result, YtMusicError};
