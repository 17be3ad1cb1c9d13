//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for a terminal session on
//! macOS, Windows or Linux.
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest`
//! - `Prompter` reading answers from stdin
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ReqwestHttpClient, TerminalPrompter};
//! use std::sync::Arc;
//!
//! let http_client = Arc::new(ReqwestHttpClient::new()?);
//! let prompter = Arc::new(TerminalPrompter::new());
//! ```

mod http;
mod prompt;

pub use http::ReqwestHttpClient;
pub use prompt::TerminalPrompter;
