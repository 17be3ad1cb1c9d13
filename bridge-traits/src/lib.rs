//! # Host Bridge Traits
//!
//! Contracts between the bulk operation engine and the outside world.
//!
//! ## Overview
//!
//! The engine never talks to a network, a terminal or a concrete remote
//! service directly. Each capability it needs is expressed as a trait here and
//! injected at startup:
//!
//! | Trait | Role | Desktop implementation |
//! |-------|------|------------------------|
//! | [`HttpClient`](http::HttpClient) | Raw HTTP transport | `bridge-desktop::ReqwestHttpClient` |
//! | [`CollectionProvider`](collection::CollectionProvider) | Remote playlist service | `provider-ytmusic::YtMusicConnector` |
//! | [`Prompter`](prompt::Prompter) | Interactive confirmations and selections | `bridge-desktop::TerminalPrompter` |
//!
//! ## Error Handling
//!
//! All traits return [`BridgeError`](error::BridgeError). Implementations
//! must map remote failures onto its classified variants; in particular a
//! write race on one playlist is `BridgeError::Conflict`, which is the only
//! error the engine retries.
//!
//! ## Thread Safety
//!
//! Every trait requires `Send + Sync`: providers are shared across the
//! workers of a batch.

pub mod collection;
pub mod error;
pub mod http;
pub mod prompt;

pub use error::BridgeError;

pub use collection::{CollectionDetail, CollectionProvider, CollectionRef, LikeStatus, Track};
pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use prompt::Prompter;
