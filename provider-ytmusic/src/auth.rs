//! Browser-header authentication.
//!
//! The user exports the request headers of a signed-in music.youtube.com tab
//! as a JSON object (`{"cookie": "...", "user-agent": "...", ...}`). Every
//! request replays those headers plus a fresh `SAPISIDHASH` authorization
//! derived from the `SAPISID` cookie.

use crate::error::{Result, YtMusicError};
use core_runtime::logging::redact_if_sensitive;
use sha1::{Digest, Sha1};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

pub const ORIGIN: &str = "https://music.youtube.com";

/// Headers recomputed per request and never replayed from the file
const REPLACED_HEADERS: &[&str] = &["authorization", "content-length", "host", "origin", "x-origin"];

/// Credentials captured from a browser session
#[derive(Clone)]
pub struct BrowserAuth {
    headers: HashMap<String, String>,
    sapisid: String,
}

impl std::fmt::Debug for BrowserAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserAuth")
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("sapisid", &redact_if_sensitive("sapisid", &self.sapisid))
            .finish()
    }
}

impl BrowserAuth {
    /// Load headers from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            YtMusicError::Auth(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    /// Parse a JSON object of header name to value.
    pub fn from_json(raw: &str) -> Result<Self> {
        let parsed: HashMap<String, String> = serde_json::from_str(raw)
            .map_err(|e| YtMusicError::Auth(format!("headers must be a JSON object of strings: {}", e)))?;
        Self::from_headers(parsed)
    }

    pub fn from_headers(headers: HashMap<String, String>) -> Result<Self> {
        let headers: HashMap<String, String> = headers
            .into_iter()
            .map(|(name, value)| (name.to_lowercase(), value))
            .filter(|(name, _)| !REPLACED_HEADERS.contains(&name.as_str()))
            .collect();

        let cookie = headers
            .get("cookie")
            .ok_or_else(|| YtMusicError::Auth("cookie header is missing".to_string()))?;
        let sapisid = sapisid_from_cookie(cookie).ok_or_else(|| {
            YtMusicError::Auth("cookie has no SAPISID; sign in and export headers again".to_string())
        })?;

        debug!(
            headers = headers.len(),
            cookie = %redact_if_sensitive("cookie", cookie),
            "Loaded browser headers"
        );

        Ok(Self { headers, sapisid })
    }

    /// `SAPISIDHASH {ts}_{sha1(ts SAPISID origin)}` for a unix timestamp.
    pub fn authorization(&self, timestamp: i64) -> String {
        let mut hasher = Sha1::new();
        hasher.update(format!("{} {} {}", timestamp, self.sapisid, ORIGIN).as_bytes());
        format!("SAPISIDHASH {}_{}", timestamp, hex::encode(hasher.finalize()))
    }

    /// Full header set for one request.
    pub fn request_headers(&self, timestamp: i64) -> HashMap<String, String> {
        let mut headers = self.headers.clone();
        headers.insert("authorization".to_string(), self.authorization(timestamp));
        headers.insert("origin".to_string(), ORIGIN.to_string());
        headers.insert("x-origin".to_string(), ORIGIN.to_string());
        headers
    }
}

/// Pull the SAPISID value out of a cookie header, preferring the
/// `__Secure-3PAPISID` variant.
pub fn sapisid_from_cookie(cookie: &str) -> Option<String> {
    let pairs: HashMap<&str, &str> = cookie
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .collect();

    ["__Secure-3PAPISID", "SAPISID"]
        .iter()
        .find_map(|name| pairs.get(name))
        .filter(|value| !value.is_empty())
        .map(|value| value.to_string())
}
