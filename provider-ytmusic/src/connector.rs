//! YouTube Music InnerTube connector
//!
//! Implements `CollectionProvider` on top of the private `youtubei/v1` API the
//! music.youtube.com web app uses.

use async_trait::async_trait;
use bridge_traits::collection::{CollectionDetail, CollectionProvider, CollectionRef, LikeStatus, Track};
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::auth::BrowserAuth;
use crate::error::{Result, YtMusicError};
use crate::parser::{self, PlaylistPage};
use crate::types::{
    playlist_id, BrowseRequest, DeletePlaylistRequest, EditAction, EditPlaylistRequest,
    LikeRequest, LikeTarget, RequestContext,
};

/// InnerTube API base URL
const API_BASE: &str = "https://music.youtube.com/youtubei/v1";

/// Browse id of the signed-in user's playlist library
const LIBRARY_BROWSE_ID: &str = "FEmusic_liked_playlists";

/// Attempts per request for rate limits, server errors and transport failures
const DEFAULT_MAX_RETRIES: u32 = 3;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// YouTube Music connector
///
/// # Features
///
/// - Library listing and playlist fetches with continuation paging
/// - Playlist deletion, track removal and rating
/// - Exponential backoff for 429 and 5xx responses
/// - `409 Conflict` surfaced as `BridgeError::Conflict` without retrying
///
/// # Example
///
/// ```ignore
/// use provider_ytmusic::{BrowserAuth, YtMusicConnector};
/// use bridge_traits::CollectionProvider;
///
/// let auth = BrowserAuth::from_file("browser.json")?;
/// let connector = YtMusicConnector::new(http_client, auth);
/// let playlists = connector.list_collections().await?;
/// ```
pub struct YtMusicConnector {
    http_client: Arc<dyn HttpClient>,
    auth: BrowserAuth,
    max_retries: u32,
}

impl YtMusicConnector {
    pub fn new(http_client: Arc<dyn HttpClient>, auth: BrowserAuth) -> Self {
        Self {
            http_client,
            auth,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    fn endpoint_url(endpoint: &str, continuation: Option<&str>) -> String {
        let mut url = format!("{}/{}?alt=json", API_BASE, endpoint);
        if let Some(token) = continuation {
            let token = urlencoding::encode(token);
            url.push_str(&format!("&ctoken={0}&continuation={0}&type=next", token));
        }
        url
    }

    fn context() -> RequestContext {
        RequestContext::web_remix(Utc::now())
    }

    /// Best human-readable message from an error response
    fn error_message(response: &HttpResponse) -> String {
        response
            .json::<Value>()
            .ok()
            .and_then(|body| {
                body.pointer("/error/message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| response.text().chars().take(200).collect())
    }

    /// POST `body` to an endpoint with retry logic
    ///
    /// Implements exponential backoff for rate limiting and transient errors.
    #[instrument(skip(self, body))]
    async fn post<B: Serialize + Sync>(
        &self,
        endpoint: &str,
        body: &B,
        continuation: Option<&str>,
    ) -> Result<Value> {
        let url = Self::endpoint_url(endpoint, continuation);
        let mut attempt = 0;

        loop {
            let request = HttpRequest::post_json(url.clone(), body)?
                .with_headers(&self.auth.request_headers(Utc::now().timestamp()))
                .with_timeout(REQUEST_TIMEOUT);

            let failure = match self.http_client.execute(request).await {
                Ok(response) if response.is_success() => {
                    debug!(status = response.status, "API request succeeded");
                    return Ok(response.json()?);
                }
                Ok(response) if response.status == 429 || response.is_server_error() => {
                    YtMusicError::Api {
                        status_code: response.status,
                        message: Self::error_message(&response),
                    }
                }
                Ok(response) => {
                    warn!(status = response.status, "API request failed");
                    return Err(YtMusicError::Api {
                        status_code: response.status,
                        message: Self::error_message(&response),
                    });
                }
                Err(e) => YtMusicError::Bridge(e),
            };

            attempt += 1;
            if attempt >= self.max_retries {
                warn!(attempts = attempt, error = %failure, "API request failed after retries");
                return Err(failure);
            }

            let backoff_ms = 100u64 * 2u64.pow(attempt);
            warn!(
                attempt,
                max_retries = self.max_retries,
                backoff_ms,
                error = %failure,
                "API request failed, retrying"
            );
            tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
        }
    }

    async fn library(&self) -> Result<Vec<CollectionRef>> {
        let response = self
            .post("browse", &BrowseRequest::browse(Self::context(), LIBRARY_BROWSE_ID), None)
            .await?;
        let first = parser::parse_library(&response)?;

        let mut collections = first.collections;
        let mut continuation = first.continuation;
        while let Some(token) = continuation {
            let response = self
                .post("browse", &BrowseRequest::continuation(Self::context(), None), Some(&token))
                .await?;
            let page = parser::parse_library_continuation(&response);
            if page.collections.is_empty() {
                break;
            }
            collections.extend(page.collections);
            continuation = page.continuation;
        }

        Ok(collections)
    }

    async fn playlist(&self, id: &str, limit: Option<usize>) -> Result<CollectionDetail> {
        let id = playlist_id(id);
        let response = self
            .post("browse", &BrowseRequest::browse(Self::context(), format!("VL{}", id)), None)
            .await?;
        let PlaylistPage {
            mut collection,
            tracks: first,
        } = parser::parse_playlist(id, &response)?;

        let mut tracks = first.tracks;
        let mut continuation = first.continuation;
        while let Some(token) = continuation {
            if limit.is_some_and(|limit| tracks.len() >= limit) {
                break;
            }
            let response = self
                .post("browse", &BrowseRequest::continuation(Self::context(), Some(token)), None)
                .await?;
            let page = parser::parse_track_continuation(&response);
            if page.tracks.is_empty() {
                break;
            }
            tracks.extend(page.tracks);
            continuation = page.continuation;
        }

        if let Some(limit) = limit {
            tracks.truncate(limit);
        }
        if collection.track_count == 0 {
            collection.track_count = tracks.len();
        }

        Ok(CollectionDetail::new(collection, tracks))
    }
}

#[async_trait]
impl CollectionProvider for YtMusicConnector {
    #[instrument(skip(self))]
    async fn list_collections(&self) -> bridge_traits::error::Result<Vec<CollectionRef>> {
        let collections = self.library().await?;
        info!(count = collections.len(), "Listed library playlists");
        Ok(collections)
    }

    #[instrument(skip(self))]
    async fn get_collection_detail(
        &self,
        id: &str,
        limit: Option<usize>,
    ) -> bridge_traits::error::Result<CollectionDetail> {
        let detail = self.playlist(id, limit).await?;
        debug!(
            title = %detail.title(),
            tracks = detail.tracks.len(),
            owned = detail.is_owned(),
            "Fetched playlist"
        );
        Ok(detail)
    }

    #[instrument(skip(self))]
    async fn delete_collection(&self, id: &str) -> bridge_traits::error::Result<()> {
        let body = DeletePlaylistRequest {
            context: Self::context(),
            playlist_id: playlist_id(id).to_string(),
        };
        self.post("playlist/delete", &body, None).await?;
        info!(id, "Deleted playlist");
        Ok(())
    }

    #[instrument(skip(self, track), fields(video_id = %track.id))]
    async fn remove_track(&self, collection_id: &str, track: &Track) -> bridge_traits::error::Result<()> {
        let set_video_id = track.entry_id.clone().ok_or_else(|| YtMusicError::MissingEntryId {
            video_id: track.id.clone(),
        })?;

        let body = EditPlaylistRequest {
            context: Self::context(),
            playlist_id: playlist_id(collection_id).to_string(),
            actions: vec![EditAction::remove_video(track.id.clone(), set_video_id)],
        };
        let response = self.post("browse/edit_playlist", &body, None).await?;
        parser::ensure_edit_succeeded(&response)?;
        Ok(())
    }

    #[instrument(skip(self, track), fields(video_id = %track.id))]
    async fn rate_track(&self, track: &Track, status: LikeStatus) -> bridge_traits::error::Result<()> {
        let endpoint = match status {
            LikeStatus::Liked => "like/like",
            LikeStatus::NotLiked => "like/dislike",
            LikeStatus::Indifferent => "like/removelike",
        };
        let body = LikeRequest {
            context: Self::context(),
            target: LikeTarget {
                video_id: track.id.clone(),
            },
        };
        self.post(endpoint, &body, None).await?;
        Ok(())
    }
}
