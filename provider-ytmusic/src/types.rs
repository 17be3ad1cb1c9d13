//! InnerTube request bodies
//!
//! Every request carries the `WEB_REMIX` client context the web player sends.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Client name of the YouTube Music web app
pub const CLIENT_NAME: &str = "WEB_REMIX";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub client_name: &'static str,
    pub client_version: String,
    pub hl: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    pub client: ClientInfo,
    pub user: serde_json::Map<String, serde_json::Value>,
}

impl RequestContext {
    /// Context for a web client built on `date` (`1.YYYYMMDD.01.00`).
    pub fn web_remix(date: DateTime<Utc>) -> Self {
        Self {
            client: ClientInfo {
                client_name: CLIENT_NAME,
                client_version: format!("1.{}.01.00", date.format("%Y%m%d")),
                hl: "en",
            },
            user: serde_json::Map::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseRequest {
    pub context: RequestContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browse_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation: Option<String>,
}

impl BrowseRequest {
    pub fn browse(context: RequestContext, browse_id: impl Into<String>) -> Self {
        Self {
            context,
            browse_id: Some(browse_id.into()),
            continuation: None,
        }
    }

    pub fn continuation(context: RequestContext, token: Option<String>) -> Self {
        Self {
            context,
            browse_id: None,
            continuation: token,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePlaylistRequest {
    pub context: RequestContext,
    pub playlist_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditPlaylistRequest {
    pub context: RequestContext,
    pub playlist_id: String,
    pub actions: Vec<EditAction>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditAction {
    pub action: &'static str,
    pub removed_video_id: String,
    pub set_video_id: String,
}

impl EditAction {
    pub fn remove_video(video_id: impl Into<String>, set_video_id: impl Into<String>) -> Self {
        Self {
            action: "ACTION_REMOVE_VIDEO",
            removed_video_id: video_id.into(),
            set_video_id: set_video_id.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeTarget {
    pub video_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LikeRequest {
    pub context: RequestContext,
    pub target: LikeTarget,
}

/// Playlist id as used by edit endpoints, without the `VL` browse prefix
pub fn playlist_id(id: &str) -> &str {
    id.strip_prefix("VL").unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_context_serialization() {
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        let body = BrowseRequest::browse(RequestContext::web_remix(date), "VLPL123");

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "context": {
                    "client": {"clientName": "WEB_REMIX", "clientVersion": "1.20240309.01.00", "hl": "en"},
                    "user": {}
                },
                "browseId": "VLPL123"
            })
        );
    }

    #[test]
    fn test_edit_request_shape() {
        let body = EditPlaylistRequest {
            context: RequestContext::web_remix(Utc::now()),
            playlist_id: "PL1".to_string(),
            actions: vec![EditAction::remove_video("vid", "set")],
        };
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["playlistId"], "PL1");
        assert_eq!(value["actions"][0]["action"], "ACTION_REMOVE_VIDEO");
        assert_eq!(value["actions"][0]["removedVideoId"], "vid");
        assert_eq!(value["actions"][0]["setVideoId"], "set");
    }

    #[test]
    fn test_playlist_id_strips_browse_prefix() {
        assert_eq!(playlist_id("VLPL123"), "PL123");
        assert_eq!(playlist_id("PL123"), "PL123");
    }
}
