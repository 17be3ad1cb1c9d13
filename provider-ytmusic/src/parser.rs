//! InnerTube response parsing
//!
//! Responses are deeply nested renderer trees. Everything here navigates a
//! `serde_json::Value` with JSON pointers and tolerates both the current
//! two-column playlist layout and the older single-column one.

use crate::error::{Result, YtMusicError};
use bridge_traits::{CollectionRef, LikeStatus, Track};
use serde_json::Value;

const SECTION_LIST: &str = "/contents/singleColumnBrowseResultsRenderer/tabs/0/tabRenderer/content/sectionListRenderer/contents";
const TWO_COLUMN_SECONDARY: &str = "/contents/twoColumnBrowseResultsRenderer/secondaryContents/sectionListRenderer/contents";
const TWO_COLUMN_PRIMARY: &str = "/contents/twoColumnBrowseResultsRenderer/tabs/0/tabRenderer/content/sectionListRenderer/contents";

/// One page of the library listing
#[derive(Debug, Default)]
pub struct LibraryPage {
    pub collections: Vec<CollectionRef>,
    pub continuation: Option<String>,
}

/// One page of playlist tracks
#[derive(Debug, Default)]
pub struct TrackPage {
    pub tracks: Vec<Track>,
    pub continuation: Option<String>,
}

/// First page of a playlist
#[derive(Debug)]
pub struct PlaylistPage {
    pub collection: CollectionRef,
    pub tracks: TrackPage,
}

fn text_of(value: &Value) -> String {
    match value.pointer("/runs").and_then(Value::as_array) {
        Some(runs) => runs
            .iter()
            .filter_map(|run| run.get("text").and_then(Value::as_str))
            .collect(),
        None => value
            .get("simpleText")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    }
}

fn run_texts(value: &Value) -> Vec<String> {
    value
        .pointer("/runs")
        .and_then(Value::as_array)
        .map(|runs| {
            runs.iter()
                .filter_map(|run| run.get("text").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// "1,234 songs" -> 1234
fn parse_count(text: &str) -> Option<usize> {
    let lower = text.to_lowercase();
    if !(lower.contains("song") || lower.contains("track") || lower.contains("episode")) {
        return None;
    }
    let digits: String = text
        .split_whitespace()
        .next()?
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

fn parse_year(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (trimmed.len() == 4 && trimmed.chars().all(|c| c.is_ascii_digit())).then(|| trimmed.to_string())
}

fn next_continuation(renderer: &Value) -> Option<String> {
    renderer
        .pointer("/continuations/0/nextContinuationData/continuation")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn continuation_item_token(item: &Value) -> Option<String> {
    item.pointer("/continuationItemRenderer/continuationEndpoint/continuationCommand/token")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Parse the `FEmusic_liked_playlists` browse response.
pub fn parse_library(response: &Value) -> Result<LibraryPage> {
    let sections = response
        .pointer(SECTION_LIST)
        .and_then(Value::as_array)
        .ok_or_else(|| YtMusicError::Parse("library response has no section list".to_string()))?;

    let grid = sections
        .iter()
        .find_map(|section| {
            section
                .get("gridRenderer")
                .or_else(|| section.pointer("/itemSectionRenderer/contents/0/gridRenderer"))
        })
        .ok_or_else(|| YtMusicError::Parse("library response has no playlist grid".to_string()))?;

    Ok(LibraryPage {
        collections: parse_grid_items(grid.get("items")),
        continuation: next_continuation(grid),
    })
}

/// Parse a library continuation response.
pub fn parse_library_continuation(response: &Value) -> LibraryPage {
    match response.pointer("/continuationContents/gridContinuation") {
        Some(grid) => LibraryPage {
            collections: parse_grid_items(grid.get("items")),
            continuation: next_continuation(grid),
        },
        None => LibraryPage::default(),
    }
}

fn parse_grid_items(items: Option<&Value>) -> Vec<CollectionRef> {
    items
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("musicTwoRowItemRenderer"))
                .filter_map(parse_library_item)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_library_item(renderer: &Value) -> Option<CollectionRef> {
    let browse_id = renderer
        .pointer("/title/runs/0/navigationEndpoint/browseEndpoint/browseId")
        .or_else(|| renderer.pointer("/navigationEndpoint/browseEndpoint/browseId"))
        .and_then(Value::as_str)?;
    // "New playlist" and other shortcuts are not VL browse targets
    let id = browse_id.strip_prefix("VL")?;

    let title = renderer.get("title").map(text_of).unwrap_or_default();
    let subtitle = renderer.get("subtitle").map(run_texts).unwrap_or_default();
    let track_count = subtitle.iter().find_map(|text| parse_count(text)).unwrap_or(0);

    Some(CollectionRef::new(id, title).with_track_count(track_count))
}

/// Parse the first `VL{id}` browse response of a playlist.
pub fn parse_playlist(id: &str, response: &Value) -> Result<PlaylistPage> {
    let editable = response
        .pointer("/header/musicEditablePlaylistDetailHeaderRenderer")
        .or_else(|| {
            response
                .pointer(&format!("{}/0/musicEditablePlaylistDetailHeaderRenderer", TWO_COLUMN_PRIMARY))
        });

    let header = match editable {
        Some(editable) => editable
            .pointer("/header/musicResponsiveHeaderRenderer")
            .or_else(|| editable.pointer("/header/musicDetailHeaderRenderer")),
        None => response
            .pointer(&format!("{}/0/musicResponsiveHeaderRenderer", TWO_COLUMN_PRIMARY))
            .or_else(|| response.pointer("/header/musicDetailHeaderRenderer")),
    }
    .ok_or_else(|| YtMusicError::Parse(format!("playlist {} has no header", id)))?;

    let title = header.get("title").map(text_of).unwrap_or_default();
    let mut subtitle = header.get("subtitle").map(run_texts).unwrap_or_default();
    subtitle.extend(header.get("secondSubtitle").map(run_texts).unwrap_or_default());

    let track_count = subtitle.iter().find_map(|text| parse_count(text)).unwrap_or(0);
    let year = subtitle.iter().find_map(|text| parse_year(text));

    let mut collection = CollectionRef::new(id, title)
        .with_owned(editable.is_some())
        .with_track_count(track_count);
    collection.year = year;

    let shelf = response
        .pointer(&format!("{}/0/musicPlaylistShelfRenderer", TWO_COLUMN_SECONDARY))
        .or_else(|| response.pointer(&format!("{}/0/musicPlaylistShelfRenderer", SECTION_LIST)));

    let tracks = match shelf {
        Some(shelf) => {
            let mut page = parse_track_items(shelf.get("contents"));
            page.continuation = page.continuation.or_else(|| next_continuation(shelf));
            page
        }
        None => TrackPage::default(),
    };

    Ok(PlaylistPage { collection, tracks })
}

/// Parse a playlist track continuation response.
pub fn parse_track_continuation(response: &Value) -> TrackPage {
    if let Some(items) =
        response.pointer("/onResponseReceivedActions/0/appendContinuationItemsAction/continuationItems")
    {
        return parse_track_items(Some(items));
    }

    match response.pointer("/continuationContents/musicPlaylistShelfContinuation") {
        Some(shelf) => {
            let mut page = parse_track_items(shelf.get("contents"));
            page.continuation = page.continuation.or_else(|| next_continuation(shelf));
            page
        }
        None => TrackPage::default(),
    }
}

fn parse_track_items(items: Option<&Value>) -> TrackPage {
    let mut page = TrackPage::default();
    let Some(items) = items.and_then(Value::as_array) else {
        return page;
    };

    for item in items {
        if let Some(renderer) = item.get("musicResponsiveListItemRenderer") {
            if let Some(track) = parse_track(renderer) {
                page.tracks.push(track);
            }
        } else if let Some(token) = continuation_item_token(item) {
            page.continuation = Some(token);
        }
    }
    page
}

fn parse_track(renderer: &Value) -> Option<Track> {
    let video_id = renderer
        .pointer("/playlistItemData/videoId")
        .and_then(Value::as_str)?;

    let title = renderer
        .pointer("/flexColumns/0/musicResponsiveListItemFlexColumnRenderer/text")
        .map(text_of)
        .unwrap_or_default();

    let like_status = renderer
        .pointer("/menu/menuRenderer/topLevelButtons")
        .and_then(Value::as_array)
        .and_then(|buttons| {
            buttons
                .iter()
                .find_map(|button| button.pointer("/likeButtonRenderer/likeStatus"))
        })
        .and_then(Value::as_str)
        .map(parse_like_status)
        .unwrap_or(LikeStatus::Indifferent);

    let mut track = Track::new(video_id, title, like_status);
    track.entry_id = renderer
        .pointer("/playlistItemData/playlistSetVideoId")
        .and_then(Value::as_str)
        .map(str::to_string);
    Some(track)
}

fn parse_like_status(status: &str) -> LikeStatus {
    match status {
        "LIKE" => LikeStatus::Liked,
        "DISLIKE" => LikeStatus::NotLiked,
        _ => LikeStatus::Indifferent,
    }
}

/// Check the `status` of an edit response.
pub fn ensure_edit_succeeded(response: &Value) -> Result<()> {
    match response.get("status").and_then(Value::as_str) {
        None | Some("STATUS_SUCCEEDED") => Ok(()),
        Some(other) => Err(YtMusicError::Rejected(other.to_string())),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{json, Value};

    pub fn track_item(video_id: &str, set_id: &str, title: &str, like: &str) -> Value {
        json!({
            "musicResponsiveListItemRenderer": {
                "flexColumns": [{
                    "musicResponsiveListItemFlexColumnRenderer": {
                        "text": {"runs": [{"text": title}]}
                    }
                }],
                "menu": {"menuRenderer": {"topLevelButtons": [
                    {"likeButtonRenderer": {"likeStatus": like}}
                ]}},
                "playlistItemData": {"videoId": video_id, "playlistSetVideoId": set_id}
            }
        })
    }

    pub fn continuation_item(token: &str) -> Value {
        json!({
            "continuationItemRenderer": {
                "continuationEndpoint": {"continuationCommand": {"token": token}}
            }
        })
    }

    pub fn playlist(title: &str, editable: bool, count: usize, items: Vec<Value>) -> Value {
        let header = json!({
            "musicResponsiveHeaderRenderer": {
                "title": {"runs": [{"text": title}]},
                "subtitle": {"runs": [{"text": "Playlist"}, {"text": " • "}, {"text": "2023"}]},
                "secondSubtitle": {"runs": [{"text": format!("{} songs", count)}, {"text": " • "}, {"text": "1 hour"}]}
            }
        });
        let header = if editable {
            json!({"musicEditablePlaylistDetailHeaderRenderer": {"header": header}})
        } else {
            header
        };

        json!({
            "contents": {"twoColumnBrowseResultsRenderer": {
                "tabs": [{"tabRenderer": {"content": {"sectionListRenderer": {"contents": [header]}}}}],
                "secondaryContents": {"sectionListRenderer": {"contents": [
                    {"musicPlaylistShelfRenderer": {"contents": items}}
                ]}}
            }}
        })
    }

    pub fn library_item(browse_id: &str, title: &str, subtitle: &str) -> Value {
        json!({
            "musicTwoRowItemRenderer": {
                "title": {"runs": [{
                    "text": title,
                    "navigationEndpoint": {"browseEndpoint": {"browseId": browse_id}}
                }]},
                "subtitle": {"runs": [{"text": "Playlist"}, {"text": " • "}, {"text": subtitle}]}
            }
        })
    }

    pub fn library(items: Vec<Value>, continuation: Option<&str>) -> Value {
        let mut grid = json!({"items": items});
        if let Some(token) = continuation {
            grid["continuations"] = json!([{"nextContinuationData": {"continuation": token}}]);
        }
        json!({
            "contents": {"singleColumnBrowseResultsRenderer": {"tabs": [{"tabRenderer": {"content": {
                "sectionListRenderer": {"contents": [{"gridRenderer": grid}]}
            }}}]}}
        })
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_library_skips_shortcuts() {
        let response = library(
            vec![
                json!({"musicTwoRowItemRenderer": {
                    "title": {"runs": [{"text": "New playlist"}]},
                    "navigationEndpoint": {"createPlaylistEndpoint": {}}
                }}),
                library_item("VLPL1", "Road Trip", "1,204 songs"),
                library_item("VLLM", "Liked Music", "Auto playlist"),
            ],
            Some("ctoken-1"),
        );

        let page = parse_library(&response).unwrap();

        assert_eq!(page.collections.len(), 2);
        assert_eq!(page.collections[0].id, "PL1");
        assert_eq!(page.collections[0].title, "Road Trip");
        assert_eq!(page.collections[0].track_count, 1204);
        assert!(!page.collections[0].owned);
        assert_eq!(page.collections[1].id, "LM");
        assert_eq!(page.continuation.as_deref(), Some("ctoken-1"));
    }

    #[test]
    fn test_parse_library_without_grid_fails() {
        assert!(parse_library(&json!({"contents": {}})).is_err());
    }

    #[test]
    fn test_parse_library_continuation() {
        let response = json!({
            "continuationContents": {"gridContinuation": {
                "items": [library_item("VLPL9", "Later", "3 songs")]
            }}
        });

        let page = parse_library_continuation(&response);
        assert_eq!(page.collections[0].id, "PL9");
        assert!(page.continuation.is_none());
    }

    #[test]
    fn test_parse_owned_playlist() {
        let response = playlist(
            "Road Trip",
            true,
            2,
            vec![
                track_item("v1", "s1", "First", "LIKE"),
                track_item("v2", "s2", "Second", "INDIFFERENT"),
                continuation_item("next-page"),
            ],
        );

        let page = parse_playlist("PL1", &response).unwrap();

        assert!(page.collection.owned);
        assert_eq!(page.collection.title, "Road Trip");
        assert_eq!(page.collection.track_count, 2);
        assert_eq!(page.collection.year.as_deref(), Some("2023"));
        assert_eq!(page.tracks.tracks.len(), 2);
        assert_eq!(page.tracks.tracks[0].like_status, LikeStatus::Liked);
        assert_eq!(page.tracks.tracks[1].entry_id.as_deref(), Some("s2"));
        assert_eq!(page.tracks.continuation.as_deref(), Some("next-page"));
    }

    #[test]
    fn test_parse_foreign_playlist() {
        let response = playlist("Top Hits", false, 1, vec![track_item("v1", "s1", "Hit", "DISLIKE")]);

        let page = parse_playlist("PLx", &response).unwrap();

        assert!(!page.collection.owned);
        assert_eq!(page.tracks.tracks[0].like_status, LikeStatus::NotLiked);
        assert!(page.tracks.continuation.is_none());
    }

    #[test]
    fn test_parse_empty_playlist() {
        let mut response = playlist("Nothing", true, 0, Vec::new());
        response["contents"]["twoColumnBrowseResultsRenderer"]
            .as_object_mut()
            .unwrap()
            .remove("secondaryContents");

        let page = parse_playlist("PL0", &response).unwrap();
        assert_eq!(page.collection.track_count, 0);
        assert!(page.tracks.tracks.is_empty());
    }

    #[test]
    fn test_parse_playlist_without_header_fails() {
        let result = parse_playlist("PL1", &json!({"contents": {}}));
        assert!(matches!(result, Err(YtMusicError::Parse(_))));
    }

    #[test]
    fn test_parse_track_continuation() {
        let response = json!({
            "onResponseReceivedActions": [{"appendContinuationItemsAction": {"continuationItems": [
                track_item("v3", "s3", "Third", "INDIFFERENT"),
                continuation_item("page-3")
            ]}}]
        });

        let page = parse_track_continuation(&response);
        assert_eq!(page.tracks[0].id, "v3");
        assert_eq!(page.continuation.as_deref(), Some("page-3"));
    }

    #[test]
    fn test_unavailable_track_without_video_id_is_skipped() {
        let items = json!([{"musicResponsiveListItemRenderer": {"flexColumns": []}}]);
        assert!(parse_track_items(Some(&items)).tracks.is_empty());
    }

    #[test]
    fn test_count_and_year_parsing() {
        assert_eq!(parse_count("25 songs"), Some(25));
        assert_eq!(parse_count("1 song"), Some(1));
        assert_eq!(parse_count("2 hours"), None);
        assert_eq!(parse_year("2021"), Some("2021".to_string()));
        assert_eq!(parse_year("Playlist"), None);
    }

    #[test]
    fn test_edit_status() {
        assert!(ensure_edit_succeeded(&json!({"status": "STATUS_SUCCEEDED"})).is_ok());
        assert!(ensure_edit_succeeded(&json!({})).is_ok());
        assert!(ensure_edit_succeeded(&json!({"status": "STATUS_FAILED"})).is_err());
    }
}
