//! End-of-operation summaries printed by the CLI.

use crate::outcome::{BatchReport, FailedItem};
use bridge_traits::{CollectionRef, Track};
use std::fmt;

const RULE: &str = "==================================================";

fn write_section(f: &mut fmt::Formatter<'_>, heading: &str, items: &[CollectionRef]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    write!(f, "\n{} ({}):", heading, items.len())?;
    for item in items {
        write!(f, "\n  • {} ({})", item.title, item.id)?;
    }
    Ok(())
}

/// Playlists matched by a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListReport {
    pub search: Option<String>,
    pub playlists: Vec<CollectionRef>,
}

impl fmt::Display for ListReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.search {
            Some(term) => writeln!(f, "Playlists matching \"{}\"", term)?,
            None => writeln!(f, "All playlists")?,
        }
        write!(f, "{}", RULE)?;

        if self.playlists.is_empty() {
            return write!(f, "\nNo playlists found.");
        }
        for playlist in &self.playlists {
            write!(f, "\n  • {} ({} tracks)", playlist.title, playlist.track_count)?;
        }
        write!(f, "\n\nTotal: {}", self.playlists.len())
    }
}

/// Result of any playlist-deleting flow
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeletionReport {
    pub deleted: BatchReport<CollectionRef>,
    /// The user answered no
    pub declined: Vec<CollectionRef>,
    pub skipped_not_owned: Vec<CollectionRef>,
    /// Left alone because they did not qualify
    pub kept: Vec<CollectionRef>,
}

impl fmt::Display for DeletionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Deletion Summary ---")?;
        write!(f, "Deleted: {}", self.deleted.succeeded)?;
        write!(f, "\nFailed: {}", self.deleted.failed)?;
        for FailedItem { item, reason } in &self.deleted.failures {
            write!(f, "\n  • {} ({}): {}", item.title, item.id, reason)?;
        }
        write_section(f, "Declined", &self.declined)?;
        write_section(f, "Skipped, not owned", &self.skipped_not_owned)?;
        if !self.kept.is_empty() {
            write!(f, "\nKept: {}", self.kept.len())?;
        }
        Ok(())
    }
}

/// Result of duplicate resolution
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DuplicateReport {
    pub unique_titles: usize,
    pub duplicate_groups: usize,
    /// Groups the user left unresolved
    pub skipped_groups: Vec<String>,
    pub kept: Vec<CollectionRef>,
    pub deletion: DeletionReport,
}

impl fmt::Display for DuplicateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Unique titles: {}", self.unique_titles)?;
        write!(f, "Duplicate groups: {}", self.duplicate_groups)?;
        if !self.skipped_groups.is_empty() {
            write!(f, "\nSkipped groups: {}", self.skipped_groups.join(", "))?;
        }
        write_section(f, "Kept", &self.kept)?;
        write!(f, "\n\n{}", self.deletion)
    }
}

/// Result of liking every track in a playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeReport {
    pub playlist: CollectionRef,
    pub total: usize,
    pub liked: usize,
    /// Already liked before the run
    pub skipped: usize,
    pub failures: Vec<FailedItem<Track>>,
}

impl LikeReport {
    pub fn new(playlist: CollectionRef, total: usize) -> Self {
        Self {
            playlist,
            total,
            liked: 0,
            skipped: 0,
            failures: Vec::new(),
        }
    }
}

impl fmt::Display for LikeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Stats for {} ---", self.playlist.title)?;
        writeln!(f, "Skipped: {} songs", self.skipped)?;
        writeln!(f, "Liked: {} songs", self.liked)?;
        write!(f, "Total: {} songs", self.total)?;
        if !self.failures.is_empty() {
            write!(f, "\nFailed: {} songs", self.failures.len())?;
            for failure in &self.failures {
                write!(f, "\n  • {}: {}", failure.item, failure.reason)?;
            }
        }
        Ok(())
    }
}

/// State of a playlist re-fetched after a bulk removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// The playlist is empty
    Confirmed,
    /// Tracks remain, e.g. re-added by another writer
    Mismatch { remaining: usize },
    Unavailable { reason: String },
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verification::Confirmed => write!(f, "verified: playlist is empty"),
            Verification::Mismatch { remaining } => {
                write!(f, "verification mismatch: {} tracks remain", remaining)
            }
            Verification::Unavailable { reason } => write!(f, "could not verify: {}", reason),
        }
    }
}

/// Result of removing every track from a playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalReport {
    pub playlist: CollectionRef,
    pub batch: BatchReport<Track>,
    pub verification: Verification,
}

impl fmt::Display for RemovalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Removal from {} ---", self.playlist.title)?;
        writeln!(f, "{}", self.batch)?;
        write!(f, "Result: {}", self.verification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::{aggregate, Outcome};
    use bridge_traits::LikeStatus;

    #[test]
    fn test_list_report_display() {
        let report = ListReport {
            search: Some("chill".to_string()),
            playlists: vec![CollectionRef::new("PL1", "Chill Vibes").with_track_count(12)],
        };
        let text = report.to_string();

        assert!(text.starts_with("Playlists matching \"chill\""));
        assert!(text.contains("• Chill Vibes (12 tracks)"));
        assert!(text.ends_with("Total: 1"));
    }

    #[test]
    fn test_empty_list_report() {
        let report = ListReport {
            search: None,
            playlists: Vec::new(),
        };
        assert!(report.to_string().ends_with("No playlists found."));
    }

    #[test]
    fn test_deletion_report_sections() {
        let report = DeletionReport {
            deleted: aggregate(vec![
                Outcome::success(CollectionRef::new("PL1", "Old")),
                Outcome::failure(CollectionRef::new("PL2", "Stuck"), "HTTP 500"),
            ]),
            declined: Vec::new(),
            skipped_not_owned: vec![CollectionRef::new("PL3", "Shared")],
            kept: Vec::new(),
        };
        let text = report.to_string();

        assert!(text.contains("Deleted: 1"));
        assert!(text.contains("• Stuck (PL2): HTTP 500"));
        assert!(text.contains("Skipped, not owned (1):"));
        assert!(!text.contains("Declined"));
    }

    #[test]
    fn test_like_report_display() {
        let mut report = LikeReport::new(CollectionRef::new("PL1", "Gym"), 3);
        report.liked = 1;
        report.skipped = 1;
        report.failures.push(FailedItem {
            item: Track::new("v3", "Song C", LikeStatus::Indifferent),
            reason: "Rate limited: slow down".to_string(),
        });
        let text = report.to_string();

        assert!(text.contains("Skipped: 1 songs"));
        assert!(text.contains("Liked: 1 songs"));
        assert!(text.contains("Total: 3 songs"));
        assert!(text.contains("• Song C: Rate limited"));
    }

    #[test]
    fn test_verification_display() {
        assert_eq!(
            Verification::Mismatch { remaining: 2 }.to_string(),
            "verification mismatch: 2 tracks remain"
        );
    }
}
