//! # Bulk Operations
//!
//! User-facing playlist flows composed from the batch primitives.
//!
//! ## Overview
//!
//! Every flow starts the same way: list the library, optionally narrow it with
//! the [`NameMatcher`], then fetch details through the [`BoundedFetcher`].
//! From there:
//!
//! | Flow | Execution | Mutation |
//! |------|-----------|----------|
//! | [`list_playlists`](BulkOperations::list_playlists) | read only | none |
//! | [`delete_empty_playlists`](BulkOperations::delete_empty_playlists) | sequential, confirm each | delete |
//! | [`delete_duplicate_playlists`](BulkOperations::delete_duplicate_playlists) | per name group, confirm each | delete |
//! | [`like_all_songs`](BulkOperations::like_all_songs) | sequential, paced | rate |
//! | [`delete_all_playlists`](BulkOperations::delete_all_playlists) | sequential after one confirmation | delete |
//! | [`delete_playlist`](BulkOperations::delete_playlist) | single | delete |
//! | [`remove_all_songs`](BulkOperations::remove_all_songs) | worker pool with conflict retry | remove track |
//!
//! Destructive calls only ever target playlists whose fetched detail reports
//! `owned`. Deletes are never retried.
//!
//! ## Usage
//!
//! ```ignore
//! use core_bulk::{BulkOperations, ConsoleProgressFactory};
//!
//! let operations = BulkOperations::new(provider, prompter, EngineConfig::default())?
//!     .with_progress(Arc::new(ConsoleProgressFactory));
//!
//! if let Some(report) = operations.remove_all_songs(Some("road trip")).await? {
//!     println!("{}", report);
//! }
//! ```

use crate::error::{BulkError, Result};
use crate::fetcher::{restore_order, BoundedFetcher};
use crate::grouping::group_by_title;
use crate::matcher::NameMatcher;
use crate::mutator::RetryingMutator;
use crate::outcome::{aggregate, FailedItem, Outcome};
use crate::pool::{Completion, WorkItem, WorkerPool};
use crate::progress::{NoopProgress, ProgressFactory};
use crate::reports::{
    DeletionReport, DuplicateReport, LikeReport, ListReport, RemovalReport, Verification,
};
use bridge_traits::{CollectionDetail, CollectionProvider, CollectionRef, LikeStatus, Prompter, Track};
use core_runtime::EngineConfig;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Reject destructive work on a playlist the user does not own.
pub fn ensure_owned(collection: &CollectionRef) -> Result<()> {
    if collection.owned {
        Ok(())
    } else {
        Err(BulkError::NotOwned {
            id: collection.id.clone(),
            title: collection.title.clone(),
        })
    }
}

/// Entry point for every bulk playlist flow
pub struct BulkOperations {
    provider: Arc<dyn CollectionProvider>,
    prompter: Arc<dyn Prompter>,
    progress: Arc<dyn ProgressFactory>,
    config: EngineConfig,
    fetcher: BoundedFetcher,
    mutator: RetryingMutator,
    matcher: NameMatcher,
}

impl BulkOperations {
    /// Build the operations over `provider`, validating `config` first.
    pub fn new(
        provider: Arc<dyn CollectionProvider>,
        prompter: Arc<dyn Prompter>,
        config: EngineConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            provider,
            prompter,
            progress: Arc::new(NoopProgress),
            fetcher: BoundedFetcher::new(config.fetch_concurrency),
            mutator: RetryingMutator::from_config(&config),
            matcher: NameMatcher::from_config(&config),
            config,
        })
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressFactory>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_matcher(mut self, matcher: NameMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// List playlists, optionally narrowed by a fuzzy search term.
    #[instrument(skip(self))]
    pub async fn list_playlists(&self, search: Option<&str>) -> Result<ListReport> {
        let details = self
            .fetch_library(search, Some(self.config.default_track_limit))
            .await?;

        Ok(ListReport {
            search: search.map(str::to_string),
            playlists: details.into_iter().map(|detail| detail.collection).collect(),
        })
    }

    /// Offer every empty owned playlist for deletion, one confirmation each.
    #[instrument(skip(self))]
    pub async fn delete_empty_playlists(&self) -> Result<DeletionReport> {
        let details = self
            .fetch_library(None, Some(self.config.default_track_limit))
            .await?;
        let mut report = DeletionReport::default();

        for CollectionDetail { collection, tracks } in details {
            if !collection.owned {
                info!(title = %collection.title, "Skipping playlist not owned by the current user");
                report.skipped_not_owned.push(collection);
                continue;
            }
            if collection.track_count > 0 || !tracks.is_empty() {
                report.kept.push(collection);
                continue;
            }

            let prompt = format!(
                "Delete empty playlist \"{}\" ({})?",
                collection.title, collection.id
            );
            if self.prompter.confirm(&prompt) {
                report.deleted.record(self.delete(collection).await);
            } else {
                report.declined.push(collection);
            }
        }

        Ok(report)
    }

    /// Resolve playlists sharing a title: the user picks the one to keep and
    /// confirms each deletion of the others.
    #[instrument(skip(self))]
    pub async fn delete_duplicate_playlists(&self) -> Result<DuplicateReport> {
        let details = self
            .fetch_library(None, Some(self.config.default_track_limit))
            .await?;
        let mut report = DuplicateReport::default();

        for group in group_by_title(details) {
            if !group.is_duplicate() {
                report.unique_titles += 1;
                continue;
            }
            report.duplicate_groups += 1;

            let options: Vec<String> = group
                .members
                .iter()
                .map(|member| member.collection.to_string())
                .collect();
            let prompt = format!(
                "Duplicate playlists named \"{}\". Select the playlist to keep (blank to skip)",
                group.name
            );

            let Some(keep) = self
                .prompter
                .select_index(&prompt, &options)
                .filter(|&index| index < options.len())
            else {
                info!(name = %group.name, "Skipping duplicate group");
                report.skipped_groups.push(group.name);
                continue;
            };

            for (position, member) in group.members.into_iter().enumerate() {
                let collection = member.collection;
                if position == keep {
                    report.kept.push(collection);
                } else if !collection.owned {
                    report.deletion.skipped_not_owned.push(collection);
                } else {
                    let prompt = format!(
                        "Delete duplicate \"{}\" ({}, {} tracks)?",
                        collection.title, collection.id, collection.track_count
                    );
                    if self.prompter.confirm(&prompt) {
                        report.deletion.deleted.record(self.delete(collection).await);
                    } else {
                        report.deletion.declined.push(collection);
                    }
                }
            }
        }

        Ok(report)
    }

    /// Like every not-yet-liked track of a selected playlist.
    ///
    /// Returns `None` when nothing was selected or the user declined.
    #[instrument(skip(self))]
    pub async fn like_all_songs(&self, search: Option<&str>) -> Result<Option<LikeReport>> {
        let Some(detail) = self
            .select_playlist(search, None, "Select the playlist to like all songs in")
            .await?
        else {
            return Ok(None);
        };

        let prompt = format!(
            "This playlist has {} songs! Would you like to like all of them?",
            detail.tracks.len()
        );
        if !self.prompter.confirm(&prompt) {
            return Ok(None);
        }

        Ok(Some(self.like_tracks(&detail).await))
    }

    /// Like the tracks of `detail` one at a time with a randomized pause after
    /// every successful call. Failures are recorded and the run continues.
    pub async fn like_tracks(&self, detail: &CollectionDetail) -> LikeReport {
        let mut report = LikeReport::new(detail.collection.clone(), detail.tracks.len());

        for track in &detail.tracks {
            if track.like_status == LikeStatus::Liked {
                debug!(track = %track, "Already liked");
                report.skipped += 1;
                continue;
            }

            match self.provider.rate_track(track, LikeStatus::Liked).await {
                Ok(()) => {
                    info!(track = %track, "Liked song");
                    report.liked += 1;
                    tokio::time::sleep(self.like_delay()).await;
                }
                Err(e) => {
                    warn!(track = %track, error = %e, "Failed to like song");
                    report.failures.push(FailedItem {
                        item: track.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            liked = report.liked,
            skipped = report.skipped,
            failed = report.failures.len(),
            "Finished liking songs"
        );
        report
    }

    /// Delete every owned playlist after a single confirmation.
    ///
    /// Returns `None` when the user declined.
    #[instrument(skip(self))]
    pub async fn delete_all_playlists(&self) -> Result<Option<DeletionReport>> {
        let details = self.fetch_library(None, None).await?;
        if details.is_empty() {
            return Ok(Some(DeletionReport::default()));
        }

        let prompt = format!(
            "This will delete {} playlists! Would you like to continue?",
            details.len()
        );
        if !self.prompter.confirm(&prompt) {
            return Ok(None);
        }

        let mut report = DeletionReport::default();
        for detail in details {
            let collection = detail.collection;
            if collection.owned {
                report.deleted.record(self.delete(collection).await);
            } else {
                info!(title = %collection.title, "Skipping playlist not owned by the current user");
                report.skipped_not_owned.push(collection);
            }
        }

        Ok(Some(report))
    }

    /// Delete one selected playlist.
    ///
    /// Fails with [`BulkError::NotOwned`] for a playlist owned by someone else.
    #[instrument(skip(self))]
    pub async fn delete_playlist(&self, search: Option<&str>) -> Result<Option<DeletionReport>> {
        let Some(detail) = self
            .select_playlist(search, None, "Select the playlist to delete")
            .await?
        else {
            return Ok(None);
        };
        ensure_owned(&detail.collection)?;

        let mut report = DeletionReport::default();
        report.deleted.record(self.delete(detail.collection).await);
        Ok(Some(report))
    }

    /// Remove every track from one selected playlist.
    #[instrument(skip(self))]
    pub async fn remove_all_songs(&self, search: Option<&str>) -> Result<Option<RemovalReport>> {
        let Some(detail) = self
            .select_playlist(search, None, "Select the playlist to remove all songs from")
            .await?
        else {
            return Ok(None);
        };

        self.remove_tracks(detail).await.map(Some)
    }

    /// Remove all tracks of `detail` concurrently, retrying write conflicts,
    /// then re-fetch the playlist to verify it is empty.
    #[instrument(skip_all, fields(id = %detail.id(), tracks = detail.tracks.len()))]
    pub async fn remove_tracks(&self, detail: CollectionDetail) -> Result<RemovalReport> {
        ensure_owned(&detail.collection)?;
        let CollectionDetail { collection, tracks } = detail;

        let items: Vec<WorkItem<Track>> = WorkItem::batch(tracks)
            .into_iter()
            .map(|item| item.with_parent(collection.id.clone()))
            .collect();

        let provider = Arc::clone(&self.provider);
        let mutator = self.mutator;
        let progress = self.progress.create("Removing songs:");

        let completions = WorkerPool::new(self.config.removal_concurrency)
            .run(
                items,
                move |item: WorkItem<Track>| {
                    let provider = Arc::clone(&provider);
                    async move {
                        let parent = item.parent_id.unwrap_or_default();
                        let track = item.payload;
                        mutator
                            .apply(track.clone(), || {
                                let provider = Arc::clone(&provider);
                                let parent = parent.clone();
                                let track = track.clone();
                                async move { provider.remove_track(&parent, &track).await }
                            })
                            .await
                    }
                },
                progress.as_ref(),
            )
            .await;

        let batch = aggregate(completions.into_iter().map(|completion| match completion {
            Completion::Finished(outcome) => outcome,
            Completion::Panicked { item, message } => {
                Outcome::failure(item.payload, format!("worker panicked: {}", message))
            }
        }));
        info!(succeeded = batch.succeeded, failed = batch.failed, "Removal batch finished");

        let verification = self.verify_empty(&collection.id).await;
        Ok(RemovalReport {
            playlist: collection,
            batch,
            verification,
        })
    }

    async fn verify_empty(&self, id: &str) -> Verification {
        match self
            .provider
            .get_collection_detail(id, Some(self.config.default_track_limit))
            .await
        {
            Ok(detail) => {
                let remaining = detail.collection.track_count.max(detail.tracks.len());
                if remaining == 0 {
                    Verification::Confirmed
                } else {
                    warn!(id, remaining, "Playlist still has tracks after removal");
                    Verification::Mismatch { remaining }
                }
            }
            Err(e) => {
                warn!(id, error = %e, "Could not verify playlist after removal");
                Verification::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn delete(&self, collection: CollectionRef) -> Outcome<CollectionRef> {
        match self.provider.delete_collection(&collection.id).await {
            Ok(()) => {
                info!(id = %collection.id, title = %collection.title, "Deleted playlist");
                Outcome::success(collection)
            }
            Err(e) => {
                warn!(id = %collection.id, error = %e, "Failed to delete playlist");
                Outcome::failure(collection, e.to_string())
            }
        }
    }

    async fn select_playlist(
        &self,
        search: Option<&str>,
        limit: Option<usize>,
        prompt: &str,
    ) -> Result<Option<CollectionDetail>> {
        let details = self.fetch_library(search, limit).await?;
        if details.is_empty() {
            info!("No playlists to choose from");
            return Ok(None);
        }

        let options: Vec<String> = details
            .iter()
            .map(|detail| detail.collection.to_string())
            .collect();

        Ok(self
            .prompter
            .select_index(prompt, &options)
            .and_then(|index| details.into_iter().nth(index)))
    }

    async fn fetch_library(
        &self,
        search: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<CollectionDetail>> {
        let listed = self.provider.list_collections().await?;
        info!(count = listed.len(), "Listed playlists");

        let refs = match search {
            Some(term) => {
                let matched = self.matcher.filter(listed, term);
                info!(term, matched = matched.len(), "Filtered playlists by name");
                matched
            }
            None => listed,
        };

        let progress = self.progress.create("Fetching playlists:");
        let details = self
            .fetcher
            .fetch_details(Arc::clone(&self.provider), refs.clone(), limit, progress.as_ref())
            .await;

        Ok(restore_order(&refs, details))
    }

    fn like_delay(&self) -> Duration {
        let (min, max) = (self.config.like_delay_min, self.config.like_delay_max);
        if max > min {
            rand::thread_rng().gen_range(min..max)
        } else {
            min
        }
    }
}
