//! # Bounded Fetcher
//!
//! Retrieves many collection details in parallel through a [`WorkerPool`].
//! A failed fetch is logged and left out of the result; it never aborts the
//! batch.

use crate::pool::{Completion, WorkItem, WorkerPool};
use crate::progress::ProgressReporter;
use bridge_traits::{CollectionDetail, CollectionProvider, CollectionRef};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Parallel detail fetcher
#[derive(Debug, Clone, Copy)]
pub struct BoundedFetcher {
    pool: WorkerPool,
}

impl BoundedFetcher {
    pub fn new(concurrency: usize) -> Self {
        Self {
            pool: WorkerPool::new(concurrency),
        }
    }

    /// Run `fetch` for every ref and keep the successful results.
    ///
    /// Results arrive in completion order.
    pub async fn fetch_with<F, Fut>(
        &self,
        refs: Vec<CollectionRef>,
        fetch: F,
        progress: &dyn ProgressReporter,
    ) -> Vec<CollectionDetail>
    where
        F: Fn(CollectionRef) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bridge_traits::error::Result<CollectionDetail>> + Send + 'static,
    {
        let requested = refs.len();
        let completions = self
            .pool
            .run(
                WorkItem::batch(refs),
                move |item: WorkItem<CollectionRef>| {
                    let fetched = fetch(item.payload.clone());
                    async move { (item.payload, fetched.await) }
                },
                progress,
            )
            .await;

        let mut details = Vec::with_capacity(completions.len());
        for completion in completions {
            match completion {
                Completion::Finished((_, Ok(detail))) => details.push(detail),
                Completion::Finished((collection, Err(e))) => {
                    warn!(id = %collection.id, title = %collection.title, error = %e, "Failed to fetch playlist");
                }
                Completion::Panicked { item, message } => {
                    warn!(id = %item.payload.id, %message, "Playlist fetch panicked");
                }
            }
        }

        info!(requested, fetched = details.len(), "Fetched playlist details");
        details
    }

    /// Fetch details from `provider`, reading at most `limit` tracks each.
    #[instrument(skip_all, fields(count = refs.len(), ?limit))]
    pub async fn fetch_details(
        &self,
        provider: Arc<dyn CollectionProvider>,
        refs: Vec<CollectionRef>,
        limit: Option<usize>,
        progress: &dyn ProgressReporter,
    ) -> Vec<CollectionDetail> {
        self.fetch_with(
            refs,
            move |collection| {
                let provider = Arc::clone(&provider);
                async move { provider.get_collection_detail(&collection.id, limit).await }
            },
            progress,
        )
        .await
    }
}

/// Sort fetched details back into the order of `refs`.
pub fn restore_order(refs: &[CollectionRef], mut details: Vec<CollectionDetail>) -> Vec<CollectionDetail> {
    let positions: HashMap<&str, usize> = refs
        .iter()
        .enumerate()
        .map(|(position, collection)| (collection.id.as_str(), position))
        .collect();

    details.sort_by_key(|detail| positions.get(detail.id()).copied().unwrap_or(usize::MAX));
    details
}
