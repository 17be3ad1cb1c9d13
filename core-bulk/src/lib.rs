//! # Bulk Operation Engine
//!
//! Batch mutations against a remote playlist service.
//!
//! ## Overview
//!
//! Remote calls are slow and sometimes race with each other, so batch work is
//! fanned out across a bounded pool while a single dispatcher keeps the
//! progress signal accurate and every item ends in exactly one outcome.
//!
//! ## Components
//!
//! - **Worker Pool** (`pool`): bounded fan-out with panic containment and one progress update per completion
//! - **Bounded Fetcher** (`fetcher`): parallel detail fetches; failures are logged and excluded
//! - **Retrying Mutator** (`mutator`): conflict-only retry with a fixed delay
//! - **Outcome Aggregator** (`outcome`): folds outcomes into a `BatchReport`
//! - **Duplicate Grouper** (`grouping`): exact-title grouping in first-seen order
//! - **Name Matcher** (`matcher`): fuzzy search with threshold and cap
//! - **Progress Reporter** (`progress`): text progress bar rendering
//! - **Operations** (`operations`): the user-facing flows built on the above

pub mod error;
pub mod fetcher;
pub mod grouping;
pub mod matcher;
pub mod mutator;
pub mod operations;
pub mod outcome;
pub mod pool;
pub mod progress;
pub mod reports;

pub use error::{BulkError, Result};
pub use fetcher::{restore_order, BoundedFetcher};
pub use grouping::{group_by_title, NameGroup};
pub use matcher::{partial_ratio, NameMatcher, Named};
pub use mutator::RetryingMutator;
pub use operations::{ensure_owned, BulkOperations};
pub use outcome::{aggregate, BatchReport, FailedItem, Outcome};
pub use pool::{Completion, WorkItem, WorkerPool};
pub use progress::{
    render_progress_bar, ConsoleProgress, ConsoleProgressFactory, NoopProgress, ProgressFactory,
    ProgressReporter,
};
pub use reports::{
    DeletionReport, DuplicateReport, LikeReport, ListReport, RemovalReport, Verification,
};
