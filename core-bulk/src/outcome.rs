//! # Outcomes & Aggregation
//!
//! Every unit of batch work ends in exactly one [`Outcome`]. [`aggregate`]
//! folds any sequence of outcomes into a [`BatchReport`], whatever produced
//! them.

use std::fmt;

/// Terminal result of one unit of batch work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success { item: T },
    Failure { item: T, reason: String },
}

impl<T> Outcome<T> {
    pub fn success(item: T) -> Self {
        Outcome::Success { item }
    }

    pub fn failure(item: T, reason: impl Into<String>) -> Self {
        Outcome::Failure {
            item,
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn item(&self) -> &T {
        match self {
            Outcome::Success { item } | Outcome::Failure { item, .. } => item,
        }
    }

    pub fn into_item(self) -> T {
        match self {
            Outcome::Success { item } | Outcome::Failure { item, .. } => item,
        }
    }

    /// Failure reason, `None` for a success
    pub fn reason(&self) -> Option<&str> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Failure { reason, .. } => Some(reason),
        }
    }
}

/// A failed item and why it failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem<T> {
    pub item: T,
    pub reason: String,
}

/// Counts and failures of a finished batch.
///
/// `succeeded + failed` always equals the number of outcomes aggregated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport<T> {
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<FailedItem<T>>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            succeeded: 0,
            failed: 0,
            failures: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    /// Fold one more outcome into the report
    pub fn record(&mut self, outcome: Outcome<T>) {
        match outcome {
            Outcome::Success { .. } => self.succeeded += 1,
            Outcome::Failure { item, reason } => {
                self.failed += 1;
                self.failures.push(FailedItem { item, reason });
            }
        }
    }
}

impl<T> FromIterator<Outcome<T>> for BatchReport<T> {
    fn from_iter<I: IntoIterator<Item = Outcome<T>>>(iter: I) -> Self {
        let mut report = BatchReport::default();
        for outcome in iter {
            report.record(outcome);
        }
        report
    }
}

/// Aggregate outcomes into a report. Failures keep their input order.
pub fn aggregate<T>(outcomes: impl IntoIterator<Item = Outcome<T>>) -> BatchReport<T> {
    outcomes.into_iter().collect()
}

impl<T: fmt::Display> fmt::Display for BatchReport<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Succeeded: {}", self.succeeded)?;
        write!(f, "Failed: {}", self.failed)?;
        for failure in &self.failures {
            write!(f, "\n  • {}: {}", failure.item, failure.reason)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_always_sum_to_input_length() {
        for n in 0..20usize {
            let outcomes: Vec<Outcome<usize>> = (0..n)
                .map(|i| {
                    if i % 3 == 0 {
                        Outcome::failure(i, "boom")
                    } else {
                        Outcome::success(i)
                    }
                })
                .collect();

            let report = aggregate(outcomes);
            assert_eq!(report.succeeded + report.failed, n);
            assert_eq!(report.failures.len(), report.failed);
        }
    }

    #[test]
    fn test_failures_keep_order_and_reason() {
        let report = aggregate(vec![
            Outcome::failure("b", "HTTP 404"),
            Outcome::success("a"),
            Outcome::failure("c", "max retries exceeded"),
        ]);

        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 2);
        assert_eq!(report.failures[0].item, "b");
        assert_eq!(report.failures[1].reason, "max retries exceeded");
        assert!(!report.is_clean());
    }

    #[test]
    fn test_counts_are_order_independent() {
        let forward = aggregate(vec![
            Outcome::success(1),
            Outcome::failure(2, "x"),
            Outcome::success(3),
        ]);
        let backward = aggregate(vec![
            Outcome::success(3),
            Outcome::failure(2, "x"),
            Outcome::success(1),
        ]);

        assert_eq!(forward.succeeded, backward.succeeded);
        assert_eq!(forward.failed, backward.failed);
    }

    #[test]
    fn test_outcome_accessors() {
        let ok: Outcome<&str> = Outcome::success("t1");
        let failed: Outcome<&str> = Outcome::failure("t2", "conflict");

        assert!(ok.is_success());
        assert_eq!(ok.reason(), None);
        assert_eq!(failed.reason(), Some("conflict"));
        assert_eq!(*failed.item(), "t2");
        assert_eq!(failed.into_item(), "t2");
    }

    #[test]
    fn test_display_lists_failures() {
        let report = aggregate(vec![Outcome::failure("Song A", "not found"), Outcome::success("Song B")]);
        let text = report.to_string();

        assert!(text.contains("Succeeded: 1"));
        assert!(text.contains("Failed: 1"));
        assert!(text.contains("• Song A: not found"));
    }
}
