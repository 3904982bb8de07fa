//! Persistence
//!
//! - `database`: local SQLite store (key-value blobs and progress)
//! - `remote`: hosted data store client
//! - `notes`, `progress`, `onboarding`: learner state built on top

pub mod database;
pub mod notes;
pub mod onboarding;
pub mod progress;
pub mod remote;

pub use database::{Database, PoolConfig, SharedDatabase};
pub use notes::{NoteBook, NoteDraft};
pub use progress::ProgressTracker;
pub use remote::RemoteStore;

/// Where a value came from: the hosted store, or local/bundled data used
/// because the hosted store was absent or failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sourced<T> {
    Remote(T),
    Fallback(T),
}

impl<T> Sourced<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Sourced::Fallback(_))
    }

    pub fn get(&self) -> &T {
        match self {
            Sourced::Remote(value) | Sourced::Fallback(value) => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Sourced::Remote(value) | Sourced::Fallback(value) => value,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Sourced<U> {
        match self {
            Sourced::Remote(value) => Sourced::Remote(f(value)),
            Sourced::Fallback(value) => Sourced::Fallback(f(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sourced_map_keeps_origin() {
        let remote = Sourced::Remote(vec![1, 2, 3]).map(|v| v.len());
        assert_eq!(remote, Sourced::Remote(3));

        let fallback = Sourced::Fallback("bundled").map(str::len);
        assert!(fallback.is_fallback());
        assert_eq!(*fallback.get(), 7);
        assert_eq!(fallback.into_inner(), 7);
    }
}
