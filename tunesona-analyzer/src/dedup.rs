//! Deduplicator
//!
//! Collapses overlapping entity sequences into one order-preserving sequence.
//! The first occurrence of each identifier wins; later copies are dropped even
//! when their other fields differ. Sequences are merged in the order given, so
//! callers control precedence by argument order.

use crate::types::{Album, Artist, Track};
use std::collections::HashSet;

/// Entity with a stable identifier
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for Track {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Album {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Artist {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Merge `sequences` in order, keeping the first copy of each identifier
///
/// # Example
/// ```rust,ignore
/// let recent_activity = dedup_by_id([&recently_played[..], &library_songs[..]]);
/// ```
pub fn dedup_by_id<'a, T, I>(sequences: I) -> Vec<T>
where
    T: Identified + Clone + 'a,
    I: IntoIterator<Item = &'a [T]>,
{
    let mut seen: HashSet<&'a str> = HashSet::new();
    let mut merged = Vec::new();

    for sequence in sequences {
        for item in sequence {
            if seen.insert(item.id()) {
                merged.push(item.clone());
            }
        }
    }

    merged
}
