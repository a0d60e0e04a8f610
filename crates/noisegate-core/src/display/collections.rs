//! Collection wrapper types for displaying groups of domain objects.

use std::{fmt, ops::Index};

use crate::models::HistoryEntry;

/// Newtype wrapper for displaying a user's mission history.
///
/// Entries are rendered in the order given, which for history fetched from
/// the archive is newest first.
///
/// # Examples
///
/// ```rust
/// use noisegate_core::display::History;
///
/// let history = History(vec![]);
/// assert_eq!(history.to_string(), "No missions archived yet.\n");
/// ```
pub struct History(pub Vec<HistoryEntry>);

impl History {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of entries in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get an iterator over the entries.
    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.0.iter()
    }
}

impl Index<usize> for History {
    type Output = HistoryEntry;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_history(f, &self.0)
    }
}

/// Writes history entries, or a placeholder line when there are none.
pub(super) fn fmt_history(f: &mut fmt::Formatter<'_>, entries: &[HistoryEntry]) -> fmt::Result {
    if entries.is_empty() {
        return writeln!(f, "No missions archived yet.");
    }
    for entry in entries {
        write!(f, "{entry}")?;
    }
    Ok(())
}
