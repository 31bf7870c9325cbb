//! The row of navigation dots.
//!
//! The row mirrors what the host renders: one dot per tracked item, at most
//! one of them active. It only reports a change when the highlighted dot
//! actually moves or the number of dots differs from the item count, so the
//! host never repaints for a no-op.

use serde::Serialize;
use tracing::debug;

/// A visual state change the host should apply to the dot row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum IndicatorChange {
    /// Highlight `index` and un-highlight `previous`, if any.
    Activated {
        index: usize,
        previous: Option<usize>,
    },
    /// Remove the highlight from `previous`, leaving no dot active.
    Cleared { previous: usize },
    /// Append or remove dots at the end of the row so it holds `len` dots.
    /// Always delivered before any highlight change computed from the same
    /// measurement.
    Resized {
        len: usize,
        append: usize,
        remove: usize,
    },
}

/// Dots to add or remove so the row matches the item count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reconcile {
    Unchanged,
    Append(usize),
    Remove(usize),
}

impl Reconcile {
    /// The change the host has to apply to reach a row of `len` dots, if any.
    pub fn change(self, len: usize) -> Option<IndicatorChange> {
        let (append, remove) = match self {
            Reconcile::Unchanged => return None,
            Reconcile::Append(count) => (count, 0),
            Reconcile::Remove(count) => (0, count),
        };
        Some(IndicatorChange::Resized {
            len,
            append,
            remove,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DotRow {
    len: usize,
    active: Option<usize>,
}

impl DotRow {
    pub fn new(len: usize) -> Self {
        Self { len, active: None }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Grow or shrink the row to `item_count` dots. Dots appended to the row
    /// start inactive; an active dot that falls off the end is dropped.
    pub fn reconcile(&mut self, item_count: usize) -> Reconcile {
        let change = match item_count.cmp(&self.len) {
            std::cmp::Ordering::Equal => Reconcile::Unchanged,
            std::cmp::Ordering::Greater => Reconcile::Append(item_count - self.len),
            std::cmp::Ordering::Less => Reconcile::Remove(self.len - item_count),
        };
        if change != Reconcile::Unchanged {
            debug!(from = self.len, to = item_count, "Reconciled dot count");
        }
        self.len = item_count;
        if self.active.is_some_and(|idx| idx >= item_count) {
            self.active = None;
        }
        change
    }

    /// Move the highlight to `index`. Out-of-range indices and repeats of the
    /// current highlight produce no change.
    pub fn activate(&mut self, index: usize) -> Option<IndicatorChange> {
        if index >= self.len || self.active == Some(index) {
            return None;
        }
        let previous = self.active.replace(index);
        Some(IndicatorChange::Activated { index, previous })
    }

    pub fn clear(&mut self) -> Option<IndicatorChange> {
        let previous = self.active.take()?;
        Some(IndicatorChange::Cleared { previous })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_activation_is_suppressed() {
        let mut row = DotRow::new(3);
        assert_eq!(
            row.activate(1),
            Some(IndicatorChange::Activated {
                index: 1,
                previous: None
            })
        );
        assert_eq!(row.activate(1), None);
        assert_eq!(
            row.activate(2),
            Some(IndicatorChange::Activated {
                index: 2,
                previous: Some(1)
            })
        );
        assert_eq!(row.activate(7), None);
    }

    #[test]
    fn reconcile_matches_item_count() {
        let mut row = DotRow::new(2);
        assert_eq!(row.reconcile(5), Reconcile::Append(3));
        assert_eq!(row.len(), 5);
        let _ = row.activate(4);
        assert_eq!(row.reconcile(3), Reconcile::Remove(2));
        assert_eq!(row.active(), None);
        assert_eq!(row.reconcile(3), Reconcile::Unchanged);
    }

    #[test]
    fn reconcile_becomes_a_resize_change() {
        let mut row = DotRow::new(5);
        assert_eq!(
            row.reconcile(2).change(row.len()),
            Some(IndicatorChange::Resized {
                len: 2,
                append: 0,
                remove: 3
            })
        );
        assert_eq!(row.reconcile(2).change(row.len()), None);
    }

    #[test]
    fn clear_only_reports_when_something_was_active() {
        let mut row = DotRow::new(2);
        assert_eq!(row.clear(), None);
        let _ = row.activate(0);
        assert_eq!(
            row.clear(),
            Some(IndicatorChange::Cleared { previous: 0 })
        );
    }
}
