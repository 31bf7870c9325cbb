//! Scroll-offset to active-index mapping.
//!
//! Each tracked item becomes active once the page is scrolled to its top
//! offset minus a fixed trigger margin. Items near the bottom of a short
//! document can have triggers past the scroll ceiling; those are spread evenly
//! between the last reachable trigger and the ceiling so that every item can
//! still be activated by scrolling.

use crate::geometry::{DocumentMetrics, TrackedItem, finite_or_zero};
use serde::Serialize;
use tracing::{debug, trace, warn};

/// Trigger offset derived for one tracked item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Threshold {
    /// Position in the item list; the same value `resolve_active_index`
    /// returns for this threshold.
    pub index: usize,
    pub ideal_offset: f64,
    pub reachable: bool,
    /// Set only for unreachable items that were redistributed.
    pub adjusted_offset: Option<f64>,
}

impl Threshold {
    /// Offset at which this item becomes active.
    pub fn trigger(&self) -> f64 {
        self.adjusted_offset.unwrap_or(self.ideal_offset)
    }
}

/// Compute one threshold per item.
///
/// `items` must be ordered by `top_offset`. A negative scroll ceiling is
/// treated as zero. When no item is reachable the ideal offsets are returned
/// untouched, which leaves the first item active at every scroll position.
pub fn compute_thresholds(
    items: &[TrackedItem],
    margin: f64,
    metrics: &DocumentMetrics,
) -> Vec<Threshold> {
    let margin = finite_or_zero(margin);
    let max_scroll = metrics.max_scroll();

    let mut thresholds: Vec<Threshold> = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let ideal_offset = item.top_offset - margin;
            Threshold {
                index,
                ideal_offset,
                reachable: ideal_offset <= max_scroll,
                adjusted_offset: None,
            }
        })
        .collect();

    let Some(last_reachable) = thresholds.iter().rposition(|t| t.reachable) else {
        return thresholds;
    };
    let unreachable_count = thresholds.len() - 1 - last_reachable;
    if unreachable_count == 0 {
        return thresholds;
    }

    let anchor = thresholds[last_reachable].ideal_offset;
    let step = (max_scroll - anchor) / (unreachable_count + 1) as f64;
    for (k, threshold) in thresholds[last_reachable + 1..].iter_mut().enumerate() {
        // min() absorbs rounding when the remaining distance is tiny.
        threshold.adjusted_offset = Some((anchor + step * (k + 1) as f64).min(max_scroll));
    }
    thresholds
}

/// Largest index whose trigger is at or below `scroll_offset`.
///
/// Returns `Some(0)` when no trigger has been passed yet and `None` only for
/// an empty threshold list.
pub fn resolve_active_index(thresholds: &[Threshold], scroll_offset: f64) -> Option<usize> {
    if thresholds.is_empty() {
        return None;
    }
    let scroll_offset = finite_or_zero(scroll_offset);
    let active = thresholds
        .iter()
        .rposition(|t| t.trigger() <= scroll_offset)
        .unwrap_or(0);
    Some(active)
}

/// Layout conditions the mapper absorbed while building a threshold set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Diagnostic {
    /// No tracked items; there is nothing to activate.
    EmptyInput,
    /// The viewport is taller than the document; the scroll ceiling was
    /// clamped to zero.
    DegenerateMetrics,
    /// Every trigger lies past the scroll ceiling; the first item stays active.
    AllUnreachable,
    /// Trailing triggers starting at `first` were spread below the ceiling.
    Redistributed { first: usize, count: usize },
    /// Item tops were not in document order.
    OutOfOrder { index: usize },
    /// The item at `position` carries a different `index`; thresholds follow
    /// list order.
    IndexMismatch { position: usize, index: usize },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::EmptyInput => write!(f, "no tracked items"),
            Diagnostic::DegenerateMetrics => write!(f, "viewport taller than document"),
            Diagnostic::AllUnreachable => write!(f, "no trigger is reachable"),
            Diagnostic::Redistributed { first, count } => {
                write!(f, "redistributed {count} trailing triggers from index {first}")
            }
            Diagnostic::OutOfOrder { index } => write!(f, "item {index} is above its predecessor"),
            Diagnostic::IndexMismatch { position, index } => {
                write!(f, "item at position {position} claims index {index}")
            }
        }
    }
}

/// A computed threshold list together with what was observed building it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdSet {
    pub thresholds: Vec<Threshold>,
    pub max_scroll: f64,
    pub diagnostics: Vec<Diagnostic>,
}

impl ThresholdSet {
    pub fn resolve(&self, scroll_offset: f64) -> Option<usize> {
        resolve_active_index(&self.thresholds, scroll_offset)
    }

    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    pub fn has(&self, diagnostic: Diagnostic) -> bool {
        self.diagnostics.contains(&diagnostic)
    }
}

/// Threshold computation bound to a trigger margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdMapper {
    margin: f64,
}

impl ThresholdMapper {
    pub fn new(margin: f64) -> Self {
        let margin = if margin.is_finite() {
            margin
        } else {
            warn!(margin, "Non-finite trigger margin; using 0");
            0.0
        };
        Self { margin }
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Build thresholds and log every absorbed layout anomaly.
    pub fn compute(&self, items: &[TrackedItem], metrics: &DocumentMetrics) -> ThresholdSet {
        let thresholds = compute_thresholds(items, self.margin, metrics);
        let diagnostics = diagnose(items, metrics, &thresholds);
        for diagnostic in &diagnostics {
            match diagnostic {
                Diagnostic::Redistributed { .. } => debug!(%diagnostic, "Threshold layout"),
                _ => warn!(%diagnostic, "Threshold layout"),
            }
        }
        trace!(
            items = items.len(),
            margin = self.margin,
            max_scroll = metrics.max_scroll(),
            "Computed thresholds"
        );
        ThresholdSet {
            thresholds,
            max_scroll: metrics.max_scroll(),
            diagnostics,
        }
    }

    /// Scroll offset that puts `item` at the trigger line.
    pub fn scroll_target(&self, item: &TrackedItem, metrics: &DocumentMetrics) -> f64 {
        (item.top_offset - self.margin).clamp(0.0, metrics.max_scroll())
    }
}

fn diagnose(
    items: &[TrackedItem],
    metrics: &DocumentMetrics,
    thresholds: &[Threshold],
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    if items.is_empty() {
        diagnostics.push(Diagnostic::EmptyInput);
        return diagnostics;
    }
    if metrics.is_degenerate() {
        diagnostics.push(Diagnostic::DegenerateMetrics);
    }
    if let Some(index) = items
        .windows(2)
        .position(|pair| pair[1].top_offset < pair[0].top_offset)
    {
        diagnostics.push(Diagnostic::OutOfOrder { index: index + 1 });
    }
    if let Some((position, item)) = items
        .iter()
        .enumerate()
        .find(|(position, item)| item.index != *position)
    {
        diagnostics.push(Diagnostic::IndexMismatch {
            position,
            index: item.index,
        });
    }
    if thresholds.iter().all(|t| !t.reachable) {
        diagnostics.push(Diagnostic::AllUnreachable);
    } else if let Some(first) = thresholds.iter().position(|t| t.adjusted_offset.is_some()) {
        diagnostics.push(Diagnostic::Redistributed {
            first,
            count: thresholds.len() - first,
        });
    }
    diagnostics
}
