//! Layout measurements consumed by the navigation logic.
//!
//! Everything here is rebuilt from host measurements on demand and never
//! updated in place. Raw values coming from the host may be garbage (NaN while
//! a page is still laying out, negative scroll ceilings on short pages), so all
//! constructors sanitize their inputs instead of failing.

use serde::{Deserialize, Serialize};

/// One content section that a navigation dot points at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackedItem {
    pub index: usize,
    /// Document-relative top edge, in pixels.
    pub top_offset: f64,
}

impl TrackedItem {
    pub fn new(index: usize, top_offset: f64) -> Self {
        Self {
            index,
            top_offset: finite_or_zero(top_offset),
        }
    }

    /// Build the ordered item list from raw top offsets.
    pub fn from_tops(tops: &[f64]) -> Vec<TrackedItem> {
        tops.iter()
            .enumerate()
            .map(|(index, top)| TrackedItem::new(index, *top))
            .collect()
    }
}

/// Viewport and document extents for the current layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMetrics")]
pub struct DocumentMetrics {
    pub viewport_height: f64,
    pub document_height: f64,
}

impl DocumentMetrics {
    pub fn new(viewport_height: f64, document_height: f64) -> Self {
        Self {
            viewport_height: finite_or_zero(viewport_height).max(0.0),
            document_height: finite_or_zero(document_height).max(0.0),
        }
    }

    /// Scroll distance before clamping. Negative when the viewport is taller
    /// than the document.
    pub fn raw_max_scroll(&self) -> f64 {
        self.document_height - self.viewport_height
    }

    /// Largest offset the document can actually be scrolled to.
    pub fn max_scroll(&self) -> f64 {
        self.raw_max_scroll().max(0.0)
    }

    pub fn is_degenerate(&self) -> bool {
        self.raw_max_scroll() < 0.0
    }
}

/// Width and height of the visible area, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawViewport")]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: finite_or_zero(width).max(0.0),
            height: finite_or_zero(height).max(0.0),
        }
    }
}

// Deserialized values go through the constructors like any other host input.
#[derive(Deserialize)]
struct RawMetrics {
    viewport_height: f64,
    document_height: f64,
}

impl From<RawMetrics> for DocumentMetrics {
    fn from(raw: RawMetrics) -> Self {
        DocumentMetrics::new(raw.viewport_height, raw.document_height)
    }
}

#[derive(Deserialize)]
struct RawViewport {
    width: f64,
    height: f64,
}

impl From<RawViewport> for Viewport {
    fn from(raw: RawViewport) -> Self {
        Viewport::new(raw.width, raw.height)
    }
}

pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_scroll_clamps_when_viewport_exceeds_document() {
        let metrics = DocumentMetrics::new(900.0, 600.0);
        assert_eq!(metrics.raw_max_scroll(), -300.0);
        assert_eq!(metrics.max_scroll(), 0.0);
        assert!(metrics.is_degenerate());
    }

    #[test]
    fn non_finite_measurements_become_zero() {
        let items = TrackedItem::from_tops(&[f64::NAN, 120.0, f64::INFINITY]);
        let tops: Vec<f64> = items.iter().map(|item| item.top_offset).collect();
        assert_eq!(tops, vec![0.0, 120.0, 0.0]);
        assert_eq!(items[2].index, 2);

        let metrics = DocumentMetrics::new(f64::NAN, 2000.0);
        assert_eq!(metrics.viewport_height, 0.0);
        assert_eq!(metrics.max_scroll(), 2000.0);
    }

    #[test]
    fn deserialized_extents_are_sanitized() {
        let viewport: Viewport =
            serde_json::from_str(r#"{ "width": -320, "height": 800 }"#).expect("viewport json");
        assert_eq!(viewport, Viewport::new(0.0, 800.0));

        let metrics: DocumentMetrics =
            serde_json::from_str(r#"{ "viewport_height": -5, "document_height": 1200 }"#)
                .expect("metrics json");
        assert_eq!(metrics.viewport_height, 0.0);
        assert_eq!(metrics.max_scroll(), 1200.0);
    }
}
