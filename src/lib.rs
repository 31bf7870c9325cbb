//! Scroll-synchronized navigation dots.
//!
//! The crate maps a page's scroll offset to the one navigation dot that should
//! be highlighted, keeps that mapping correct when trailing sections sit below
//! the scroll ceiling, and rate-limits the work the way a browser host needs:
//! one recomputation per frame, geometry rebuilt only after resizing stops.
//!
//! - [`thresholds`]: the pure offset-to-index mapping.
//! - [`navigation`]: the per-page controller hosts drive with raw events.
//! - [`snap`]: the horizontal snap list used on narrow viewports.
//! - [`replay`]: scripted event timelines for reproducing layouts offline.

pub mod config;
pub mod geometry;
pub mod indicator;
pub mod navigation;
pub mod replay;
pub mod scheduler;
pub mod snap;
pub mod subscription;
pub mod thresholds;

pub use geometry::{DocumentMetrics, TrackedItem, Viewport};
pub use indicator::IndicatorChange;
pub use navigation::{LayoutSource, NavigationDots};
pub use thresholds::{
    Diagnostic, Threshold, ThresholdMapper, ThresholdSet, compute_thresholds,
    resolve_active_index,
};
