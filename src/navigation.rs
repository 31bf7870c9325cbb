//! Navigation-dot controller.
//!
//! `NavigationDots` is the explicit page context for one dot row: it owns the
//! last measured geometry, the computed thresholds, the highlighted dot and the
//! rate limiters. The host forwards raw events (`on_scroll`, `on_frame`,
//! `on_resize`, `poll`) and applies the `IndicatorChange`s delivered to its
//! subscribers.
//!
//! Geometry is measured at attach time and after each debounced resize, never
//! on scroll. On viewports at or below the tablet breakpoint the controller is
//! dormant: every dot is cleared and scroll frames are ignored until a resize
//! brings the viewport back above the breakpoint.

use crate::config::AppConfig;
use crate::geometry::{DocumentMetrics, TrackedItem, Viewport};
use crate::indicator::{DotRow, IndicatorChange};
use crate::scheduler::{Debouncer, FrameCoalescer};
use crate::subscription::{Listeners, Subscription};
use crate::thresholds::{ThresholdMapper, ThresholdSet};
use std::time::Instant;
use tracing::{debug, info, trace};

/// Measurements the host reads from its layout engine.
pub trait LayoutSource {
    fn viewport(&self) -> Viewport;
    fn document_height(&self) -> f64;
    /// Document-relative top offset of every tracked item, in order.
    fn item_tops(&self) -> Vec<f64>;
    fn scroll_offset(&self) -> f64;
}

/// Geometry captured from one `LayoutSource` read.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSnapshot {
    pub viewport: Viewport,
    pub metrics: DocumentMetrics,
    pub items: Vec<TrackedItem>,
}

impl LayoutSnapshot {
    pub fn measure(layout: &dyn LayoutSource) -> Self {
        let viewport = layout.viewport();
        Self {
            viewport,
            metrics: DocumentMetrics::new(viewport.height, layout.document_height()),
            items: TrackedItem::from_tops(&layout.item_tops()),
        }
    }
}

pub struct NavigationDots {
    config: AppConfig,
    mapper: ThresholdMapper,
    layout: LayoutSnapshot,
    thresholds: ThresholdSet,
    dots: DotRow,
    initial_resize: Option<IndicatorChange>,
    enabled: bool,
    frame: FrameCoalescer,
    resize: Debouncer,
    listeners: Listeners<IndicatorChange>,
}

impl std::fmt::Debug for NavigationDots {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationDots")
            .field("items", &self.layout.items.len())
            .field("active", &self.dots.active())
            .field("enabled", &self.enabled)
            .field("frame_pending", &self.frame.is_pending())
            .field("resize_pending", &self.resize.is_pending())
            .finish()
    }
}

impl NavigationDots {
    /// Measure the page and prepare the dot row.
    ///
    /// `existing_dots` is the number of dots the host has already rendered.
    /// Returns `None` when the page has no tracked items; there is nothing to
    /// navigate and the host should not render a row. Otherwise the row is
    /// reconciled against the item count (see `initial_resize`) and the first
    /// recomputation is queued for the next frame so layout can settle first.
    pub fn attach(
        config: AppConfig,
        layout: &dyn LayoutSource,
        existing_dots: usize,
    ) -> Option<Self> {
        let snapshot = LayoutSnapshot::measure(layout);
        if snapshot.items.is_empty() {
            info!("No tracked items; navigation dots not attached");
            return None;
        }

        let mapper = ThresholdMapper::new(config.trigger_margin);
        let thresholds = mapper.compute(&snapshot.items, &snapshot.metrics);
        let mut dots = DotRow::new(existing_dots);
        let initial_resize = dots.reconcile(snapshot.items.len()).change(dots.len());
        let enabled = config.is_desktop(snapshot.viewport.width);
        let resize = Debouncer::new(config.resize_debounce());

        let mut nav = Self {
            config,
            mapper,
            layout: snapshot,
            thresholds,
            dots,
            initial_resize,
            enabled,
            frame: FrameCoalescer::new(),
            resize,
            listeners: Listeners::new(),
        };
        if nav.enabled {
            nav.frame.request();
        }
        info!(
            items = nav.layout.items.len(),
            existing_dots,
            enabled = nav.enabled,
            margin = nav.mapper.margin(),
            max_scroll = nav.thresholds.max_scroll,
            "Navigation dots attached"
        );
        Some(nav)
    }

    /// Dots the host must add or remove right after attaching. Later changes
    /// in item count reach subscribers as `IndicatorChange::Resized`.
    pub fn initial_resize(&self) -> Option<IndicatorChange> {
        self.initial_resize
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&IndicatorChange) + 'static) -> Subscription {
        self.listeners.subscribe(listener)
    }

    /// Scroll event. Returns `true` when the host should request an animation
    /// frame; `false` when one is already pending or the row is dormant.
    pub fn on_scroll(&mut self) -> bool {
        if !self.enabled {
            return false;
        }
        self.frame.request()
    }

    /// Animation frame callback. Resolves the active dot once if a
    /// recomputation was pending.
    pub fn on_frame(&mut self, layout: &dyn LayoutSource) -> Option<IndicatorChange> {
        if !self.frame.take() || !self.enabled {
            return None;
        }
        self.update_active(layout.scroll_offset())
    }

    pub fn on_resize(&mut self, now: Instant) {
        trace!("Resize event; restarting debounce");
        self.resize.schedule(now);
    }

    /// Run the debounced resize work once its quiet period has elapsed.
    /// Returns the published changes in the order they were delivered.
    pub fn poll(&mut self, now: Instant, layout: &dyn LayoutSource) -> Vec<IndicatorChange> {
        if !self.resize.poll(now) {
            return Vec::new();
        }
        self.remeasure(layout)
    }

    /// Scroll offset that brings item `index` to the trigger line.
    pub fn scroll_target(&self, index: usize) -> Option<f64> {
        let item = self.layout.items.get(index)?;
        Some(self.mapper.scroll_target(item, &self.layout.metrics))
    }

    /// Drop pending work and dispose every subscriber.
    pub fn detach(&mut self) {
        self.frame.cancel();
        self.resize.cancel();
        self.listeners.dispose_all();
        debug!("Navigation dots detached");
    }

    pub fn active_index(&self) -> Option<usize> {
        self.dots.active()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn frame_pending(&self) -> bool {
        self.frame.is_pending()
    }

    pub fn thresholds(&self) -> &ThresholdSet {
        &self.thresholds
    }

    pub fn dots(&self) -> &DotRow {
        &self.dots
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn remeasure(&mut self, layout: &dyn LayoutSource) -> Vec<IndicatorChange> {
        self.layout = LayoutSnapshot::measure(layout);
        let mut changes = Vec::new();
        let resized = self
            .dots
            .reconcile(self.layout.items.len())
            .change(self.dots.len());
        self.publish(resized);
        changes.extend(resized);

        self.enabled = self.config.is_desktop(self.layout.viewport.width);
        debug!(
            width = self.layout.viewport.width,
            items = self.layout.items.len(),
            enabled = self.enabled,
            "Remeasured layout after resize"
        );

        if !self.enabled {
            self.frame.cancel();
            let cleared = self.dots.clear();
            self.publish(cleared);
            changes.extend(cleared);
            return changes;
        }

        self.thresholds = self
            .mapper
            .compute(&self.layout.items, &self.layout.metrics);
        changes.extend(self.update_active(layout.scroll_offset()));
        changes
    }

    fn update_active(&mut self, scroll_offset: f64) -> Option<IndicatorChange> {
        let change = match self.thresholds.resolve(scroll_offset) {
            Some(index) => self.dots.activate(index),
            None => self.dots.clear(),
        };
        if let Some(change) = &change {
            debug!(scroll_offset, ?change, "Active dot changed");
        }
        self.publish(change);
        change
    }

    fn publish(&mut self, change: Option<IndicatorChange>) {
        if let Some(change) = change {
            self.listeners.emit(&change);
        }
    }
}
