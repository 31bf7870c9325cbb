//! Horizontal snap list for narrow viewports.
//!
//! While the list scrolls, the item nearest the list centre is highlighted
//! once per frame. When scrolling settles and no pointer is down, that item
//! is snapped to the centre.

use crate::config::AppConfig;
use crate::geometry::finite_or_zero;
use crate::scheduler::{Debouncer, FrameCoalescer};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapItem {
    pub left: f64,
    pub width: f64,
}

impl SnapItem {
    pub fn center(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

/// Index of the item whose centre is nearest the visible centre of the list.
/// Ties go to the earlier item.
pub fn closest_item(items: &[SnapItem], scroll_left: f64, client_width: f64) -> Option<usize> {
    let list_center = finite_or_zero(scroll_left) + finite_or_zero(client_width) / 2.0;
    let mut best: Option<(usize, f64)> = None;
    for (idx, item) in items.iter().enumerate() {
        let dist = (item.center() - list_center).abs();
        if best.is_none_or(|(_, closest)| dist < closest) {
            best = Some((idx, dist));
        }
    }
    best.map(|(idx, _)| idx)
}

/// Horizontal scroll position that centres `item` in a list `client_width`
/// wide, never negative.
pub fn snap_target(item: &SnapItem, client_width: f64) -> f64 {
    (item.left - (finite_or_zero(client_width) - item.width) / 2.0).max(0.0)
}

/// What the host should do after feeding an event to the list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SnapAction {
    Highlight { index: usize },
    ScrollTo { index: usize, left: f64 },
}

#[derive(Debug)]
pub struct SnapList {
    items: Vec<SnapItem>,
    client_width: f64,
    active: Option<usize>,
    pointer_down: bool,
    frame: FrameCoalescer,
    settle: Debouncer,
    resize: Debouncer,
}

impl SnapList {
    /// Returns `None` for an empty list or a viewport wider than the mobile
    /// breakpoint. The first item starts highlighted.
    pub fn attach(
        config: &AppConfig,
        viewport_width: f64,
        items: Vec<SnapItem>,
        client_width: f64,
    ) -> Option<Self> {
        if items.is_empty() || !config.is_mobile(viewport_width) {
            return None;
        }
        debug!(items = items.len(), "Snap list attached");
        Some(Self {
            items,
            client_width: finite_or_zero(client_width),
            active: Some(0),
            pointer_down: false,
            frame: FrameCoalescer::new(),
            settle: Debouncer::new(config.snap_settle()),
            resize: Debouncer::new(config.resize_debounce()),
        })
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Returns `true` when the host should request an animation frame.
    pub fn on_scroll(&mut self, now: Instant) -> bool {
        self.settle.schedule(now);
        self.frame.request()
    }

    pub fn on_frame(&mut self, scroll_left: f64) -> Option<SnapAction> {
        if !self.frame.take() {
            return None;
        }
        let index = closest_item(&self.items, scroll_left, self.client_width)?;
        self.highlight(index)
    }

    pub fn on_pointer_down(&mut self) {
        self.pointer_down = true;
        self.settle.cancel();
    }

    /// Pointer released or cancelled: snap right away.
    pub fn on_pointer_up(&mut self, scroll_left: f64) -> Option<SnapAction> {
        self.pointer_down = false;
        self.snap(scroll_left)
    }

    /// New item geometry after a resize; the snap waits for the debounce.
    pub fn on_resize(&mut self, now: Instant, items: Vec<SnapItem>, client_width: f64) {
        self.items = items;
        self.client_width = finite_or_zero(client_width);
        if self.active.is_some_and(|idx| idx >= self.items.len()) {
            self.active = None;
        }
        self.settle.cancel();
        self.resize.schedule(now);
    }

    /// Run settle and resize work whose quiet period has elapsed.
    pub fn poll(&mut self, now: Instant, scroll_left: f64) -> Option<SnapAction> {
        let settled = self.settle.poll(now) && !self.pointer_down;
        let resized = self.resize.poll(now);
        if settled || resized {
            return self.snap(scroll_left);
        }
        None
    }

    fn highlight(&mut self, index: usize) -> Option<SnapAction> {
        if self.active == Some(index) {
            return None;
        }
        self.active = Some(index);
        trace!(index, "Snap highlight moved");
        Some(SnapAction::Highlight { index })
    }

    fn snap(&mut self, scroll_left: f64) -> Option<SnapAction> {
        let index = closest_item(&self.items, scroll_left, self.client_width)?;
        let left = snap_target(&self.items[index], self.client_width);
        self.active = Some(index);
        debug!(index, left, "Snapping to closest item");
        Some(SnapAction::ScrollTo { index, left })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn cards() -> Vec<SnapItem> {
        (0..4)
            .map(|i| SnapItem {
                left: 20.0 + i as f64 * 300.0,
                width: 280.0,
            })
            .collect()
    }

    fn mobile_list() -> SnapList {
        SnapList::attach(&AppConfig::default(), 390.0, cards(), 390.0).expect("mobile list")
    }

    #[test]
    fn closest_item_uses_centre_distance() {
        let items = cards();
        assert_eq!(closest_item(&items, 0.0, 390.0), Some(0));
        assert_eq!(closest_item(&items, 290.0, 390.0), Some(1));
        assert_eq!(closest_item(&items, 10_000.0, 390.0), Some(3));
        assert_eq!(closest_item(&[], 0.0, 390.0), None);
    }

    #[test]
    fn ties_prefer_the_earlier_item() {
        let items = [
            SnapItem {
                left: 0.0,
                width: 100.0,
            },
            SnapItem {
                left: 100.0,
                width: 100.0,
            },
        ];
        assert_eq!(closest_item(&items, 0.0, 200.0), Some(0));
    }

    #[test]
    fn snap_target_centres_and_never_goes_negative() {
        let items = cards();
        assert_eq!(snap_target(&items[0], 390.0), 0.0);
        assert_eq!(snap_target(&items[1], 390.0), 265.0);
    }

    #[test]
    fn desktop_viewport_does_not_attach() {
        assert!(SnapList::attach(&AppConfig::default(), 1024.0, cards(), 390.0).is_none());
        assert!(SnapList::attach(&AppConfig::default(), 390.0, Vec::new(), 390.0).is_none());
    }

    #[test]
    fn settle_snaps_once_scrolling_stops() {
        let mut list = mobile_list();
        let start = Instant::now();

        assert!(list.on_scroll(start));
        assert!(!list.on_scroll(start + Duration::from_millis(50)));
        assert_eq!(
            list.on_frame(290.0),
            Some(SnapAction::Highlight { index: 1 })
        );
        assert_eq!(list.poll(start + Duration::from_millis(100), 290.0), None);
        assert_eq!(
            list.poll(start + Duration::from_millis(170), 290.0),
            Some(SnapAction::ScrollTo {
                index: 1,
                left: 265.0
            })
        );
    }

    #[test]
    fn held_pointer_blocks_settle_until_release() {
        let mut list = mobile_list();
        let start = Instant::now();

        list.on_scroll(start);
        list.on_pointer_down();
        list.on_scroll(start + Duration::from_millis(10));
        assert_eq!(list.poll(start + Duration::from_millis(500), 600.0), None);
        assert_eq!(
            list.on_pointer_up(600.0),
            Some(SnapAction::ScrollTo {
                index: 2,
                left: 565.0
            })
        );
        assert_eq!(list.active(), Some(2));
    }

    #[test]
    fn resize_snaps_after_debounce() {
        let mut list = mobile_list();
        let start = Instant::now();
        list.on_resize(start, cards(), 360.0);
        assert_eq!(list.poll(start + Duration::from_millis(149), 0.0), None);
        assert!(matches!(
            list.poll(start + Duration::from_millis(150), 0.0),
            Some(SnapAction::ScrollTo { index: 0, .. })
        ));
    }
}
