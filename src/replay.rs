//! Scripted replay of host events against a `NavigationDots` controller.
//!
//! A scenario is a JSON document describing the initial page layout and a
//! timeline of scroll, frame, resize and click events. Replaying it drives the
//! controller the way a browser host would and records every indicator
//! change, which makes layout bugs reproducible outside a browser. Once the
//! timeline ends the page is left idle: a pending resize debounce runs out and
//! a requested frame is rendered before the final state is read.

use crate::config::AppConfig;
use crate::geometry::Viewport;
use crate::indicator::IndicatorChange;
use crate::navigation::{LayoutSource, NavigationDots};
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Scenario {
    pub viewport: Viewport,
    pub document_height: f64,
    pub item_tops: Vec<f64>,
    #[serde(default)]
    pub scroll_offset: f64,
    /// Dots already rendered by the page before attaching.
    #[serde(default)]
    pub existing_dots: usize,
    #[serde(default)]
    pub events: Vec<TimedEvent>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimedEvent {
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: HostEvent,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum HostEvent {
    Scroll {
        offset: f64,
    },
    Frame,
    Resize {
        viewport: Viewport,
        #[serde(default)]
        document_height: Option<f64>,
        #[serde(default)]
        item_tops: Option<Vec<f64>>,
    },
    /// Dot click; the page jumps straight to the dot's scroll target.
    Click {
        index: usize,
    },
    /// Lets timers fire without any other input.
    Tick,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedChange {
    pub at_ms: u64,
    pub change: IndicatorChange,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub attached: bool,
    pub changes: Vec<RecordedChange>,
    pub final_active: Option<usize>,
    pub frames_requested: usize,
}

pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("parsing scenario {}", path.display()))
}

fn check_timeline(scenario: &Scenario) -> Result<()> {
    if let Some(pair) = scenario
        .events
        .windows(2)
        .find(|pair| pair[1].at_ms < pair[0].at_ms)
    {
        return Err(anyhow!(
            "scenario events out of order: {}ms follows {}ms",
            pair[1].at_ms,
            pair[0].at_ms
        ));
    }
    Ok(())
}

struct PageState {
    viewport: Viewport,
    document_height: f64,
    item_tops: Vec<f64>,
    scroll_offset: f64,
}

impl LayoutSource for PageState {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn document_height(&self) -> f64 {
        self.document_height
    }

    fn item_tops(&self) -> Vec<f64> {
        self.item_tops.clone()
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }
}

pub fn replay(config: AppConfig, scenario: &Scenario) -> Result<ReplayReport> {
    check_timeline(scenario)?;
    let mut page = PageState {
        viewport: scenario.viewport,
        document_height: scenario.document_height,
        item_tops: scenario.item_tops.clone(),
        scroll_offset: scenario.scroll_offset,
    };

    let resize_debounce_ms = config.resize_debounce_ms;
    let Some(mut nav) = NavigationDots::attach(config, &page, scenario.existing_dots) else {
        info!("Scenario has no tracked items; nothing to replay");
        return Ok(ReplayReport {
            attached: false,
            changes: Vec::new(),
            final_active: None,
            frames_requested: 0,
        });
    };

    let origin = Instant::now();
    let clock = Rc::new(RefCell::new(0u64));
    let changes = Rc::new(RefCell::new(Vec::new()));
    if let Some(change) = nav.initial_resize() {
        changes.borrow_mut().push(RecordedChange { at_ms: 0, change });
    }
    let subscription = {
        let clock = Rc::clone(&clock);
        let changes = Rc::clone(&changes);
        nav.subscribe(move |change| {
            changes.borrow_mut().push(RecordedChange {
                at_ms: *clock.borrow(),
                change: *change,
            });
        })
    };

    let mut frames_requested = usize::from(nav.frame_pending());
    for timed in &scenario.events {
        *clock.borrow_mut() = timed.at_ms;
        let now = origin + Duration::from_millis(timed.at_ms);
        nav.poll(now, &page);

        match &timed.event {
            HostEvent::Scroll { offset } => {
                page.scroll_offset = *offset;
                if nav.on_scroll() {
                    frames_requested += 1;
                }
            }
            HostEvent::Frame => {
                nav.on_frame(&page);
            }
            HostEvent::Resize {
                viewport,
                document_height,
                item_tops,
            } => {
                page.viewport = *viewport;
                if let Some(height) = document_height {
                    page.document_height = *height;
                }
                if let Some(tops) = item_tops {
                    page.item_tops = tops.clone();
                }
                nav.on_resize(now);
            }
            HostEvent::Click { index } => {
                let Some(target) = nav.scroll_target(*index) else {
                    debug!(index, "Click on missing dot ignored");
                    continue;
                };
                page.scroll_offset = target;
                if nav.on_scroll() {
                    frames_requested += 1;
                }
            }
            HostEvent::Tick => {}
        }
    }

    let end_ms = scenario
        .events
        .last()
        .map_or(0, |timed| timed.at_ms)
        .saturating_add(resize_debounce_ms);
    *clock.borrow_mut() = end_ms;
    nav.poll(origin + Duration::from_millis(end_ms), &page);
    if nav.frame_pending() {
        debug!(at_ms = end_ms, "Rendering frame left pending by the timeline");
        nav.on_frame(&page);
    }

    subscription.dispose();
    let final_active = nav.active_index();
    nav.detach();
    let changes = changes.borrow().clone();
    info!(
        events = scenario.events.len(),
        changes = changes.len(),
        frames_requested,
        ?final_active,
        "Replay finished"
    );
    Ok(ReplayReport {
        attached: true,
        changes,
        final_active,
        frames_requested,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"{
        "viewport": { "width": 1440, "height": 800 },
        "document_height": 1900,
        "item_tops": [0, 500, 1000, 1500, 2000],
        "events": [
            { "at_ms": 0, "kind": "frame" },
            { "at_ms": 10, "kind": "scroll", "offset": 450 },
            { "at_ms": 12, "kind": "scroll", "offset": 1000 },
            { "at_ms": 16, "kind": "frame" },
            { "at_ms": 20, "kind": "click", "index": 4 },
            { "at_ms": 32, "kind": "frame" },
            { "at_ms": 40, "kind": "resize", "viewport": { "width": 700, "height": 800 } },
            { "at_ms": 300, "kind": "tick" }
        ]
    }"#;

    #[test]
    fn replays_scroll_click_and_resize() {
        let scenario: Scenario = serde_json::from_str(SCENARIO).expect("scenario json");
        let report = replay(AppConfig::default(), &scenario).expect("replay");

        let summary: Vec<(u64, IndicatorChange)> = report
            .changes
            .iter()
            .map(|recorded| (recorded.at_ms, recorded.change))
            .collect();
        assert_eq!(
            summary,
            vec![
                (
                    0,
                    IndicatorChange::Resized {
                        len: 5,
                        append: 5,
                        remove: 0
                    }
                ),
                (
                    0,
                    IndicatorChange::Activated {
                        index: 0,
                        previous: None
                    }
                ),
                (
                    16,
                    IndicatorChange::Activated {
                        index: 3,
                        previous: Some(0)
                    }
                ),
                (
                    32,
                    IndicatorChange::Activated {
                        index: 4,
                        previous: Some(3)
                    }
                ),
                (300, IndicatorChange::Cleared { previous: 4 }),
            ]
        );
        assert_eq!(report.frames_requested, 3);
        assert_eq!(report.final_active, None);
    }

    #[test]
    fn pending_resize_runs_out_after_the_last_event() {
        let scenario: Scenario = serde_json::from_str(
            r#"{
                "viewport": { "width": 1440, "height": 800 },
                "document_height": 1900,
                "item_tops": [0, 500, 1000, 1500, 2000],
                "existing_dots": 5,
                "events": [
                    { "at_ms": 0, "kind": "frame" },
                    { "at_ms": 40, "kind": "resize", "viewport": { "width": 700, "height": 800 } }
                ]
            }"#,
        )
        .expect("scenario json");
        let report = replay(AppConfig::default(), &scenario).expect("replay");

        assert_eq!(report.final_active, None);
        assert_eq!(report.frames_requested, 1);
        assert_eq!(
            report.changes,
            vec![
                RecordedChange {
                    at_ms: 0,
                    change: IndicatorChange::Activated {
                        index: 0,
                        previous: None
                    }
                },
                RecordedChange {
                    at_ms: 190,
                    change: IndicatorChange::Cleared { previous: 0 }
                },
            ]
        );
    }

    #[test]
    fn trailing_scroll_is_rendered_before_reporting() {
        let scenario: Scenario = serde_json::from_str(
            r#"{
                "viewport": { "width": 1440, "height": 800 },
                "document_height": 1900,
                "item_tops": [0, 500, 1000, 1500, 2000],
                "existing_dots": 5,
                "events": [
                    { "at_ms": 0, "kind": "frame" },
                    { "at_ms": 10, "kind": "scroll", "offset": 1000 }
                ]
            }"#,
        )
        .expect("scenario json");
        let report = replay(AppConfig::default(), &scenario).expect("replay");

        assert_eq!(report.final_active, Some(3));
        assert_eq!(report.frames_requested, 2);
        assert_eq!(report.changes.len(), 2);
    }

    #[test]
    fn negative_viewport_in_scenario_is_sanitized() {
        let scenario: Scenario = serde_json::from_str(
            r#"{
                "viewport": { "width": -1440, "height": 800 },
                "document_height": 1900,
                "item_tops": [0, 500]
            }"#,
        )
        .expect("scenario json");
        assert_eq!(scenario.viewport, Viewport::new(0.0, 800.0));

        let report = replay(AppConfig::default(), &scenario).expect("replay");
        assert!(report.attached);
        assert_eq!(report.frames_requested, 0);
    }

    #[test]
    fn empty_page_is_not_attached() {
        let scenario = Scenario {
            viewport: Viewport::new(1440.0, 800.0),
            document_height: 800.0,
            item_tops: Vec::new(),
            scroll_offset: 0.0,
            existing_dots: 0,
            events: Vec::new(),
        };
        let report = replay(AppConfig::default(), &scenario).expect("replay");
        assert!(!report.attached);
        assert!(report.changes.is_empty());
    }

    #[test]
    fn rejects_out_of_order_timeline() {
        let mut scenario: Scenario = serde_json::from_str(SCENARIO).expect("scenario json");
        scenario.events.swap(0, 3);
        assert!(replay(AppConfig::default(), &scenario).is_err());
    }
}
