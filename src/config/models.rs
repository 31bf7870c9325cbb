use serde::Deserialize;
use std::time::Duration;

/// Runtime configuration, flattened from the sectioned TOML file.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Pixels above an item's top edge at which it becomes active.
    pub trigger_margin: f64,
    /// Viewport widths at or below this disable the navigation dots.
    pub tablet_breakpoint: f64,
    pub resize_debounce_ms: u64,
    /// Viewport widths at or below this enable the horizontal snap list.
    pub mobile_breakpoint: f64,
    pub snap_settle_ms: u64,
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            trigger_margin: crate::config::defaults::default_trigger_margin(),
            tablet_breakpoint: crate::config::defaults::default_tablet_breakpoint(),
            resize_debounce_ms: crate::config::defaults::default_resize_debounce_ms(),
            mobile_breakpoint: crate::config::defaults::default_mobile_breakpoint(),
            snap_settle_ms: crate::config::defaults::default_snap_settle_ms(),
            log_level: crate::config::defaults::default_log_level(),
        }
    }
}

impl AppConfig {
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn snap_settle(&self) -> Duration {
        Duration::from_millis(self.snap_settle_ms)
    }

    /// Navigation dots only run on viewports wider than the tablet breakpoint.
    pub fn is_desktop(&self, viewport_width: f64) -> bool {
        viewport_width > self.tablet_breakpoint
    }

    pub fn is_mobile(&self, viewport_width: f64) -> bool {
        viewport_width <= self.mobile_breakpoint
    }

    /// Replace non-finite numbers with defaults so a bad file cannot poison
    /// threshold math.
    pub(crate) fn sanitized(mut self) -> Self {
        let defaults = AppConfig::default();
        if !self.trigger_margin.is_finite() {
            self.trigger_margin = defaults.trigger_margin;
        }
        if !self.tablet_breakpoint.is_finite() {
            self.tablet_breakpoint = defaults.tablet_breakpoint;
        }
        if !self.mobile_breakpoint.is_finite() {
            self.mobile_breakpoint = defaults.mobile_breakpoint;
        }
        self
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Debug
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
