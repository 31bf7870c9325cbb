use super::defaults;
use super::models::{AppConfig, LogLevel};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    navigation: NavigationConfig,
    #[serde(default)]
    timing: TimingConfig,
    #[serde(default)]
    snap: SnapConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl From<ConfigTables> for AppConfig {
    fn from(tables: ConfigTables) -> Self {
        AppConfig {
            trigger_margin: tables.navigation.trigger_margin,
            tablet_breakpoint: tables.navigation.tablet_breakpoint,
            resize_debounce_ms: tables.timing.resize_debounce_ms,
            mobile_breakpoint: tables.snap.mobile_breakpoint,
            snap_settle_ms: tables.snap.settle_ms,
            log_level: tables.logging.log_level,
        }
    }
}

impl From<&AppConfig> for ConfigTables {
    fn from(config: &AppConfig) -> Self {
        ConfigTables {
            navigation: NavigationConfig {
                trigger_margin: config.trigger_margin,
                tablet_breakpoint: config.tablet_breakpoint,
            },
            timing: TimingConfig {
                resize_debounce_ms: config.resize_debounce_ms,
            },
            snap: SnapConfig {
                mobile_breakpoint: config.mobile_breakpoint,
                settle_ms: config.snap_settle_ms,
            },
            logging: LoggingConfig {
                log_level: config.log_level,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct NavigationConfig {
    #[serde(default = "defaults::default_trigger_margin")]
    trigger_margin: f64,
    #[serde(default = "defaults::default_tablet_breakpoint")]
    tablet_breakpoint: f64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        NavigationConfig {
            trigger_margin: defaults::default_trigger_margin(),
            tablet_breakpoint: defaults::default_tablet_breakpoint(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct TimingConfig {
    #[serde(default = "defaults::default_resize_debounce_ms")]
    resize_debounce_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            resize_debounce_ms: defaults::default_resize_debounce_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct SnapConfig {
    #[serde(default = "defaults::default_mobile_breakpoint")]
    mobile_breakpoint: f64,
    #[serde(default = "defaults::default_snap_settle_ms")]
    settle_ms: u64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        SnapConfig {
            mobile_breakpoint: defaults::default_mobile_breakpoint(),
            settle_ms: defaults::default_snap_settle_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
        }
    }
}
