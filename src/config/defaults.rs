pub(crate) fn default_trigger_margin() -> f64 {
    60.0
}

pub(crate) fn default_tablet_breakpoint() -> f64 {
    991.0
}

pub(crate) fn default_resize_debounce_ms() -> u64 {
    150
}

pub(crate) fn default_mobile_breakpoint() -> f64 {
    767.0
}

pub(crate) fn default_snap_settle_ms() -> u64 {
    120
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Debug
}
