pub mod json;

/// Environment flag set by `--verbose`.
pub const VERBOSE_ENV: &str = "SOURCES_UPDATER_VERBOSE";

pub fn is_verbose() -> bool {
    std::env::var(VERBOSE_ENV).is_ok()
}
