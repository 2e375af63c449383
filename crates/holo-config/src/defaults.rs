/// Environment variable pinning the root directory for a run.
pub const ROOT_DIR_ENV: &str = "HOLO_ROOT_DIR";

/// Root directory used when [`ROOT_DIR_ENV`] is unset or empty.
pub const DEFAULT_ROOT_DIR: &str = "/";

/// Cache location relative to the root directory.
pub const CACHE_SUBDIR: &str = "tmp/holo-cache";

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default log filter expression used by the binaries.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Default logging format for the binaries.
#[must_use]
pub fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::default()
}
