//! Environment variables of the plugin interface.
//!
//! Every plugin process inherits the caller's environment plus the variables
//! below. Directory values pass through [`normalize_path`] so they do not
//! depend on how the root directory was spelled.

use std::ffi::OsString;

use crate::descriptor::PluginDescriptor;

/// Version of the plugin interface spoken by this crate.
pub const API_VERSION: &str = "3";

/// Variable carrying [`API_VERSION`].
pub const API_VERSION_ENV: &str = "HOLO_API_VERSION";
/// Variable carrying the plugin's cache directory.
pub const CACHE_DIR_ENV: &str = "HOLO_CACHE_DIR";
/// Variable carrying the plugin's resource directory.
pub const RESOURCE_DIR_ENV: &str = "HOLO_RESOURCE_DIR";
/// Variable carrying the plugin's state directory.
pub const STATE_DIR_ENV: &str = "HOLO_STATE_DIR";
/// Variable carrying the root directory.
pub const ROOT_DIR_ENV: &str = holo_config::ROOT_DIR_ENV;

/// Normalises a path before it is exported to a plugin.
///
/// `"/"` is returned as is. Otherwise one leading `"./"` and one trailing
/// `"/"` are removed. Nothing else changes.
///
/// ```
/// use holo_plugins::normalize_path;
///
/// assert_eq!(normalize_path("/"), "/");
/// assert_eq!(normalize_path("./target/usr/share/holo/files/"), "target/usr/share/holo/files");
/// ```
#[must_use]
pub fn normalize_path(path: &str) -> &str {
    if path == "/" {
        return path;
    }
    let relative = path.strip_prefix("./").unwrap_or(path);
    relative.strip_suffix('/').unwrap_or(relative)
}

/// Variables set on top of the inherited environment for `plugin`.
///
/// `parent` looks up variables of the calling process. `HOLO_ROOT_DIR` is
/// only emitted when the parent does not define it (or defines it as
/// empty), so an outer invocation can pin the root for nested runs.
#[must_use]
pub fn plugin_environment<F>(plugin: &PluginDescriptor, parent: F) -> Vec<(&'static str, String)>
where
    F: Fn(&str) -> Option<OsString>,
{
    let mut vars = vec![
        (API_VERSION_ENV, API_VERSION.to_owned()),
        (
            CACHE_DIR_ENV,
            normalize_path(plugin.cache_dir().as_str()).to_owned(),
        ),
        (
            RESOURCE_DIR_ENV,
            normalize_path(plugin.resource_dir().as_str()).to_owned(),
        ),
        (
            STATE_DIR_ENV,
            normalize_path(plugin.state_dir().as_str()).to_owned(),
        ),
    ];
    let root_pinned = parent(ROOT_DIR_ENV).is_some_and(|value| !value.is_empty());
    if !root_pinned {
        vars.push((
            ROOT_DIR_ENV,
            normalize_path(plugin.root_dir().as_str()).to_owned(),
        ));
    }
    vars
}
