//! Plugin identity and filesystem layout.
//!
//! A [`PluginDescriptor`] names one plugin and resolves the paths the plugin
//! interface promises it:
//!
//! | Purpose            | Path                           |
//! |--------------------|--------------------------------|
//! | Plugin executable  | `<root>/usr/lib/holo/holo-<id>` |
//! | Resource directory | `<root>/usr/share/holo/<id>`    |
//! | Cache directory    | `<cache>/<id>`                  |
//! | State directory    | `<root>/var/lib/holo/<id>`      |
//!
//! Construction performs no I/O. Whether the executable exists is only
//! discovered when the operating system is asked to launch it.

use camino::{Utf8Path, Utf8PathBuf};
use holo_config::Config;

use crate::error::PluginError;

/// Immutable description of one plugin and its directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDescriptor {
    id: String,
    executable: Utf8PathBuf,
    root_dir: Utf8PathBuf,
    resource_dir: Utf8PathBuf,
    cache_dir: Utf8PathBuf,
    state_dir: Utf8PathBuf,
}

impl PluginDescriptor {
    /// Describes the installed plugin `id` under the configured root.
    ///
    /// # Example
    ///
    /// ```
    /// use holo_config::Config;
    /// use holo_plugins::PluginDescriptor;
    ///
    /// let plugin = PluginDescriptor::new("files", &Config::default());
    /// assert_eq!(plugin.executable(), "/usr/lib/holo/holo-files");
    /// assert_eq!(plugin.state_dir(), "/var/lib/holo/files");
    /// ```
    #[must_use]
    pub fn new(id: impl Into<String>, config: &Config) -> Self {
        let plugin_id: String = id.into();
        let executable = config
            .root_dir()
            .join(format!("usr/lib/holo/holo-{plugin_id}"));
        Self::with_executable(plugin_id, executable, config)
    }

    /// Describes a plugin whose executable lives outside the standard
    /// location, typically a freshly built binary tested before installation.
    ///
    /// Only the executable differs from [`PluginDescriptor::new`]; the
    /// directories follow the same layout.
    #[must_use]
    pub fn with_executable(
        id: impl Into<String>,
        executable: impl Into<Utf8PathBuf>,
        config: &Config,
    ) -> Self {
        let plugin_id: String = id.into();
        let root_dir = config.root_dir().to_owned();
        Self {
            resource_dir: root_dir.join(format!("usr/share/holo/{plugin_id}")),
            cache_dir: config.cache_dir().join(plugin_id.trim_start_matches('/')),
            state_dir: root_dir.join(format!("var/lib/holo/{plugin_id}")),
            executable: executable.into(),
            root_dir,
            id: plugin_id,
        }
    }

    /// Parses a plugin reference of the form `id` or `id=path/to/executable`.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::InvalidIdentifier`] when the ID or the explicit
    /// executable path is empty.
    pub fn from_identifier_line(line: &str, config: &Config) -> Result<Self, PluginError> {
        let trimmed = line.trim();
        let invalid = |message: &str| PluginError::InvalidIdentifier {
            line: line.to_owned(),
            message: message.to_owned(),
        };
        match trimmed.split_once('=') {
            None if trimmed.is_empty() => Err(invalid("plugin ID must not be empty")),
            None => Ok(Self::new(trimmed, config)),
            Some(("", _)) => Err(invalid("plugin ID must not be empty")),
            Some((_, "")) => Err(invalid("executable path must not be empty")),
            Some((id, executable)) => Ok(Self::with_executable(id, executable, config)),
        }
    }

    /// Plugin ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Path of the plugin executable.
    #[must_use]
    pub fn executable(&self) -> &Utf8Path {
        &self.executable
    }

    /// Root directory the plugin operates on.
    #[must_use]
    pub fn root_dir(&self) -> &Utf8Path {
        &self.root_dir
    }

    /// Directory holding the plugin's resources (entity definitions etc.).
    #[must_use]
    pub fn resource_dir(&self) -> &Utf8Path {
        &self.resource_dir
    }

    /// Directory where the plugin may keep temporary data for this run.
    #[must_use]
    pub fn cache_dir(&self) -> &Utf8Path {
        &self.cache_dir
    }

    /// Directory where the plugin may keep persistent data.
    #[must_use]
    pub fn state_dir(&self) -> &Utf8Path {
        &self.state_dir
    }
}

#[cfg(test)]
mod tests;
