//! Unit tests for plugin path resolution.

use rstest::{fixture, rstest};

use super::*;

#[fixture]
fn test_root() -> Config {
    Config::with_root("/srv/holo-test")
}

#[rstest]
#[case::system_root(Config::default(), "/usr/lib/holo/holo-files")]
#[case::test_root(Config::with_root("/srv/holo-test"), "/srv/holo-test/usr/lib/holo/holo-files")]
#[case::relative_root(Config::with_root("./target"), "./target/usr/lib/holo/holo-files")]
fn executable_is_derived_from_root(#[case] config: Config, #[case] expected: &str) {
    let plugin = PluginDescriptor::new("files", &config);
    assert_eq!(plugin.executable(), expected);
}

#[rstest]
fn directories_follow_layout(test_root: Config) {
    let plugin = PluginDescriptor::new("users-groups", &test_root);
    assert_eq!(plugin.id(), "users-groups");
    assert_eq!(plugin.root_dir(), "/srv/holo-test");
    assert_eq!(
        plugin.resource_dir(),
        "/srv/holo-test/usr/share/holo/users-groups"
    );
    assert_eq!(
        plugin.cache_dir(),
        "/srv/holo-test/tmp/holo-cache/users-groups"
    );
    assert_eq!(plugin.state_dir(), "/srv/holo-test/var/lib/holo/users-groups");
}

#[rstest]
fn explicit_executable_keeps_derived_directories(test_root: Config) {
    let installed = PluginDescriptor::new("files", &test_root);
    let prebuilt = PluginDescriptor::with_executable("files", "./build/holo-files", &test_root);

    assert_eq!(prebuilt.executable(), "./build/holo-files");
    assert_eq!(prebuilt.resource_dir(), installed.resource_dir());
    assert_eq!(prebuilt.cache_dir(), installed.cache_dir());
    assert_eq!(prebuilt.state_dir(), installed.state_dir());
}

#[test]
fn cache_dir_uses_configured_cache() {
    let config = Config::with_directories("/", "/run/holo-cache");
    let plugin = PluginDescriptor::new("ssh-keys", &config);
    assert_eq!(plugin.cache_dir(), "/run/holo-cache/ssh-keys");
    assert_eq!(plugin.state_dir(), "/var/lib/holo/ssh-keys");
}

#[test]
fn absolute_id_stays_inside_cache() {
    let config = Config::with_directories("/", "/run/holo-cache");
    let plugin = PluginDescriptor::new("/etc", &config);
    assert_eq!(plugin.cache_dir(), "/run/holo-cache/etc");
}

#[rstest]
fn repeated_construction_is_deterministic(test_root: Config) {
    let first = PluginDescriptor::new("files", &test_root);
    let _other = PluginDescriptor::new("users-groups", &test_root);
    let second = PluginDescriptor::new("files", &test_root);
    assert_eq!(first, second);
}

#[rstest]
#[case::bare("files", "files", "/srv/holo-test/usr/lib/holo/holo-files")]
#[case::explicit("files=./build/holo-files", "files", "./build/holo-files")]
#[case::padded("  run-scripts  ", "run-scripts", "/srv/holo-test/usr/lib/holo/holo-run-scripts")]
fn identifier_lines_resolve(
    test_root: Config,
    #[case] line: &str,
    #[case] id: &str,
    #[case] executable: &str,
) {
    let plugin = PluginDescriptor::from_identifier_line(line, &test_root).expect("parse line");
    assert_eq!(plugin.id(), id);
    assert_eq!(plugin.executable(), executable);
}

#[rstest]
#[case::empty("")]
#[case::blank("   ")]
#[case::missing_id("=./build/holo-files")]
#[case::missing_path("files=")]
fn identifier_lines_reject_empty_parts(test_root: Config, #[case] line: &str) {
    let error = PluginDescriptor::from_identifier_line(line, &test_root)
        .expect_err("line should be rejected");
    assert!(matches!(error, PluginError::InvalidIdentifier { .. }));
}
