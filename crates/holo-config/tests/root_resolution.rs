//! Behaviour tests for root and cache directory resolution.

use std::cell::RefCell;
use std::ffi::OsString;

use holo_config::{Config, ROOT_DIR_ENV};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

#[derive(Default)]
struct Harness {
    root_override: RefCell<Option<String>>,
    loaded: RefCell<Option<Config>>,
}

#[fixture]
fn harness() -> Harness {
    Harness::default()
}

#[given("no root directory override")]
fn given_no_override(harness: &Harness) {
    *harness.root_override.borrow_mut() = None;
}

#[given("the root directory override \"{root}\"")]
fn given_override(harness: &Harness, root: String) {
    *harness.root_override.borrow_mut() = Some(root);
}

#[when("the configuration is resolved")]
fn when_resolved(harness: &Harness) {
    let root = harness.root_override.borrow().clone();
    let lookup = move |key: &str| {
        if key == ROOT_DIR_ENV {
            root.clone().map(OsString::from)
        } else {
            None
        }
    };
    let config = match Config::from_lookup(lookup) {
        Ok(config) => config,
        Err(error) => panic!("configuration failed to resolve: {error}"),
    };
    *harness.loaded.borrow_mut() = Some(config);
}

#[then("the root directory is \"{root}\"")]
fn then_root(harness: &Harness, root: String) {
    let loaded = harness.loaded.borrow();
    let Some(config) = loaded.as_ref() else {
        panic!("configuration was not resolved");
    };
    assert_eq!(config.root_dir().as_str(), root);
}

#[then("the cache directory is \"{cache}\"")]
fn then_cache(harness: &Harness, cache: String) {
    let loaded = harness.loaded.borrow();
    let Some(config) = loaded.as_ref() else {
        panic!("configuration was not resolved");
    };
    assert_eq!(config.cache_dir().as_str(), cache);
}

#[scenario(path = "tests/features/root_resolution.feature", index = 0)]
fn default_root(#[from(harness)] harness: Harness) {
    let _ = harness;
}

#[scenario(path = "tests/features/root_resolution.feature", index = 1)]
fn pinned_root(#[from(harness)] harness: Harness) {
    let _ = harness;
}
