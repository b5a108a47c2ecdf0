use std::error::Error;

use uibuild::config::ConfigFile;
use uibuild::watch::build_watch_profile;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn default_profile_watches_all_three_source_trees() -> TestResult {
    let profile = build_watch_profile(&ConfigFile::default())?;

    assert!(profile.matches("src/main/resources/logo.svg"));
    assert!(profile.matches("src/main/resources/css/structure.less"));
    assert!(profile.matches("src/main/js/app.js"));
    assert!(profile.matches("src/main/js/views/login.js"));
    assert!(profile.matches("target/ui-compose/partials/header.html"));

    Ok(())
}

#[test]
fn only_js_files_are_watched_under_the_scripts_dir() -> TestResult {
    let profile = build_watch_profile(&ConfigFile::default())?;

    assert!(!profile.matches("src/main/js/app.css"));
    assert!(!profile.matches("src/main/js/notes.md"));
    assert!(!profile.matches("README.md"));

    Ok(())
}

#[test]
fn a_cycles_own_writes_never_trigger_the_next_cycle() -> TestResult {
    // Output root nested inside a watched source tree: the implicit exclude
    // must win over the include.
    let mut cfg = ConfigFile::default();
    cfg.sources.resources = "www".to_string();
    cfg.project.output_root = "www/build".to_string();

    let profile = build_watch_profile(&cfg)?;
    assert!(profile.matches("www/logo.svg"));
    assert!(!profile.matches("www/build/css/structure.css"));
    assert!(!profile.matches("www/build/b.js"));

    // Same for the deploy tree.
    let mut cfg = ConfigFile::default();
    cfg.sources.resources = "site".to_string();
    cfg.project.deploy_dir = "site/deploy".to_string();

    let profile = build_watch_profile(&cfg)?;
    assert!(profile.matches("site/index.html"));
    assert!(!profile.matches("site/deploy/index.html"));

    Ok(())
}

#[test]
fn configured_exclude_globs_are_appended_to_the_implicit_ones() -> TestResult {
    let mut cfg = ConfigFile::default();
    cfg.watch.exclude.push("**/*.tmp".to_string());
    cfg.watch.exclude.push("src/main/js/vendor/**".to_string());

    let profile = build_watch_profile(&cfg)?;
    assert!(!profile.matches("src/main/resources/cache.tmp"));
    assert!(!profile.matches("src/main/js/vendor/lib.js"));
    assert!(profile.matches("src/main/resources/logo.svg"));
    assert!(profile.matches("src/main/js/app.js"));

    Ok(())
}
