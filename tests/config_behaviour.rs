use std::error::Error;
use std::fs;

use tempfile::tempdir;
use uibuild::config::{load_and_validate, load_from_path, validate_config};

type TestResult = Result<(), Box<dyn Error>>;

fn write_config(contents: &str) -> Result<(tempfile::TempDir, std::path::PathBuf), Box<dyn Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("Uibuild.toml");
    fs::write(&path, contents)?;
    Ok((dir, path))
}

#[test]
fn empty_config_gets_conventional_defaults() -> TestResult {
    let (_dir, path) = write_config("")?;
    let cfg = load_and_validate(&path)?;

    assert_eq!(cfg.project.output_root, "target/www");
    assert_eq!(cfg.sources.resources, "src/main/resources");
    assert_eq!(cfg.sources.scripts, "src/main/js");
    assert_eq!(cfg.sources.compose, "target/ui-compose");
    assert_eq!(
        cfg.styles.get("css/structure.less").map(String::as_str),
        Some("css/structure.css")
    );
    assert_eq!(cfg.watch.while_running, "queue");
    assert_eq!(cfg.watch.queue_length, 1);
    assert!(cfg.modules.is_empty());

    Ok(())
}

#[test]
fn explicit_sections_override_defaults() -> TestResult {
    let (_dir, path) = write_config(
        r#"
[project]
output_root = "out"
deploy_dir = "../deployed"

[sources]
resources = "resources"
scripts = "js"
compose = "compose"

[styles]
"css/site.less" = "css/site.css"

[watch]
while_running = "drop"
queue_length = 3
exclude = ["**/*.tmp"]

[modules]
Footer = "org/example/ui/Footer"
"#,
    )?;
    let cfg = load_and_validate(&path)?;

    assert_eq!(cfg.project.output_root, "out");
    assert_eq!(cfg.sources.scripts, "js");
    assert_eq!(cfg.styles.len(), 1);
    assert_eq!(cfg.watch.while_running, "drop");
    assert_eq!(cfg.watch.queue_length, 3);
    assert_eq!(
        cfg.modules.get("Footer").map(String::as_str),
        Some("org/example/ui/Footer")
    );

    Ok(())
}

#[test]
fn output_root_equal_to_deploy_dir_is_rejected() -> TestResult {
    let (_dir, path) = write_config(
        r#"
[project]
output_root = "target/www"
deploy_dir = "target/www"
"#,
    )?;

    assert!(load_and_validate(&path).is_err());
    Ok(())
}

#[test]
fn dot_prefixed_paths_still_collide_with_the_output_root() -> TestResult {
    let (_dir, path) = write_config(
        r#"
[project]
output_root = "target/www"
deploy_dir = "./target/www/"
"#,
    )?;
    assert!(load_and_validate(&path).is_err());

    let (_dir, path) = write_config(
        r#"
[sources]
resources = "./target/www"
"#,
    )?;
    assert!(load_and_validate(&path).is_err());

    Ok(())
}

#[test]
fn source_dir_equal_to_output_root_is_rejected() -> TestResult {
    let (_dir, path) = write_config(
        r#"
[project]
output_root = "target/www"

[sources]
compose = "target/www"
"#,
    )?;

    assert!(load_and_validate(&path).is_err());
    Ok(())
}

#[test]
fn invalid_watch_settings_are_rejected() -> TestResult {
    for bad in [
        "[watch]\nwhile_running = \"cancel\"\n",
        "[watch]\nqueue_length = 0\n",
        "[watch]\nexclude = [\"[unclosed\"]\n",
    ] {
        let (_dir, path) = write_config(bad)?;
        let cfg = load_from_path(&path)?;
        assert!(validate_config(&cfg).is_err(), "expected rejection of: {bad}");
    }
    Ok(())
}

#[test]
fn tool_templates_must_carry_their_placeholders() -> TestResult {
    let (_dir, path) = write_config("[tools]\nstyles_cmd = \"lessc\"\n")?;
    assert!(load_and_validate(&path).is_err());

    let (_dir, path) = write_config("[tools]\nbundle_cmd = \"r.js -o {entry}\"\n")?;
    assert!(load_and_validate(&path).is_err());

    Ok(())
}
