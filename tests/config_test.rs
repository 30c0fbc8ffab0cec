//! Layered settings: defaults < global file < local `.advent.toml`.
//!
//! Every test passes an explicit global path inside a temp dir so the
//! developer's own config never leaks in.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use advent::application::ApplicationError;
use advent::config::{local_config_path, Settings};

fn global_file(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("advent.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn given_no_config_files_when_load_then_defaults_with_cli_input_dir() {
    let inputs = TempDir::new().unwrap();
    let missing_global = inputs.path().join("nowhere").join("advent.toml");

    let settings = Settings::load_with(Some(&missing_global), Some(inputs.path())).unwrap();

    assert_eq!(settings.input_dir, inputs.path());
    assert_eq!(settings.input_file, "input.txt");
    assert_eq!(settings.chiton.repeats, 5);
    assert_eq!(settings.polymer.long_steps, 40);
}

#[test]
fn given_global_config_when_load_then_overrides_defaults() {
    let home = TempDir::new().unwrap();
    let inputs = TempDir::new().unwrap();
    let global = global_file(
        &home,
        r#"
input_file = "puzzle.txt"

[polymer]
short_steps = 3
"#,
    );

    let settings = Settings::load_with(Some(&global), Some(inputs.path())).unwrap();

    assert_eq!(settings.input_file, "puzzle.txt");
    assert_eq!(settings.polymer.short_steps, 3);
    assert_eq!(settings.polymer.long_steps, 40);
}

#[test]
fn given_local_and_global_config_when_load_then_local_wins() {
    let home = TempDir::new().unwrap();
    let inputs = TempDir::new().unwrap();
    let global = global_file(
        &home,
        r#"
[chiton]
repeats = 3

[origami]
ink = "@"
"#,
    );
    fs::write(
        local_config_path(inputs.path()),
        r#"
[chiton]
repeats = 2
"#,
    )
    .unwrap();

    let settings = Settings::load_with(Some(&global), Some(inputs.path())).unwrap();

    assert_eq!(settings.chiton.repeats, 2);
    assert_eq!(settings.origami.ink, '@');
    assert_eq!(settings.origami.paper, '.');
}

#[test]
fn given_cli_input_dir_when_local_config_names_another_then_cli_wins() {
    let inputs = TempDir::new().unwrap();
    fs::write(local_config_path(inputs.path()), "input_dir = \"/elsewhere\"\n").unwrap();

    let settings = Settings::load_with(None, Some(inputs.path())).unwrap();

    assert_eq!(settings.input_dir, inputs.path());
}

#[test]
fn given_zero_repeats_when_load_then_config_error() {
    let inputs = TempDir::new().unwrap();
    fs::write(local_config_path(inputs.path()), "[chiton]\nrepeats = 0\n").unwrap();

    let err = Settings::load_with(None, Some(inputs.path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_malformed_toml_when_load_then_config_error_names_file() {
    let inputs = TempDir::new().unwrap();
    fs::write(local_config_path(inputs.path()), "[chiton\nrepeats = 2\n").unwrap();

    let err = Settings::load_with(None, Some(inputs.path())).unwrap_err();

    match err {
        ApplicationError::Config { message } => assert!(message.contains(".advent.toml")),
        other => panic!("expected config error, got {:?}", other),
    }
}
