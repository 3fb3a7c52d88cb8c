//! Integration tests for command dispatch
//!
//! Commands run in headless mode so their output is NDJSON on stdout; the
//! assertions look at the returned status and the settings file.

#![cfg(unix)]

mod support;

use std::path::PathBuf;

use serial_test::serial;

use robotarium::{run, Args, Command};
use robotarium_app::{load_settings, save_settings, Settings};
use robotarium_core::Error;

use support::{canonical, FakeToolchain};

fn args(settings: PathBuf, command: Command) -> Args {
    Args {
        settings: Some(settings),
        headless: true,
        command,
    }
}

fn with_fake_settings(fake: &FakeToolchain) -> PathBuf {
    let path = fake.path("settings.json");
    save_settings(&path, &fake.settings()).unwrap();
    path
}

#[tokio::test]
async fn test_set_writes_settings_file() {
    let fake = FakeToolchain::new();
    let path = fake.path("settings.json");

    let ok = run(args(
        path.clone(),
        Command::Set {
            key: "fqbn".to_string(),
            value: "arduino:avr:mega".to_string(),
        },
    ))
    .await
    .unwrap();
    assert!(ok);

    let ok = run(args(
        path.clone(),
        Command::Set {
            key: "command_timeout_secs".to_string(),
            value: "90".to_string(),
        },
    ))
    .await
    .unwrap();
    assert!(ok);

    let settings = load_settings(&path);
    assert_eq!(settings.fqbn, "arduino:avr:mega");
    assert_eq!(settings.command_timeout_secs, Some(90));
}

#[tokio::test]
async fn test_set_unknown_key_fails_without_writing() {
    let fake = FakeToolchain::new();
    let path = fake.path("settings.json");
    let command = Command::Set {
        key: "__class__".to_string(),
        value: "1".to_string(),
    };

    assert!(!run(args(path.clone(), command.clone())).await.unwrap());
    assert!(!path.exists());

    let interactive = Args {
        headless: false,
        ..args(path.clone(), command)
    };
    let err = run(interactive).await.unwrap_err();
    assert!(matches!(err, Error::UnknownSetting { .. }));
}

#[tokio::test]
async fn test_compile_remembers_project() {
    let fake = FakeToolchain::new();
    let settings_path = with_fake_settings(&fake);
    let sketch = fake.sketch("Blink", "void setup() {}\nvoid loop() {}\n");

    let ok = run(args(
        settings_path.clone(),
        Command::Compile {
            path: Some(sketch.clone()),
        },
    ))
    .await
    .unwrap();

    assert!(ok);
    assert_eq!(load_settings(&settings_path).project, Some(canonical(&sketch)));
    assert!(fake.calls()[0].starts_with("compile --fqbn arduino:avr:uno"));

    // Second compile with no path reuses the remembered project
    assert!(run(args(settings_path, Command::Compile { path: None }))
        .await
        .unwrap());
    assert_eq!(fake.calls().len(), 2);
}

#[tokio::test]
async fn test_compile_failure_exits_unsuccessfully() {
    let fake = FakeToolchain::new();
    let settings_path = with_fake_settings(&fake);
    let sketch = fake.sketch("Broken", "BROKEN\n");

    let ok = run(args(settings_path, Command::Compile { path: Some(sketch) }))
        .await
        .unwrap();
    assert!(!ok);
}

#[tokio::test]
async fn test_compile_missing_project_reports_error_event() {
    let fake = FakeToolchain::new();
    let settings_path = with_fake_settings(&fake);

    let ok = run(args(
        settings_path,
        Command::Compile {
            path: Some(fake.path("does-not-exist")),
        },
    ))
    .await
    .unwrap();

    assert!(!ok);
    assert!(fake.calls().is_empty());
}

#[tokio::test]
#[serial]
async fn test_compile_defaults_to_current_directory() {
    let fake = FakeToolchain::new();
    let settings_path = with_fake_settings(&fake);
    let sketch = fake.sketch("Blink", "void setup() {}\n");

    let original = std::env::current_dir().unwrap();
    std::env::set_current_dir(&sketch).unwrap();
    let result = run(args(settings_path, Command::Compile { path: None })).await;
    std::env::set_current_dir(original).unwrap();

    assert!(result.unwrap());
    assert_eq!(
        fake.calls(),
        vec![format!(
            "compile --fqbn arduino:avr:uno {}",
            canonical(&sketch).display()
        )]
    );
}

#[tokio::test]
async fn test_init_succeeds_with_working_toolchain() {
    let fake = FakeToolchain::new();
    let settings_path = with_fake_settings(&fake);

    assert!(run(args(settings_path, Command::Init)).await.unwrap());
    assert_eq!(fake.calls().len(), 3);
}

#[tokio::test]
async fn test_devices_lists_boards() {
    let fake = FakeToolchain::new();
    fake.set_boards("COM3 serial Uno\n");
    let settings_path = with_fake_settings(&fake);

    assert!(run(args(settings_path, Command::Devices)).await.unwrap());
    assert_eq!(fake.calls(), vec!["board list"]);
}

#[tokio::test]
async fn test_check_reports_missing_toolchain() {
    let fake = FakeToolchain::new();
    let path = fake.path("settings.json");

    save_settings(
        &path,
        &Settings {
            executable: "robotarium-no-such-toolchain".to_string(),
            ..Settings::default()
        },
    )
    .unwrap();
    assert!(!run(args(path.clone(), Command::Check)).await.unwrap());

    save_settings(&path, &fake.settings()).unwrap();
    assert!(run(args(path, Command::Check)).await.unwrap());
}

#[tokio::test]
async fn test_bad_settings_value_keeps_file_and_other_keys() {
    let fake = FakeToolchain::new();
    let settings_path = fake.path("settings.json");
    let mut value = serde_json::to_value(fake.settings()).unwrap();
    value["font_size"] = serde_json::json!("big");
    let content = serde_json::to_string_pretty(&value).unwrap();
    std::fs::write(&settings_path, &content).unwrap();
    let sketch = fake.sketch("Blink", "void setup() {}\n");

    // The toolchain keys still apply, so the compile reaches the fake tool
    let ok = run(args(
        settings_path.clone(),
        Command::Compile {
            path: Some(sketch),
        },
    ))
    .await
    .unwrap();
    assert!(ok);
    assert_eq!(fake.calls().len(), 1);

    let set = Command::Set {
        key: "theme".to_string(),
        value: "monokai".to_string(),
    };
    assert!(!run(args(settings_path.clone(), set)).await.unwrap());

    assert_eq!(std::fs::read_to_string(&settings_path).unwrap(), content);
}
