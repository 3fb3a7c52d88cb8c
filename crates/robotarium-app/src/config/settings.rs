//! Settings persistence for `settings.json`

use std::path::{Path, PathBuf};

use robotarium_core::prelude::*;

use super::types::{Settings, KNOWN_KEYS};

pub const SETTINGS_FILENAME: &str = "settings.json";
const APP_DIR: &str = "robotarium";

/// `<config_dir>/robotarium/settings.json`, or `./settings.json` when the
/// platform has no config directory.
pub fn default_settings_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join(APP_DIR).join(SETTINGS_FILENAME),
        None => PathBuf::from(SETTINGS_FILENAME),
    }
}

/// How a settings file was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// No file yet; defaults in use
    Missing,

    /// Every known key was applied
    Loaded,

    /// The file exists but could not be fully applied (unreadable, not a
    /// JSON object, or a value of the wrong type). Whatever could be read
    /// is in use; the file must not be overwritten.
    Invalid,
}

impl LoadStatus {
    /// Whether saving would keep everything the user wrote.
    pub fn can_write_back(&self) -> bool {
        !matches!(self, LoadStatus::Invalid)
    }
}

/// Load settings from `path`.
///
/// A missing file yields defaults silently. An unreadable or malformed file
/// yields defaults with a warning. Unknown keys are warned about and
/// dropped; missing keys take their defaults.
pub fn load_settings(path: &Path) -> Settings {
    load_settings_with_status(path).0
}

/// Like [`load_settings`], also reporting whether the file was usable.
///
/// Keys are applied one at a time, so a single bad value only costs that
/// key its default.
pub fn load_settings_with_status(path: &Path) -> (Settings, LoadStatus) {
    if !path.exists() {
        debug!("No settings file at {:?}, using defaults", path);
        return (Settings::default(), LoadStatus::Missing);
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read {:?}: {}", path, e);
            return (Settings::default(), LoadStatus::Invalid);
        }
    };

    match parse_settings(&content) {
        Ok((settings, rejected)) if rejected.is_empty() => {
            debug!("Loaded settings from {:?}", path);
            (settings, LoadStatus::Loaded)
        }
        Ok((settings, rejected)) => {
            warn!(
                "Settings {:?} kept at defaults in {:?}; the file will not be overwritten",
                rejected, path
            );
            (settings, LoadStatus::Invalid)
        }
        Err(e) => {
            warn!("Failed to parse {:?}: {}", path, e);
            (Settings::default(), LoadStatus::Invalid)
        }
    }
}

/// Apply each known key on top of the defaults. Returns the settings and
/// the keys whose values were rejected.
fn parse_settings(content: &str) -> Result<(Settings, Vec<String>)> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let serde_json::Value::Object(object) = value else {
        return Err(Error::config("settings root must be a JSON object"));
    };

    let mut settings = Settings::default();
    let mut rejected = Vec::new();
    for (key, value) in object {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            warn!("Ignoring unknown setting '{}'", key);
            continue;
        }
        if let Err(e) = settings.set(&key, value) {
            warn!("Invalid value for setting '{}': {}", key, e);
            rejected.push(key);
        }
    }

    Ok((settings, rejected))
}

/// Write settings to `path`, creating the parent directory if needed.
///
/// Uses atomic write (temp file + rename).
pub fn save_settings(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::config(format!("Failed to create {:?}: {}", parent, e)))?;
    }

    let content = serde_json::to_string_pretty(settings)?;
    let temp_path = path.with_extension("json.tmp");

    std::fs::write(&temp_path, content)
        .map_err(|e| Error::config(format!("Failed to write temp settings: {}", e)))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| Error::config(format!("Failed to rename temp file: {}", e)))?;

    debug!("Saved settings to {:?}", path);
    Ok(())
}

/// Change one key and write the result back to `path`.
///
/// Nothing is written if the key is unknown or the value does not fit.
pub fn update_setting(
    path: &Path,
    settings: &mut Settings,
    key: &str,
    value: serde_json::Value,
) -> Result<()> {
    settings.set(key, value)?;
    save_settings(path, settings)?;
    info!("Updated setting '{}'", key);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp = tempdir().unwrap();
        let settings = load_settings(&temp.path().join(SETTINGS_FILENAME));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(SETTINGS_FILENAME);
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn test_non_object_root_uses_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(SETTINGS_FILENAME);
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn test_load_status() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(SETTINGS_FILENAME);
        assert_eq!(load_settings_with_status(&path).1, LoadStatus::Missing);

        std::fs::write(&path, r#"{ "font": "Poppins" }"#).unwrap();
        let (_, status) = load_settings_with_status(&path);
        assert_eq!(status, LoadStatus::Loaded);
        assert!(status.can_write_back());

        std::fs::write(&path, "{ not json").unwrap();
        let (_, status) = load_settings_with_status(&path);
        assert_eq!(status, LoadStatus::Invalid);
        assert!(!status.can_write_back());
    }

    #[test]
    fn test_bad_value_keeps_other_keys() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(SETTINGS_FILENAME);
        std::fs::write(
            &path,
            r#"{ "executable": "/opt/custom/arduino-cli", "fqbn": "arduino:avr:mega", "font_size": "big" }"#,
        )
        .unwrap();

        let (settings, status) = load_settings_with_status(&path);
        assert_eq!(status, LoadStatus::Invalid);
        assert_eq!(settings.executable, "/opt/custom/arduino-cli");
        assert_eq!(settings.fqbn, "arduino:avr:mega");
        assert_eq!(settings.font_size, Settings::default().font_size);
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(SETTINGS_FILENAME);
        std::fs::write(
            &path,
            r#"{ "font": "Poppins", "__init__": "boom", "fqbn": "arduino:avr:nano" }"#,
        )
        .unwrap();

        let settings = load_settings(&path);
        assert_eq!(settings.font, "Poppins");
        assert_eq!(settings.fqbn, "arduino:avr:nano");
        assert_eq!(settings.executable, "arduino-cli");
    }

    #[test]
    fn test_save_then_load() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join(SETTINGS_FILENAME);

        let settings = Settings {
            font_size: 20.0,
            command_timeout_secs: Some(300),
            project: Some(PathBuf::from("/home/me/Blink")),
            ..Settings::default()
        };
        save_settings(&path, &settings).unwrap();

        assert_eq!(load_settings(&path), settings);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_update_setting_persists() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(SETTINGS_FILENAME);
        let mut settings = Settings::default();

        update_setting(&path, &mut settings, "theme", json!("monokai")).unwrap();

        assert_eq!(settings.theme, "monokai");
        assert_eq!(load_settings(&path).theme, "monokai");
    }

    #[test]
    fn test_update_unknown_key_writes_nothing() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(SETTINGS_FILENAME);
        let mut settings = Settings::default();

        let err = update_setting(&path, &mut settings, "eval", json!("x")).unwrap_err();
        assert!(matches!(err, Error::UnknownSetting { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_default_path_file_name() {
        assert!(default_settings_path().ends_with(SETTINGS_FILENAME));
    }
}
