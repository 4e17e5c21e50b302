use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use glimpse_config::Config;
use serde::{Deserialize, Serialize};

/// Represents a user profile
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

/// Read a profile file
pub fn load_profile(path: &Path) -> anyhow::Result<Profile> {
    let file =
        File::open(path).with_context(|| format!("failed to open profile {}", path.display()))?;
    let reader = BufReader::new(file);
    let profile = serde_json::from_reader(reader)
        .with_context(|| format!("invalid profile {}", path.display()))?;
    Ok(profile)
}

/// Profile (or defaults when none is given), then environment overrides.
/// Also returns the profile's name; runs before logging is up, so the caller
/// reports it.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<(Config, Option<String>)> {
    let Some(path) = path else {
        return Ok((Config::new(), None));
    };

    let profile = load_profile(path)?;
    let mut config = profile.value;
    config.apply_env();
    Ok((config, Some(profile.name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("glimpse-profile-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_profile() {
        let path = write_temp(
            r#"{ "name": "scans", "value": { "ocr": { "page_seg_mode": 6 }, "ui": { "preview_width": 1024 } } }"#,
        );

        let profile = load_profile(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(profile.name, "scans");
        assert_eq!(profile.value.ocr.page_seg_mode, Some(6));
        assert_eq!(profile.value.ui.preview_width, 1024.0);
        assert_eq!(profile.value.ui.preview_height, 600.0);
    }

    #[test]
    fn test_broken_profile_names_the_file() {
        let path = write_temp("{ not json");

        let err = load_profile(&path).err().unwrap();
        std::fs::remove_file(&path).ok();

        assert!(err.to_string().contains("invalid profile"), "{err}");
    }

    #[test]
    fn test_load_config_returns_profile_name() {
        let path = write_temp(r#"{ "name": "receipts", "value": { "ocr": { "language": "deu" } } }"#);

        let (config, name) = load_config(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(name.as_deref(), Some("receipts"));
        assert_eq!(config.selection.limits.min_display, 4.0);
    }

    #[test]
    fn test_missing_profile_is_an_error() {
        assert!(load_config(Some(Path::new("/nonexistent/glimpse/profile.json"))).is_err());
    }
}
