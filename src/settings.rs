//! Feed client settings, optionally loaded from a TOML file.
//!
//! A missing file yields `FeedSettings::default()`; unknown keys are ignored.
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML in settings file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Tunables for page resolution and item fetching.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified;
/// missing keys fall back to the defaults below.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeedSettings {
    /// Items per page; also sent to the backend so resolved boundaries match.
    pub page_size: u32,

    /// How many pages a single resolution request expands past its target.
    pub resolve_batch: u32,

    /// Deadline for each backend request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            page_size: 20,
            resolve_batch: 12,
            request_timeout_secs: 30,
        }
    }
}

impl FeedSettings {
    /// Load settings from a TOML file.
    ///
    /// - Missing file → `Ok(FeedSettings::default())`
    /// - Empty file → `Ok(FeedSettings::default())`
    /// - Invalid TOML → `Err(SettingsError::Parse)` with line info
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No settings file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(SettingsError::Io(e)),
        };

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let settings: FeedSettings = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            page_size = settings.page_size,
            resolve_batch = settings.resolve_batch,
            "Loaded feed settings"
        );
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let settings = FeedSettings::default();
        assert_eq!(settings.page_size, 20);
        assert_eq!(settings.resolve_batch, 12);
        assert_eq!(settings.request_timeout_secs, 30);
    }

    #[test]
    fn test_missing_file_returns_defaults() {
        let path = Path::new("/tmp/blazefeed_test_nonexistent_settings.toml");
        let settings = FeedSettings::load(path).unwrap();
        assert_eq!(settings, FeedSettings::default());
    }

    #[test]
    fn test_partial_file_uses_defaults_for_missing() {
        let dir = std::env::temp_dir().join("blazefeed_settings_test_partial");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        std::fs::write(&path, "page_size = 40\n").unwrap();

        let settings = FeedSettings::load(&path).unwrap();
        assert_eq!(settings.page_size, 40);
        assert_eq!(settings.resolve_batch, 12); // default

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let dir = std::env::temp_dir().join("blazefeed_settings_test_invalid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        std::fs::write(&path, "this is not [valid toml").unwrap();

        let result = FeedSettings::load(&path);
        assert!(matches!(result, Err(SettingsError::Parse(_))));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_empty_file_returns_defaults() {
        let dir = std::env::temp_dir().join("blazefeed_settings_test_empty");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        std::fs::write(&path, "  \n").unwrap();

        let settings = FeedSettings::load(&path).unwrap();
        assert_eq!(settings, FeedSettings::default());

        std::fs::remove_dir_all(&dir).ok();
    }
}
