//! Settings parser for ~/.config/mediatree/config.toml

use std::path::{Path, PathBuf};

use serde::Deserialize;

use mediatree_core::prelude::*;
use mediatree_core::DEFAULT_MAX_CHILDREN;

const CONFIG_FILENAME: &str = "config.toml";
const CONFIG_DIR: &str = "mediatree";

/// Default auto-expansion depth below the discovered roots
pub const DEFAULT_DEPTH: u32 = 1;
/// Default idle window before giving up on unanswered requests.
/// Failed expansions are silent, so this is the only way to finish.
pub const DEFAULT_WAIT_MS: u64 = 3000;

/// User settings, all optional in the file; CLI flags override these.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Children fetched per listing call (first page only)
    pub max_children: u32,
    /// How many container levels below the roots to expand
    pub depth: u32,
    /// Idle window in milliseconds before the browser gives up waiting
    pub wait_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_children: DEFAULT_MAX_CHILDREN,
            depth: DEFAULT_DEPTH,
            wait_ms: DEFAULT_WAIT_MS,
        }
    }
}

/// Load settings from the user config directory.
///
/// A missing file is not an error; defaults apply. A present but
/// unparsable file is an error (silently ignoring a typo'd config is
/// worse than failing).
pub fn load_settings() -> Result<Settings> {
    match config_file_path() {
        Some(path) if path.exists() => load_settings_from(&path),
        _ => Ok(Settings::default()),
    }
}

/// Load settings from a specific file path
pub fn load_settings_from(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::config(format!("{}: {e}", path.display())))
}

fn config_file_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join(CONFIG_DIR).join(CONFIG_FILENAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.max_children, 50);
        assert_eq!(settings.depth, DEFAULT_DEPTH);
        assert_eq!(settings.wait_ms, DEFAULT_WAIT_MS);
    }

    #[test]
    fn test_load_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_children = 25\ndepth = 3\nwait_ms = 500").unwrap();

        let settings = load_settings_from(file.path()).unwrap();
        assert_eq!(
            settings,
            Settings {
                max_children: 25,
                depth: 3,
                wait_ms: 500,
            }
        );
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "depth = 2").unwrap();

        let settings = load_settings_from(file.path()).unwrap();
        assert_eq!(settings.depth, 2);
        assert_eq!(settings.max_children, 50);
        assert_eq!(settings.wait_ms, DEFAULT_WAIT_MS);
    }

    #[test]
    fn test_load_invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "depth = \"deep\"").unwrap();

        let err = load_settings_from(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            load_settings_from(&missing).unwrap_err(),
            Error::Io(_)
        ));
    }
}
