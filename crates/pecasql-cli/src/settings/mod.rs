use std::path::{Path, PathBuf};

use pecasql_core::LoadOptions;
use serde::Deserialize;
use thiserror::Error;

/// Settings file looked up in the working directory when `--config` is absent.
pub const DEFAULT_SETTINGS_FILE: &str = "pecasql.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("toml decode error in {}: {source}", .path.display())]
    TomlDecode {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid delimiter {0:?}: expected a single ASCII character")]
    Delimiter(String),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Optional defaults read from `pecasql.toml`. Command-line flags win.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub delimiter: Option<String>,
    pub trim: Option<bool>,
    pub output: Option<PathBuf>,
    pub preview_chars: Option<usize>,
}

impl Settings {
    pub fn load(explicit: Option<&Path>) -> SettingsResult<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(DEFAULT_SETTINGS_FILE);
                if path.exists() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| SettingsError::TomlDecode {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Merge flag values over the file values into loader options.
    pub fn load_options(&self, delimiter: Option<&str>, trim: bool) -> SettingsResult<LoadOptions> {
        let defaults = LoadOptions::default();
        let delimiter = match delimiter.or(self.delimiter.as_deref()) {
            Some(value) => parse_delimiter(value)?,
            None => defaults.delimiter,
        };
        Ok(LoadOptions {
            delimiter,
            trim: trim || self.trim.unwrap_or(defaults.trim),
        })
    }
}

pub fn parse_delimiter(value: &str) -> SettingsResult<u8> {
    let value_for_error = || SettingsError::Delimiter(value.to_string());
    match value {
        "\\t" | "tab" => Ok(b'\t'),
        _ => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Ok(c as u8),
                _ => Err(value_for_error()),
            }
        }
    }
}
