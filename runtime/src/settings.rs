//! Loader settings: defaults, JSON loading, sanitisation.

use crate::error::{LoaderError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_COLOR: &str = "#59a2ff";
pub const DEFAULT_INITIAL_POSITION: f64 = 0.08;
pub const DEFAULT_HEIGHT_PX: f64 = 4.0;
pub const DEFAULT_EASING: &str = "ease";
pub const DEFAULT_SPEED_MS: u64 = 200;
pub const DEFAULT_Z_INDEX: i64 = 2_147_483_647;

/// Direction the bar travels in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

/// Bar thickness: a pixel count or any CSS length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Height {
    Px(f64),
    Css(String),
}

impl Default for Height {
    fn default() -> Self {
        Height::Px(DEFAULT_HEIGHT_PX)
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Height::Px(px) => write!(f, "{px}px"),
            Height::Css(css) => f.write_str(css),
        }
    }
}

/// Appearance and behaviour of one loader.
///
/// JSON keys are camelCase (`initialPosition`, `showSpinner`, ...); any key
/// left out keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Bar fill, any CSS color or gradient.
    pub color: String,
    /// Fraction of the width the bar starts at.
    pub initial_position: f64,
    pub height: Height,
    /// CSS easing of position transitions.
    pub easing: String,
    /// Transition duration in milliseconds; also the trickle period.
    pub speed: u64,
    pub z_index: i64,
    pub box_shadow: Option<String>,
    pub show_spinner: bool,
    pub dir: Direction,
    /// Treat links that only change the query string as same-page.
    pub ignore_search_params: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR.to_string(),
            initial_position: DEFAULT_INITIAL_POSITION,
            height: Height::default(),
            easing: DEFAULT_EASING.to_string(),
            speed: DEFAULT_SPEED_MS,
            z_index: DEFAULT_Z_INDEX,
            box_shadow: None,
            show_spinner: false,
            dir: Direction::Ltr,
            ignore_search_params: false,
        }
    }
}

impl Settings {
    /// Parse settings from JSON, merging over the defaults.
    pub fn from_json(json: &str, origin: &Path) -> Result<Self> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|source| LoaderError::ConfigParse {
                path: origin.to_path_buf(),
                source,
            })?;
        Ok(settings.sanitized())
    }

    /// Read settings from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| LoaderError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json, path)
    }

    /// `~/.toploader/settings.json`.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".toploader")
            .join("settings.json")
    }

    /// Load from `path` when given, else from the default path when that
    /// file exists, else the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Replace out-of-range values so construction never fails.
    pub fn sanitized(mut self) -> Self {
        if !self.initial_position.is_finite() {
            warn!(
                "initial position {} is not a number, using {DEFAULT_INITIAL_POSITION}",
                self.initial_position
            );
            self.initial_position = DEFAULT_INITIAL_POSITION;
        } else if !(0.0..=1.0).contains(&self.initial_position) {
            let clamped = self.initial_position.clamp(0.0, 1.0);
            warn!(
                "initial position {} outside 0..=1, clamped to {clamped}",
                self.initial_position
            );
            self.initial_position = clamped;
        }
        if let Height::Px(px) = self.height {
            if !px.is_finite() || px < 0.0 {
                warn!("bar height {px} is invalid, using {DEFAULT_HEIGHT_PX}px");
                self.height = Height::default();
            }
        }
        if self.easing.trim().is_empty() {
            self.easing = DEFAULT_EASING.to_string();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.color, "#59a2ff");
        assert_eq!(s.initial_position, 0.08);
        assert_eq!(s.height.to_string(), "4px");
        assert_eq!(s.easing, "ease");
        assert_eq!(s.speed, 200);
        assert_eq!(s.z_index, 2147483647);
        assert!(s.box_shadow.is_none());
        assert!(!s.show_spinner);
        assert_eq!(s.dir, Direction::Ltr);
        assert!(!s.ignore_search_params);
    }

    #[test]
    fn test_partial_json_merges_over_defaults() {
        let s = Settings::from_json(
            r#"{"color": "red", "height": "0.25rem", "dir": "rtl", "ignoreSearchParams": true}"#,
            Path::new("inline"),
        )
        .unwrap();
        assert_eq!(s.color, "red");
        assert_eq!(s.height, Height::Css("0.25rem".into()));
        assert_eq!(s.dir, Direction::Rtl);
        assert!(s.ignore_search_params);
        assert_eq!(s.speed, 200);
    }

    #[test]
    fn test_numeric_height_is_pixels() {
        let s = Settings::from_json(r#"{"height": 2.5}"#, Path::new("inline")).unwrap();
        assert_eq!(s.height.to_string(), "2.5px");
    }

    #[test]
    fn test_sanitize_clamps_initial_position() {
        let s = Settings {
            initial_position: 1.7,
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(s.initial_position, 1.0);

        let s = Settings {
            initial_position: f64::NAN,
            height: Height::Px(-3.0),
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(s.initial_position, DEFAULT_INITIAL_POSITION);
        assert_eq!(s.height, Height::default());
    }

    #[test]
    fn test_from_file_and_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"speed": 350, "showSpinner": true}}"#).unwrap();
        let s = Settings::load(Some(file.path())).unwrap();
        assert_eq!(s.speed, 350);
        assert!(s.show_spinner);

        let missing = Settings::from_file(Path::new("/nonexistent/toploader.json"));
        assert!(matches!(missing, Err(LoaderError::ConfigRead { .. })));

        let bad = Settings::from_json("{not json", Path::new("inline"));
        assert!(matches!(bad, Err(LoaderError::ConfigParse { .. })));
    }
}
