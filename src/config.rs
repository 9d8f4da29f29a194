//! Configuration directory and theme preference.
//!
//! Task state is session-local and never written anywhere; the one
//! persisted preference is the UI theme, stored as a single line in
//! `~/.oasis/theme`.

use std::fs;
use std::path::{Path, PathBuf};

/// UI colour scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeName {
    Light,
    Dark,
}

impl ThemeName {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeName::Light => "light",
            ThemeName::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<ThemeName> {
        match s.trim() {
            "light" => Some(ThemeName::Light),
            "dark" => Some(ThemeName::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> ThemeName {
        match self {
            ThemeName::Light => ThemeName::Dark,
            ThemeName::Dark => ThemeName::Light,
        }
    }
}

/// Resolve (and create if missing) the oasis configuration directory.
pub fn oasis_dir() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    let dir = PathBuf::from(home).join(".oasis");
    fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

fn theme_file(dir: &Path) -> PathBuf {
    dir.join("theme")
}

/// Load the persisted theme preference, defaulting to light.
pub fn load_theme(dir: &Path) -> ThemeName {
    fs::read_to_string(theme_file(dir))
        .ok()
        .and_then(|s| ThemeName::parse(&s))
        .unwrap_or(ThemeName::Light)
}

/// Persist the theme preference. Failure to write is not fatal; the
/// preference simply does not survive the session.
pub fn save_theme(dir: &Path, theme: ThemeName) {
    let tmp = dir.join("theme.tmp");
    let write = fs::write(&tmp, theme.as_str()).and_then(|_| fs::rename(&tmp, theme_file(dir)));
    if let Err(e) = write {
        eprintln!("Could not save theme preference: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_round_trips_through_parse() {
        for theme in [ThemeName::Light, ThemeName::Dark] {
            assert_eq!(ThemeName::parse(theme.as_str()), Some(theme));
        }
        assert_eq!(ThemeName::parse("solarized"), None);
        assert_eq!(ThemeName::parse(" dark\n"), Some(ThemeName::Dark));
    }

    #[test]
    fn toggle_flips_between_light_and_dark() {
        assert_eq!(ThemeName::Light.toggled(), ThemeName::Dark);
        assert_eq!(ThemeName::Dark.toggled().toggled(), ThemeName::Dark);
    }

    #[test]
    fn missing_preference_defaults_to_light() {
        let dir = std::env::temp_dir().join("oasis-test-no-theme");
        let _ = fs::create_dir_all(&dir);
        let _ = fs::remove_file(dir.join("theme"));
        assert_eq!(load_theme(&dir), ThemeName::Light);
    }

    #[test]
    fn saved_preference_is_loaded_back() {
        let dir = std::env::temp_dir().join("oasis-test-theme");
        let _ = fs::create_dir_all(&dir);
        save_theme(&dir, ThemeName::Dark);
        assert_eq!(load_theme(&dir), ThemeName::Dark);
        let _ = fs::remove_file(dir.join("theme"));
    }
}
