//! Profile persistence
//!
//! Save/load/list/delete profiles as `<name>.json` files in a profile
//! directory.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::domain::{FuncGenError, FuncGenResult, Profile};

/// Name of the profile that can never be deleted
pub const DEFAULT_PROFILE: &str = "Default";

/// Ensure the profile directory exists and return it.
fn profile_dir(dir: &Path) -> FuncGenResult<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| {
        FuncGenError::Config(format!("Failed to create profile dir {}: {e}", dir.display()))
    })?;
    Ok(dir.to_path_buf())
}

/// Characters a profile name may contain. Dots and path separators are
/// excluded, so a name can only ever resolve to a file directly inside the
/// profile directory.
fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, ' ' | '-' | '_')
}

/// Validate `name` and return it trimmed.
fn checked_name(name: &str) -> FuncGenResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FuncGenError::Config("Profile name cannot be empty".into()));
    }
    match name.chars().find(|&c| !is_name_char(c)) {
        Some(bad) => Err(FuncGenError::Config(format!(
            "Profile name '{name}' may not contain {bad:?}"
        ))),
        None => Ok(name),
    }
}

fn profile_file(dir: &Path, name: &str) -> PathBuf {
    dir.join(name).with_extension("json")
}

pub fn save_profile(dir: &Path, profile: &Profile) -> FuncGenResult<PathBuf> {
    let name = checked_name(&profile.name)?;
    profile.device.validate()?;
    let path = profile_file(&profile_dir(dir)?, name);
    let json = serde_json::to_string_pretty(profile)
        .map_err(|e| FuncGenError::Config(format!("Serialization error: {e}")))?;
    std::fs::write(&path, json)
        .map_err(|e| FuncGenError::Config(format!("Failed to write profile: {e}")))?;
    log::info!("Saved profile '{name}' to {}", path.display());
    Ok(path)
}

/// Load a profile. A missing `Default` profile yields the built-in defaults.
pub fn load_profile(dir: &Path, name: &str) -> FuncGenResult<Profile> {
    let name = checked_name(name)?;
    let path = profile_file(dir, name);
    if name == DEFAULT_PROFILE && !path.exists() {
        return Ok(Profile::default());
    }
    let json = std::fs::read_to_string(&path)
        .map_err(|e| FuncGenError::Config(format!("Failed to read profile '{name}': {e}")))?;
    let profile: Profile = serde_json::from_str(&json)
        .map_err(|e| FuncGenError::Config(format!("Failed to parse profile '{name}': {e}")))?;
    profile.device.validate()?;
    Ok(profile)
}

/// Names of all saved profiles, sorted.
pub fn list_profiles(dir: &Path) -> FuncGenResult<Vec<String>> {
    let entries = std::fs::read_dir(profile_dir(dir)?)
        .map_err(|e| FuncGenError::Config(format!("Failed to read profile dir: {e}")))?;

    let mut names = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension() != Some(OsStr::new("json")) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(OsStr::to_str) {
            names.push(stem.to_owned());
        }
    }
    names.sort_unstable();
    Ok(names)
}

pub fn delete_profile(dir: &Path, name: &str) -> FuncGenResult<()> {
    let name = checked_name(name)?;
    if name == DEFAULT_PROFILE {
        return Err(FuncGenError::Config(
            "Cannot delete the Default profile".into(),
        ));
    }
    let path = profile_file(dir, name);
    if !path.exists() {
        return Err(FuncGenError::Config(format!("Profile '{name}' not found")));
    }
    std::fs::remove_file(&path)
        .map_err(|e| FuncGenError::Config(format!("Failed to delete profile '{name}': {e}")))?;
    log::info!("Deleted profile '{name}'");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OutputSettings, Waveform};

    #[test]
    fn checked_name_trims_and_accepts_plain_names() {
        for (raw, expected) in [
            ("Default", "Default"),
            ("  Bench 1kHz ", "Bench 1kHz"),
            ("ramp_slow-2", "ramp_slow-2"),
        ] {
            assert_eq!(checked_name(raw).unwrap(), expected);
        }
    }

    #[test]
    fn checked_name_refuses_anything_that_escapes_the_dir() {
        for raw in ["", "   ", "..", "../evil", "a/b", "a\\b", "x.json", "sweep;rm", "out>file"] {
            assert!(
                matches!(checked_name(raw), Err(FuncGenError::Config(_))),
                "'{raw}' should be refused"
            );
        }
    }

    #[test]
    fn profile_file_stays_in_dir() {
        let dir = Path::new("/tmp/profiles");
        assert_eq!(
            profile_file(dir, "bench"),
            PathBuf::from("/tmp/profiles/bench.json")
        );
    }

    #[test]
    fn save_then_load_profile() {
        let dir = tempfile::tempdir().unwrap();
        let profile = Profile {
            name: "bench".into(),
            serial_port: Some("/dev/ttyUSB1".into()),
            output: OutputSettings {
                waveform: Some(Waveform::Pwm),
                frequency_hz: Some(1000.0),
                duty_cycle: Some(64),
                ..OutputSettings::default()
            },
            ..Profile::default()
        };
        save_profile(dir.path(), &profile).unwrap();
        assert_eq!(load_profile(dir.path(), "bench").unwrap(), profile);
    }

    #[test]
    fn list_profiles_sorted_json_only() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["zeta", "alpha"] {
            let profile = Profile {
                name: name.into(),
                ..Profile::default()
            };
            save_profile(dir.path(), &profile).unwrap();
        }
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        assert_eq!(list_profiles(dir.path()).unwrap(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn missing_default_profile_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            load_profile(dir.path(), DEFAULT_PROFILE).unwrap(),
            Profile::default()
        );
    }

    #[test]
    fn missing_named_profile_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_profile(dir.path(), "nope"),
            Err(FuncGenError::Config(_))
        ));
    }

    #[test]
    fn delete_profile_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let profile = Profile {
            name: "temp".into(),
            ..Profile::default()
        };
        let path = save_profile(dir.path(), &profile).unwrap();
        delete_profile(dir.path(), "temp").unwrap();
        assert!(!path.exists());
        assert!(delete_profile(dir.path(), "temp").is_err());
    }

    #[test]
    fn default_profile_cannot_be_deleted() {
        let dir = tempfile::tempdir().unwrap();
        save_profile(dir.path(), &Profile::default()).unwrap();
        assert!(delete_profile(dir.path(), DEFAULT_PROFILE).is_err());
    }
}
