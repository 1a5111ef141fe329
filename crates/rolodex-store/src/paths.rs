use crate::error::{Result, StoreError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "rolodex";
const STORE_FILENAME: &str = "records.json";
const STORE_EXTENSION: &str = "json";

pub fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os("XDG_DATA_HOME") {
        let path = PathBuf::from(dir);
        if path.as_os_str().is_empty() {
            return Err(StoreError::InvalidDataPath(path));
        }
        return Ok(path.join(APP_DIR));
    }

    let home = dirs::home_dir().ok_or(StoreError::MissingHomeDir)?;
    Ok(home.join(".local").join("share").join(APP_DIR))
}

pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
            restrict_dir_permissions(parent)?;
        }
    }
    Ok(())
}

/// Store file for a named partition (one store per city).
pub fn store_path_in(dir: &Path, name: &str) -> Result<PathBuf> {
    let slug: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|ch| {
            if ch.is_whitespace() || matches!(ch, '/' | '\\') {
                '-'
            } else {
                ch
            }
        })
        .collect();
    if slug.is_empty() || slug.chars().all(|ch| ch == '.' || ch == '-') {
        return Err(StoreError::InvalidStoreName(name.to_string()));
    }
    Ok(dir.join(format!("{slug}.{STORE_EXTENSION}")))
}

pub fn default_store_path_in(dir: &Path) -> PathBuf {
    dir.join(STORE_FILENAME)
}

/// Picks the store file: an explicit path wins, then a named store under the
/// data directory, then the default store file.
pub fn resolve_store_path(
    custom: Option<PathBuf>,
    data_dir_override: Option<&Path>,
    name: Option<&str>,
) -> Result<PathBuf> {
    if let Some(path) = custom {
        if path.as_os_str().is_empty() {
            return Err(StoreError::InvalidDataPath(path));
        }
        return Ok(path);
    }

    let dir = match data_dir_override {
        Some(dir) => dir.to_path_buf(),
        None => data_dir()?,
    };
    match name {
        Some(name) => store_path_in(&dir, name),
        None => Ok(default_store_path_in(&dir)),
    }
}

#[cfg(unix)]
fn restrict_dir_permissions(dir: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let perms = fs::Permissions::from_mode(0o700);
    fs::set_permissions(dir, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_dir_permissions(_dir: &Path) -> Result<()> {
    Ok(())
}
