use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    error::{Error, Result},
    schema::CoworkConfig,
};

const CONFIG_FILE: &str = "cowork.toml";

/// The user-level config directory (`~/.config/cowork` on Linux).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "cowork").map(|d| d.config_dir().to_path_buf())
}

/// Load configuration from an explicit path.
pub fn load_from_path(path: &Path) -> Result<CoworkConfig> {
    let data = fs::read_to_string(path)?;
    let config = toml::from_str(&data)?;
    info!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Load configuration, searching `./cowork.toml` then the user config
/// directory. Falls back to defaults when no file exists.
pub fn discover_and_load(explicit: Option<&Path>) -> Result<CoworkConfig> {
    if let Some(path) = explicit {
        return load_from_path(path);
    }

    let local = PathBuf::from(CONFIG_FILE);
    if local.exists() {
        return load_from_path(&local);
    }

    if let Some(dir) = config_dir() {
        let user = dir.join(CONFIG_FILE);
        if user.exists() {
            return load_from_path(&user);
        }
    }

    debug!("no config file found, using defaults");
    Ok(CoworkConfig::default())
}

/// Write a starter config file with every default spelled out.
/// Refuses to overwrite an existing file.
pub fn save_starter_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(Error::AlreadyExists(path.to_path_buf()));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = toml::to_string_pretty(&CoworkConfig::default())?;
    fs::write(path, data)?;
    info!(path = %path.display(), "wrote starter config");
    Ok(())
}
