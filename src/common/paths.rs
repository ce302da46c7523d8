use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Centralized path management for armory.

/// Get the armory config directory (`~/.config/armory`)
pub fn armory_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Unable to determine user config directory")?
        .join("armory");
    Ok(config_dir)
}

/// Get the armory data directory (`~/.local/share/armory`)
pub fn armory_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("share")))
        .context("Unable to determine user data directory")?
        .join("armory");
    Ok(data_dir)
}

/// User-scoped install locations plus the search path used for presence checks.
#[derive(Debug, Clone)]
pub struct InstallPaths {
    /// Root of everything armory writes (`cargo install --root` target).
    pub data_dir: PathBuf,
    /// Private binary directory, always searched first.
    pub bin_dir: PathBuf,
    /// Private opt directory holding interpreted-language checkouts.
    pub opt_dir: PathBuf,
    search_path: OsString,
}

impl InstallPaths {
    /// Resolve the default locations for the invoking user.
    pub fn discover() -> Result<Self> {
        let data_dir = armory_data_dir()?;
        let home = dirs::home_dir().context("Unable to determine home directory")?;
        let system_path = std::env::var_os("PATH").unwrap_or_default();
        Self::with_root(data_dir, &home, &system_path)
    }

    /// Build paths under an explicit data root. The search path is the private
    /// bin dir, then the user-scoped ecosystem bin dirs, then `system_path`.
    pub fn with_root(data_dir: PathBuf, home: &Path, system_path: &OsString) -> Result<Self> {
        let bin_dir = data_dir.join("bin");
        let opt_dir = data_dir.join("opt");

        let mut dirs = vec![
            bin_dir.clone(),
            home.join(".local").join("bin"),
            home.join(".cargo").join("bin"),
            home.join("go").join("bin"),
        ];
        dirs.extend(std::env::split_paths(system_path));
        dirs.push(PathBuf::from("/snap/bin"));

        let search_path = std::env::join_paths(dirs).context("Building binary search path")?;

        Ok(Self {
            data_dir,
            bin_dir,
            opt_dir,
            search_path,
        })
    }

    /// Create the private bin and opt directories if missing.
    pub fn ensure(&self) -> Result<()> {
        for dir in [&self.bin_dir, &self.opt_dir] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating directory at {}", dir.display()))?;
        }
        Ok(())
    }

    pub fn search_path(&self) -> &OsString {
        &self.search_path
    }

    /// Presence check: resolve `binary` against the search path.
    pub fn locate(&self, binary: &str) -> Option<PathBuf> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        which::which_in(binary, Some(&self.search_path), cwd).ok()
    }
}
