use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated home for one test: config, data and scratch all live in a temp dir,
/// so nothing touches the real user's files.
pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        for dir in ["home", "config", "data", "scratch"] {
            fs::create_dir_all(temp_dir.path().join(dir))?;
        }
        Ok(Self { temp_dir })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn fake_home(&self) -> PathBuf {
        self.path().join("home")
    }

    pub fn config_home(&self) -> PathBuf {
        self.path().join("config")
    }

    pub fn data_home(&self) -> PathBuf {
        self.path().join("data")
    }

    pub fn scratch_root(&self) -> PathBuf {
        self.path().join("scratch")
    }

    /// Private binary directory of the armory under test.
    pub fn bin_dir(&self) -> PathBuf {
        self.data_home().join("armory").join("bin")
    }

    pub fn opt_dir(&self) -> PathBuf {
        self.data_home().join("armory").join("opt")
    }

    pub fn write_config(&self, content: &str) -> Result<()> {
        let dir = self.config_home().join("armory");
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("config.toml"), content)?;
        Ok(())
    }
}
