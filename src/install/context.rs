use anyhow::{Context, Result};
use lazy_static::lazy_static;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

use crate::common::config::ArmoryConfig;
use crate::common::paths::InstallPaths;
use crate::host::SystemCapabilities;
use crate::ui::prelude::*;
use crate::ui::is_debug_enabled;

/// Exit status used when the run is interrupted with Ctrl-C.
pub const EXIT_INTERRUPTED: i32 = 130;

lazy_static! {
    /// Scratch directory of the live run, removed by the interrupt handler.
    static ref ACTIVE_SCRATCH: Mutex<Option<PathBuf>> = Mutex::new(None);
}

/// Install the Ctrl-C handler that removes the scratch directory before exiting.
pub fn install_interrupt_handler() {
    let _ = ctrlc::set_handler(|| {
        if let Ok(active) = ACTIVE_SCRATCH.lock()
            && let Some(path) = active.as_ref()
        {
            let _ = fs::remove_dir_all(path);
        }
        std::process::exit(EXIT_INTERRUPTED);
    });
}

/// Per-run scratch space. Removed on drop.
#[derive(Debug)]
pub struct Scratch {
    dir: TempDir,
    next: u32,
}

impl Scratch {
    pub fn create(root: &Path) -> Result<Self> {
        fs::create_dir_all(root)
            .with_context(|| format!("creating scratch root {}", root.display()))?;
        let dir = tempfile::Builder::new()
            .prefix("armory-")
            .tempdir_in(root)
            .with_context(|| format!("creating scratch directory in {}", root.display()))?;

        if let Ok(mut active) = ACTIVE_SCRATCH.lock() {
            *active = Some(dir.path().to_path_buf());
        }

        Ok(Self { dir, next: 0 })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// A fresh, empty subdirectory for one attempt.
    pub fn subdir(&mut self, label: &str) -> Result<PathBuf> {
        self.next += 1;
        let path = self.dir.path().join(format!("{:03}-{}", self.next, label));
        fs::create_dir_all(&path)
            .with_context(|| format!("creating {}", path.display()))?;
        Ok(path)
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        if let Ok(mut active) = ACTIVE_SCRATCH.lock()
            && active.as_deref() == Some(self.dir.path())
        {
            *active = None;
        }
    }
}

/// Write-once gate for the package metadata refresh.
#[derive(Debug, Default)]
pub struct RefreshGate {
    done: bool,
}

impl RefreshGate {
    /// True exactly once per gate: the caller owns the refresh.
    pub fn claim(&mut self) -> bool {
        !std::mem::replace(&mut self.done, true)
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

/// Everything an install run threads through the executors.
pub struct RunContext {
    pub caps: SystemCapabilities,
    pub paths: InstallPaths,
    pub config: ArmoryConfig,
    pub scratch: Scratch,
    pub refresh: RefreshGate,
    pub http: reqwest::blocking::Client,
}

impl RunContext {
    /// Inspect the host and prepare private directories and scratch space.
    pub fn new(config: ArmoryConfig) -> Result<Self> {
        let caps = SystemCapabilities::detect();
        let paths = InstallPaths::discover()?;
        Self::with_parts(caps, paths, config)
    }

    pub fn with_parts(
        caps: SystemCapabilities,
        paths: InstallPaths,
        config: ArmoryConfig,
    ) -> Result<Self> {
        paths.ensure()?;
        let scratch = Scratch::create(&config.scratch_root())?;
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("armory/{}", env!("CARGO_PKG_VERSION")))
            .timeout(config.http_timeout())
            .build()
            .context("Failed to create HTTP client")?;

        emit(
            Level::Debug,
            "install.context",
            &format!(
                "{} family={} manager={} arch={} scratch={}",
                char::from(NerdFont::Cpu),
                caps.family,
                caps.package_manager
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "none".to_string()),
                caps.arch,
                scratch.path().display()
            ),
            None,
        );

        Ok(Self {
            caps,
            paths,
            config,
            scratch,
            refresh: RefreshGate::default(),
            http,
        })
    }

    /// Per-attempt failure reasons are kept and shown for exhausted tools.
    pub fn diagnostics(&self) -> bool {
        self.config.diagnostics || is_debug_enabled()
    }
}
