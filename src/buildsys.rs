//! Per-project build targets and reload-on-change watching
//!
//! Projects may carry a `build.yml` declaring shell-step build targets and a
//! hot-reload section. The watcher is a fixed-interval mtime scan with a
//! debounce window, matching the rest of the tool's polling character.

use crate::error::{Error, Result};
use crate::utils;
use colored::Colorize;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};
use tracing::{debug, info};
use walkdir::WalkDir;

const SKIP_PATTERNS: &[&str] = &[
    ".git",
    "node_modules",
    "__pycache__",
    ".pytest_cache",
    ".vscode",
    ".idea",
    "dist",
    "build",
    ".next",
    "target",
];

const SCAN_INTERVAL: Duration = Duration::from_secs(1);

fn default_debounce() -> u64 {
    2
}

fn default_extensions() -> Vec<String> {
    [".py", ".js", ".ts", ".vue", ".php", ".html", ".css", ".scss"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Hot-reload section of `build.yml`
#[derive(Debug, Clone, Deserialize)]
pub struct HotReloadConfig {
    /// Whether watching is enabled
    #[serde(default)]
    pub enabled: bool,
    /// Seconds to wait before reacting to another change
    #[serde(default = "default_debounce")]
    pub debounce: u64,
    /// File extensions (with leading dot) that trigger a reload
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Shell command run on change
    #[serde(default)]
    pub command: Option<String>,
}

impl Default for HotReloadConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            debounce: default_debounce(),
            extensions: default_extensions(),
            command: None,
        }
    }
}

/// Parsed `build.yml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildConfig {
    /// Target name to ordered shell steps
    #[serde(default)]
    pub build: BTreeMap<String, Vec<String>>,
    /// Hot-reload settings
    #[serde(default)]
    pub hot_reload: HotReloadConfig,
}

/// Build runner for a single project directory
#[derive(Debug)]
pub struct BuildSystem {
    project_path: PathBuf,
    config: BuildConfig,
}

impl BuildSystem {
    /// Load `build.yml` from the project, defaulting to an empty config
    pub fn load(project_path: impl Into<PathBuf>) -> Result<Self> {
        let project_path = project_path.into();
        let config_file = project_path.join("build.yml");

        let config = if config_file.exists() {
            let content = std::fs::read_to_string(&config_file)?;
            serde_yaml::from_str(&content)
                .map_err(|e| Error::config(format!("Invalid build.yml: {}", e)))?
        } else {
            BuildConfig::default()
        };

        Ok(Self { project_path, config })
    }

    /// Parsed configuration
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Run the ordered steps of a build target, stopping on first failure
    pub fn run(&self, target: &str) -> Result<()> {
        let steps = self.config.build.get(target).cloned().unwrap_or_default();

        if steps.is_empty() {
            println!(
                "{}",
                format!("No build steps defined for target: {}", target).yellow()
            );
            return Ok(());
        }

        println!("{}", format!("Building {}...", target).cyan());
        for step in &steps {
            println!("{}", format!("Running: {}", step).blue());
            utils::run_shell(&self.project_path, step)?;
        }

        println!("{}", "Build completed successfully".green());
        Ok(())
    }

    /// Watch the project tree and run the reload command on change
    ///
    /// Fixed 1-second mtime scans with the configured debounce window; runs
    /// until the process is interrupted.
    pub fn watch(&self) -> Result<()> {
        println!(
            "{}",
            format!(
                "Starting hot reload for {}",
                self.project_path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default()
            )
            .cyan()
        );

        let debounce = Duration::from_secs(self.config.hot_reload.debounce);
        let mut snapshot = self.scan_mtimes();
        let mut last_reload = Instant::now().checked_sub(debounce).unwrap_or_else(Instant::now);

        loop {
            std::thread::sleep(SCAN_INTERVAL);

            let current = self.scan_mtimes();
            let changed = current.iter().find(|(path, mtime)| {
                snapshot.get(*path).map(|old| old != *mtime).unwrap_or(true)
            });

            if let Some((path, _)) = changed {
                if last_reload.elapsed() >= debounce {
                    println!(
                        "{}",
                        format!(
                            "File changed: {}",
                            path.file_name()
                                .map(|n| n.to_string_lossy().to_string())
                                .unwrap_or_default()
                        )
                        .yellow()
                    );
                    self.trigger_reload();
                    last_reload = Instant::now();
                } else {
                    debug!(path = %path.display(), "change within debounce window");
                }
            }

            snapshot = current;
        }
    }

    fn scan_mtimes(&self) -> BTreeMap<PathBuf, SystemTime> {
        let mut mtimes = BTreeMap::new();

        for entry in WalkDir::new(&self.project_path)
            .into_iter()
            .filter_entry(|e| !is_skipped(e.path()))
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            if !self.should_reload(entry.path()) {
                continue;
            }
            if let Ok(metadata) = entry.metadata() {
                if let Ok(mtime) = metadata.modified() {
                    mtimes.insert(entry.path().to_path_buf(), mtime);
                }
            }
        }

        mtimes
    }

    fn should_reload(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let dotted = format!(".{}", ext);
        self.config.hot_reload.extensions.iter().any(|e| e == &dotted)
    }

    fn trigger_reload(&self) {
        let Some(command) = &self.config.hot_reload.command else {
            return;
        };

        info!(command = %command, "running reload command");
        match utils::run_shell(&self.project_path, command) {
            Ok(()) => println!("{}", "Application reloaded".green()),
            Err(e) => println!("{}", format!("Reload failed: {}", e).red()),
        }
    }
}

fn is_skipped(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| SKIP_PATTERNS.contains(&name))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn build_yml_parses_targets_and_hot_reload() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("build.yml"),
            "build:
  dev:
    - npm install
    - npm run dev
  prod:
    - npm run build
hot_reload:
  enabled: true
  debounce: 5
  command: docker compose restart dev
",
        )
        .unwrap();

        let system = BuildSystem::load(dir.path()).unwrap();
        assert_eq!(system.config.build["dev"].len(), 2);
        assert_eq!(system.config.build["prod"], vec!["npm run build".to_string()]);
        assert!(system.config.hot_reload.enabled);
        assert_eq!(system.config.hot_reload.debounce, 5);
    }

    #[test]
    fn missing_build_yml_yields_empty_config() {
        let dir = TempDir::new().unwrap();
        let system = BuildSystem::load(dir.path()).unwrap();
        assert!(system.config.build.is_empty());
        assert!(!system.config.hot_reload.enabled);
        // Running an undefined target is not an error.
        assert!(system.run("dev").is_ok());
    }

    #[test]
    fn reload_filter_honours_extensions_and_skip_list() {
        let dir = TempDir::new().unwrap();
        let system = BuildSystem::load(dir.path()).unwrap();

        assert!(system.should_reload(Path::new("src/app.py")));
        assert!(system.should_reload(Path::new("web/index.php")));
        assert!(!system.should_reload(Path::new("README.rst")));
        assert!(!system.should_reload(Path::new("Makefile")));
        assert!(is_skipped(Path::new("node_modules")));
        assert!(is_skipped(Path::new(".git")));
        assert!(!is_skipped(Path::new("src")));
    }
}
