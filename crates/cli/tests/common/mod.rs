//! Common utilities for integration tests

pub mod cli;

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

pub use cli::{CommandResult, MirrorCommand};

/// Temporary watched/mirror folder pair with a fast-settling config file
pub struct MirrorFixture {
    _temp_dir: TempDir,
    pub root: PathBuf,
    pub source: PathBuf,
    pub mirror: PathBuf,
    pub config_home: PathBuf,
    pub config_file: PathBuf,
}

impl MirrorFixture {
    pub fn new() -> Self {
        Self::with_mirror_at(|root| root.join("mirror"))
    }

    pub fn with_mirror_at(mirror: impl FnOnce(&Path) -> PathBuf) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = fs::canonicalize(temp_dir.path()).unwrap();
        let source = root.join("source");
        let mirror = mirror(&root);
        let config_home = root.join("config");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&config_home).unwrap();

        let config_file = config_home.join("test.toml");
        let config = format!(
            "source = {:?}\ndestination = {:?}\n\n[stability]\nrounds = 3\nretry_delay_ms = 20\nsettle_ms = 30\n",
            source.display().to_string(),
            mirror.display().to_string(),
        );
        fs::write(&config_file, config).unwrap();

        Self {
            _temp_dir: temp_dir,
            root,
            source,
            mirror,
            config_home,
            config_file,
        }
    }

    /// `drivemirror <subcommand> --config <fixture config>`
    pub fn command(&self, subcommand: &str) -> MirrorCommand {
        let mut cmd = MirrorCommand::new(&self.config_home);
        cmd.args(&[subcommand, "--config"]).arg_path(&self.config_file);
        cmd
    }

    pub fn write(&self, relative: &str, contents: &[u8]) {
        let path = self.source.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }
}

/// Poll until `condition` holds or ten seconds pass
pub fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < Duration::from_secs(10) {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(50));
    }
    false
}
