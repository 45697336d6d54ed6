//! Experiment folder layout
//!
//! ```text
//! root/
//!   <codec>/
//!     <bitrate>/
//!       <bitrate><resolution><fps>/
//!         <run>/logcat.txt
//! ```

mod run_matcher;

pub use run_matcher::RunPattern;

use crate::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Log file captured in every run folder
pub const LOG_FILE_NAME: &str = "logcat.txt";

/// Entries the OS drops into folders that are never runs
pub const RESERVED_NAMES: &[&str] = &[".DS_Store"];

/// One experimental configuration, minus the target bitrate it is swept over
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct Condition {
    pub codec: String,
    /// Resolution tag as it appears in folder names, e.g. `_small_`
    pub resolution: String,
    pub fps: u32,
}

impl Condition {
    pub fn new(codec: impl Into<String>, resolution: impl Into<String>, fps: u32) -> Self {
        Self {
            codec: codec.into(),
            resolution: resolution.into(),
            fps,
        }
    }

    /// Name of the folder holding this condition's runs at `bitrate`
    pub fn folder_name(&self, bitrate: u32) -> String {
        format!("{}{}{}", bitrate, self.resolution, self.fps)
    }

    pub fn folder(&self, root: &Path, bitrate: u32) -> PathBuf {
        root.join(&self.codec)
            .join(bitrate.to_string())
            .join(self.folder_name(bitrate))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}fps", self.codec, self.resolution, self.fps)
    }
}

/// A repeated run of one condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDirectory {
    pub name: String,
    pub path: PathBuf,
}

impl RunDirectory {
    pub fn log_file(&self) -> PathBuf {
        self.path.join(LOG_FILE_NAME)
    }
}

/// Lists the run folders of a condition folder
pub trait RunDirectorySource {
    /// Fails with [`Error::MissingDirectory`] when `path` does not exist
    fn list_run_directories(&self, path: &Path) -> Result<Vec<RunDirectory>>;
}

/// Run folders on the local filesystem, sorted by name
#[derive(Debug, Clone, Default)]
pub struct FsRunDirectories {
    pattern: Option<RunPattern>,
}

impl FsRunDirectories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only list runs whose folder name matches `pattern`
    pub fn with_pattern(mut self, pattern: RunPattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    fn is_run_name(&self, name: &str) -> bool {
        if RESERVED_NAMES.contains(&name) {
            return false;
        }
        // Anything with an extension is a file that happens to sit next to the runs
        if Path::new(name).extension().is_some() {
            return false;
        }
        match &self.pattern {
            None => true,
            Some(pattern) => pattern.matches(name),
        }
    }
}

impl RunDirectorySource for FsRunDirectories {
    fn list_run_directories(&self, path: &Path) -> Result<Vec<RunDirectory>> {
        tracing::debug!("Listing runs in: {}", path.display());

        if !path.is_dir() {
            return Err(Error::MissingDirectory(path.to_path_buf()));
        }

        let mut runs = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();

            if !self.is_run_name(&name) || !entry.path().is_dir() {
                tracing::debug!("Skipping {}", name);
                continue;
            }

            runs.push(RunDirectory {
                name,
                path: entry.path(),
            });
        }

        runs.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::debug!("Found {} runs in {}", runs.len(), path.display());

        Ok(runs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_condition_folder() {
        let condition = Condition::new("H264", "_small_", 15);
        assert_eq!(condition.folder_name(600), "600_small_15");
        assert_eq!(
            condition.folder(Path::new("/data"), 600),
            PathBuf::from("/data/H264/600/600_small_15")
        );
        assert_eq!(condition.to_string(), "H264 _small_ 15fps");
    }

    #[test]
    fn test_log_file() {
        let run = RunDirectory {
            name: "1".to_string(),
            path: PathBuf::from("/data/H264/600/600_small_15/1"),
        };
        assert_eq!(
            run.log_file(),
            PathBuf::from("/data/H264/600/600_small_15/1/logcat.txt")
        );
    }

    #[test]
    fn test_list_run_directories_filters_entries() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("run2")).unwrap();
        fs::create_dir(dir.path().join("run1")).unwrap();
        fs::create_dir(dir.path().join("plots.d")).unwrap();
        fs::write(dir.path().join(".DS_Store"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        fs::write(dir.path().join("README"), b"").unwrap();

        let runs = FsRunDirectories::new()
            .list_run_directories(dir.path())
            .unwrap();

        let names: Vec<&str> = runs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["run1", "run2"]);
        assert_eq!(runs[0].path, dir.path().join("run1"));
    }

    #[test]
    fn test_list_run_directories_with_pattern() {
        let dir = TempDir::new().unwrap();
        for name in ["run1", "run2", "warmup"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }

        let runs = FsRunDirectories::new()
            .with_pattern(RunPattern::parse("run*").unwrap())
            .list_run_directories(dir.path())
            .unwrap();

        assert_eq!(runs.len(), 2);
        assert!(runs.iter().all(|r| r.name.starts_with("run")));
    }

    #[test]
    fn test_list_run_directories_missing() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("H264").join("600");

        let result = FsRunDirectories::new().list_run_directories(&missing);

        match result {
            Err(Error::MissingDirectory(path)) => assert_eq!(path, missing),
            other => panic!("Expected MissingDirectory, got {:?}", other),
        }
    }
}
