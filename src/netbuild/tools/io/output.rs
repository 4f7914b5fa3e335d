//! Destinations for generated text.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::netbuild::tools::error::{Result, ToolError};

/// File receiving the formatted error report.
pub const ERRORS_FILE: &str = "ccg-errors.txt";
/// File receiving the ignored-rows log.
pub const IGNORED_FILE: &str = "ccg-ignored.txt";

/// Accepts finished documents from a generation run.
pub trait OutputSink {
    /// Stores the configuration of one device.
    fn write_device(&mut self, device: &str, text: &str) -> Result<()>;

    /// Stores a run-level report such as [`ERRORS_FILE`].
    fn write_report(&mut self, file_name: &str, text: &str) -> Result<()>;
}

/// Writes `<device>.txt` and the reports into one directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    /// Creates the directory when needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if root.exists() && !root.is_dir() {
            return Err(ToolError::InvalidOutput(root));
        }
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a device's configuration is written to. Path separators in the
    /// device name are replaced so every file stays inside the root.
    pub fn device_path(&self, device: &str) -> PathBuf {
        let file_stem: String = device
            .chars()
            .map(|ch| if matches!(ch, '/' | '\\') { '_' } else { ch })
            .collect();
        self.root.join(format!("{file_stem}.txt"))
    }
}

impl OutputSink for DirectorySink {
    fn write_device(&mut self, device: &str, text: &str) -> Result<()> {
        let path = self.device_path(device);
        debug!(path = %path.display(), "writing device configuration");
        fs::write(path, text)?;
        Ok(())
    }

    fn write_report(&mut self, file_name: &str, text: &str) -> Result<()> {
        let path = self.root.join(file_name);
        debug!(path = %path.display(), "writing report");
        fs::write(path, text)?;
        Ok(())
    }
}

/// Keeps everything in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySink {
    pub devices: BTreeMap<String, String>,
    pub reports: BTreeMap<String, String>,
}

impl OutputSink for MemorySink {
    fn write_device(&mut self, device: &str, text: &str) -> Result<()> {
        self.devices.insert(device.to_string(), text.to_string());
        Ok(())
    }

    fn write_report(&mut self, file_name: &str, text: &str) -> Result<()> {
        self.reports.insert(file_name.to_string(), text.to_string());
        Ok(())
    }
}
