use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: Server,
    pub comparator: Comparator,
    pub workspace: Workspace,
    pub limits: Limits,
    #[serde(default)]
    pub debug: Debug,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Server {
    pub bind_addr: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Comparator {
    /// Executable name or path; resolved via PATH when it contains no slash.
    pub command: String,
    /// Fixed leading arguments, e.g. ["-jar", "/opt/mapper/mapper.jar"].
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Workspace {
    pub scratch_root: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Limits {
    pub exec_timeout_s: u64,
    pub max_upload_kb: usize,
    pub max_output_kb: usize,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Debug {
    /// When set, execution failures carry the full command line and captured
    /// output and are emitted as raw text instead of the normal page.
    #[serde(default)]
    pub expose_diagnostics: bool,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)?;
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            Ok(serde_json::from_str(&raw)?)
        } else {
            Ok(toml::from_str(&raw)?)
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.workspace.scratch_root.is_dir() {
            anyhow::bail!(
                "scratch_root does not exist or is not a directory: {}",
                self.workspace.scratch_root.display()
            );
        }
        if self.comparator.command.trim().is_empty() {
            anyhow::bail!("comparator command must not be empty");
        }
        if self.limits.exec_timeout_s == 0 { anyhow::bail!("exec_timeout_s must be > 0"); }
        if self.limits.max_upload_kb == 0 { anyhow::bail!("max_upload_kb must be > 0"); }
        if self.limits.max_output_kb == 0 { anyhow::bail!("max_output_kb must be > 0"); }
        Ok(())
    }
}
