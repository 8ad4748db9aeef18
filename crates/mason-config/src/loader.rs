//! Configuration file loading
//!
//! `.masonconf` is line-oriented: the key runs up to the first space, the
//! value is the remainder of the line (values may contain spaces). Trailing
//! `\r`/`\n` is stripped. Blank lines are ignored.

use crate::project::{ConfigWarning, ProjectConfig};
use crate::{ConfigError, ConfigResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file, looked up in the working directory
pub const CONFIG_FILE: &str = ".masonconf";

/// A loaded configuration plus any warnings produced while parsing it
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ProjectConfig,
    pub warnings: Vec<ConfigWarning>,
}

/// Load configuration from `<dir>/.masonconf`.
///
/// A missing file is not an error; the defaults are returned. An existing
/// but unreadable file is fatal.
pub fn load_from_dir(dir: &Path) -> ConfigResult<LoadedConfig> {
    let path = dir.join(CONFIG_FILE);
    if !path.is_file() {
        return Ok(LoadedConfig {
            config: ProjectConfig::default(),
            warnings: Vec::new(),
        });
    }
    let text = fs::read_to_string(&path).map_err(|error| ConfigError::ReadError {
        path: path.clone(),
        error,
    })?;
    Ok(parse_str(&text))
}

/// Parse configuration text. Parsing itself never fails; unknown keys are
/// collected as warnings and skipped.
pub fn parse_str(text: &str) -> LoadedConfig {
    let mut config = ProjectConfig::default();
    let mut warnings = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }

        let (key, value) = match line.split_once(' ') {
            Some((key, value)) => (key, value),
            None => (line, ""),
        };

        match key {
            "PROJECT" => config.project_dir = PathBuf::from(value),
            "MAIN" => config.main_file = value.to_string(),
            "INCLUDE" => config.include_dirs.push(PathBuf::from(value)),
            "LINK" => config.link_libs.push(value.to_string()),
            "LIB" => config.lib_dirs.push(PathBuf::from(value)),
            "SOURCE" => config.vendor_sources.push(PathBuf::from(value)),
            other => warnings.push(ConfigWarning {
                line: idx + 1,
                key: other.to_string(),
            }),
        }
    }

    LoadedConfig { config, warnings }
}
