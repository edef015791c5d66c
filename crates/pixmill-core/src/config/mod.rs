//! Engine configuration management.
//!
//! This module provides configuration loading, global verbose flag management,
//! and the engine configuration types.

mod defaults;


pub use defaults::EngineDefaults;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Once, OnceLock};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::image::Kernel;
use crate::pixel::ColorMatrix;
use crate::presets::{is_builtin_preset, validate_preset_name};

// Global verbose flag for controlling debug output
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set the global verbose flag. When true, debug messages will be printed.
pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::SeqCst);
}

/// Check if verbose mode is enabled.
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Print a message to stderr only if verbose mode is enabled.
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if $crate::config::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "PIXMILL_CONFIG";

/// Canonical list of candidate config file names we search for on disk.
const CONFIG_FILENAMES: &[&str] = &["pixmill.yml", "pixmill.yaml"];

/// Public handle that stores the loaded configuration, its source path, and warnings.
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    pub config: EngineConfig,
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

impl ConfigHandle {
    fn with_config(config: EngineConfig, source: Option<PathBuf>, warnings: Vec<String>) -> Self {
        Self {
            config,
            source,
            warnings,
        }
    }
}

/// Complete configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub defaults: EngineDefaults,

    /// User convolution presets by name.
    pub kernels: BTreeMap<String, Vec<Vec<f64>>>,

    /// User 3x3 color presets by name.
    pub color_matrices: BTreeMap<String, Vec<Vec<f64>>>,
}

impl EngineConfig {
    /// Parse YAML text without sanitizing.
    pub fn from_yaml_str(contents: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }

    /// Read and sanitize a single config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<(Self, Vec<String>), ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&contents).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        let mut warnings = Vec::new();
        let config = config.sanitize(&mut warnings);
        Ok((config, warnings))
    }

    /// Drop presets that would fail when applied, recording why.
    pub fn sanitize(mut self, warnings: &mut Vec<String>) -> Self {
        self.kernels.retain(|name, rows| {
            match check_preset_name(name).and_then(|()| {
                Kernel::new(rows.clone())
                    .map(|_| ())
                    .map_err(|err| invalid_preset(name, err))
            }) {
                Ok(()) => true,
                Err(err) => {
                    warnings.push(format!("Dropping kernel preset: {}", err));
                    false
                }
            }
        });

        self.color_matrices.retain(|name, rows| {
            match check_preset_name(name).and_then(|()| {
                ColorMatrix::from_rows(rows.as_slice())
                    .map(|_| ())
                    .map_err(|err| invalid_preset(name, err))
            }) {
                Ok(()) => true,
                Err(err) => {
                    warnings.push(format!("Dropping color matrix preset: {}", err));
                    false
                }
            }
        });

        let shared: Vec<String> = self
            .kernels
            .keys()
            .filter(|name| self.color_matrices.contains_key(*name))
            .cloned()
            .collect();
        for name in shared {
            warnings.push(format!(
                "Dropping color matrix preset '{}': name already used by a kernel preset",
                name
            ));
            self.color_matrices.remove(&name);
        }

        self
    }
}

fn check_preset_name(name: &str) -> Result<(), ConfigError> {
    validate_preset_name(name)?;
    if is_builtin_preset(name) {
        return Err(invalid_preset(name, "name is reserved for a built-in filter"));
    }
    Ok(())
}

fn invalid_preset(name: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidPreset {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// Load configuration from disk, optionally forcing a specific path.
///
/// Unreadable or malformed candidates are skipped with a warning; when no
/// candidate loads, built-in defaults are used.
pub fn load_engine_config(custom_path: Option<&Path>) -> ConfigHandle {
    let mut warnings = Vec::new();
    let candidates = get_config_candidates(custom_path);

    for candidate in candidates {
        if !candidate.is_file() {
            continue;
        }

        match EngineConfig::from_file(&candidate) {
            Ok((config, config_warnings)) => {
                warnings.extend(config_warnings);
                for warning in &warnings {
                    log::warn!("{}", warning);
                }
                let source = fs::canonicalize(&candidate).unwrap_or(candidate);
                log::info!("loaded engine config from {}", source.display());
                return ConfigHandle::with_config(config, Some(source), warnings);
            }
            Err(err) => {
                log::warn!("{}", err);
                warnings.push(err.to_string());
            }
        }
    }

    warnings.push("No engine config found; using built-in defaults.".to_string());
    ConfigHandle::with_config(EngineConfig::default(), None, warnings)
}

/// Get list of config file candidates to try
fn get_config_candidates(custom_path: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = custom_path {
        candidates.push(path.to_path_buf());
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        candidates.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(cwd.join("config").join(name));
        }
        for name in CONFIG_FILENAMES {
            candidates.push(cwd.join(name));
        }
    }

    if let Some(home_dir) = dirs::home_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(home_dir.join("pixmill").join(name));
        }
    }

    candidates
}

static ENGINE_CONFIG_HANDLE: OnceLock<ConfigHandle> = OnceLock::new();
static PRINT_CONFIG_ONCE: Once = Once::new();

/// Access the global engine configuration (loaded once per process).
pub fn engine_config_handle() -> &'static ConfigHandle {
    ENGINE_CONFIG_HANDLE.get_or_init(|| load_engine_config(None))
}

/// Print config source and warnings the first time it is requested (only in verbose mode).
pub fn log_config_usage() {
    PRINT_CONFIG_ONCE.call_once(|| {
        if !is_verbose() {
            return;
        }
        let handle = engine_config_handle();
        if let Some(source) = &handle.source {
            eprintln!("[pixmill] Loaded engine config from {}", source.display());
        } else {
            eprintln!("[pixmill] Using built-in engine defaults");
        }

        for warning in &handle.warnings {
            eprintln!("[pixmill] Config warning: {}", warning);
        }
    });
}
