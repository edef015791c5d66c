//! Filter preset management
//!
//! Named filters are either convolution kernels or 3x3 color matrices. The
//! library starts with the built-in `blur`, `sharpen`, `greyscale` and `sepia`
//! and can be extended from configuration or from YAML preset files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{ConfigError, ImageError};
use crate::image::{Image, Kernel};
use crate::pixel::ColorMatrix;

/// Names of the filters every library provides.
pub const BUILTIN_PRESETS: [&str; 4] = ["blur", "sharpen", "greyscale", "sepia"];

pub fn is_builtin_preset(name: &str) -> bool {
    BUILTIN_PRESETS.contains(&name)
}

/// A filter that can be applied to an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "matrix", rename_all = "snake_case")]
pub enum FilterPreset {
    Kernel(Kernel),
    ColorMatrix(ColorMatrix),
}

impl FilterPreset {
    pub fn apply(&self, image: &Image, name: &str) -> Result<Image, ImageError> {
        match self {
            FilterPreset::Kernel(kernel) => image.apply_kernel(kernel, name),
            FilterPreset::ColorMatrix(matrix) => image.apply_color_matrix(matrix, name),
        }
    }
}

/// On-disk form of a single preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetFile {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub filter: FilterPreset,
}

/// Filters available by name.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetLibrary {
    presets: BTreeMap<String, FilterPreset>,
}

impl Default for PresetLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PresetLibrary {
    /// Only the built-in filters.
    pub fn builtin() -> Self {
        let mut presets = BTreeMap::new();
        presets.insert("blur".to_string(), FilterPreset::Kernel(Kernel::blur()));
        presets.insert("sharpen".to_string(), FilterPreset::Kernel(Kernel::sharpen()));
        presets.insert(
            "greyscale".to_string(),
            FilterPreset::ColorMatrix(ColorMatrix::GREYSCALE),
        );
        presets.insert(
            "sepia".to_string(),
            FilterPreset::ColorMatrix(ColorMatrix::SEPIA),
        );
        Self { presets }
    }

    /// Built-ins plus the presets of a sanitized configuration.
    ///
    /// Entries that fail validation are skipped with a warning.
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut library = Self::builtin();

        for (name, rows) in &config.kernels {
            let added = Kernel::new(rows.clone())
                .map_err(|err| ConfigError::InvalidPreset {
                    name: name.clone(),
                    reason: err.to_string(),
                })
                .and_then(|kernel| library.insert(name, FilterPreset::Kernel(kernel)));
            if let Err(err) = added {
                log::warn!("skipping kernel preset: {}", err);
            }
        }

        for (name, rows) in &config.color_matrices {
            let added = ColorMatrix::from_rows(rows.as_slice())
                .map_err(|err| ConfigError::InvalidPreset {
                    name: name.clone(),
                    reason: err.to_string(),
                })
                .and_then(|matrix| library.insert(name, FilterPreset::ColorMatrix(matrix)));
            if let Err(err) = added {
                log::warn!("skipping color matrix preset: {}", err);
            }
        }

        library
    }

    /// Add or replace a user preset. Built-in names cannot be replaced.
    pub fn insert(&mut self, name: &str, preset: FilterPreset) -> Result<(), ConfigError> {
        validate_preset_name(name)?;
        if is_builtin_preset(name) {
            return Err(ConfigError::InvalidPreset {
                name: name.to_string(),
                reason: "name is reserved for a built-in filter".to_string(),
            });
        }
        self.presets.insert(name.to_string(), preset);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FilterPreset> {
        self.presets.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }

    /// Preset names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.presets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Load every preset file in `dir`, returning the names that were added.
    pub fn load_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<Vec<String>, ConfigError> {
        let dir = dir.as_ref();
        let mut added = Vec::new();
        for stem in list_preset_files(dir)? {
            let file = load_preset_file(preset_path(dir, &stem))?;
            self.insert(&file.name, file.filter)?;
            added.push(file.name);
        }
        Ok(added)
    }
}

/// Validate a preset name to prevent path traversal attacks.
/// Rejects names containing path separators, "..", or other dangerous patterns.
pub fn validate_preset_name(name: &str) -> Result<(), ConfigError> {
    let reject = |reason: &str| {
        Err(ConfigError::InvalidPreset {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.is_empty() {
        return reject("preset name cannot be empty");
    }

    if name.contains('/') || name.contains('\\') {
        return reject("preset name cannot contain path separators");
    }

    if name.contains("..") {
        return reject("preset name cannot contain '..'");
    }

    // Hidden files
    if name.starts_with('.') {
        return reject("preset name cannot start with '.'");
    }

    if name.contains('\0') {
        return reject("preset name cannot contain null bytes");
    }

    Ok(())
}

/// Load a preset from a YAML file
pub fn load_preset_file<P: AsRef<Path>>(path: P) -> Result<PresetFile, ConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let preset: PresetFile = serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    validate_preset_name(&preset.name)?;
    Ok(preset)
}

/// Save a preset to a YAML file
pub fn save_preset_file<P: AsRef<Path>>(preset: &PresetFile, path: P) -> Result<(), ConfigError> {
    let path = path.as_ref();
    validate_preset_name(&preset.name)?;
    let yaml = serde_yaml::to_string(preset).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    std::fs::write(path, yaml).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// List preset file stems in a directory, sorted and unique.
///
/// When both `x.yml` and `x.yaml` exist, `x` is listed once and the `.yml` file wins.
pub fn list_preset_files<P: AsRef<Path>>(dir: P) -> Result<Vec<String>, ConfigError> {
    let dir = dir.as_ref();
    let io_error = |source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut presets = Vec::new();

    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();

        if matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yml") | Some("yaml")
        ) {
            if let Some(name) = path.file_stem().and_then(|n| n.to_str()) {
                presets.push(name.to_string());
            }
        }
    }

    presets.sort();
    presets.dedup();
    Ok(presets)
}

fn preset_path(dir: &Path, stem: &str) -> PathBuf {
    let yml = dir.join(format!("{}.yml", stem));
    if yml.is_file() {
        yml
    } else {
        dir.join(format!("{}.yaml", stem))
    }
}
