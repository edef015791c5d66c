//! Engine defaults read from the `defaults:` section

use serde::{Deserialize, Serialize};

use crate::image::DEFAULT_MAX_CHANNEL;

/// Defaults applied by the image store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineDefaults {
    /// Create missing parent directories when saving.
    pub create_parent_dirs: bool,

    /// Maximum channel value for images the store creates from scratch.
    pub default_max_channel: u8,
}

impl Default for EngineDefaults {
    fn default() -> Self {
        Self {
            create_parent_dirs: true,
            default_max_channel: DEFAULT_MAX_CHANNEL,
        }
    }
}
