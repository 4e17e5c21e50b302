use std::env;

use serde::{Deserialize, Serialize};

fn default_preview_width() -> f64 {
    800.0
}

fn default_preview_height() -> f64 {
    600.0
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct UiConfig {
    /// Preview container size in display units; the image is fitted inside
    #[serde(default = "default_preview_width")]
    pub preview_width: f64,
    #[serde(default = "default_preview_height")]
    pub preview_height: f64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            preview_width: default_preview_width(),
            preview_height: default_preview_height(),
        }
    }
}

impl UiConfig {
    pub fn apply_env(&mut self) {
        if let Some(width) = env::var("GLIMPSE_PREVIEW_WIDTH")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.preview_width = width;
        }

        if let Some(height) = env::var("GLIMPSE_PREVIEW_HEIGHT")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.preview_height = height;
        }
    }
}
