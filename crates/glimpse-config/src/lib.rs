use std::env;

use serde::{Deserialize, Serialize};

use self::ocr::OcrConfig;
use self::selection::SelectionConfig;
use self::ui::UiConfig;

pub mod ocr;
pub mod selection;
pub mod ui;

fn default_log_filter() -> String {
    "info".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct Config {
    pub ocr: OcrConfig,
    pub selection: SelectionConfig,
    pub ui: UiConfig,

    /// Fallback tracing filter when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Emit logs as JSON lines instead of human readable output
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ocr: OcrConfig::default(),
            selection: SelectionConfig::default(),
            ui: UiConfig::default(),
            log_filter: default_log_filter(),
            log_json: false,
        }
    }
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields from `GLIMPSE_*` environment variables
    pub fn apply_env(&mut self) {
        self.ocr.apply_env();
        self.ui.apply_env();

        if let Ok(filter) = env::var("GLIMPSE_LOG") {
            self.log_filter = filter;
        }

        if let Some(json) = env::var("GLIMPSE_LOG_JSON")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.log_json = json;
        }
    }
}
