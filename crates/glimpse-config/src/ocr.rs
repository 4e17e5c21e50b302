use std::env;

use serde::{Deserialize, Serialize};

fn default_language() -> String {
    "eng".to_string()
}

fn default_tesseract_path() -> String {
    "tesseract".to_string()
}

fn default_empty_placeholder() -> String {
    "(no text detected)".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct OcrConfig {
    /// Language tag handed to the engine as-is
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_tesseract_path")]
    pub tesseract_path: String,
    /// Tesseract `--psm`, engine default when unset
    pub page_seg_mode: Option<u32>,
    /// Shown instead of an empty result
    #[serde(default = "default_empty_placeholder")]
    pub empty_placeholder: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            tesseract_path: default_tesseract_path(),
            page_seg_mode: None,
            empty_placeholder: default_empty_placeholder(),
        }
    }
}

impl OcrConfig {
    pub fn apply_env(&mut self) {
        if let Ok(language) = env::var("GLIMPSE_LANGUAGE") {
            self.language = language;
        }

        if let Ok(path) = env::var("GLIMPSE_TESSERACT") {
            self.tesseract_path = path;
        }

        if let Some(psm) = env::var("GLIMPSE_PSM").ok().and_then(|v| v.parse().ok()) {
            self.page_seg_mode = Some(psm);
        }
    }
}
