use glimpse_types::SelectionLimits;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct SelectionConfig {
    pub limits: SelectionLimits,
}
